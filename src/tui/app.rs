//! Application state and event loop

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    DefaultTerminal, Frame,
};

use crate::types::{DashboardError, MetricSet};

use super::theme::Theme;
use super::widgets::{
    dashboard::{Cursor, Dashboard, Direction},
    detail::DetailView,
    help::HelpPopup,
};

/// Application state
pub enum AppState {
    /// Metrics computed for this pass
    Ready { data: Box<AppData> },
    /// One or both inputs absent; the dashboard is not drawn
    NeedsInput { message: String },
    /// Load or aggregation failed
    Error { message: String },
}

/// Loaded application data
#[derive(Debug)]
pub struct AppData {
    pub metrics: MetricSet,
    /// Where the two tables came from, for the header line
    pub sources: String,
}

/// Main application
pub struct App {
    state: AppState,
    should_quit: bool,
    selected: Cursor,
    /// Scroll offset of the open drill-down, if any
    detail_scroll: Option<usize>,
    show_help: bool,
    theme: Theme,
    viewport_height: u16,
}

impl App {
    /// Create an app from the outcome of a load-then-aggregate pass
    pub fn new(outcome: Result<AppData, DashboardError>, theme: Theme) -> Self {
        let state = match outcome {
            Ok(data) => AppState::Ready {
                data: Box::new(data),
            },
            Err(err @ DashboardError::MissingInput(_)) => AppState::NeedsInput {
                message: err.to_string(),
            },
            Err(err) => AppState::Error {
                message: err.to_string(),
            },
        };

        Self {
            state,
            should_quit: false,
            selected: Cursor::default(),
            detail_scroll: None,
            show_help: false,
            theme,
            viewport_height: 24,
        }
    }

    /// Record the terminal height (bounds drill-down scrolling)
    pub fn set_viewport_height(&mut self, height: u16) {
        self.viewport_height = height;
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            match key.code {
                KeyCode::Char('?') | KeyCode::Esc => self.show_help = false,
                KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        if self.detail_scroll.is_some() {
            self.handle_detail_key(key.code);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(Direction::Up),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(Direction::Down),
            KeyCode::Left | KeyCode::Char('h') => self.move_selection(Direction::Left),
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
                self.move_selection(Direction::Right)
            }
            KeyCode::BackTab => self.move_selection(Direction::Left),
            KeyCode::Enter => {
                if matches!(self.state, AppState::Ready { .. }) {
                    self.detail_scroll = Some(0);
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, code: KeyCode) {
        let max = self.max_detail_scroll();
        let Some(scroll) = self.detail_scroll.as_mut() else {
            return;
        };
        let page = DetailView::visible_rows(self.viewport_height);
        match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => self.detail_scroll = None,
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = (*scroll + 1).min(max),
            KeyCode::PageUp => *scroll = scroll.saturating_sub(page),
            KeyCode::PageDown => *scroll = (*scroll + page).min(max),
            KeyCode::Home => *scroll = 0,
            KeyCode::End => *scroll = max,
            _ => {}
        }
    }

    fn move_selection(&mut self, direction: Direction) {
        self.selected = self.selected.moved(direction);
    }

    fn max_detail_scroll(&self) -> usize {
        match &self.state {
            AppState::Ready { data } => data
                .metrics
                .get(self.selected.key())
                .map(|m| DetailView::max_scroll_offset(m, self.viewport_height))
                .unwrap_or(0),
            _ => 0,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn render_message(&self, area: Rect, buf: &mut Buffer, lines: Vec<Line<'_>>) {
        let height = lines.len() as u16;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let message_area = Rect {
            x: area.x,
            y,
            width: area.width,
            height: height.min(area.height),
        };
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(message_area, buf);
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.state {
            AppState::Ready { data } => {
                Dashboard::new(&data.metrics, self.selected, &data.sources, self.theme)
                    .render(area, buf);

                if self.detail_scroll.is_some() {
                    if let Some(metric) = data.metrics.get(self.selected.key()) {
                        DetailView::new(metric, self.detail_scroll.unwrap_or(0), self.theme)
                            .render(area, buf);
                    }
                }
            }
            AppState::NeedsInput { message } => {
                let lines = vec![
                    Line::from(Span::styled(
                        "Upload both CSVs or enable the default data directory.",
                        Style::default().fg(self.theme.accent()),
                    )),
                    Line::from(Span::styled(
                        message.as_str(),
                        Style::default().fg(self.theme.muted()),
                    )),
                    Line::from(Span::styled(
                        "Run with --providers <provider.csv> --services <services.csv>. Press q to quit.",
                        Style::default().fg(self.theme.muted()),
                    )),
                ];
                self.render_message(area, buf, lines);
            }
            AppState::Error { message } => {
                let lines = vec![Line::from(Span::styled(
                    format!("Error: {}", message),
                    Style::default().fg(self.theme.error()),
                ))];
                self.render_message(area, buf, lines);
            }
        }

        if self.show_help {
            let popup_area = HelpPopup::centered_area(area);
            HelpPopup::new(self.theme).render(popup_area, buf);
        }
    }
}

/// Run the TUI application
pub fn run(app: App) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, app);
    ratatui::restore();
    result
}

fn run_app(terminal: &mut DefaultTerminal, mut app: App) -> anyhow::Result<()> {
    loop {
        app.set_viewport_height(terminal.size()?.height);
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        let ev = event::read()?;
        app.handle_event(ev);
    }

    Ok(())
}
