//! Help popup widget - keyboard shortcuts grouped by screen

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const POPUP_WIDTH: u16 = 46;

/// Width of the key column
const KEY_WIDTH: usize = 20;

/// (group heading, [(keys, action)])
const BINDINGS: &[(&str, &[(&str, &str)])] = &[
    (
        "Dashboard",
        &[
            ("Arrows or h/j/k/l", "Select card"),
            ("Tab / Shift+Tab", "Next / previous card"),
            ("Enter", "Show rows"),
        ],
    ),
    (
        "Details",
        &[
            ("Up/Down or j/k", "Scroll"),
            ("PgUp / PgDn", "Scroll a page"),
            ("Home / End", "First / last row"),
            ("Esc / Enter", "Back to cards"),
        ],
    ),
    (
        "General",
        &[("q / Ctrl+C", "Quit"), ("?", "Toggle help")],
    ),
];

/// Help popup widget showing keyboard shortcuts
pub struct HelpPopup {
    theme: Theme,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Rows needed: borders, top padding, each group (heading, rule,
    /// bindings, gap) and the close hint
    fn popup_height() -> u16 {
        let groups: usize = BINDINGS.iter().map(|(_, keys)| keys.len() + 3).sum();
        (groups + 4) as u16
    }

    /// Calculate centered popup area
    pub fn centered_area(area: Rect) -> Rect {
        let height = Self::popup_height();
        let x = area.x + (area.width.saturating_sub(POPUP_WIDTH)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        Rect {
            x,
            y,
            width: POPUP_WIDTH.min(area.width),
            height: height.min(area.height),
        }
    }

    fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let heading = Style::default()
            .fg(self.theme.value())
            .add_modifier(Modifier::BOLD);
        let rule = "─".repeat(width as usize);

        let mut lines = vec![Line::default()];
        for (title, keys) in BINDINGS {
            lines.push(Line::from(Span::styled(*title, heading)));
            lines.push(Line::from(Span::styled(
                rule.clone(),
                Style::default().fg(self.theme.muted()),
            )));
            lines.extend(keys.iter().map(|(key, action)| {
                Line::from(vec![
                    Span::styled(
                        format!("  {:<width$}", key, width = KEY_WIDTH),
                        Style::default().fg(self.theme.accent()),
                    ),
                    Span::styled(*action, Style::default().fg(self.theme.text())),
                ])
            }));
            lines.push(Line::default());
        }
        lines.push(
            Line::from(Span::styled(
                "Press ? to close",
                Style::default().fg(self.theme.muted()),
            ))
            .alignment(Alignment::Center),
        );
        lines
    }
}

impl Default for HelpPopup {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(format!(" partnerdash v{} ", VERSION))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.lines(inner.width)).render(inner, buf);
    }
}
