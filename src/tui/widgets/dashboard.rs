//! Dashboard widget - metric cards grouped by section

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::tui::theme::Theme;
use crate::types::{Metric, MetricKey, MetricSet, Section};

/// Maximum content width (keeps layout clean on wide terminals)
const MAX_CONTENT_WIDTH: u16 = 110;

/// Card dimensions
const CARD_WIDTH: u16 = 30;
const CARD_HEIGHT: u16 = 4;
const CARD_SPACING: u16 = 2;

/// Section heading + card row
const SECTION_HEIGHT: u16 = 1 + CARD_HEIGHT;

/// Format a number with thousand separators (e.g., 1234567 -> "1,234,567")
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    // Digits are ASCII, so byte indexing is safe
    for (i, ch) in s.bytes().enumerate() {
        if i > 0 && (len - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(ch as char);
    }

    result
}

/// Selection movement on the card grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Card grid: one row per section, cards in layout order
pub fn grid() -> Vec<&'static [MetricKey]> {
    Section::all().iter().map(|section| section.cards()).collect()
}

/// Selected card, as a grid cell. A metric can sit on more than one
/// card, so the selection is positional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Metric under the cursor
    pub fn key(self) -> MetricKey {
        grid()
            .get(self.row)
            .and_then(|keys| keys.get(self.col))
            .copied()
            .unwrap_or(MetricKey::ActiveProviders)
    }

    /// Move; left/right walk every card and wrap, up/down clamp the column
    pub fn moved(self, direction: Direction) -> Self {
        let grid = grid();
        match direction {
            Direction::Left | Direction::Right => {
                let cells: Vec<Cursor> = grid
                    .iter()
                    .enumerate()
                    .flat_map(|(row, keys)| (0..keys.len()).map(move |col| Cursor::new(row, col)))
                    .collect();
                let idx = cells.iter().position(|c| *c == self).unwrap_or(0);
                let next = if direction == Direction::Right {
                    (idx + 1) % cells.len()
                } else {
                    (idx + cells.len() - 1) % cells.len()
                };
                cells[next]
            }
            Direction::Up | Direction::Down => {
                let row = if direction == Direction::Down {
                    (self.row + 1).min(grid.len() - 1)
                } else {
                    self.row.saturating_sub(1)
                };
                Cursor::new(row, self.col.min(grid[row].len() - 1))
            }
        }
    }
}

/// Dashboard widget
pub struct Dashboard<'a> {
    metrics: &'a MetricSet,
    selected: Cursor,
    sources: &'a str,
    theme: Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(metrics: &'a MetricSet, selected: Cursor, sources: &'a str, theme: Theme) -> Self {
        Self {
            metrics,
            selected,
            sources,
            theme,
        }
    }

    /// First section row to draw so the selected card stays on screen
    fn first_visible_row(&self, grid_height: u16) -> usize {
        let visible = (grid_height / SECTION_HEIGHT).max(1) as usize;
        (self.selected.row + 1).saturating_sub(visible)
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let content_width = area.width.min(MAX_CONTENT_WIDTH);
        let x_offset = (area.width.saturating_sub(content_width)) / 2;
        let centered_area = Rect {
            x: area.x + x_offset,
            y: area.y,
            width: content_width,
            height: area.height,
        };

        let chunks = Layout::vertical([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Sources
            Constraint::Length(1), // Separator
            Constraint::Fill(1),   // Sections
            Constraint::Length(1), // Separator
            Constraint::Length(1), // Keybindings
        ])
        .split(centered_area);

        self.render_title(chunks[0], buf);
        self.render_sources(chunks[1], buf);
        self.render_separator(chunks[2], buf);
        self.render_sections(chunks[3], buf);
        self.render_separator(chunks[4], buf);
        self.render_keybindings(chunks[5], buf);
    }
}

impl Dashboard<'_> {
    fn render_title(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(Span::styled(
            "Partner & Service Dashboard",
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(area, buf);
    }

    fn render_sources(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(Span::styled(
            self.sources,
            Style::default().fg(self.theme.muted()),
        )))
        .alignment(Alignment::Center)
        .render(area, buf);
    }

    fn render_separator(&self, area: Rect, buf: &mut Buffer) {
        let line = "─".repeat(area.width as usize);
        buf.set_string(
            area.x,
            area.y,
            &line,
            Style::default().fg(self.theme.muted()),
        );
    }

    fn render_sections(&self, area: Rect, buf: &mut Buffer) {
        let first = self.first_visible_row(area.height);
        let row_width = 3 * CARD_WIDTH + 2 * CARD_SPACING;
        let start_x = area.x + area.width.saturating_sub(row_width) / 2;

        for (i, (row, section)) in Section::all().iter().enumerate().skip(first).enumerate() {
            let y = area.y + i as u16 * SECTION_HEIGHT;
            if y + SECTION_HEIGHT > area.y + area.height {
                break;
            }

            buf.set_string(
                start_x,
                y,
                section.title(),
                Style::default()
                    .fg(self.theme.section(*section))
                    .add_modifier(Modifier::BOLD),
            );

            for (col, metric) in self.metrics.section(*section).enumerate() {
                let card_area = Rect {
                    x: start_x + col as u16 * (CARD_WIDTH + CARD_SPACING),
                    y: y + 1,
                    width: CARD_WIDTH,
                    height: CARD_HEIGHT,
                };
                if card_area.right() > area.right() {
                    break;
                }
                self.render_card(card_area, buf, metric, self.selected == Cursor::new(row, col));
            }
        }
    }

    fn render_card(&self, area: Rect, buf: &mut Buffer, metric: &Metric, is_selected: bool) {
        let border_style = if is_selected {
            Style::default()
                .fg(self.theme.accent())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.theme.card_border())
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .render(area, buf);

        let value = format_number(metric.count as u64);
        let value_x = area.x + (area.width.saturating_sub(value.len() as u16)) / 2;
        buf.set_string(
            value_x,
            area.y + 1,
            &value,
            Style::default()
                .fg(self.theme.value())
                .add_modifier(Modifier::BOLD),
        );

        let label = metric.key.label();
        let label_x = area.x + (area.width.saturating_sub(label.len() as u16)) / 2;
        let label_color = if is_selected {
            self.theme.accent()
        } else {
            self.theme.muted()
        };
        buf.set_string(label_x, area.y + 2, label, Style::default().fg(label_color));
    }

    fn render_keybindings(&self, area: Rect, buf: &mut Buffer) {
        let bindings = Paragraph::new(Line::from(vec![
            Span::styled("←↑↓→", Style::default().fg(self.theme.accent())),
            Span::styled(": Select", Style::default().fg(self.theme.muted())),
            Span::raw("  "),
            Span::styled("Enter", Style::default().fg(self.theme.accent())),
            Span::styled(": Details", Style::default().fg(self.theme.muted())),
            Span::raw("  "),
            Span::styled("?", Style::default().fg(self.theme.accent())),
            Span::styled(": Help", Style::default().fg(self.theme.muted())),
            Span::raw("  "),
            Span::styled("q", Style::default().fg(self.theme.accent())),
            Span::styled(": Quit", Style::default().fg(self.theme.muted())),
        ]))
        .alignment(Alignment::Center);

        bindings.render(area, buf);
    }
}
