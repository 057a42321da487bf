//! Drill-down view - the rows behind one metric card

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Widget},
};

use super::dashboard::format_number;
use crate::tui::theme::Theme;
use crate::types::{Metric, Subset};

/// Widest a single column is allowed to grow
const MAX_COLUMN_WIDTH: usize = 24;

/// Border, header row and footer line
const CHROME_ROWS: u16 = 4;

/// Drill-down popup for a metric
pub struct DetailView<'a> {
    metric: &'a Metric,
    scroll: usize,
    theme: Theme,
}

impl<'a> DetailView<'a> {
    pub fn new(metric: &'a Metric, scroll: usize, theme: Theme) -> Self {
        Self {
            metric,
            scroll,
            theme,
        }
    }

    /// Rows that fit in a view of the given height
    pub fn visible_rows(height: u16) -> usize {
        height.saturating_sub(CHROME_ROWS).max(1) as usize
    }

    /// Largest useful scroll offset for a metric shown at the given height
    pub fn max_scroll_offset(metric: &Metric, height: u16) -> usize {
        let rows = metric.detail.as_ref().map(Subset::len).unwrap_or(0);
        rows.saturating_sub(Self::visible_rows(height))
    }
}

/// Column widths sized to content, capped
fn column_widths(subset: &Subset) -> Vec<Constraint> {
    subset
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let widest = subset
                .rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(name.chars().count());
            Constraint::Length(widest.min(MAX_COLUMN_WIDTH) as u16)
        })
        .collect()
}

impl Widget for DetailView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let title = format!(
            " {} ({}) ",
            self.metric.key.label(),
            format_number(self.metric.count as u64)
        );
        let block = Block::default()
            .title(title)
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));
        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Table
            Constraint::Length(1), // Footer
        ])
        .split(inner);

        match &self.metric.detail {
            None => {
                Paragraph::new(Line::from(Span::styled(
                    "Column not present in the uploaded data",
                    Style::default().fg(self.theme.muted()),
                )))
                .alignment(Alignment::Center)
                .render(chunks[0], buf);
            }
            Some(subset) if subset.is_empty() => {
                Paragraph::new(Line::from(Span::styled(
                    "No matching rows",
                    Style::default().fg(self.theme.muted()),
                )))
                .alignment(Alignment::Center)
                .render(chunks[0], buf);
            }
            Some(subset) => self.render_table(subset, chunks[0], buf),
        }

        self.render_footer(chunks[1], buf);
    }
}

impl DetailView<'_> {
    fn render_table(&self, subset: &Subset, area: Rect, buf: &mut Buffer) {
        let header = Row::new(subset.columns.iter().map(|c| Cell::from(c.as_str()))).style(
            Style::default()
                .fg(self.theme.accent())
                .add_modifier(Modifier::BOLD),
        );

        let visible = Self::visible_rows(area.height + 3);
        let rows = subset
            .rows
            .iter()
            .skip(self.scroll)
            .take(visible)
            .map(|row| {
                Row::new(row.iter().map(|c| Cell::from(c.as_str())))
                    .style(Style::default().fg(self.theme.text()))
            });

        Table::new(rows, column_widths(subset))
            .header(header)
            .column_spacing(2)
            .render(area, buf);
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        let total = self.metric.detail.as_ref().map(Subset::len).unwrap_or(0);
        let position = if total == 0 {
            String::new()
        } else {
            format!("row {}/{}  ", (self.scroll + 1).min(total), total)
        };

        Paragraph::new(Line::from(vec![
            Span::styled(position, Style::default().fg(self.theme.muted())),
            Span::styled("↑↓", Style::default().fg(self.theme.accent())),
            Span::styled(": Scroll", Style::default().fg(self.theme.muted())),
            Span::raw("  "),
            Span::styled("Esc", Style::default().fg(self.theme.accent())),
            Span::styled(": Back", Style::default().fg(self.theme.muted())),
        ]))
        .alignment(Alignment::Center)
        .render(area, buf);
    }
}
