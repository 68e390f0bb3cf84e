//! Boxed tables for step listings and run summaries.
//!
//! Cells carry their style separately from their text so that column
//! widths are measured on what the operator sees, not on escape codes.

use console::{measure_text_width, Style};

use super::theme::BaselineTheme;

/// Horizontal placement of a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// One table cell.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    text: String,
    style: Option<Style>,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    /// A cell drawn with `style` after padding.
    pub fn styled(text: impl Into<String>, style: &Style) -> Self {
        Self {
            text: text.into(),
            style: Some(style.clone()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn width(&self) -> usize {
        measure_text_width(&self.text)
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::plain(text)
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::plain(text)
    }
}

#[derive(Debug)]
struct Column {
    header: String,
    align: Align,
    width: usize,
}

/// A boxed table of steps.
#[derive(Debug)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        let columns = headers
            .iter()
            .map(|h| Column {
                header: h.to_string(),
                align: Align::Left,
                width: measure_text_width(h),
            })
            .collect();
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Right-align column `index` (durations).
    pub fn align(mut self, index: usize, align: Align) -> Self {
        if let Some(column) = self.columns.get_mut(index) {
            column.align = align;
        }
        self
    }

    /// Append a row. Cells beyond the header count are dropped; missing
    /// cells render empty.
    pub fn add_row<I, C>(&mut self, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        let mut row: Vec<Cell> = cells.into_iter().map(Into::into).collect();
        row.truncate(self.columns.len());
        for (column, cell) in self.columns.iter_mut().zip(&row) {
            column.width = column.width.max(cell.width());
        }
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self, theme: &BaselineTheme) -> String {
        let headers: Vec<Cell> = self
            .columns
            .iter()
            .map(|c| Cell::styled(c.header.as_str(), &theme.highlight))
            .collect();

        let mut lines = vec![
            self.border(theme, '┌', '┬', '┐'),
            self.row(theme, &headers),
            self.border(theme, '├', '┼', '┤'),
        ];
        lines.extend(self.rows.iter().map(|r| self.row(theme, r)));
        lines.push(self.border(theme, '└', '┴', '┘'));
        lines.join("\n")
    }

    fn border(&self, theme: &BaselineTheme, left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = self
            .columns
            .iter()
            .map(|c| "─".repeat(c.width + 2))
            .collect();
        let line = format!("{}{}{}", left, segments.join(&mid.to_string()), right);
        theme.border.apply_to(line).to_string()
    }

    fn row(&self, theme: &BaselineTheme, cells: &[Cell]) -> String {
        let bar = theme.border.apply_to("│").to_string();
        let mut line = bar.clone();
        for (i, column) in self.columns.iter().enumerate() {
            let blank = Cell::default();
            let cell = cells.get(i).unwrap_or(&blank);
            let pad = " ".repeat(column.width - cell.width().min(column.width));
            let text = match &cell.style {
                Some(style) => style.apply_to(cell.text.as_str()).to_string(),
                None => cell.text.clone(),
            };
            let padded = match column.align {
                Align::Left => format!("{}{}", text, pad),
                Align::Right => format!("{}{}", pad, text),
            };
            line.push_str(&format!(" {} {}", padded, bar));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> BaselineTheme {
        BaselineTheme::plain()
    }

    #[test]
    fn empty_table_still_shows_headers() {
        let table = Table::new(&["ID", "Step"]);
        assert!(table.is_empty());
        let output = table.render(&plain());
        assert!(output.contains("ID"));
        assert!(output.contains("Step"));
        assert_eq!(output.lines().count(), 4);
    }

    #[test]
    fn columns_grow_to_the_widest_cell() {
        let mut table = Table::new(&["ID", "Step"]);
        table.add_row(["01", "01-kernel-headers"]);
        table.add_row(["02", "02-macbook-drivers"]);
        assert_eq!(table.row_count(), 2);

        let output = table.render(&plain());
        let widths: Vec<usize> = output.lines().map(measure_text_width).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
        assert!(output.contains("│ 02-macbook-drivers │"));
    }

    #[test]
    fn right_aligned_column_pads_on_the_left() {
        let mut table = Table::new(&["Step", "Duration"]).align(1, Align::Right);
        table.add_row(["01-kernel-headers", "2.0s"]);
        let output = table.render(&plain());
        assert!(output.contains("│     2.0s │"));
    }

    #[test]
    fn styled_cells_are_padded_by_visible_width() {
        let red = Style::new().red().force_styling(true);
        let mut table = Table::new(&["Status"]);
        table.add_row([Cell::styled("Failed", &red)]);
        table.add_row([Cell::plain("Ok")]);

        let output = table.render(&plain());
        let widths: Vec<usize> = output.lines().map(measure_text_width).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
        assert!(output.contains('\u{1b}'));
    }

    #[test]
    fn short_rows_render_blank_cells() {
        let mut table = Table::new(&["ID", "Step", "Reboot"]);
        table.add_row(["01", "01-kernel-headers"]);
        let output = table.render(&plain());
        assert!(output.contains("│ 01 │ 01-kernel-headers │        │"));
    }

    #[test]
    fn extra_cells_are_dropped() {
        let mut table = Table::new(&["ID"]);
        table.add_row(["01", "ignored"]);
        assert!(!table.render(&plain()).contains("ignored"));
    }
}
