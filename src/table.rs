//! Fixed-width text tables with ASCII borders.
//!
//! Widths are measured in Unicode scalar values, so Cyrillic and other
//! multi-byte text lines up with plain ASCII cells.

use std::fmt;
use std::io::Write;

/// Text shown for NULL cells.
pub const MISSING: &str = "N/A";

/// A header row plus buffered data rows, rendered as a bordered table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Number of code points in `s`, i.e. bytes that are not UTF-8 continuation bytes.
pub fn display_width(s: &str) -> usize {
    s.chars().count()
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row; `None` cells render as [`MISSING`].
    ///
    /// Rows shorter than the header are padded with [`MISSING`], longer rows
    /// are truncated, so every rendered line keeps the same column count.
    pub fn push_row<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .take(self.headers.len())
            .map(|cell| cell.unwrap_or_else(|| MISSING.to_string()))
            .collect();
        row.resize(self.headers.len(), MISSING.to_string());
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest cell of each column (header included) plus one space each side.
    pub fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                self.rows
                    .iter()
                    .map(|row| display_width(&row[col]))
                    .fold(display_width(header), usize::max)
                    + 2
            })
            .collect()
    }

    pub fn render<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        write!(out, "{self}")
    }

    fn write_border(f: &mut fmt::Formatter<'_>, widths: &[usize]) -> fmt::Result {
        f.write_str("+")?;
        for width in widths {
            write!(f, "{}+", "-".repeat(*width))?;
        }
        f.write_str("\n")
    }

    fn write_line(f: &mut fmt::Formatter<'_>, widths: &[usize], cells: &[String]) -> fmt::Result {
        f.write_str("|")?;
        for (cell, width) in cells.iter().zip(widths) {
            let pad = width - 1 - display_width(cell);
            write!(f, " {cell}{}|", " ".repeat(pad))?;
        }
        f.write_str("\n")
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();
        Self::write_border(f, &widths)?;
        Self::write_line(f, &widths, &self.headers)?;
        Self::write_border(f, &widths)?;
        for row in &self.rows {
            Self::write_line(f, &widths, row)?;
        }
        Self::write_border(f, &widths)
    }
}
