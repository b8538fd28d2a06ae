//! Fixed-width report table.
//!
//! Operators compare two terminals side by side, so every column but the
//! last is padded to at least the column width and never truncated.

use latency_types::ReportRow;
use std::io::{self, Write};

/// Minimum width of every column except the last.
pub const DEFAULT_COLUMN_WIDTH: usize = 32;

/// Column titles in print order.
pub const COLUMN_TITLES: [&str; 5] = [
    "current time",
    "file lastmodified",
    "file contents",
    "file inner timestamp",
    "file name",
];

/// Printed after every completed scan cycle.
const HEARTBEAT: &str = ".";

/// Column layout for the report table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    column_width: usize,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMN_WIDTH)
    }
}

impl TableLayout {
    /// Layout with the given minimum column width.
    pub fn new(column_width: usize) -> Self {
        Self { column_width }
    }

    /// Minimum column width.
    pub fn column_width(&self) -> usize {
        self.column_width
    }

    /// The title line.
    pub fn header_line(&self) -> String {
        self.render(COLUMN_TITLES)
    }

    /// The `=` underline, one run per title.
    pub fn separator_line(&self) -> String {
        let underlines = COLUMN_TITLES.map(|title| "=".repeat(title.len()));
        self.render(underlines.each_ref().map(String::as_str))
    }

    /// A data line.
    pub fn row_line(&self, row: &ReportRow) -> String {
        self.render(row.fields())
    }

    fn render(&self, fields: [&str; 5]) -> String {
        let [leading @ .., last] = fields;
        let mut line = String::with_capacity(self.column_width * leading.len() + last.len());
        for field in leading {
            line.push_str(&format!("{:<width$}", field, width = self.column_width));
        }
        line.push_str(last);
        line
    }
}

/// Writes the report table to any output stream.
#[derive(Debug)]
pub struct TableWriter<W: Write> {
    out: W,
    layout: TableLayout,
}

impl<W: Write> TableWriter<W> {
    /// Create a writer with the given layout.
    pub fn new(out: W, layout: TableLayout) -> Self {
        Self { out, layout }
    }

    /// Blank line, title line, underline.
    pub fn write_header(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", self.layout.header_line())?;
        writeln!(self.out, "{}", self.layout.separator_line())
    }

    /// Start a batch of rows on a fresh line after heartbeat dots.
    pub fn begin_rows(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    /// One data line.
    pub fn write_row(&mut self, row: &ReportRow) -> io::Result<()> {
        writeln!(self.out, "{}", self.layout.row_line(row))
    }

    /// The per-cycle progress marker.
    pub fn write_heartbeat(&mut self) -> io::Result<()> {
        write!(self.out, "{}", HEARTBEAT)
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Recover the underlying stream.
    pub fn into_inner(self) -> W {
        self.out
    }
}
