//! Output of sorted entry batches.
//!
//! The [Printer] writes one batch at a time in one of three formats: the long metadata table,
//! one name per line, or the tab aligned grid computed by [layout](crate::core::layout).
//! Column widths of the long format are recomputed for every batch.

use crate::core::entry::Entry;
use crate::core::error::ListError;
use crate::core::formatter::{
    TIME_FORMAT_OLD, TIME_FORMAT_RECENT, classified_name, format_file_time, mode_header,
    render_mode, size_column,
};
use crate::core::layout::{TAB_WIDTH, layout_columns};
use crate::core::status::StatusCode;

use chrono::{Datelike, Local};
use crossterm::style::Stylize;
use unicode_width::UnicodeWidthStr;

use std::io::{self, Write};

/// Output format for entry batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Mode, size, time, optional status and name per line.
    Long,
    OnePerLine,
    #[default]
    Grid,
}

/// Presentation settings for a [Printer].
#[derive(Debug, Clone)]
pub struct PrintOptions {
    pub format: OutputFormat,
    pub line_width: usize,
    pub tab_width: usize,
    pub time_format_recent: String,
    pub time_format_old: String,
    /// Underline the long format header.
    pub styled: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            format: OutputFormat::Grid,
            line_width: 80,
            tab_width: TAB_WIDTH,
            time_format_recent: TIME_FORMAT_RECENT.to_string(),
            time_format_old: TIME_FORMAT_OLD.to_string(),
            styled: false,
        }
    }
}

/// One formatted row of the long format.
struct LongRow {
    mode: String,
    size: String,
    time: String,
    status: String,
    name: String,
}

pub struct Printer<W: Write> {
    out: W,
    opts: PrintOptions,
    current_year: i32,
    header_written: bool,
    errors: Vec<ListError>,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, opts: PrintOptions) -> Self {
        Printer {
            out,
            opts,
            current_year: Local::now().year(),
            header_written: false,
            errors: Vec::new(),
        }
    }

    /// Errors met while formatting (e.g. unreadable symlink targets) since the last call.
    pub fn take_errors(&mut self) -> Vec<ListError> {
        std::mem::take(&mut self.errors)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes a blank separator line.
    pub fn blank_line(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    /// Writes a `<title>:` section label.
    pub fn section_title(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "{}:", title)
    }

    /// Writes the long format column header. Only the first call has an effect.
    pub fn long_header(&mut self) -> io::Result<()> {
        if self.opts.format != OutputFormat::Long || self.header_written {
            return Ok(());
        }
        self.header_written = true;

        let titles = [mode_header(), "Size", "Date Modified", "Name"];
        let line = if self.opts.styled {
            titles
                .iter()
                .map(|&t| t.underlined().to_string())
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            titles.join(" ")
        };
        writeln!(self.out, "{}", line)
    }

    /// Writes one batch of entries in the configured format.
    pub fn print_entries(&mut self, entries: &[Entry]) -> io::Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        match self.opts.format {
            OutputFormat::Long => self.print_long(entries),
            OutputFormat::OnePerLine => self.print_one_per_line(entries),
            OutputFormat::Grid => self.print_grid(entries),
        }
    }

    fn print_long(&mut self, entries: &[Entry]) -> io::Result<()> {
        let mut rows = Vec::with_capacity(entries.len());
        let (mut size_w, mut time_w, mut status_w) = (0, 0, 0);

        for entry in entries {
            let row = self.long_row(entry);
            size_w = size_w.max(row.size.width());
            time_w = time_w.max(row.time.width());
            status_w = status_w.max(row.status.width());
            rows.push(row);
        }

        if status_w > 0 {
            status_w += 1; // separated from the time when visible
        }
        for mut row in rows {
            if status_w > 0 && row.status.is_empty() {
                row.status = StatusCode::PLACEHOLDER.to_string();
            }
            writeln!(
                self.out,
                "{} {:>size_w$} {:<time_w$}{:>status_w$} {}",
                row.mode, row.size, row.time, row.status, row.name,
            )?;
        }
        Ok(())
    }

    fn long_row(&mut self, entry: &Entry) -> LongRow {
        let mut name = classified_name(entry);
        if entry.is_symlink() {
            match entry.link_target() {
                Ok(target) => {
                    name.push_str(" -> ");
                    name.push_str(&target.to_string_lossy());
                }
                Err(e) => self.errors.push(e),
            }
        }

        LongRow {
            mode: render_mode(entry),
            size: size_column(entry),
            time: format_file_time(
                entry.modified(),
                self.current_year,
                &self.opts.time_format_recent,
                &self.opts.time_format_old,
            ),
            status: entry.status().map(|s| s.to_string()).unwrap_or_default(),
            name,
        }
    }

    fn print_one_per_line(&mut self, entries: &[Entry]) -> io::Result<()> {
        for entry in entries {
            writeln!(self.out, "{}", classified_name(entry))?;
        }
        Ok(())
    }

    fn print_grid(&mut self, entries: &[Entry]) -> io::Result<()> {
        let names: Vec<String> = entries.iter().map(classified_name).collect();
        let grid = layout_columns(&names, self.opts.tab_width, self.opts.line_width);
        for line in grid.render(&names) {
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }
}
