//! Effective settings for one run.
//!
//! [Options] is the last configuration layer: command line flags on top of the [Config]
//! (which already carries the file and environment layers).

use crate::config::Config;
use crate::core::{OutputFormat, PrintOptions, ScanOptions, Sorter, TAB_WIDTH};
use crate::utils::cli::CliArgs;

#[derive(Debug, Clone)]
pub struct Options {
    pub all: bool,
    pub dirs_as_files: bool,
    pub long: bool,
    pub one_per_line: bool,
    pub git: bool,
    pub sorter: Sorter,
    pub time_format_recent: String,
    pub time_format_old: String,
}

impl Options {
    pub fn resolve(config: &Config, cli: &CliArgs) -> Self {
        let general = config.general();
        let display = config.display();
        let key = cli.sort.unwrap_or(general.sort());
        let reverse = cli.reverse.unwrap_or(general.reverse());
        let dirs_first = cli.dirs_first.unwrap_or(general.dirs_first());

        Options {
            all: cli.all.unwrap_or(general.all()),
            dirs_as_files: cli.dirs_as_files.unwrap_or(false),
            long: cli.long.unwrap_or(display.long()),
            one_per_line: cli.one_per_line.unwrap_or(display.one_per_line()),
            git: cli.git.unwrap_or(general.git()),
            sorter: Sorter::new(key, reverse, dirs_first),
            time_format_recent: display.time_format_recent().to_string(),
            time_format_old: display.time_format_old().to_string(),
        }
    }

    /// Status is only shown in the long format.
    #[inline]
    pub fn show_status(&self) -> bool {
        self.long && self.git
    }

    pub fn format(&self) -> OutputFormat {
        if self.long {
            OutputFormat::Long
        } else if self.one_per_line {
            OutputFormat::OnePerLine
        } else {
            OutputFormat::Grid
        }
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            show_all: self.all,
            status: self.show_status(),
            sorter: self.sorter,
        }
    }

    pub fn print_options(&self, line_width: usize, styled: bool) -> PrintOptions {
        PrintOptions {
            format: self.format(),
            line_width,
            tab_width: TAB_WIDTH,
            time_format_recent: self.time_format_recent.clone(),
            time_format_old: self.time_format_old.clone(),
            styled,
        }
    }
}
