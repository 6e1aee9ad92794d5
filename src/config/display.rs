//! Display configuration options for myls
//!
//! This module defines the `[display]` table of myls.toml: the output format and the chrono
//! time formats used by the long format.

use crate::core::formatter::{TIME_FORMAT_OLD, TIME_FORMAT_RECENT, is_valid_time_format};

use serde::Deserialize;

/// Display configuration options
///
/// Default values are provided for all options, so a partial table is valid.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Display {
    long: bool,
    one_per_line: bool,
    time_format_recent: String,
    time_format_old: String,
}

impl Default for Display {
    fn default() -> Self {
        Display {
            long: false,
            one_per_line: false,
            time_format_recent: TIME_FORMAT_RECENT.to_string(),
            time_format_old: TIME_FORMAT_OLD.to_string(),
        }
    }
}

/// Public methods for accessing display configuration options
impl Display {
    pub fn long(&self) -> bool {
        self.long
    }

    pub fn one_per_line(&self) -> bool {
        self.one_per_line
    }

    /// Format for times within the current year.
    pub fn time_format_recent(&self) -> &str {
        &self.time_format_recent
    }

    pub fn time_format_old(&self) -> &str {
        &self.time_format_old
    }

    /// Replaces the recent time format if `fmt` is usable.
    pub(crate) fn set_time_format_recent(&mut self, fmt: String) {
        if accept_time_format("time_format_recent", &fmt) {
            self.time_format_recent = fmt;
        }
    }

    /// Replaces the old time format if `fmt` is usable.
    pub(crate) fn set_time_format_old(&mut self, fmt: String) {
        if accept_time_format("time_format_old", &fmt) {
            self.time_format_old = fmt;
        }
    }

    /// Resets time formats from the config file that are empty or can not be rendered.
    pub(crate) fn validated(mut self) -> Self {
        let defaults = Display::default();
        if !accept_time_format("time_format_recent", &self.time_format_recent) {
            self.time_format_recent = defaults.time_format_recent;
        }
        if !accept_time_format("time_format_old", &self.time_format_old) {
            self.time_format_old = defaults.time_format_old;
        }
        self
    }
}

/// Empty formats are skipped quietly; invalid ones are logged.
fn accept_time_format(key: &str, fmt: &str) -> bool {
    if fmt.is_empty() {
        log::debug!("empty {key}, keeping the previous format");
        return false;
    }
    if !is_valid_time_format(fmt) {
        log::warn!("ignoring {key} {fmt:?}: not a valid time format");
        return false;
    }
    true
}
