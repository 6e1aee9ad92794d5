//! Miscellaneous utility functions for myls.
//!
//! This module holds the [helpers] submodule (path normalization, `~` abbreviation, boolean
//! words, error reporting, terminal width) and the [cli] argument parser.

pub mod cli;
pub mod helpers;

pub use helpers::{
    DEFAULT_LINE_WIDTH, PROG_NAME, line_width, normalize_path, parse_bool_word, report_error,
    shorten_home_path, stdout_is_terminal,
};
