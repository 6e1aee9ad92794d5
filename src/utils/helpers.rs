//! Helpers for myls.
//!
//! Small utilities shared by the binary and the core:
//! - Lexical path normalization (no filesystem access)
//! - Displaying home directories as "~" in section titles
//! - Boolean environment words
//! - Error reporting and terminal width detection

use crate::core::ListError;

use std::io::{self, IsTerminal};
use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};

/// Program name used as the prefix of error lines.
pub const PROG_NAME: &str = "myls";

/// Line width used when stdout is not a terminal.
pub const DEFAULT_LINE_WIDTH: usize = 80;

/// Makes `path` absolute and removes `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root. If the current directory can not be determined a
/// relative path is normalized as is.
pub fn normalize_path(path: &Path) -> PathBuf {
    let joined;
    let path = if path.is_absolute() {
        path
    } else {
        match std::env::current_dir() {
            Ok(cwd) => {
                joined = cwd.join(path);
                &joined
            }
            Err(_) => path,
        }
    };

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if out.file_name().is_some() {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Util function to shorten home directory to ~.
/// Is used for the section titles of directory listings.
pub fn shorten_home_path<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    if let Some(home_dir) = dirs::home_dir()
        && let Ok(stripped) = path.strip_prefix(&home_dir)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        } else {
            let mut short = stripped.display().to_string();
            if short.starts_with(MAIN_SEPARATOR) {
                short.remove(0);
            }
            return format!("~{}{}", MAIN_SEPARATOR, short);
        }
    }
    path.display().to_string()
}

/// Parses a boolean word as accepted in environment variables.
///
/// Accepts `1 t true yes on` and `0 f false no off`, ignoring case.
pub fn parse_bool_word(word: &str) -> Option<bool> {
    match word.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Prints `myls: <error>` to stderr.
pub fn report_error(err: &ListError) {
    eprintln!("{}: {}", PROG_NAME, err);
}

/// Whether stdout is attached to a terminal.
pub fn stdout_is_terminal() -> bool {
    io::stdout().is_terminal()
}

/// Width available for the grid format.
pub fn line_width() -> usize {
    if !stdout_is_terminal() {
        return DEFAULT_LINE_WIDTH;
    }
    match crossterm::terminal::size() {
        Ok((cols, _)) if cols > 0 => cols as usize,
        Ok(_) => DEFAULT_LINE_WIDTH,
        Err(e) => {
            log::debug!("terminal size unavailable: {e}");
            DEFAULT_LINE_WIDTH
        }
    }
}
