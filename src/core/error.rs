//! Error type shared by the myls core.
//!
//! Nothing in the core is fatal to a whole run. Every fallible step returns a [ListError]
//! which the caller reports with [report_error](crate::utils::report_error) and then moves on.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListError {
    /// lstat, readdir or readlink failed for a path.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The external status command could not be run or exited non-zero.
    #[error("status query failed: {0}")]
    StatusQuery(String),

    #[error("invalid sort key '{0}': must be name, extension, size, time, or git")]
    InvalidSortKey(String),

    #[error("{0}")]
    InvalidOption(String),
}

impl ListError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ListError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = ListError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path() {
        let err = ListError::io(
            "/no/such/dir",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        let msg = err.to_string();
        assert!(msg.starts_with("/no/such/dir: "), "got {msg:?}");
        assert!(msg.contains("not found"));
    }

    #[test]
    fn sort_key_error_lists_choices() {
        let msg = ListError::InvalidSortKey("colour".into()).to_string();
        assert!(msg.contains("colour"));
        assert!(msg.contains("extension"));
    }
}
