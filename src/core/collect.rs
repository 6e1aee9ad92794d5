//! Expansion of command line patterns into entries.
//!
//! Every argument is first tried as a glob pattern (shells on Windows do not expand them); when
//! that yields nothing it is used as a literal path. Each resulting path is `lstat`ed and put
//! either in the `files` list (shown directly) or the `dirs` list (whose contents are listed).

use crate::core::entry::Entry;
use crate::core::error::ListError;

use std::path::PathBuf;

const GLOB_META: [char; 3] = ['*', '?', '['];

/// Entries gathered from the command line, in argument and match order.
#[derive(Debug, Default)]
pub struct Collected {
    pub files: Vec<Entry>,
    pub dirs: Vec<Entry>,
    pub errors: Vec<ListError>,
}

impl Collected {
    /// Nothing to list; errors alone do not count.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }
}

/// Expands `patterns` (the current directory when empty) into files and directories.
///
/// With `dirs_as_files` directories are shown themselves instead of their contents.
/// Paths that can not be `lstat`ed are reported in [Collected::errors] and skipped.
pub fn collect_entries<S: AsRef<str>>(patterns: &[S], dirs_as_files: bool) -> Collected {
    let mut collected = Collected::default();
    let patterns: Vec<&str> = if patterns.is_empty() {
        vec!["."]
    } else {
        patterns.iter().map(AsRef::as_ref).collect()
    };

    for pattern in patterns {
        for path in expand(pattern, &mut collected.errors) {
            let name = path.to_string_lossy().into_owned();
            let entry = match Entry::lstat(name, &path) {
                Ok(entry) => entry,
                Err(e) => {
                    collected.errors.push(e);
                    continue;
                }
            };
            if !dirs_as_files && entry.is_dir() {
                collected.dirs.push(entry);
            } else {
                collected.files.push(entry);
            }
        }
    }
    collected
}

/// Glob matches for `pattern`, or the pattern itself as a literal path.
fn expand(pattern: &str, errors: &mut Vec<ListError>) -> Vec<PathBuf> {
    if !pattern.contains(GLOB_META) {
        return vec![PathBuf::from(pattern)];
    }

    let mut matches = Vec::new();
    match glob::glob(pattern) {
        Ok(paths) => {
            for item in paths {
                match item {
                    Ok(path) => matches.push(path),
                    Err(e) => {
                        let path = e.path().to_path_buf();
                        errors.push(ListError::io(path, e.into_error()));
                    }
                }
            }
        }
        Err(e) => log::debug!("{pattern:?} is not a valid pattern ({e}), using it literally"),
    }

    if matches.is_empty() {
        matches.push(PathBuf::from(pattern));
    }
    matches
}
