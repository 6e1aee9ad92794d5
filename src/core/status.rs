//! Git status codes, parsing and propagation for myls.
//!
//! This module turns the output of `git status --porcelain=v1 -z --ignored=matching` into a
//! [RepoStatusMap]: absolute path -> [StatusCode], with every changed path's status also
//! propagated to each ancestor directory up to the repository root.
//!
//! Conflicts are resolved by [StatusRank]: ignored < untracked < anything else. The cache that
//! makes sure each root is queried only once lives in [repo_cache](crate::core::repo_cache).

use crate::core::error::{ListError, Result};

use once_cell::sync::Lazy;

use std::borrow::Cow;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Name of the marker directory that identifies a repository root.
const REPO_MARKER: &str = ".git";

/// Significance of a status code. Higher wins when two codes meet on one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusRank {
    Ignored = 1,
    Untracked = 2,
    Changed = 3,
}

/// A two character status code as shown in the listing, e.g. `??`, `!!`, `-M`, `A-`.
///
/// Spaces from the porcelain format are stored as `-` so the code is always printable.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode([u8; 2]);

impl StatusCode {
    /// Shown for entries without a status when the rest of the batch has one.
    pub const PLACEHOLDER: StatusCode = StatusCode(*b"--");
    pub const UNTRACKED: StatusCode = StatusCode(*b"??");
    pub const IGNORED: StatusCode = StatusCode(*b"!!");

    /// Parses the two status bytes of a porcelain record.
    pub fn parse(raw: [u8; 2]) -> Option<Self> {
        let mut code = [0u8; 2];
        for (slot, byte) in code.iter_mut().zip(raw) {
            *slot = match byte {
                b' ' => b'-',
                b if b.is_ascii_graphic() => b,
                _ => return None,
            };
        }
        Some(StatusCode(code))
    }

    pub fn rank(self) -> StatusRank {
        match &self.0 {
            b"!!" => StatusRank::Ignored,
            b"??" => StatusRank::Untracked,
            _ => StatusRank::Changed,
        }
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII graphic bytes are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("--")
    }

    /// Keeps whichever of `self` and `other` is more significant.
    ///
    /// Ties keep `self`, which makes merging a code with itself a no-op.
    pub fn merge(self, other: StatusCode) -> StatusCode {
        if other.rank() > self.rank() { other } else { self }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatusCode({:?})", self.as_str())
    }
}

/// Status codes for one repository, keyed by absolute path.
///
/// Built once per root and read-only afterwards.
#[derive(Debug, Default, Clone)]
pub struct RepoStatusMap {
    root: PathBuf,
    codes: HashMap<PathBuf, StatusCode>,
}

impl RepoStatusMap {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        RepoStatusMap {
            root: root.into(),
            codes: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, path: &Path) -> Option<StatusCode> {
        self.codes.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Stores `code` at `path`, keeping the existing code if it ranks at least as high.
    fn merge(&mut self, path: PathBuf, code: StatusCode) {
        self.codes
            .entry(path)
            .and_modify(|prev| *prev = prev.merge(code))
            .or_insert(code);
    }

    /// Records `code` for `path` and propagates it to every ancestor up to and including the root.
    pub fn insert(&mut self, path: PathBuf, code: StatusCode) {
        let mut dir = path.parent().map(Path::to_path_buf);
        self.merge(path, code);

        while let Some(current) = dir {
            if !current.starts_with(&self.root) {
                break;
            }
            let next = if current == self.root {
                None
            } else {
                current.parent().map(Path::to_path_buf)
            };
            self.merge(current, code);
            dir = next;
        }
    }

    /// Builds the map from NUL-delimited porcelain v1 output.
    ///
    /// Each record is `XY <path>` with a slash separated path relative to `root`. Records that
    /// do not have that shape (for example the source half of a rename) are skipped.
    pub fn from_porcelain(root: &Path, output: &[u8]) -> Self {
        let mut map = RepoStatusMap::new(root);
        for record in output.split(|b| *b == 0) {
            if record.len() < 4 || record[2] != b' ' {
                continue;
            }
            let Some(code) = StatusCode::parse([record[0], record[1]]) else {
                log::debug!("skipping status record with bad code: {:?}", record);
                continue;
            };
            map.insert(join_slash_path(root, &record[3..]), code);
        }
        map
    }
}

/// Joins a slash separated relative path onto `root` using native separators.
///
/// Trailing slashes (git reports ignored or untracked directories as `dir/`) are dropped.
fn join_slash_path(root: &Path, rel: &[u8]) -> PathBuf {
    let mut full = root.to_path_buf();
    for part in rel.split(|b| *b == b'/').filter(|p| !p.is_empty() && **p != *b".") {
        full.push(path_component(part));
    }
    full
}

/// Raw path bytes as reported by git. Unix paths need not be UTF-8 and are kept as they are.
#[cfg(unix)]
fn path_component(bytes: &[u8]) -> Cow<'_, OsStr> {
    use std::os::unix::ffi::OsStrExt;
    Cow::Borrowed(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_component(bytes: &[u8]) -> Cow<'_, OsStr> {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(s) => Cow::Borrowed(OsStr::new(s)),
        Cow::Owned(s) => Cow::Owned(s.into()),
    }
}

/// Walks from `start` upward until a directory containing the repository marker is found.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(REPO_MARKER).exists())
        .map(Path::to_path_buf)
}

/// Location of the git executable, looked up once per process.
static GIT_BINARY: Lazy<Option<PathBuf>> = Lazy::new(|| which::which("git").ok());

/// Runs `git status` for `root` and returns its raw NUL-delimited output.
pub fn query_git_status(root: &Path) -> Result<Vec<u8>> {
    let git = GIT_BINARY
        .as_deref()
        .ok_or_else(|| ListError::StatusQuery("git was not found in PATH".into()))?;
    let output = Command::new(git)
        .arg("-C")
        .arg(root)
        .args(["status", "--porcelain=v1", "-z", "--ignored=matching"])
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| ListError::StatusQuery(format!("failed to spawn git: {}", e)))?;

    if !output.status.success() {
        return Err(ListError::StatusQuery(format!(
            "git status in {} exited with {}",
            root.display(),
            output.status
        )));
    }
    Ok(output.stdout)
}
