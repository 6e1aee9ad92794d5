//! Directory entries and directory reading for myls.
//!
//! Provides the [Entry] struct which flows through collection, status overlay, sorting and
//! printing. Entries are built from `lstat` data (symlinks are not followed) and carry an
//! absolute, lexically normalized path.

use crate::core::error::{ListError, Result};
use crate::core::status::StatusCode;
use crate::utils::normalize_path;

use std::borrow::Cow;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Closed set of file kinds an entry can have.
///
/// Derived once from the `lstat` file type, so a symlink is always [FileKind::Symlink] even
/// when it points at a directory (see [Entry::is_dir_like]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    Symlink,
    BlockDevice,
    CharDevice,
    Fifo,
    Socket,
    Other,
}

impl FileKind {
    fn from_metadata(md: &Metadata) -> Self {
        let ft = md.file_type();
        if ft.is_symlink() {
            return FileKind::Symlink;
        }
        if ft.is_dir() {
            return FileKind::Directory;
        }
        if ft.is_file() {
            return FileKind::File;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if ft.is_block_device() {
                return FileKind::BlockDevice;
            }
            if ft.is_char_device() {
                return FileKind::CharDevice;
            }
            if ft.is_fifo() {
                return FileKind::Fifo;
            }
            if ft.is_socket() {
                return FileKind::Socket;
            }
        }
        FileKind::Other
    }
}

/// A single filesystem object being listed.
///
/// Everything except `status` is fixed at construction. The status is filled in at most once by
/// the status overlay, before sorting.
#[derive(Debug, Clone)]
pub struct Entry {
    name: String,
    path: PathBuf,
    kind: FileKind,
    flags: u8,
    size: u64,
    modified: Option<SystemTime>,
    mode: u32,
    status: Option<StatusCode>,
}

impl Entry {
    // Flag bit definitions
    pub(crate) const IS_DIR_TARGET: u8 = 1 << 0;
    pub(crate) const IS_HIDDEN: u8 = 1 << 1;
    pub(crate) const IS_EXECUTABLE: u8 = 1 << 2;

    #[cfg(unix)]
    const EXEC_FLAG: u32 = 0o111;

    /// Builds an entry from already fetched `lstat` metadata.
    ///
    /// `path` must be absolute. Symlinks are resolved once here to learn whether they point at
    /// a directory.
    pub fn from_metadata(name: impl Into<String>, path: PathBuf, md: &Metadata) -> Self {
        let name = name.into();
        let kind = FileKind::from_metadata(md);
        let mut flags = 0u8;

        if kind == FileKind::Symlink {
            if fs::metadata(&path).is_ok_and(|target| target.is_dir()) {
                flags |= Entry::IS_DIR_TARGET;
            }
        }

        if name.starts_with('.') {
            flags |= Entry::IS_HIDDEN;
        }

        #[cfg(unix)]
        let mode = {
            use std::os::unix::fs::PermissionsExt;
            md.permissions().mode()
        };
        #[cfg(windows)]
        let mode = {
            use std::os::windows::fs::MetadataExt;
            md.file_attributes()
        };
        #[cfg(not(any(unix, windows)))]
        let mode = 0u32;

        #[cfg(unix)]
        if kind == FileKind::File && mode & Entry::EXEC_FLAG != 0 {
            flags |= Entry::IS_EXECUTABLE;
        }
        #[cfg(windows)]
        if kind == FileKind::File {
            if let Some(ext) = Path::new(&name).extension().and_then(|e| e.to_str()) {
                match ext.to_ascii_lowercase().as_str() {
                    "exe" | "com" | "bat" | "cmd" | "ps1" => flags |= Entry::IS_EXECUTABLE,
                    _ => {}
                }
            }
        }

        Entry {
            name,
            path,
            kind,
            flags,
            size: md.len(),
            modified: md.modified().ok(),
            mode,
            status: None,
        }
    }

    /// `lstat`s `path` and builds an entry displayed as `name`.
    pub fn lstat(name: impl Into<String>, path: &Path) -> Result<Self> {
        let md = fs::symlink_metadata(path).map_err(|e| ListError::io(path, e))?;
        Ok(Entry::from_metadata(name, normalize_path(path), &md))
    }

    // Accessors

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn kind(&self) -> FileKind {
        self.kind
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Raw permission bits on Unix, file attributes on Windows.
    #[inline]
    pub fn mode(&self) -> u32 {
        self.mode
    }

    #[inline]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }

    #[inline]
    pub fn is_symlink(&self) -> bool {
        self.kind == FileKind::Symlink
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.flags & Entry::IS_HIDDEN != 0
    }

    #[inline]
    pub fn is_executable(&self) -> bool {
        self.flags & Entry::IS_EXECUTABLE != 0
    }

    /// Directory, or a symlink that resolves to one.
    #[inline]
    pub fn is_dir_like(&self) -> bool {
        self.is_dir() || self.flags & Entry::IS_DIR_TARGET != 0
    }

    /// Case-folded display name, the baseline sort key.
    pub(crate) fn folded_name(&self) -> Cow<'_, str> {
        fold_case(&self.name)
    }

    pub(crate) fn set_status(&mut self, status: Option<StatusCode>) {
        debug_assert!(self.status.is_none(), "status attached twice");
        self.status = status;
    }

    /// Reads the target of a symlink entry.
    pub fn link_target(&self) -> Result<PathBuf> {
        fs::read_link(&self.path).map_err(|e| ListError::io(&self.path, e))
    }
}

#[cfg(test)]
impl Entry {
    /// Builds an entry without touching the filesystem.
    pub(crate) fn stub(name: &str, kind: FileKind, size: u64) -> Self {
        let flags = if name.starts_with('.') { Entry::IS_HIDDEN } else { 0 };
        Entry {
            name: name.to_string(),
            path: PathBuf::from("/stub").join(name),
            kind,
            flags,
            size,
            modified: None,
            mode: 0o644,
            status: None,
        }
    }

    pub(crate) fn with_modified(mut self, modified: SystemTime) -> Self {
        self.modified = Some(modified);
        self
    }

    pub(crate) fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }
}

/// Lowercases `s`, borrowing when it is already lowercase.
pub(crate) fn fold_case(s: &str) -> Cow<'_, str> {
    if s.chars().any(char::is_uppercase) {
        Cow::Owned(s.to_lowercase())
    } else {
        Cow::Borrowed(s)
    }
}

/// Reads the contents of `dir` into entries.
///
/// `dir` should be absolute and normalized; children get `dir.join(name)` as their path.
/// Children whose metadata can not be read are pushed onto `errors` and skipped.
pub fn read_dir(dir: &Path, errors: &mut Vec<ListError>) -> Result<Vec<Entry>> {
    let mut entries = Vec::with_capacity(64);

    for item in fs::read_dir(dir).map_err(|e| ListError::io(dir, e))? {
        let item = match item {
            Ok(item) => item,
            Err(e) => {
                errors.push(ListError::io(dir, e));
                continue;
            }
        };
        let path = dir.join(item.file_name());
        let md = match item.metadata() {
            Ok(md) => md,
            Err(e) => {
                errors.push(ListError::io(&path, e));
                continue;
            }
        };
        let name = item.file_name().to_string_lossy().into_owned();
        entries.push(Entry::from_metadata(name, path, &md));
    }
    Ok(entries)
}

/// Builds the `.` and `..` pseudo-entries for `dir`.
pub fn self_and_parent(dir: &Path, errors: &mut Vec<ListError>) -> Vec<Entry> {
    let mut entries = Vec::with_capacity(2);
    for name in [".", ".."] {
        match Entry::lstat(name, &dir.join(name)) {
            Ok(entry) => entries.push(entry),
            Err(e) => errors.push(e),
        }
    }
    entries
}
