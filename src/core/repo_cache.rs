//! Per-process cache of repository status maps and the status overlay built on it.
//!
//! A [RepoCache] is created once in `main` and shared by reference with every scan thread.
//! Each repository root is queried at most once for the lifetime of the process: the cache
//! lock is only held to look up or insert the root's slot, while the slow `git status` call
//! runs outside it. Threads that miss on the same root at the same time wait on that slot
//! instead of starting a second query.
//!
//! Failed queries are cached too (as `None`) so they are not retried.

use crate::core::entry::Entry;
use crate::core::error::Result;
use crate::core::status::{RepoStatusMap, StatusCode, find_repo_root, query_git_status};

use once_cell::sync::OnceCell;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Status map of one root, or `None` when the root has no usable status.
pub type SharedStatus = Option<Arc<RepoStatusMap>>;

type QueryFn = dyn Fn(&Path) -> Result<Vec<u8>> + Send + Sync;

/// How a batch of entries relates to repositories.
#[derive(Debug, Clone, Copy)]
pub enum StatusScope<'a> {
    /// File arguments, possibly from unrelated directories.
    Flat,
    /// Children of a single directory.
    Directory(&'a Path),
}

pub struct RepoCache {
    repos: Mutex<HashMap<PathBuf, Arc<OnceCell<SharedStatus>>>>,
    query: Box<QueryFn>,
}

impl Default for RepoCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RepoCache {
    /// Cache backed by the real `git` executable.
    pub fn new() -> Self {
        Self::with_query(query_git_status)
    }

    /// Cache backed by a custom query returning porcelain output for a root.
    pub fn with_query<F>(query: F) -> Self
    where
        F: Fn(&Path) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        RepoCache {
            repos: Mutex::new(HashMap::new()),
            query: Box::new(query),
        }
    }

    /// Returns the status map for `root`, querying it on first use.
    pub fn statuses_for_root(&self, root: &Path) -> SharedStatus {
        let slot = {
            let mut repos = self.repos.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(repos.entry(root.to_path_buf()).or_default())
        };

        if let Some(cached) = slot.get() {
            log::debug!("status cache hit for {}", root.display());
            return cached.clone();
        }
        slot.get_or_init(|| self.load(root)).clone()
    }

    /// Returns the status map for the repository containing `dir`, if any.
    pub fn statuses_for_dir(&self, dir: &Path) -> SharedStatus {
        let root = find_repo_root(dir)?;
        log::debug!("{} belongs to repository {}", dir.display(), root.display());
        self.statuses_for_root(&root)
    }

    fn load(&self, root: &Path) -> SharedStatus {
        log::debug!("querying status for {}", root.display());
        match (self.query)(root) {
            Ok(output) => {
                let map = RepoStatusMap::from_porcelain(root, &output);
                log::debug!("{} status entries under {}", map.len(), map.root().display());
                Some(Arc::new(map))
            }
            Err(e) => {
                log::debug!("no status for {}: {}", root.display(), e);
                None
            }
        }
    }

    /// Attaches status codes to `entries` according to `scope`.
    pub fn attach(&self, entries: &mut [Entry], scope: StatusScope<'_>) {
        match scope {
            StatusScope::Flat => self.attach_to_files(entries),
            StatusScope::Directory(dir) => self.attach_to_dir(dir, entries),
        }
    }

    /// Attaches status to a flat list of entries from any number of directories.
    ///
    /// Directories resolve their repository from themselves (they may be a root), everything
    /// else from its parent. Lookups are memoized per parent directory for this batch.
    /// Placeholders are only added when at least one entry belongs to a repository.
    pub fn attach_to_files(&self, entries: &mut [Entry]) {
        let mut by_dir: HashMap<PathBuf, SharedStatus> = HashMap::with_capacity(entries.len());
        let mut codes = Vec::with_capacity(entries.len());
        let mut show = false;

        for entry in entries.iter() {
            let dir = if entry.is_dir() {
                entry.path()
            } else {
                entry.path().parent().unwrap_or(entry.path())
            };
            let stats = by_dir
                .entry(dir.to_path_buf())
                .or_insert_with(|| self.statuses_for_dir(dir));

            codes.push(match stats {
                Some(map) => {
                    show = true;
                    map.get(entry.path())
                }
                None => None,
            });
        }

        if !show {
            return;
        }
        for (entry, code) in entries.iter_mut().zip(codes) {
            entry.set_status(Some(code.unwrap_or(StatusCode::PLACEHOLDER)));
        }
    }

    /// Attaches status to the children of `dir`, which all share one repository.
    pub fn attach_to_dir(&self, dir: &Path, entries: &mut [Entry]) {
        let Some(map) = self.statuses_for_dir(dir) else {
            return;
        };
        for entry in entries.iter_mut() {
            let code = map.get(entry.path()).unwrap_or(StatusCode::PLACEHOLDER);
            entry.set_status(Some(code));
        }
    }
}
