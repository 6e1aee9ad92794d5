//! Concurrent directory scanning for myls.
//!
//! [scan_dirs] queues one task per directory argument for a small pool of worker threads. Each
//! worker reads its directory, injects or filters entries, attaches status through the shared
//! [RepoCache] and sorts. The results come back over a channel tagged with the argument's index
//! and are dropped into pre-allocated slots, so the returned listings are always in argument
//! order no matter which worker finished first.
//!
//! The only state shared between threads is the [RepoCache].

use crate::core::entry::{Entry, read_dir, self_and_parent};
use crate::core::error::ListError;
use crate::core::repo_cache::{RepoCache, StatusScope};
use crate::core::sort::{Sorter, filter_hidden};
use crate::utils::normalize_path;

use crossbeam_channel::{Receiver, Sender, unbounded};

use std::num::NonZeroUsize;
use std::path::Path;
use std::thread;
use std::time::Instant;

/// Per-run settings applied to every scanned directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Keep hidden entries and add `.` and `..`.
    pub show_all: bool,
    /// Attach version control status.
    pub status: bool,
    pub sorter: Sorter,
}

/// Result of scanning one directory argument.
#[derive(Debug, Default)]
pub struct DirListing {
    entries: Vec<Entry>,
    errors: Vec<ListError>,
    listed: bool,
}

impl DirListing {
    /// Sorted entries; empty when the directory could not be read.
    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Errors met while scanning, in the order they happened.
    #[inline]
    pub fn errors(&self) -> &[ListError] {
        &self.errors
    }

    /// Whether the directory itself could be read.
    #[inline]
    pub fn is_listed(&self) -> bool {
        self.listed
    }

    pub fn into_parts(self) -> (Vec<Entry>, Vec<ListError>) {
        (self.entries, self.errors)
    }
}

/// Task sent to a scan worker: the argument's index and its directory.
#[derive(Debug)]
struct ScanTask<'a> {
    index: usize,
    dir: &'a Path,
}

/// Message sent from a scan worker back to the coordinator.
#[derive(Debug)]
struct ScanResponse {
    index: usize,
    listing: DirListing,
}

/// Number of scan workers for `jobs` directories: one per available core, at most one per job.
pub fn worker_count(jobs: usize) -> usize {
    let cores = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    cores.min(jobs).max(1)
}

/// Scans every directory in `dirs` concurrently and returns the listings in input order.
///
/// A fixed set of [worker_count] threads pulls tasks from a shared queue. A directory that
/// fails to open yields an unlisted [DirListing] carrying the error; the other directories are
/// unaffected.
pub fn scan_dirs<P: AsRef<Path> + Sync>(
    dirs: &[P],
    opts: &ScanOptions,
    cache: &RepoCache,
) -> Vec<DirListing> {
    let mut slots: Vec<DirListing> = Vec::with_capacity(dirs.len());
    slots.resize_with(dirs.len(), DirListing::default);
    if dirs.is_empty() {
        return slots;
    }

    thread::scope(|scope| {
        let (task_tx, task_rx) = unbounded::<ScanTask<'_>>();
        let (res_tx, res_rx) = unbounded::<ScanResponse>();

        for _ in 0..worker_count(dirs.len()) {
            let task_rx = task_rx.clone();
            let res_tx = res_tx.clone();
            scope.spawn(move || start_scan_worker(task_rx, res_tx, opts, cache));
        }
        drop(task_rx);
        drop(res_tx);

        for (index, dir) in dirs.iter().enumerate() {
            let _ = task_tx.send(ScanTask {
                index,
                dir: dir.as_ref(),
            });
        }
        // Workers stop once the queue is drained.
        drop(task_tx);

        for ScanResponse { index, listing } in res_rx.iter() {
            slots[index] = listing;
        }
    });
    slots
}

fn start_scan_worker(
    task_rx: Receiver<ScanTask<'_>>,
    res_tx: Sender<ScanResponse>,
    opts: &ScanOptions,
    cache: &RepoCache,
) {
    for ScanTask { index, dir } in task_rx.iter() {
        let started = Instant::now();
        let dir = normalize_path(dir);
        let listing = scan_dir(&dir, opts, cache);
        log::debug!(
            "scanned {} ({} entries) in {:?}",
            dir.display(),
            listing.entries.len(),
            started.elapsed()
        );
        let _ = res_tx.send(ScanResponse { index, listing });
    }
}

/// Reads, filters, annotates and sorts a single directory.
pub fn scan_dir(dir: &Path, opts: &ScanOptions, cache: &RepoCache) -> DirListing {
    let mut errors = Vec::new();
    let mut entries = match read_dir(dir, &mut errors) {
        Ok(entries) => entries,
        Err(e) => {
            errors.push(e);
            return DirListing {
                entries: Vec::new(),
                errors,
                listed: false,
            };
        }
    };

    if opts.show_all {
        let mut all = self_and_parent(dir, &mut errors);
        all.append(&mut entries);
        entries = all;
    } else {
        filter_hidden(&mut entries);
    }

    if opts.status {
        cache.attach(&mut entries, StatusScope::Directory(dir));
    }
    opts.sorter.sort_entries(&mut entries);

    DirListing {
        entries,
        errors,
        listed: true,
    }
}
