//! Core listing engine for myls.
//!
//! This module contains everything between the command line and the terminal:
//! - [collect]: expanding arguments into file and directory entries.
//! - [entry]: the [Entry] type and directory reading.
//! - [sort]: the sort engine ([Sorter], [SortKey]).
//! - [status]: git porcelain parsing and the status priority merge.
//! - [repo_cache]: the shared, coalescing per-repository status cache.
//! - [worker]: concurrent scanning of directory arguments.
//! - [layout] and [printer]: grid geometry and output formatting.
//!
//! Most callers will import [collect_entries], [scan_dirs], [Sorter] and [Printer] from here.

pub mod collect;
pub mod entry;
pub mod error;
pub mod formatter;
pub mod layout;
pub mod printer;
pub mod repo_cache;
pub mod sort;
pub mod status;
pub mod worker;

pub use collect::{Collected, collect_entries};
pub use entry::{Entry, FileKind};
pub use error::{ListError, Result};
pub use formatter::{classified_name, format_file_size, format_file_time, render_mode};
pub use layout::{GridLayout, TAB_WIDTH, layout_columns};
pub use printer::{OutputFormat, PrintOptions, Printer};
pub use repo_cache::{RepoCache, StatusScope};
pub use sort::{SortKey, Sorter, filter_hidden};
pub use status::{RepoStatusMap, StatusCode, StatusRank};
pub use worker::{DirListing, ScanOptions, scan_dir, scan_dirs};
