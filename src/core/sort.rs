//! Sorting and filtering of entries for myls.
//!
//! The [Sorter] holds the sort key, direction and the dirs-first rule. Sorting is always done in
//! stable passes: first by case-folded name, then (optionally) by the chosen key, then
//! (optionally) a partition that moves directories to the front. Entries that compare equal
//! under a later pass keep the order produced by the earlier ones.

use crate::core::entry::Entry;
use crate::core::error::ListError;

use phf::phf_map;

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Key used for the secondary sort pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Name,
    Extension,
    Size,
    Time,
    Status,
}

/// Words accepted for `-sort`, including the short aliases.
static SORT_WORDS: phf::Map<&'static str, SortKey> = phf_map! {
    "name" => SortKey::Name,
    "ext" => SortKey::Extension,
    "extension" => SortKey::Extension,
    "size" => SortKey::Size,
    "time" => SortKey::Time,
    "mtime" => SortKey::Time,
    "git" => SortKey::Status,
};

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Extension => "extension",
            SortKey::Size => "size",
            SortKey::Time => "time",
            SortKey::Status => "git",
        }
    }
}

impl FromStr for SortKey {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SORT_WORDS
            .get(s)
            .copied()
            .ok_or_else(|| ListError::InvalidSortKey(s.to_string()))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sorting rules for one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sorter {
    key: SortKey,
    reverse: bool,
    dirs_first: bool,
}

impl Sorter {
    pub fn new(key: SortKey, reverse: bool, dirs_first: bool) -> Self {
        Self {
            key,
            reverse,
            dirs_first,
        }
    }

    #[inline]
    pub fn key(&self) -> SortKey {
        self.key
    }

    /// Sorts `entries` in place.
    pub fn sort_entries(&self, entries: &mut [Entry]) {
        entries.sort_by(|a, b| self.directed(a.folded_name().cmp(&b.folded_name())));

        match self.key {
            SortKey::Name => {}
            SortKey::Extension => {
                entries.sort_by(|a, b| self.directed(extension_key(a).cmp(&extension_key(b))))
            }
            SortKey::Size => entries.sort_by(|a, b| self.directed(a.size().cmp(&b.size()))),
            SortKey::Time => {
                entries.sort_by(|a, b| self.directed(a.modified().cmp(&b.modified())))
            }
            SortKey::Status => {
                entries.sort_by(|a, b| self.directed(status_key(a).cmp(&status_key(b))))
            }
        }

        if self.dirs_first {
            entries.sort_by_key(|e| !e.is_dir_like());
        }
    }

    #[inline]
    fn directed(&self, ord: Ordering) -> Ordering {
        if self.reverse { ord.reverse() } else { ord }
    }
}

fn extension_key(entry: &Entry) -> Cow<'_, str> {
    Path::new(entry.name())
        .extension()
        .map(|ext| Cow::Owned(ext.to_string_lossy().to_lowercase()))
        .unwrap_or(Cow::Borrowed(""))
}

/// Entries without a status compare as the empty string, i.e. before every code.
fn status_key(entry: &Entry) -> String {
    entry
        .status()
        .map(|s| s.as_str().to_lowercase())
        .unwrap_or_default()
}

/// Removes entries whose name starts with a dot.
pub fn filter_hidden(entries: &mut Vec<Entry>) {
    entries.retain(|e| !e.is_hidden());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::FileKind;
    use crate::core::status::StatusCode;

    use rand::seq::SliceRandom;
    use rand::{Rng, rng};
    use std::time::{Duration, SystemTime};

    fn names(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.name()).collect()
    }

    fn file(name: &str, size: u64) -> Entry {
        Entry::stub(name, FileKind::File, size)
    }

    fn dir(name: &str) -> Entry {
        Entry::stub(name, FileKind::Directory, 0)
    }

    #[test]
    fn sort_key_words() {
        assert_eq!("ext".parse::<SortKey>().ok(), Some(SortKey::Extension));
        assert_eq!("mtime".parse::<SortKey>().ok(), Some(SortKey::Time));
        assert_eq!("git".parse::<SortKey>().ok(), Some(SortKey::Status));
        assert!("Name".parse::<SortKey>().is_err());
        assert_eq!(SortKey::Status.to_string(), "git");
    }

    #[test]
    fn name_sort_is_case_insensitive() {
        let mut entries = vec![file("b", 0), file("C", 0), file("a", 0)];
        Sorter::default().sort_entries(&mut entries);
        assert_eq!(names(&entries), ["a", "b", "C"]);

        Sorter::new(SortKey::Name, true, false).sort_entries(&mut entries);
        assert_eq!(names(&entries), ["C", "b", "a"]);
    }

    #[test]
    fn size_descending_keeps_name_order_for_ties() {
        let mut entries = vec![file("c", 10), file("a", 10), file("b", 5)];
        Sorter::new(SortKey::Size, true, false).sort_entries(&mut entries);
        // The reversed name pass yields c, b, a; the size pass keeps c before a.
        assert_eq!(names(&entries), ["c", "a", "b"]);

        Sorter::new(SortKey::Size, false, false).sort_entries(&mut entries);
        assert_eq!(names(&entries), ["b", "a", "c"]);
    }

    #[test]
    fn extension_sort() {
        let mut entries = vec![
            file("z.RS", 0),
            file("Makefile", 0),
            file("a.toml", 0),
            file("b.rs", 0),
        ];
        Sorter::new(SortKey::Extension, false, false).sort_entries(&mut entries);
        assert_eq!(names(&entries), ["Makefile", "b.rs", "z.RS", "a.toml"]);
    }

    #[test]
    fn time_sort() {
        let t0 = SystemTime::UNIX_EPOCH;
        let mut entries = vec![
            file("new", 0).with_modified(t0 + Duration::from_secs(300)),
            file("old", 0).with_modified(t0 + Duration::from_secs(100)),
            file("mid", 0).with_modified(t0 + Duration::from_secs(200)),
        ];
        Sorter::new(SortKey::Time, false, false).sort_entries(&mut entries);
        assert_eq!(names(&entries), ["old", "mid", "new"]);
    }

    #[test]
    fn status_sort_puts_missing_status_first() {
        let mut entries = vec![
            file("a", 0).with_status(StatusCode::UNTRACKED),
            file("b", 0),
            file("c", 0).with_status(StatusCode::PLACEHOLDER),
            file("d", 0).with_status(StatusCode::IGNORED),
        ];
        Sorter::new(SortKey::Status, false, false).sort_entries(&mut entries);
        assert_eq!(names(&entries), ["b", "d", "c", "a"]);
    }

    #[test]
    fn dirs_first_partition() {
        let mut entries = vec![file("a", 0), dir("z"), file("b", 0), dir("m")];
        Sorter::new(SortKey::Name, false, true).sort_entries(&mut entries);
        assert_eq!(names(&entries), ["m", "z", "a", "b"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let mut rng = rng();
        for _ in 0..50 {
            // Few distinct names and sizes so ties are common. The modification time records
            // each entry's position before sorting.
            let entries: Vec<Entry> = (0..40)
                .map(|i| {
                    let name = ["a", "A", "b", "B"][rng.random_range(0..4)];
                    file(name, rng.random_range(0..3))
                        .with_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(i))
                })
                .collect();

            let key = [SortKey::Name, SortKey::Size][rng.random_range(0..2)];
            let reverse = rng.random_bool(0.5);
            let mut sorted = entries.clone();
            Sorter::new(key, reverse, false).sort_entries(&mut sorted);

            for (i, a) in sorted.iter().enumerate() {
                for b in &sorted[i + 1..] {
                    let same_name = a.name().to_lowercase() == b.name().to_lowercase();
                    let same_key = key == SortKey::Name || a.size() == b.size();
                    if same_name && same_key {
                        assert!(
                            a.modified() < b.modified(),
                            "equal entries changed relative order"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn dirs_first_keeps_relative_order_within_groups() {
        let mut rng = rng();
        for _ in 0..50 {
            let mut entries: Vec<Entry> = (0..30)
                .map(|_| {
                    let name = format!("n{}.{}", rng.random_range(0..20), rng.random_range(0..3));
                    if rng.random_bool(0.4) {
                        dir(&name)
                    } else {
                        file(&name, rng.random_range(0..10))
                    }
                })
                .collect();
            entries.shuffle(&mut rng);
            let key = [SortKey::Name, SortKey::Size, SortKey::Extension][rng.random_range(0..3)];
            let reverse = rng.random_bool(0.5);

            let mut plain = entries.clone();
            Sorter::new(key, reverse, false).sort_entries(&mut plain);
            let mut grouped = entries;
            Sorter::new(key, reverse, true).sort_entries(&mut grouped);

            let split = |v: &[Entry], want_dir: bool| -> Vec<String> {
                v.iter()
                    .filter(|e| e.is_dir_like() == want_dir)
                    .map(|e| format!("{}:{}", e.name(), e.size()))
                    .collect()
            };
            assert_eq!(split(&plain, true), split(&grouped, true));
            assert_eq!(split(&plain, false), split(&grouped, false));

            if let Some(idx) = grouped.iter().position(|e| !e.is_dir_like()) {
                assert!(grouped[idx..].iter().all(|e| !e.is_dir_like()));
            }
        }
    }

    #[test]
    fn filter_hidden_entries() {
        let mut entries = vec![file(".env", 0), file("main.rs", 0), dir(".git")];
        filter_hidden(&mut entries);
        assert_eq!(names(&entries), ["main.rs"]);
    }
}
