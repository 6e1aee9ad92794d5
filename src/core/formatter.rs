//! Formatting helpers for the long and short listing formats.
//!
//! Renders modes, sizes, times and classification glyphs for an [Entry]. Nothing here touches
//! the sort order or status overlay; these are pure presentation helpers used by the printer.

use crate::core::entry::{Entry, FileKind};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, Local};
use humansize::{BINARY, format_size};

use std::fmt::Write;
use std::fs;
use std::time::SystemTime;

/// Default time format for files modified this year.
pub const TIME_FORMAT_RECENT: &str = "%b %e %H:%M";
/// Default time format for older files.
pub const TIME_FORMAT_OLD: &str = "%b %e  %Y";

/// Maps a file kind to its classification glyph, as in `ls -F`.
pub fn classify(entry: &Entry) -> Option<char> {
    match entry.kind() {
        FileKind::Directory => Some('/'),
        FileKind::Symlink => Some('@'),
        FileKind::Fifo => Some('|'),
        FileKind::Socket => Some('='),
        FileKind::File if entry.is_executable() => Some('*'),
        _ => None,
    }
}

/// Display name followed by its classification glyph.
pub fn classified_name(entry: &Entry) -> String {
    let mut name = entry.name().to_string();
    if let Some(glyph) = classify(entry) {
        name.push(glyph);
    }
    name
}

/// Formats the entry mode in a unix-like format.
///
/// On Unix: ten characters like `drwxr-xr-x`, with the type letter for devices, pipes, sockets
/// and links, and setuid/setgid/sticky patched into the execute slots.
/// On Windows: five characters `darhs` (directory or link, archive, read-only, hidden, system).
pub fn render_mode(entry: &Entry) -> String {
    #[cfg(unix)]
    {
        let mode = entry.mode();
        let first = match entry.kind() {
            FileKind::Directory => 'd',
            FileKind::Symlink => 'l',
            FileKind::BlockDevice => 'b',
            FileKind::CharDevice => 'c',
            FileKind::Fifo => 'p',
            FileKind::Socket => 's',
            FileKind::File | FileKind::Other => '-',
        };
        let mut chars = [first, '-', '-', '-', '-', '-', '-', '-', '-', '-'];
        let shifts = [6, 3, 0];
        for (i, &shift) in shifts.iter().enumerate() {
            let base = 1 + i * 3;
            if (mode >> (shift + 2)) & 1u32 != 0 {
                chars[base] = 'r';
            }
            if (mode >> (shift + 1)) & 1u32 != 0 {
                chars[base + 1] = 'w';
            }
            if (mode >> shift) & 1u32 != 0 {
                chars[base + 2] = 'x';
            }
        }

        // setuid, setgid, sticky
        for (bit, slot, set) in [(0o4000, 3, 's'), (0o2000, 6, 's'), (0o1000, 9, 't')] {
            if mode & bit != 0 {
                chars[slot] = if chars[slot] == 'x' {
                    set
                } else {
                    set.to_ascii_uppercase()
                };
            }
        }
        chars.iter().collect()
    }
    #[cfg(windows)]
    {
        let attr = entry.mode();
        let mut out = String::with_capacity(5);
        out.push(if entry.is_symlink() {
            'l'
        } else if entry.is_dir() {
            'd'
        } else {
            '-'
        });
        out.push(if attr & 0x20 != 0 { 'a' } else { '-' });
        out.push(if attr & 0x01 != 0 { 'r' } else { '-' });
        out.push(if attr & 0x02 != 0 { 'h' } else { '-' });
        out.push(if attr & 0x04 != 0 { 's' } else { '-' });
        out
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = entry;
        String::from("----------")
    }
}

/// Header matching the width of [render_mode]'s output.
pub fn mode_header() -> &'static str {
    if cfg!(windows) { "Mode " } else { "Permissions" }
}

/// Formats a file size into a compact human-readable string, e.g. `512B`, `1.5KiB`.
pub fn format_file_size(size: u64) -> String {
    format_size(size, BINARY).replace(' ', "")
}

/// Size column for an entry: child count for directories, human size otherwise.
///
/// Returns `!` when a directory can not be read.
pub fn size_column(entry: &Entry) -> String {
    if entry.is_dir_like() {
        match fs::read_dir(entry.path()) {
            Ok(children) => children.count().to_string(),
            Err(_) => "!".to_string(),
        }
    } else {
        format_file_size(entry.size())
    }
}

/// Whether `fmt` is a strftime format chrono can render.
pub fn is_valid_time_format(fmt: &str) -> bool {
    !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
}

/// Formats a modification time, using `recent` for times in `current_year` and `old` otherwise.
///
/// Unknown times, and formats chrono can not render, give `-`.
pub fn format_file_time(
    modified: Option<SystemTime>,
    current_year: i32,
    recent: &str,
    old: &str,
) -> String {
    let Some(mtime) = modified else {
        return "-".to_string();
    };
    let dt: DateTime<Local> = DateTime::from(mtime);
    let fmt = if dt.year() == current_year { recent } else { old };

    let mut out = String::new();
    if write!(out, "{}", dt.format(fmt)).is_err() {
        return "-".to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn classify_glyphs() {
        assert_eq!(classify(&Entry::stub("d", FileKind::Directory, 0)), Some('/'));
        assert_eq!(classify(&Entry::stub("l", FileKind::Symlink, 0)), Some('@'));
        assert_eq!(classify(&Entry::stub("p", FileKind::Fifo, 0)), Some('|'));
        assert_eq!(classify(&Entry::stub("s", FileKind::Socket, 0)), Some('='));
        assert_eq!(classify(&Entry::stub("f", FileKind::File, 0)), None);
        assert_eq!(classified_name(&Entry::stub("src", FileKind::Directory, 0)), "src/");
    }

    #[cfg(unix)]
    #[test]
    fn unix_mode_strings() -> Result<(), Box<dyn std::error::Error>> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let script = dir.path().join("run.sh");
        File::create(&script)?;
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;
        let entry = Entry::lstat("run.sh", &script)?;
        assert_eq!(render_mode(&entry), "-rwxr-xr-x");
        assert!(entry.is_executable());
        assert_eq!(classify(&entry), Some('*'));

        let sticky = dir.path().join("shared");
        fs::create_dir(&sticky)?;
        fs::set_permissions(&sticky, fs::Permissions::from_mode(0o1777))?;
        assert_eq!(render_mode(&Entry::lstat("shared", &sticky)?), "drwxrwxrwt");

        let data = dir.path().join("data");
        File::create(&data)?;
        fs::set_permissions(&data, fs::Permissions::from_mode(0o4644))?;
        assert_eq!(render_mode(&Entry::lstat("data", &data)?), "-rwSr--r--");
        Ok(())
    }

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0), "0B");
        assert_eq!(format_file_size(512), "512B");
        assert!(format_file_size(1536).starts_with("1.5"));
    }

    #[test]
    fn directory_size_is_child_count() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        File::create(dir.path().join("a"))?;
        File::create(dir.path().join("b"))?;
        let entry = Entry::lstat("dir", dir.path())?;
        assert_eq!(size_column(&entry), "2");
        Ok(())
    }

    #[test]
    fn time_format_depends_on_year() {
        let t = Local.with_ymd_and_hms(2023, 3, 7, 9, 5, 0).single().map(SystemTime::from);
        assert_eq!(
            format_file_time(t, 2023, TIME_FORMAT_RECENT, TIME_FORMAT_OLD),
            "Mar  7 09:05"
        );
        assert_eq!(
            format_file_time(t, 2025, TIME_FORMAT_RECENT, TIME_FORMAT_OLD),
            "Mar  7  2023"
        );
        assert_eq!(format_file_time(None, 2025, TIME_FORMAT_RECENT, TIME_FORMAT_OLD), "-");
    }

    #[test]
    fn unrenderable_time_format_does_not_panic() {
        let now = Some(SystemTime::now());
        assert_eq!(format_file_time(now, 1999, TIME_FORMAT_RECENT, "%Q bogus"), "-");
    }

    #[test]
    fn time_format_validation() {
        assert!(is_valid_time_format(TIME_FORMAT_RECENT));
        assert!(is_valid_time_format(TIME_FORMAT_OLD));
        assert!(is_valid_time_format("%Y-%m-%d"));
        assert!(!is_valid_time_format("%Q bogus"));
        assert!(!is_valid_time_format("%"));
    }
}
