//! One complete listing run.
//!
//! [run] ties the core together in the order the output needs: file arguments first as a single
//! batch, then every directory argument in sort order, each as its own section. Directories are
//! scanned concurrently but printed strictly in order.

use crate::config::Options;
use crate::core::{
    Collected, Entry, ListError, PrintOptions, Printer, RepoCache, StatusScope, collect_entries,
    scan_dirs,
};
use crate::utils::shorten_home_path;

use std::io::{self, Write};
use std::path::Path;

/// Lists `patterns` into `out`, handing every non-fatal error to `report`.
///
/// Returns `Ok(false)` when the arguments produced nothing to list at all.
pub fn run<W, R>(
    options: &Options,
    patterns: &[String],
    out: W,
    print: PrintOptions,
    mut report: R,
) -> io::Result<bool>
where
    W: Write,
    R: FnMut(&ListError),
{
    let collected = collect_entries(patterns, options.dirs_as_files);
    collected.errors.iter().for_each(&mut report);
    if collected.is_empty() {
        return Ok(false);
    }
    let Collected {
        mut files,
        mut dirs,
        ..
    } = collected;

    let labeled = !files.is_empty() || dirs.len() > 1;
    let cache = RepoCache::new();
    let mut printer = Printer::new(out, print);

    if !files.is_empty() {
        if options.show_status() {
            cache.attach(&mut files, StatusScope::Flat);
        }
        options.sorter.sort_entries(&mut files);
        print_batch(&mut printer, &files, &mut report)?;
    }

    options.sorter.sort_entries(&mut dirs);
    let paths: Vec<&Path> = dirs.iter().map(Entry::path).collect();
    let listings = scan_dirs(&paths, &options.scan_options(), &cache);

    for (i, (dir, listing)) in dirs.iter().zip(listings).enumerate() {
        if i > 0 || !files.is_empty() {
            printer.blank_line()?;
        }
        if labeled {
            printer.section_title(&shorten_home_path(dir.name()))?;
        }
        let (entries, errors) = listing.into_parts();
        errors.iter().for_each(&mut report);
        print_batch(&mut printer, &entries, &mut report)?;
    }

    printer.into_inner().flush()?;
    Ok(true)
}

fn print_batch<W, R>(printer: &mut Printer<W>, entries: &[Entry], report: &mut R) -> io::Result<()>
where
    W: Write,
    R: FnMut(&ListError),
{
    if entries.is_empty() {
        return Ok(());
    }
    printer.long_header()?;
    printer.print_entries(entries)?;
    printer.take_errors().iter().for_each(report);
    Ok(())
}
