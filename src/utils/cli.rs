//! Command-line argument parsing and help for myls.
//!
//! Flags may be written with one or two dashes (`-git`, `--git`). Boolean flags also accept an
//! explicit value (`-git=false`). Parsing stops at `--` or at the first argument that is not a
//! flag; everything after that is a file pattern.

use crate::core::{ListError, SortKey};
use crate::utils::{PROG_NAME, parse_bool_word};

/// What the binary should do after parsing its arguments.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    Help,
    Version,
    List(CliArgs),
}

/// Settings given on the command line. `None` leaves the configured value in place.
#[derive(Debug, Default, PartialEq)]
pub struct CliArgs {
    pub all: Option<bool>,
    pub dirs_as_files: Option<bool>,
    pub long: Option<bool>,
    pub reverse: Option<bool>,
    pub one_per_line: Option<bool>,
    pub dirs_first: Option<bool>,
    pub git: Option<bool>,
    pub sort: Option<SortKey>,
    pub patterns: Vec<String>,
}

pub fn handle_args() -> Result<CliAction, ListError> {
    parse_args(std::env::args().skip(1))
}

/// Parses the arguments following the program name.
pub fn parse_args<I, S>(args: I) -> Result<CliAction, ListError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter().map(Into::into);

    while let Some(arg) = args.next() {
        if arg == "--" {
            break;
        }
        let Some(flag) = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) else {
            parsed.patterns.push(arg);
            break;
        };
        if flag.is_empty() {
            // A lone "-" is a file name.
            parsed.patterns.push(arg);
            break;
        }

        let (name, value) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (flag, None),
        };

        match name {
            "h" | "help" => return Ok(CliAction::Help),
            "V" | "version" => return Ok(CliAction::Version),
            "sort" => {
                let word = match value {
                    Some(word) => word.to_string(),
                    None => args.next().ok_or_else(|| {
                        ListError::InvalidOption("flag needs an argument: -sort".to_string())
                    })?,
                };
                parsed.sort = Some(word.parse()?);
            }
            _ => {
                let slot = match name {
                    "a" => &mut parsed.all,
                    "d" => &mut parsed.dirs_as_files,
                    "l" => &mut parsed.long,
                    "r" => &mut parsed.reverse,
                    "1" => &mut parsed.one_per_line,
                    "dirsfirst" => &mut parsed.dirs_first,
                    "git" => &mut parsed.git,
                    _ => {
                        return Err(ListError::InvalidOption(format!(
                            "flag provided but not defined: -{name}"
                        )));
                    }
                };
                *slot = Some(match value {
                    None => true,
                    Some(v) => parse_bool_word(v).ok_or_else(|| {
                        ListError::InvalidOption(format!(
                            "invalid boolean value {v:?} for -{name}"
                        ))
                    })?,
                });
            }
        }
    }

    parsed.patterns.extend(args);
    Ok(CliAction::List(parsed))
}

pub fn print_version() {
    println!("{} {}", PROG_NAME, env!("CARGO_PKG_VERSION"));
}

/// One-line synopsis, printed to stderr on usage errors.
pub fn usage() -> String {
    format!(
        "Usage: {} [-h] [-V] [-a] [-d] [-l] [-r] [-1] [-dirsfirst] [-git] [-sort WORD] [file ...]",
        PROG_NAME
    )
}

pub fn print_help() {
    println!(
        r#"myls - list directory contents, with git status

{}

ARGS:
  file                    Files, directories or glob patterns (default: .)

OPTIONS:
  -a                      Show hidden entries, plus . and ..
  -d                      List directories themselves, not their contents
  -l                      Long format: mode, size, time, name
  -r                      Reverse the sort order
  -1                      One entry per line
  -dirsfirst              List directories before files
  -git                    Show git status in the long format
  -sort WORD              Sort by name, ext, size, time or git (default: name)
  -h, --help              Print help information
  -V, --version           Display the current installed version of myls

ENVIRONMENT:
  MYLS_CONFIG             Override the default config path
  MYLS_TIMEFMT_NEW        Time format for files changed this year (default: "%b %e %H:%M")
  MYLS_TIMEFMT_OLD        Time format for older files (default: "%b %e  %Y")
  MYLS_DIRS_FIRST         Default for -dirsfirst (true/false)
  MYLS_GIT                Default for -git (true/false)
  RUST_LOG                Diagnostic logging, e.g. RUST_LOG=debug
"#,
        usage()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(args: &[&str]) -> Result<CliArgs, Box<dyn std::error::Error>> {
        match parse_args(args.iter().copied())? {
            CliAction::List(parsed) => Ok(parsed),
            other => Err(format!("unexpected action {other:?}").into()),
        }
    }

    #[test]
    fn no_arguments() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(list(&[])?, CliArgs::default());
        Ok(())
    }

    #[test]
    fn single_and_double_dash_flags() -> Result<(), Box<dyn std::error::Error>> {
        let parsed = list(&["-l", "--git", "-dirsfirst", "-r", "src"])?;
        assert_eq!(parsed.long, Some(true));
        assert_eq!(parsed.git, Some(true));
        assert_eq!(parsed.dirs_first, Some(true));
        assert_eq!(parsed.reverse, Some(true));
        assert_eq!(parsed.all, None);
        assert_eq!(parsed.patterns, ["src"]);
        Ok(())
    }

    #[test]
    fn sort_word_forms() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(list(&["-sort", "size"])?.sort, Some(SortKey::Size));
        assert_eq!(list(&["--sort=mtime"])?.sort, Some(SortKey::Time));
        assert_eq!(list(&["-sort=ext"])?.sort, Some(SortKey::Extension));
        assert!(matches!(
            parse_args(["-sort", "color"]),
            Err(ListError::InvalidSortKey(word)) if word == "color"
        ));
        assert!(matches!(parse_args(["-sort"]), Err(ListError::InvalidOption(_))));
        Ok(())
    }

    #[test]
    fn explicit_boolean_values() -> Result<(), Box<dyn std::error::Error>> {
        let parsed = list(&["-git=false", "-a=1"])?;
        assert_eq!(parsed.git, Some(false));
        assert_eq!(parsed.all, Some(true));
        assert!(parse_args(["-git=sometimes"]).is_err());
        Ok(())
    }

    #[test]
    fn parsing_stops_at_first_pattern() -> Result<(), Box<dyn std::error::Error>> {
        let parsed = list(&["-a", "one", "-l", "two"])?;
        assert_eq!(parsed.all, Some(true));
        assert_eq!(parsed.long, None);
        assert_eq!(parsed.patterns, ["one", "-l", "two"]);

        let parsed = list(&["--", "-l"])?;
        assert_eq!(parsed.long, None);
        assert_eq!(parsed.patterns, ["-l"]);
        Ok(())
    }

    #[test]
    fn help_version_and_unknown_flags() {
        assert_eq!(parse_args(["-h"]).ok(), Some(CliAction::Help));
        assert_eq!(parse_args(["--help"]).ok(), Some(CliAction::Help));
        assert_eq!(parse_args(["-V"]).ok(), Some(CliAction::Version));
        assert!(matches!(
            parse_args(["-x"]),
            Err(ListError::InvalidOption(msg)) if msg.contains("-x")
        ));
    }
}
