//! main.rs
//! Entry point for myls

use myls::app;
use myls::config::{Config, Options};
use myls::utils::cli::{CliAction, handle_args, print_help, print_version, usage};
use myls::utils::{PROG_NAME, line_width, report_error, stdout_is_terminal};

use env_logger::Env;

use std::io::{self, BufWriter};
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let args = match handle_args() {
        Ok(CliAction::List(args)) => args,
        Ok(CliAction::Help) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Ok(CliAction::Version) => {
            print_version();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            report_error(&e);
            eprintln!("{}", usage());
            return ExitCode::from(2);
        }
    };

    let config = Config::load();
    let options = Options::resolve(&config, &args);
    log::debug!("resolved options: {options:?}");

    let print = options.print_options(line_width(), stdout_is_terminal());
    let stdout = io::stdout();
    let out = BufWriter::new(stdout.lock());

    match app::run(&options, &args.patterns, out, print, report_error) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", PROG_NAME, e);
            ExitCode::from(1)
        }
    }
}
