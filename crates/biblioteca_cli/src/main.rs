//! Console entry point for the book catalogue walkthrough.
//!
//! # Responsibility
//! - Load settings, start logging, and open the session factory once.
//! - Run the walkthrough against stdout, then close the factory.
//! - Map any startup or operation failure to a failing exit status.

use biblioteca_core::settings::CONFIG_PATH_ENV;
use biblioteca_core::{
    core_version, init_logging, run_demo, BookService, SessionFactory, Settings,
};
use log::{error, info};
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config_path = match parse_args(std::env::args().skip(1)) {
        Ok(Some(path)) => Some(path),
        Ok(None) => std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from),
        Err(exit) => return exit,
    };

    match run(config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=app_exit module=cli status=error error={err}");
            log::logger().flush();
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let settings = Settings::load(config_path.as_deref())?;
    init_logging(&settings.logging)?;

    let factory = SessionFactory::open(&settings.database)?;
    {
        let service = BookService::new(&factory);
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        run_demo(&service, &mut out)?;
        out.flush()?;
    }
    factory.close()?;

    info!("event=app_exit module=cli status=ok");
    log::logger().flush();
    Ok(())
}

/// Returns the config path argument, or the exit code for `--help`,
/// `--version` and usage errors.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<PathBuf>, ExitCode> {
    let Some(first) = args.next() else {
        return Ok(None);
    };
    match first.as_str() {
        "-h" | "--help" => {
            println!("usage: biblioteca [CONFIG_FILE]");
            println!("  CONFIG_FILE  TOML settings (default: ./biblioteca.toml, or ${CONFIG_PATH_ENV})");
            Err(ExitCode::SUCCESS)
        }
        "-V" | "--version" => {
            println!("biblioteca {}", core_version());
            Err(ExitCode::SUCCESS)
        }
        _ if args.next().is_some() => {
            eprintln!("error: expected at most one argument; see --help");
            Err(ExitCode::from(2))
        }
        path => Ok(Some(PathBuf::from(path))),
    }
}
