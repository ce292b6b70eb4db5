//! Logging setup for SheetDupe.
//!
//! Uses the `log` facade with an `env_logger` backend. The level comes from,
//! in priority order:
//!
//! 1. The `RUST_LOG` environment variable
//! 2. `--quiet` (errors only) or `-v`/`-vv` (debug/trace)
//! 3. Info
//!
//! Debug builds prefix each line with a timestamp, and with the module path
//! when verbose. Release builds print only level and message.
//!
//! # Example
//!
//! ```rust,no_run
//! use sheetdupe::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("Classified 120 rows");
//! ```

use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Initialize the logger from CLI verbosity flags.
///
/// Must be called once, before any log output.
///
/// # Panics
///
/// Panics if a logger has already been installed.
pub fn init_logging(verbose: u8, quiet: bool) {
    let from_env = std::env::var_os("RUST_LOG").is_some();

    let mut builder = Builder::new();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(level_for(verbose, quiet));
    }
    apply_format(&mut builder, verbose);
    builder.init();

    log::debug!(
        "Logging initialized at {} ({})",
        level_name(log::max_level()),
        if from_env { "RUST_LOG" } else { "CLI flags" }
    );
}

/// Map CLI flags to a level filter. `quiet` wins over `verbose`.
fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Lowercase name of a level filter.
#[must_use]
pub fn level_name(level: LevelFilter) -> &'static str {
    match level {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}

#[cfg(debug_assertions)]
fn apply_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let timestamp = buf.timestamp_seconds();
        let level = record.level();
        let style = buf.default_level_style(level);
        if verbose > 0 {
            writeln!(
                buf,
                "{timestamp} {style}{level:<5}{style:#} [{}] {}",
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(buf, "{timestamp} {style}{level:<5}{style:#} {}", record.args())
        }
    });
}

#[cfg(not(debug_assertions))]
fn apply_format(builder: &mut Builder, _verbose: u8) {
    builder.format(|buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
    });
}
