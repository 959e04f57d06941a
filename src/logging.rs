//! Line logger behind the `log` facade.
//!
//! The terminal player owns stdout and stderr while it runs, so its log goes
//! to a file named by `ROWMATCH_LOG_PATH`. The headless simulator may log to
//! stderr instead. `ROWMATCH_LOG` picks the level (default `warn`).

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

use anyhow::{Context, Result};
use log::{LevelFilter, Log, Metadata, Record};

pub const LOG_PATH_ENV: &str = "ROWMATCH_LOG_PATH";
pub const LOG_LEVEL_ENV: &str = "ROWMATCH_LOG";

enum Sink {
    File(File),
    Stderr,
}

struct LineLogger {
    level: LevelFilter,
    sink: Mutex<Sink>,
}

impl Log for LineLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(record.level(), record.target(), &record.args().to_string());
        if let Ok(mut sink) = self.sink.lock() {
            let _ = match &mut *sink {
                Sink::File(file) => writeln!(file, "{}", line),
                Sink::Stderr => writeln!(std::io::stderr(), "{}", line),
            };
        }
    }

    fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            if let Sink::File(file) = &mut *sink {
                let _ = file.flush();
            }
        }
    }
}

fn format_line(level: log::Level, target: &str, message: &str) -> String {
    format!("{:<5} {}: {}", level, target, message)
}

/// Parse `error|warn|info|debug|trace|off`, case-insensitively.
pub fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Install the logger from the environment.
///
/// With no log path, logs go to stderr when `stderr_fallback` is set and are
/// dropped otherwise. Returns the active level.
pub fn init_from_env(stderr_fallback: bool) -> Result<LevelFilter> {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|s| parse_level(&s))
        .unwrap_or(LevelFilter::Warn);

    let sink = match std::env::var(LOG_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .with_context(|| format!("opening log file {}", path))?;
            Sink::File(file)
        }
        _ if stderr_fallback => Sink::Stderr,
        _ => return Ok(LevelFilter::Off),
    };

    let logger: &'static LineLogger = Box::leak(Box::new(LineLogger {
        level,
        sink: Mutex::new(sink),
    }));
    log::set_logger(logger).map_err(|e| anyhow::anyhow!("installing logger: {}", e))?;
    log::set_max_level(level);
    Ok(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!(parse_level("DEBUG"), Some(LevelFilter::Debug));
        assert_eq!(parse_level(" warn "), Some(LevelFilter::Warn));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn lines_carry_level_and_target() {
        assert_eq!(
            format_line(log::Level::Warn, "rowmatch_core::spawn", "gave up"),
            "WARN  rowmatch_core::spawn: gave up"
        );
    }
}
