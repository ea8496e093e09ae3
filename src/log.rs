// src/log.rs
use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::{Error, Result};

static START: OnceLock<Instant> = OnceLock::new();

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

/// `[HH:MM:SS.mmm]` since the first log line (process-relative).
struct Elapsed;

impl FormatTime for Elapsed {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "[{}]", fmt_elapsed(start().elapsed().as_millis()))
    }
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "wm_roster=warn",
        1 => "wm_roster=info",
        2 => "wm_roster=debug",
        _ => "wm_roster=trace",
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `verbosity`.
/// With `file`, lines are appended there (parent dirs created) instead of stderr.
pub fn init(verbosity: u8, file: Option<&Path>) -> Result<()> {
    start();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let (writer, ansi) = match file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    crate::file::ensure_directory(parent)?;
                }
            }
            let f = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(f)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(Elapsed)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::Config(format!("logger: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_format_pads_fields() {
        assert_eq!(fmt_elapsed(0), "00:00:00.000");
        assert_eq!(fmt_elapsed(3_723_004), "01:02:03.004");
    }

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(default_directive(0), "wm_roster=warn");
        assert_eq!(default_directive(2), "wm_roster=debug");
        assert_eq!(default_directive(9), "wm_roster=trace");
    }
}
