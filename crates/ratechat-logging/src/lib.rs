//! # ratechat-logging
//!
//! Structured logging with `tracing`, plus the append-only log of executed
//! exchange commands.
//!
//! - [`init_subscriber`] installs the global `tracing` subscriber (compact
//!   text or JSON on stderr)
//! - [`CommandLog`] is the sink every attempted `exchange` command is written
//!   to; [`FileCommandLog`] appends to a file, [`MemoryCommandLog`] keeps
//!   lines in memory

#![deny(unsafe_code)]

pub mod command_log;

pub use command_log::{CommandLog, CommandRecord, FileCommandLog, MemoryCommandLog};

/// Initialize the global tracing subscriber on stderr.
///
/// `RUST_LOG` takes precedence over `level` when set. With `json` the output
/// is one JSON object per event, otherwise compact text. Subsequent calls are
/// no-ops.
pub fn init_subscriber(level: &str, json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    // set_global_default is a no-op if already set
    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.compact().try_init();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
