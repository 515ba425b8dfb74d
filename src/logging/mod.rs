// Logging setup and the per-run JSONL log
//
// Diagnostics go through `tracing`; run summaries are appended to an
// optional JSONL file.

pub mod run_log;

pub use run_log::{RunLog, RunOutcome, RunSummary};

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "stackwright=info,tower_http=info";
const DEBUG_FILTER: &str = "stackwright=debug,tower_http=debug";

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `debug` picks between the info and
/// debug filters. Safe to call more than once.
pub fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug { DEBUG_FILTER } else { DEFAULT_FILTER })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
