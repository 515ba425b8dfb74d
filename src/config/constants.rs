// Project-wide constants
//
// Centralised here so port numbers and other magic values have one
// source of truth. Import via `use crate::config::constants::*;`.

/// Default bind address for the HTTP server (all interfaces).
pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";

/// Origin of the bundled web client, allowed by CORS unless configured otherwise.
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:8080";

/// Upload ceiling for `POST /api/generate`. Larger files get a 413.
pub const MAX_UPLOAD_BYTES: usize = 5_000_000;

/// Fix calls allowed per role before the run fails.
pub const DEFAULT_MAX_REVISIONS: u32 = 3;

/// Default maximum tokens for completion requests.
pub const DEFAULT_MAX_TOKENS: u32 = 8000;

/// HTTP client timeout inside providers. Kept above the gateway timeout so
/// the gateway's own deadline is the one that fires.
pub const PROVIDER_HTTP_TIMEOUT_SECS: u64 = 300;

/// Per-call deadline applied by the gateway.
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 180;

/// Concurrent per-file review calls within one review.
pub const DEFAULT_REVIEW_CONCURRENCY: usize = 4;

/// Word ceiling for the frontend role's output.
pub const DEFAULT_FRONTEND_MAX_WORDS: usize = 1000;

/// Directory under $HOME holding `config.toml`.
pub const CONFIG_DIR_NAME: &str = ".stackwright";
