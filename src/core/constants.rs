//! Shared constants used across the application

/// Fixed endpoint of the hosted code-generation model the proxy forwards to.
pub const UPSTREAM_URL: &str = "https://api-inference.huggingface.co/models/bigcode/starcoder";

/// Route the proxy exposes and the chat client calls.
pub const GENERATE_ROUTE: &str = "/api/generate";

pub const DEFAULT_LISTEN_PORT: u16 = 3000;
pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:3000";

/// Upper bound on a single generate round-trip before the attempt is failed.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Pace of the cosmetic character-by-character reveal.
pub const DEFAULT_REVEAL_INTERVAL_MS: u64 = 15;
