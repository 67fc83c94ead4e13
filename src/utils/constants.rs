//! Shared constants and defaults

pub const DEFAULT_CONFIG_PATH: &str = "api-agent.yaml";
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_METRICS_PATH: &str = "/metrics";
pub const DEFAULT_TOKEN_STORE_PATH: &str = "api-agent-token.json";
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const RESTAURANTS_PATH: &str = "/restaurants";
pub const NO_ADDRESS: &str = "No address";
