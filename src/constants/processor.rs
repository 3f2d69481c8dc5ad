//! Fallback values for optional processor parameters.
//! Used only when a parameter is absent from every source.
pub const DEFAULT_DATABASE_MAX_IDLE_CONNS: u64 = 50;
pub const DEFAULT_DATABASE_MAX_OPEN_CONNS: u64 = 200;
pub const DEFAULT_DATABASE_CONN_MAX_LIFETIME_SECS: u64 = 10;

pub const DEFAULT_QUEUE_PREFETCH_COUNT: u64 = 100;

pub const DEFAULT_HEADER_SYNC_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_CONFIRMATIONS: u64 = 3;
pub const DEFAULT_CONFIRMATIONS_TIMEOUT_SECS: u64 = 360;
pub const DEFAULT_PROFITABLE_ONLY: bool = false;

pub const DEFAULT_BACKOFF_RETRY_INTERVAL_SECS: u64 = 12;
pub const DEFAULT_BACKOFF_MAX_RETRIES: u64 = 3;

pub const DEFAULT_ETH_CLIENT_TIMEOUT_SECS: u64 = 10;
