use std::time::Duration;

/// MySQL port used when `databaseHost` carries no explicit port.
pub const DEFAULT_DATABASE_PORT: u16 = 3306;
pub const DATABASE_CHARSET: &str = "utf8mb4";
/// Idle timeout applied when no idle database connections are allowed.
pub const DATABASE_NO_IDLE_TIMEOUT: Duration = Duration::from_secs(1);
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_MS: u64 = 10_000;

pub const DEFAULT_QUEUE_CONNECT_TIMEOUT_MS: u64 = 5_000;
