use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseSettings,
}

/// Contains tuning parameters for the database connection pool and query
/// deadlines. The connection string itself is a secret and comes from the
/// `DATABASE_URL` environment variable, not from this file.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// The maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long to wait for a free pooled connection before giving up.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    /// An optional per-query deadline override in seconds. The repository
    /// clamps this to its built-in maximum; it can shorten the deadline,
    /// never lengthen it.
    #[serde(default)]
    pub query_deadline_secs: Option<u64>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            query_deadline_secs: None,
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    5
}
