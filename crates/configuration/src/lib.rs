// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{Config, DatabaseSettings};

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, deserializes it into our strongly-typed `Config`
/// struct, and returns it. Every setting carries a default, so a missing
/// file simply yields the default configuration. Environment variables
/// prefixed with `CINELOG_` override file values (e.g.
/// `CINELOG_DATABASE__MAX_CONNECTIONS=25`).
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`
        .add_source(config::File::with_name("config.toml").required(false))
        .add_source(config::Environment::with_prefix("CINELOG").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_config().unwrap();
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.acquire_timeout_secs, 5);
        assert!(config.database.query_deadline_secs.is_none());
    }
}
