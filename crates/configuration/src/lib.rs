use crate::error::ConfigError;
use config::{Environment, File, FileFormat};
use std::path::{Path, PathBuf};

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{Config, DatabaseSettings, LoggingSettings, QuoteSettings, ServerSettings};

/// Command-line flags for locating the configuration file.
#[cfg(feature = "clap")]
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Path to a TOML configuration file (defaults to `./config.toml` when present).
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,
}

/// Loads the application configuration.
///
/// Sources, lowest precedence first:
/// 1. built-in defaults,
/// 2. the TOML file at `path`, or `config.toml` in the working directory if it exists,
/// 3. `PORTFOLIO__<SECTION>__<KEY>` environment variables (e.g. `PORTFOLIO__SERVER__PORT`),
/// 4. `DATABASE_URL`, which overrides `database.url`.
///
/// Variables in a `.env` file are loaded into the environment first.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();

    let file = match path {
        Some(path) => File::from(PathBuf::from(path)).required(true),
        None => File::with_name("config").required(false),
    };

    let mut builder = config::Config::builder().add_source(file).add_source(
        Environment::with_prefix("PORTFOLIO")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );
    if let Ok(url) = std::env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }

    let config = builder.build()?.try_deserialize::<Config>()?;
    validate(&config)?;
    Ok(config)
}

/// Parses a configuration from TOML text, without consulting the environment.
pub fn config_from_toml(toml: &str) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError("server.port must not be 0".to_string()));
    }
    if config.database.url.trim().is_empty() {
        return Err(ConfigError::ValidationError("database.url must be set".to_string()));
    }
    if config.database.max_connections == 0 {
        return Err(ConfigError::ValidationError(
            "database.max_connections must be greater than 0".to_string(),
        ));
    }
    if config.quotes.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "quotes.timeout_secs must be greater than 0".to_string(),
        ));
    }
    Ok(())
}
