use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{DatabaseSettings, LoggingSettings, ServerSettings, Settings};

/// Conventional environment variable names and the setting each one overrides.
/// These win over everything else so a container can be configured without a file.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("server.port", "PORT"),
    ("database.host", "DB_HOST"),
    ("database.port", "DB_PORT"),
    ("database.user", "DB_USER"),
    ("database.password", "DB_PASSWORD"),
    ("database.name", "DB_NAME"),
    ("database.url", "DATABASE_URL"),
    ("logging.level", "RUST_LOG"),
];

/// Loads the application settings.
///
/// This function is the primary entry point for this crate. It picks up a
/// `.env` file if one exists, then layers built-in defaults, an optional
/// `config.toml`, `APP__SECTION__KEY` variables and finally the conventional
/// names (`PORT`, `DB_HOST`, ...).
pub fn load_settings() -> Result<Settings, ConfigError> {
    dotenvy::dotenv().ok();
    let vars: HashMap<String, String> = std::env::vars().collect();
    load_settings_from(Some(Path::new("config.toml")), &vars)
}

/// Same layering as [`load_settings`], with the file path and the environment supplied by the caller.
pub fn load_settings_from(
    file: Option<&Path>,
    vars: &HashMap<String, String>,
) -> Result<Settings, ConfigError> {
    let mut builder = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5000)?
        .set_default("server.body_limit_bytes", 1024 * 1024)?
        .set_default("database.host", "localhost")?
        .set_default("database.port", 5432)?
        .set_default("database.user", "postboard")?
        .set_default("database.password", "postboard")?
        .set_default("database.name", "postboard")?
        .set_default("database.max_connections", 10)?
        .set_default("database.acquire_timeout_secs", 30)?
        .set_default("database.run_migrations", true)?
        .set_default("logging.level", "info")?
        .set_default("logging.file_prefix", "postboard.log")?;

    if let Some(path) = file {
        builder = builder.add_source(config::File::from(path).required(false));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("APP")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .source(Some(vars.clone().into_iter().collect())),
    );

    for (key, var) in ENV_OVERRIDES {
        let value = vars.get(*var).filter(|v| !v.is_empty()).cloned();
        builder = builder.set_override_option(*key, value)?;
    }

    let settings = builder.build()?.try_deserialize::<Settings>()?;
    settings.validate()?;
    Ok(settings)
}
