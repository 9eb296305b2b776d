use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Builds the PostgreSQL connection pool.
///
/// The pool connects lazily: nothing touches the network here, so an
/// unreachable database never prevents the process from starting. At most
/// `max_connections` connections are open at once; further callers queue
/// inside `acquire` until one is released or `acquire_timeout_secs` elapses.
pub fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let options = connect_options(settings)?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect_lazy_with(options);

    Ok(pool)
}

fn connect_options(settings: &DatabaseSettings) -> Result<PgConnectOptions, DbError> {
    match &settings.url {
        Some(url) => PgConnectOptions::from_str(url)
            .map_err(|e| DbError::ConnectionConfigError(e.to_string())),
        None => Ok(PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(&settings.password)
            .database(&settings.name)),
    }
}

/// Runs one acquire/release cycle and reports the outcome.
///
/// This is a startup diagnostic only. It logs and returns `false` on failure
/// rather than erroring, so the server still comes up and answers `/api/health`.
pub async fn check_connectivity(pool: &PgPool) -> bool {
    match pool.acquire().await {
        Ok(conn) => {
            drop(conn);
            tracing::info!("Connected to the database.");
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "Database connection check failed.");
            false
        }
    }
}

/// Applies the embedded migrations in `./migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
