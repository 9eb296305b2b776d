use clap::{Parser, Subcommand};

/// The main entry point for the Postboard API server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Settings come before anything logs: they carry the log level and directory.
    let settings = configuration::load_settings()?;
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => web_server::run_server(settings).await?,
        Commands::Migrate => handle_migrate(&settings).await?,
        Commands::CheckDb => handle_check_db(&settings).await?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A small users-and-posts REST API backed by PostgreSQL.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (the default when no subcommand is given).
    Serve,
    /// Apply the database migrations and exit.
    Migrate,
    /// Try one database connection and report whether it succeeded.
    CheckDb,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_migrate(settings: &configuration::Settings) -> anyhow::Result<()> {
    let db_pool = database::connect(&settings.database)?;
    database::run_migrations(&db_pool).await?;
    tracing::info!(database = %settings.database.describe(), "Database migrations applied.");
    db_pool.close().await;
    Ok(())
}

async fn handle_check_db(settings: &configuration::Settings) -> anyhow::Result<()> {
    let db_pool = database::connect(&settings.database)?;
    let reachable = database::check_connectivity(&db_pool).await;
    db_pool.close().await;
    if !reachable {
        anyhow::bail!("database {} is not reachable", settings.database.describe());
    }
    Ok(())
}
