use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use configuration::{ServerSettings, Settings};
use database::{DbRepository, Store};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod extract;
pub mod handlers;
pub mod response;

/// The shared application state that all handlers can access.
///
/// The store is injected rather than global, so the router can be driven
/// against any `Store` implementation.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

/// Defines the application routes and middleware.
pub fn build_router(state: Arc<AppState>, server: &ServerSettings) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(handlers::health).fallback(handlers::method_not_allowed))
        .route(
            "/api/users",
            get(handlers::list_users)
                .post(handlers::create_user)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/users/:id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/posts",
            get(handlers::list_posts)
                .post(handlers::create_post)
                .fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::route_not_found)
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(server.body_limit_bytes))
}

/// The main function to configure and run the web server.
///
/// The database being unreachable at startup is logged but not fatal: the
/// server still binds, and requests fail individually until it comes back.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let db_pool = database::connect(&settings.database)?;
    tracing::info!(
        database = %settings.database.describe(),
        max_connections = settings.database.max_connections,
        "Database pool created."
    );

    if database::check_connectivity(&db_pool).await && settings.database.run_migrations {
        match database::run_migrations(&db_pool).await {
            Ok(()) => tracing::info!("Database migrations applied."),
            Err(e) => tracing::error!(error = %e, "Failed to apply database migrations."),
        }
    }

    let store: Arc<dyn Store> = Arc::new(DbRepository::new(db_pool.clone()));
    let app = build_router(Arc::new(AppState::new(store)), &settings.server);

    let listener =
        tokio::net::TcpListener::bind((settings.server.host.as_str(), settings.server.port)).await?;
    tracing::info!("Web server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db_pool.close().await;
    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler.");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler.");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received.");
}
