use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use configuration::Config;
use database::DbRepository;
use engine::PortfolioService;
use quote_client::YahooClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub service: PortfolioService,
}

/// Connects to the database, applies migrations and wires up the live quote source.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_pool = database::connect(&config.database).await?;
    database::run_migrations(&db_pool).await?;
    let quotes = YahooClient::new(&config.quotes)?;

    let service = PortfolioService::new(DbRepository::new(db_pool), Arc::new(quotes));
    Ok(Arc::new(AppState { service }))
}

/// Defines the application routes.
pub fn app_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(|| async { "OK" }))
        .route("/assets", get(handlers::list_assets).post(handlers::create_asset))
        .route(
            "/assets/:asset_id",
            get(handlers::get_asset)
                .put(handlers::update_asset)
                .delete(handlers::delete_asset),
        )
        .route("/assets/:asset_id/history", get(handlers::get_price_history))
        .route("/prices/update", post(handlers::update_prices))
        .route("/performance", get(handlers::get_performance))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// The main function to configure and run the web server.
///
/// Tracing is expected to be initialised by the caller.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = app_router(build_state(config).await?);

    tracing::info!("Web server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
