use server::book_cache;
use server::config;
use server::routes;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();

    // Warm the opening book so the first request doesn't pay for the load
    let positions = book_cache::BOOK_CACHE.len();
    tracing::info!("Opening book ready: {positions} positions");

    // CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Health
        .route("/health", get(routes::health::health_check))
        // Game-data provider proxy
        .route(
            "/api/players/{username}/games",
            get(routes::games::get_player_games),
        )
        .route("/api/games/{game_id}", get(routes::games::get_game_detail))
        // Analysis
        .route("/api/analyze", post(routes::analysis::analyze_game))
        // Shared state
        .layer(Extension(config.clone()))
        .layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app).await.expect("Server error");
}
