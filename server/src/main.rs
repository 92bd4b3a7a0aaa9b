use server::config::{AuthConfig, ServerConfig};
use server::{db, routes, state};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env().expect("invalid server configuration");
    let auth = AuthConfig::from_env().expect("invalid auth configuration");
    if auth.is_weak() {
        tracing::warn!("JWT_SECRET not set; verifying credentials with the insecure default secret");
    }

    let pool = db::init_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("database init failed");

    let app = routes::app(state::AppState::new(pool, auth));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "server listening");
    axum::serve(listener, app).await.expect("server failed");
}
