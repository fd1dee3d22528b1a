use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod routes;
mod state;
mod crypto {
    pub mod session_id;
    pub mod signing;
}

mod models {
    pub mod session;
}

mod services {
    pub mod cookie;
    pub mod credentials;
    pub mod session;
    pub mod token;
}

mod handlers {
    pub mod auth;
}

mod middleware_layer {
    pub mod auth;
}

mod validation {
    pub mod auth;
}

#[cfg(test)]
mod test_support;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!("✅ Configuration loaded successfully");

    let state = AppState::new(&config);
    tracing::info!(
        "✅ AppState initialized (session TTL {}s)",
        config.session_ttl_seconds
    );

    let app = routes::router(state);

    tracing::info!("🚀 Server listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
