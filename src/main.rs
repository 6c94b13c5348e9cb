use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{error_handling::HandleErrorLayer, http::StatusCode};
use tower::{BoxError, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, Level};

use session_access_service::{
    create_router, AppState, ConferenceConfig, CredentialIssuer, SystemClock, TokenPolicy,
};

// Error handler
async fn handle_error(error: BoxError) -> (StatusCode, String) {
    if error.is::<tokio::time::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            "Request took too long".to_string(),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {}", error),
        )
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    // Load conferencing configuration; a missing app id, secret or domain
    // aborts startup here rather than failing on the first join attempt
    let config = ConferenceConfig::from_env();
    info!(
        "Conferencing configuration loaded for domain {}",
        config.domain
    );

    // Optional token policy overrides from environment
    let mut policy = TokenPolicy::default();

    if let Ok(ttl_minutes) = env::var("SESSION_TOKEN_TTL_MINUTES") {
        let ttl_minutes = ttl_minutes
            .parse::<i64>()
            .expect("SESSION_TOKEN_TTL_MINUTES must be an integer number of minutes");
        policy.ttl = chrono::Duration::minutes(ttl_minutes);
        info!("Token TTL overridden to {} minutes", ttl_minutes);
    }

    if let Ok(skew_seconds) = env::var("SESSION_TOKEN_SKEW_SECONDS") {
        let skew_seconds = skew_seconds
            .parse::<i64>()
            .expect("SESSION_TOKEN_SKEW_SECONDS must be an integer number of seconds");
        policy.not_before_skew = chrono::Duration::seconds(skew_seconds);
        info!("Token not-before skew overridden to {} seconds", skew_seconds);
    }

    // Build the credential issuer; an empty secret is refused outright
    let issuer = CredentialIssuer::new(config)
        .expect("Conferencing configuration is invalid")
        .with_policy(policy);
    info!("Credential issuer initialized");

    // Check if running in production mode
    let is_production = env::var("ENVIRONMENT")
        .map(|val| val.to_lowercase() == "production")
        .unwrap_or(false);

    if is_production {
        info!("Running in PRODUCTION mode - restricting available endpoints");
    } else {
        info!("Running in DEVELOPMENT mode - all endpoints will be available");
    }

    // Create shared application state
    let app_state = Arc::new(AppState {
        issuer,
        clock: Arc::new(SystemClock),
    });

    // Create router with appropriate routes based on environment
    let app = create_router(app_state, is_production).layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_error))
            .load_shed()
            .concurrency_limit(64)
            .timeout(Duration::from_secs(10))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::new().allow_origin(Any)),
    );

    // Bind to port 3000
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    // Set up signal handler for graceful shutdown
    let shutdown = async {
        let ctrl_c = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received interrupt signal, starting graceful shutdown");
            },
            _ = terminate => {
                info!("Received terminate signal, starting graceful shutdown");
            },
        }
    };

    // Start server with graceful shutdown
    info!("Server is ready to accept connections");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .expect("Failed to start server");

    info!("Server has been gracefully shut down");
}
