use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::info;

use crate::handlers::api::{classify_bookings, join_meeting, AppState};
use crate::handlers::test::{health_check, test_classify_request, test_join_request};

pub fn create_router(app_state: Arc<AppState>, is_production: bool) -> Router {
    let mut router = Router::new();

    // Health check is always available
    let health_route = Router::new().route("/health", get(health_check));
    router = router.merge(health_route);

    // Core session-access endpoints are always available
    let api_routes = Router::new()
        .route("/bookings/classify", post(classify_bookings))
        .route("/meetings/join", post(join_meeting));
    router = router.merge(api_routes);

    // Only add sample payload routes if not in production mode
    if !is_production {
        let sample_routes = Router::new()
            .route("/test/classify-request", get(test_classify_request))
            .route("/test/join-request", get(test_join_request));

        router = router.merge(sample_routes);

        info!("Sample payload routes enabled - server running in development mode");
    } else {
        info!("Running in production mode - only core and health endpoints exposed");
    }

    router.with_state(app_state)
}
