//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderName, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::middleware::{
    require_admin_key, require_project_key, ADMIN_KEY_HEADER, PROJECT_KEY_HEADER,
};
use crate::server::routes::{
    check_handler, create_project_handler, health_handler, list_projects_handler,
    notify_handler, request_code_handler, root_handler, verify_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: Arc<ServerDeps>,
    /// `None` disables the admin routes (503)
    pub admin_api_key: Option<Arc<str>>,
}

/// Build the Axum application router
pub fn build_app(deps: Arc<ServerDeps>, admin_api_key: Option<String>) -> Result<Router> {
    let app_state = AxumAppState {
        deps,
        admin_api_key: admin_api_key.map(Arc::from),
    };

    // CORS configuration - any origin, the API is key-authenticated
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(PROJECT_KEY_HEADER),
            HeaderName::from_static(ADMIN_KEY_HEADER),
        ]);

    // Rate limiting for the OTP endpoints: 10 req/sec per IP, bursts of 20.
    // Client IP comes from X-Forwarded-For / X-Real-IP / Forwarded, then the
    // socket address.
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .use_headers()
            .finish()
            .context("invalid rate limiter configuration")?,
    );
    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    // Project-key routes
    let auth_routes = Router::new()
        .route("/auth/request", post(request_code_handler))
        .route("/auth/check", post(check_handler))
        .route("/auth/verify", post(verify_handler))
        .route_layer(middleware::from_fn(require_project_key))
        .layer(rate_limit_layer);

    let notify_routes = Router::new()
        .route("/notify", post(notify_handler))
        .route_layer(middleware::from_fn(require_project_key));

    // Admin-key routes
    let admin_routes = Router::new()
        .route(
            "/projects",
            get(list_projects_handler).post(create_project_handler),
        )
        .route_layer(middleware::from_fn(require_admin_key));

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(auth_routes)
        .merge(notify_routes)
        .merge(admin_routes)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
