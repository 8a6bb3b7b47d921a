//! Shared application state and router assembly

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, patch},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::ActivityRepository;
use crate::handlers::{activities, health};
use crate::middleware::{jwt_auth_middleware, remove_blank_fields};
use crate::upstream::ActivityProvider;

#[derive(Clone)]
pub struct AppState {
    pub activities: Arc<dyn ActivityRepository>,
    pub provider: Arc<dyn ActivityProvider>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        activities: Arc<dyn ActivityRepository>,
        provider: Arc<dyn ActivityProvider>,
        config: AppConfig,
    ) -> Self {
        Self {
            activities,
            provider,
            config: Arc::new(config),
        }
    }
}

pub fn app(state: AppState) -> Router {
    let max_body = state.config.api.max_request_size_bytes;
    let cors = cors_layer(&state.config.security);

    Router::new()
        .route("/health", get(health::health))
        .merge(activity_routes(state.clone()))
        .with_state(state)
        // Global middleware
        .layer(DefaultBodyLimit::max(max_body))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn activity_routes(state: AppState) -> Router<AppState> {
    // Token required for mutations; blanks stripped for updates only
    let owner_only = patch(activities::activity_update)
        .route_layer(middleware::from_fn_with_state(state.clone(), remove_blank_fields))
        .delete(activities::activity_destroy)
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    Router::new()
        .route(
            "/activities",
            get(activities::activity_index).post(activities::activity_create),
        )
        .route("/activities/random", get(activities::activity_random))
        .route(
            "/activities/:id",
            get(activities::activity_show).merge(owner_only),
        )
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
