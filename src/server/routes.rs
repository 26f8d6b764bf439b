use crate::server::{handlers, types::AppState};
use crate::service::InferenceService;
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

pub fn create_router(service: Arc<InferenceService>, metrics_handle: PrometheusHandle) -> Router {
    let state = Arc::new(AppState {
        service,
        metrics_handle,
    });

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/predict", post(handlers::predict))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
}
