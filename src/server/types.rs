use crate::service::InferenceService;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared Application State
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<InferenceService>,
    pub metrics_handle: PrometheusHandle,
}

// --- DTOs (Data Transfer Objects) ---

#[derive(Deserialize)]
pub struct PredictRequest {
    /// Base64 encoded image data
    pub image: String,
}

#[derive(Serialize)]
pub struct PredictResponse {
    pub predicted_class: usize,
    pub confidence: f32,
    /// Base64 encoded PNG of the reconstruction
    pub reconstructed_image: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
