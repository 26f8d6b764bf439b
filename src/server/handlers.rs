use axum::{extract::State, Json};
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Instant;

use crate::error::InferenceError;
use crate::postprocessing;
use crate::server::types::*;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PredictRequest>,
) -> Result<Json<PredictResponse>, InferenceError> {
    let start = Instant::now();

    let inference = state.service.predict(&payload.image)?;

    let png = postprocessing::image::encode_png(inference.reconstruction.view())?;
    let reconstructed_image = postprocessing::image::encode_base64(&png);

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!("inference_time_ms", elapsed_ms);
    counter!("predict_requests_total", 1);
    tracing::debug!(
        predicted_class = inference.predicted_class,
        confidence = inference.confidence,
        elapsed_ms,
        "prediction served"
    );

    Ok(Json(PredictResponse {
        predicted_class: inference.predicted_class,
        confidence: inference.confidence,
        reconstructed_image,
    }))
}

pub async fn metrics(State(state): State<Arc<AppState>>) -> String {
    state.metrics_handle.render()
}
