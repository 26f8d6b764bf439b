use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ndarray::ShapeError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Checkpoint not found at path: {0}")]
    CheckpointNotFound(String),

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] safetensors::SafeTensorError),

    #[error("Checkpoint tensor '{name}' shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        name: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("Invalid base64 payload: {0}")]
    Format(#[from] base64::DecodeError),

    #[error("Image decoding error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Shape error: {0}")]
    Shape(#[from] ShapeError),

    #[error("Model parameters are not loaded yet")]
    ModelNotReady,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for InferenceError {
    fn into_response(self) -> Response {
        let status = match self {
            InferenceError::Format(_) | InferenceError::Decode(_) | InferenceError::Shape(_) => {
                StatusCode::BAD_REQUEST
            }
            InferenceError::ModelNotReady => StatusCode::SERVICE_UNAVAILABLE,
            InferenceError::CheckpointNotFound(_)
            | InferenceError::Checkpoint(_)
            | InferenceError::ShapeMismatch { .. }
            | InferenceError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_not_found_error() {
        let error = InferenceError::CheckpointNotFound("ckpt/model.safetensors".to_string());
        assert_eq!(
            error.to_string(),
            "Checkpoint not found at path: ckpt/model.safetensors"
        );
    }

    #[test]
    fn test_shape_mismatch_error() {
        let error = InferenceError::ShapeMismatch {
            name: "encoder.0.weight".to_string(),
            expected: vec![64, 784],
            got: vec![64, 256],
        };
        assert_eq!(
            error.to_string(),
            "Checkpoint tensor 'encoder.0.weight' shape mismatch: expected [64, 784], got [64, 256]"
        );
    }

    #[test]
    fn test_shape_error_conversion() {
        let shape_error = ShapeError::from_kind(ndarray::ErrorKind::OutOfBounds);
        let inference_error = InferenceError::from(shape_error);
        match inference_error {
            InferenceError::Shape(_) => {} // Expected
            _ => panic!("Expected Shape"),
        }
    }

    #[test]
    fn test_image_error_conversion() {
        let image_error =
            image::ImageError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, "test"));
        let inference_error = InferenceError::from(image_error);
        match inference_error {
            InferenceError::Decode(_) => {} // Expected
            _ => panic!("Expected Decode"),
        }
    }

    #[test]
    fn test_into_response_decode_is_bad_request() {
        let error = InferenceError::Decode(image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "bad bytes",
        )));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_into_response_model_not_ready() {
        let error = InferenceError::ModelNotReady;
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_into_response_checkpoint_not_found() {
        let error = InferenceError::CheckpointNotFound("missing".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
