use crate::error::InferenceError;
use crate::model::network::IMAGE_DIM;
use base64::{engine::general_purpose, Engine as _};
use image::imageops::FilterType;
use ndarray::Array4;

/// Decodes a base64 request payload into raw image bytes.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, InferenceError> {
    Ok(general_purpose::STANDARD.decode(payload)?)
}

/// Preprocesses an encoded image of any size or color mode into the canonical
/// model input tensor of shape [1, 1, 28, 28] with values in [0, 1].
///
/// Steps: decode (format is guessed from the bytes), luminance-weighted
/// grayscale reduction, then bilinear resampling to 28x28. The resampling
/// policy is fixed to bilinear; results are not invariant under a different
/// filter choice.
pub fn process_bytes(buffer: &[u8]) -> Result<Array4<f32>, InferenceError> {
    // 1. Load image from bytes (guess format)
    let img = image::load_from_memory(buffer)?;

    // 2. Grayscale first, then resample, matching the training-time order
    let gray = img
        .grayscale()
        .resize_exact(IMAGE_DIM as u32, IMAGE_DIM as u32, FilterType::Triangle)
        .to_luma8();

    // 3. Scale u8 intensities into [0, 1]
    let scaled: Vec<f32> = gray.pixels().map(|p| p.0[0] as f32 / 255.0).collect();

    // 4. Wrap as a single-element batch [1, 1, 28, 28]
    let array = Array4::from_shape_vec((1, 1, IMAGE_DIM, IMAGE_DIM), scaled)?;

    Ok(array)
}
