use crate::error::InferenceError;
use base64::{engine::general_purpose, Engine as _};
use image::{GrayImage, ImageFormat};
use ndarray::ArrayView2;
use std::io::Cursor;

/// Encodes a reconstruction tensor as PNG bytes.
///
/// Values are clamped to [0, 1], scaled to the u8 range by truncation, and
/// written as a single-channel PNG. Deterministic: the same tensor always
/// yields the same bytes.
pub fn encode_png(recon: ArrayView2<f32>) -> Result<Vec<u8>, InferenceError> {
    let (height, width) = recon.dim();
    let pixels: Vec<u8> = recon
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0) as u8)
        .collect();

    let img = GrayImage::from_raw(width as u32, height as u32, pixels).ok_or_else(|| {
        InferenceError::Shape(ndarray::ShapeError::from_kind(
            ndarray::ErrorKind::IncompatibleShape,
        ))
    })?;

    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Encodes PNG bytes for JSON transport.
pub fn encode_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::network::IMAGE_DIM;
    use ndarray::Array2;

    #[test]
    fn test_zero_tensor_encodes_to_valid_png() {
        let recon = Array2::zeros((IMAGE_DIM, IMAGE_DIM));
        let png = encode_png(recon.view()).unwrap();

        let decoded = image::load_from_memory(&png).unwrap().to_luma8();
        assert_eq!(decoded.dimensions(), (28, 28));
        assert!(decoded.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let recon = Array2::from_shape_fn((IMAGE_DIM, IMAGE_DIM), |(i, j)| {
            ((i * IMAGE_DIM + j) % 256) as f32 / 255.0
        });
        let png_a = encode_png(recon.view()).unwrap();
        let png_b = encode_png(recon.view()).unwrap();
        assert_eq!(png_a, png_b);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let mut recon = Array2::zeros((IMAGE_DIM, IMAGE_DIM));
        recon[[0, 0]] = -3.0;
        recon[[0, 1]] = 7.5;

        let png = encode_png(recon.view()).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_luma8();
        assert_eq!(decoded.get_pixel(0, 0).0[0], 0);
        assert_eq!(decoded.get_pixel(1, 0).0[0], 255);
    }

    #[test]
    fn test_intensity_scaling_truncates() {
        // Scaling truncates: 0.5 maps to floor(127.5) = 127.
        let recon = Array2::from_elem((IMAGE_DIM, IMAGE_DIM), 0.5);
        let png = encode_png(recon.view()).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_luma8();
        assert!(decoded.pixels().all(|p| p.0[0] == 127));
    }

    #[test]
    fn test_base64_wraps_png_bytes() {
        let recon = Array2::zeros((IMAGE_DIM, IMAGE_DIM));
        let png = encode_png(recon.view()).unwrap();
        let encoded = encode_base64(&png);

        let decoded = general_purpose::STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, png);
    }
}
