use crate::error::InferenceError;
use crate::model::network::{
    Autoencoder, Linear, HIDDEN_SIZE, INPUT_SIZE, LATENT_SIZE, NUM_CLASSES,
};
use memmap2::Mmap;
use ndarray::{Array1, Array2};
use safetensors::tensor::{Dtype, TensorView};
use safetensors::{SafeTensorError, SafeTensors};
use std::fs::File;
use std::path::Path;

/// Loads the model parameters from a SafeTensors checkpoint.
///
/// The file is memory-mapped and read once; the returned model owns its
/// parameters and is never mutated afterwards. Tensor names follow the
/// training-side `state_dict` layout (`encoder.0.weight`, ..., `classifier.bias`).
pub fn load_checkpoint(path: impl AsRef<Path>) -> Result<Autoencoder, InferenceError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(InferenceError::CheckpointNotFound(
            path.display().to_string(),
        ));
    }

    let file = File::open(path)?;
    let mmap = unsafe { Mmap::map(&file)? };
    let tensors = SafeTensors::deserialize(&mmap)?;

    let enc1 = read_linear(&tensors, "encoder.0", HIDDEN_SIZE, INPUT_SIZE)?;
    let enc2 = read_linear(&tensors, "encoder.2", LATENT_SIZE, HIDDEN_SIZE)?;
    let dec1 = read_linear(&tensors, "decoder.0", HIDDEN_SIZE, LATENT_SIZE)?;
    let dec2 = read_linear(&tensors, "decoder.2", INPUT_SIZE, HIDDEN_SIZE)?;
    let classifier = read_linear(&tensors, "classifier", NUM_CLASSES, LATENT_SIZE)?;

    tracing::info!(
        "loaded checkpoint {} ({:.2} KB)",
        path.display(),
        mmap.len() as f64 / 1024.0,
    );

    Ok(Autoencoder::new(enc1, enc2, dec1, dec2, classifier))
}

/// Writes the model parameters as a SafeTensors checkpoint. Counterpart of
/// [`load_checkpoint`]; used by test fixtures and external training jobs.
pub fn save_checkpoint(model: &Autoencoder, path: impl AsRef<Path>) -> Result<(), InferenceError> {
    let mut raw: Vec<(String, Vec<usize>, Vec<u8>)> = Vec::new();
    for (prefix, layer) in model.layers() {
        raw.push((
            format!("{prefix}.weight"),
            layer.weight().shape().to_vec(),
            le_bytes(layer.weight().iter().copied()),
        ));
        raw.push((
            format!("{prefix}.bias"),
            layer.bias().shape().to_vec(),
            le_bytes(layer.bias().iter().copied()),
        ));
    }

    let mut views = Vec::with_capacity(raw.len());
    for (name, shape, bytes) in &raw {
        let view = TensorView::new(Dtype::F32, shape.clone(), bytes)?;
        views.push((name.as_str(), view));
    }

    let serialized = safetensors::serialize(views, &None)?;
    std::fs::write(path, serialized)?;
    Ok(())
}

fn le_bytes(values: impl Iterator<Item = f32>) -> Vec<u8> {
    values.flat_map(f32::to_le_bytes).collect()
}

fn read_linear(
    tensors: &SafeTensors,
    prefix: &str,
    out_dim: usize,
    in_dim: usize,
) -> Result<Linear, InferenceError> {
    let weight = read_f32(tensors, &format!("{prefix}.weight"), &[out_dim, in_dim])?;
    let bias = read_f32(tensors, &format!("{prefix}.bias"), &[out_dim])?;
    Ok(Linear::new(
        Array2::from_shape_vec((out_dim, in_dim), weight)?,
        Array1::from_vec(bias),
    ))
}

fn read_f32(
    tensors: &SafeTensors,
    name: &str,
    expected: &[usize],
) -> Result<Vec<f32>, InferenceError> {
    let view = tensors.tensor(name)?;
    if view.dtype() != Dtype::F32 {
        return Err(InferenceError::Checkpoint(
            SafeTensorError::TensorInvalidInfo,
        ));
    }
    if view.shape() != expected {
        return Err(InferenceError::ShapeMismatch {
            name: name.to_string(),
            expected: expected.to_vec(),
            got: view.shape().to_vec(),
        });
    }
    Ok(view
        .data()
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}
