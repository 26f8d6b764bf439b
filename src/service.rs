use crate::error::InferenceError;
use crate::model::loader;
use crate::model::network::Autoencoder;
use crate::preprocessing;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Result of a single prediction.
#[derive(Debug)]
pub struct Inference {
    /// Digit class in 0..=9.
    pub predicted_class: usize,
    /// Softmax probability of the predicted class, in [0, 1].
    pub confidence: f32,
    /// Reconstructed canonical image, 28x28 with values in [0, 1].
    pub reconstruction: Array2<f32>,
}

enum ServiceState {
    Loading,
    Ready(Arc<Autoencoder>),
}

/// Serving handle with two observable states: `loading` and `ready`.
///
/// The transition happens once, when the checkpoint is loaded, and is never
/// reversed. The lock is write-once; after that every request takes shared
/// read access to the immutable parameters, so concurrent predictions are
/// independent of interleaving.
pub struct InferenceService {
    state: RwLock<ServiceState>,
}

impl Default for InferenceService {
    fn default() -> Self {
        Self::new()
    }
}

impl InferenceService {
    /// Creates a service in the `loading` state.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ServiceState::Loading),
        }
    }

    /// Creates a service that is immediately `ready` with the given model.
    pub fn with_model(model: Autoencoder) -> Self {
        Self {
            state: RwLock::new(ServiceState::Ready(Arc::new(model))),
        }
    }

    /// Loads parameters from a checkpoint and transitions to `ready`.
    pub fn load_checkpoint(&self, path: impl AsRef<Path>) -> Result<(), InferenceError> {
        let model = loader::load_checkpoint(path)?;
        let mut state = self.state.write().unwrap();
        *state = ServiceState::Ready(Arc::new(model));
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.state.read().unwrap(), ServiceState::Ready(_))
    }

    fn model(&self) -> Result<Arc<Autoencoder>, InferenceError> {
        match &*self.state.read().unwrap() {
            ServiceState::Ready(model) => Ok(model.clone()),
            ServiceState::Loading => Err(InferenceError::ModelNotReady),
        }
    }

    /// Runs the full inference pipeline on a base64-encoded image.
    ///
    /// Decodes and normalizes the image into the canonical tensor, runs the
    /// forward pass, and softmax-normalizes the logits. Predicted class is
    /// the argmax; confidence is that maximum probability. No state is
    /// mutated; the same input always yields the same result.
    pub fn predict(&self, image_b64: &str) -> Result<Inference, InferenceError> {
        let model = self.model()?;

        let image_bytes = preprocessing::image::decode_base64(image_b64)?;
        let input = preprocessing::image::process_bytes(&image_bytes)?;

        let (recon, logits) = model.forward(&input)?;

        let probabilities = softmax(logits.index_axis(Axis(0), 0));
        let (predicted_class, confidence) = argmax(probabilities.view());

        let reconstruction = recon
            .index_axis(Axis(0), 0)
            .index_axis(Axis(0), 0)
            .to_owned();

        Ok(Inference {
            predicted_class,
            confidence,
            reconstruction,
        })
    }
}

/// Numerically stable softmax: subtracts the maximum before exponentiation.
pub fn softmax(logits: ArrayView1<f32>) -> Array1<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exp = logits.mapv(|v| (v - max).exp());
    let sum = exp.sum();
    exp / sum
}

fn argmax(probabilities: ArrayView1<f32>) -> (usize, f32) {
    let mut best = 0;
    let mut best_p = probabilities[0];
    for (i, &p) in probabilities.iter().enumerate().skip(1) {
        if p > best_p {
            best = i;
            best_p = p;
        }
    }
    (best, best_p)
}
