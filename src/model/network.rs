use crate::error::InferenceError;
use ndarray::{Array1, Array2, Array4, ArrayView2};

/// Side length of the canonical input image.
pub const IMAGE_DIM: usize = 28;
/// Flattened input size (28 * 28).
pub const INPUT_SIZE: usize = IMAGE_DIM * IMAGE_DIM;
/// Width of the hidden layers in both encoder and decoder.
pub const HIDDEN_SIZE: usize = 64;
/// Width of the latent vector shared by the decoder and classifier heads.
pub const LATENT_SIZE: usize = 32;
/// Number of digit classes.
pub const NUM_CLASSES: usize = 10;

/// A fully connected layer. Weight orientation is `[out, in]`, matching the
/// checkpoint layout, so the forward pass multiplies by the transpose.
#[derive(Debug)]
pub struct Linear {
    weight: Array2<f32>,
    bias: Array1<f32>,
}

impl Linear {
    pub fn new(weight: Array2<f32>, bias: Array1<f32>) -> Self {
        Self { weight, bias }
    }

    pub fn zeroed(out_dim: usize, in_dim: usize) -> Self {
        Self {
            weight: Array2::zeros((out_dim, in_dim)),
            bias: Array1::zeros(out_dim),
        }
    }

    pub fn weight(&self) -> &Array2<f32> {
        &self.weight
    }

    pub fn bias(&self) -> &Array1<f32> {
        &self.bias
    }

    fn forward(&self, x: ArrayView2<f32>) -> Array2<f32> {
        x.dot(&self.weight.t()) + &self.bias
    }
}

fn relu(x: Array2<f32>) -> Array2<f32> {
    x.mapv(|v| v.max(0.0))
}

fn sigmoid(x: Array2<f32>) -> Array2<f32> {
    x.mapv(|v| 1.0 / (1.0 + (-v).exp()))
}

/// Joint autoencoder/classifier over 28x28 digit images.
///
/// Encoder: 784 -> 64 -> ReLU -> 32 (latent). From the latent vector, two
/// independent heads: a decoder (32 -> 64 -> ReLU -> 784 -> sigmoid) and a
/// single linear classifier (32 -> 10). Parameters are plain arrays; the
/// forward pass is a pure function of input and parameters.
#[derive(Debug)]
pub struct Autoencoder {
    enc1: Linear,
    enc2: Linear,
    dec1: Linear,
    dec2: Linear,
    classifier: Linear,
}

impl Autoencoder {
    pub fn new(enc1: Linear, enc2: Linear, dec1: Linear, dec2: Linear, classifier: Linear) -> Self {
        Self {
            enc1,
            enc2,
            dec1,
            dec2,
            classifier,
        }
    }

    /// All-zero parameters. Useful as a structural stand-in when no trained
    /// checkpoint is available.
    pub fn zeroed() -> Self {
        Self {
            enc1: Linear::zeroed(HIDDEN_SIZE, INPUT_SIZE),
            enc2: Linear::zeroed(LATENT_SIZE, HIDDEN_SIZE),
            dec1: Linear::zeroed(HIDDEN_SIZE, LATENT_SIZE),
            dec2: Linear::zeroed(INPUT_SIZE, HIDDEN_SIZE),
            classifier: Linear::zeroed(NUM_CLASSES, LATENT_SIZE),
        }
    }

    /// Deterministic pseudo-random parameters for tests and benchmarks that
    /// need non-trivial activations without a real model file.
    pub fn synthetic() -> Self {
        Self {
            enc1: synthetic_linear(HIDDEN_SIZE, INPUT_SIZE, 1),
            enc2: synthetic_linear(LATENT_SIZE, HIDDEN_SIZE, 2),
            dec1: synthetic_linear(HIDDEN_SIZE, LATENT_SIZE, 3),
            dec2: synthetic_linear(INPUT_SIZE, HIDDEN_SIZE, 4),
            classifier: synthetic_linear(NUM_CLASSES, LATENT_SIZE, 5),
        }
    }

    /// Layers paired with their checkpoint tensor name prefixes. The prefixes
    /// mirror the trainer's `nn.Sequential` indices so trained checkpoints
    /// exported to SafeTensors load without renaming.
    pub fn layers(&self) -> [(&'static str, &Linear); 5] {
        [
            ("encoder.0", &self.enc1),
            ("encoder.2", &self.enc2),
            ("decoder.0", &self.dec1),
            ("decoder.2", &self.dec2),
            ("classifier", &self.classifier),
        ]
    }

    /// Runs the forward pass on a batch of canonical images.
    ///
    /// Input shape is `(batch, 1, 28, 28)`. Returns the reconstruction in the
    /// same shape with values in `[0,1]`, and raw classification logits of
    /// shape `(batch, 10)`. Softmax is the caller's responsibility.
    pub fn forward(&self, x: &Array4<f32>) -> Result<(Array4<f32>, Array2<f32>), InferenceError> {
        let batch = x.shape()[0];
        let flat = x.view().into_shape((batch, INPUT_SIZE))?;

        let hidden = relu(self.enc1.forward(flat));
        let latent = self.enc2.forward(hidden.view());

        let decoded = relu(self.dec1.forward(latent.view()));
        let recon = sigmoid(self.dec2.forward(decoded.view()));
        let recon = recon.into_shape((batch, 1, IMAGE_DIM, IMAGE_DIM))?;

        let logits = self.classifier.forward(latent.view());

        Ok((recon, logits))
    }
}

fn synthetic_linear(out_dim: usize, in_dim: usize, salt: u32) -> Linear {
    // Knuth multiplicative hash, scaled to small values around zero.
    let cell = |k: u32| -> f32 {
        let h = k.wrapping_mul(2_654_435_761).wrapping_add(salt.wrapping_mul(97)) >> 16;
        ((h % 1000) as f32 / 1000.0 - 0.5) * 0.1
    };
    let weight = Array2::from_shape_fn((out_dim, in_dim), |(i, j)| cell((i * in_dim + j) as u32));
    let bias = Array1::from_shape_fn(out_dim, |i| cell(u32::MAX - i as u32));
    Linear::new(weight, bias)
}
