// ============================================================
// Layer 5 - Encoder (amortised inference network)
// ============================================================
// Maps a sequence to the parameters of its latent Gaussian.
//
//   input            [batch, dim,     128]
//   block 1          [batch, ndf,      64]   Conv1d k4 s2 p1 → BN → LeakyReLU(0.2)
//   block 2          [batch, ndf*2,    32]
//   block 3          [batch, ndf*4,    16]
//   block 4          [batch, ndf*8,     8]
//   block 5          [batch, ndf*16,    4]
//   mu head          [batch, out_z,     1]   Conv1d k4 s1 p0
//   log_var head     [batch, out_z,     1]   Conv1d k4 s1 p0 → softplus + 1e-4
//
// The `log_var` head keeps its historical name (it is the
// parameter name stored in checkpoints) but its output is the
// variance itself: softplus keeps it positive and the 1e-4
// floor keeps it away from zero so sampling stays defined.
//
// Shape errors are raised by Burn's own shape checks.

use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        BatchNorm, BatchNormConfig, PaddingConfig1d,
    },
    prelude::*,
    tensor::activation::leaky_relu,
};

use crate::ml::init::init_layer;
use crate::ml::params::{prefixed, ParameterShapes};

/// Number of stride-2 blocks (128 → 4).
pub const DEPTH: usize = 5;

/// Lower bound added to the softplus variance head.
pub const VARIANCE_FLOOR: f64 = 1e-4;

const NEGATIVE_SLOPE: f64 = 0.2;
const KERNEL: usize = 4;

#[derive(Config, Debug)]
pub struct EncoderConfig {
    /// Input channels
    pub dim:   usize,
    /// Width of the first block; doubles every block
    pub ndf:   usize,
    /// Latent channels produced by each head
    pub out_z: usize,
}

impl EncoderConfig {
    /// Build the encoder with Burn's default parameter initialisation.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Encoder<B> {
        let mut blocks = Vec::with_capacity(DEPTH);
        let mut channels_in = self.dim;
        for level in 0..DEPTH {
            let channels_out = self.ndf << level;
            blocks.push(DownBlock {
                conv: Conv1dConfig::new(channels_in, channels_out, KERNEL)
                    .with_stride(2)
                    .with_padding(PaddingConfig1d::Explicit(1))
                    .init(device),
                norm: BatchNormConfig::new(channels_out).init(device),
            });
            channels_in = channels_out;
        }

        let mu      = Conv1dConfig::new(channels_in, self.out_z, KERNEL).init(device);
        let log_var = Conv1dConfig::new(channels_in, self.out_z, KERNEL).init(device);

        Encoder { blocks, mu, log_var }
    }
}

#[derive(Module, Debug)]
pub struct DownBlock<B: Backend> {
    pub conv: Conv1d<B>,
    pub norm: BatchNorm<B, 1>,
}

impl<B: Backend> DownBlock<B> {
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        leaky_relu(self.norm.forward(self.conv.forward(x)), NEGATIVE_SLOPE)
    }

    fn initialize(self) -> Self {
        Self {
            conv: init_layer(self.conv),
            norm: init_layer(self.norm),
        }
    }
}

#[derive(Module, Debug)]
pub struct Encoder<B: Backend> {
    pub blocks:  Vec<DownBlock<B>>,
    pub mu:      Conv1d<B>,
    pub log_var: Conv1d<B>,
}

/// Mean and variance of the latent Gaussian, both `[batch, out_z, 1]`.
#[derive(Debug, Clone)]
pub struct Posterior<B: Backend> {
    pub mu:  Tensor<B, 3>,
    pub var: Tensor<B, 3>,
}

impl<B: Backend> Posterior<B> {
    /// Reparameterised draw: `mu + √var · ε`, ε ~ N(0, 1).
    pub fn sample(&self) -> Tensor<B, 3> {
        let eps = Tensor::random(
            self.mu.shape(),
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &self.mu.device(),
        );
        self.mu.clone() + self.var.clone().sqrt() * eps
    }
}

impl<B: Backend> Encoder<B> {
    /// input: [batch, dim, 128] → mu, var: [batch, out_z, 1]
    pub fn forward(&self, input: Tensor<B, 3>) -> Posterior<B> {
        let features = self
            .blocks
            .iter()
            .fold(input, |x, block| block.forward(x));

        let mu  = self.mu.forward(features.clone());
        let var = softplus(self.log_var.forward(features)).add_scalar(VARIANCE_FLOOR);

        Posterior { mu, var }
    }

    /// Apply the per-kind initialisation policy to every layer.
    pub fn init_weights(self) -> Self {
        Self {
            blocks:  self.blocks.into_iter().map(DownBlock::initialize).collect(),
            mu:      init_layer(self.mu),
            log_var: init_layer(self.log_var),
        }
    }
}

impl<B: Backend> ParameterShapes for Encoder<B> {
    fn parameter_shapes(&self) -> Vec<(String, Vec<usize>)> {
        let mut shapes = Vec::new();
        for (i, block) in self.blocks.iter().enumerate() {
            shapes.extend(prefixed(&format!("blocks.{i}.conv"), block.conv.parameter_shapes()));
            shapes.extend(prefixed(&format!("blocks.{i}.norm"), block.norm.parameter_shapes()));
        }
        shapes.extend(prefixed("mu", self.mu.parameter_shapes()));
        shapes.extend(prefixed("log_var", self.log_var.parameter_shapes()));
        shapes
    }
}

/// `ln(1 + eˣ)` in the overflow-free form `max(x, 0) + ln(1 + e^(−|x|))`.
///
/// `burn::tensor::activation::softplus` evaluates `ln(eˣ + 1)` directly,
/// which overflows to infinity for large `x`.
fn softplus<B: Backend, const D: usize>(x: Tensor<B, D>) -> Tensor<B, D> {
    x.clone().clamp_min(0.0) + x.abs().neg().exp().log1p()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::{
        backend::{Autodiff, NdArray},
        module::AutodiffModule,
        tensor::Distribution,
    };

    type TestBackend = NdArray;

    fn small() -> EncoderConfig {
        EncoderConfig::new(3, 4, 8)
    }

    fn batch<B: Backend>(n: usize, device: &B::Device) -> Tensor<B, 3> {
        Tensor::random([n, 3, 128], Distribution::Normal(0.0, 1.0), device)
    }

    #[test]
    fn test_head_shapes() {
        let device  = Default::default();
        let encoder = small().init::<TestBackend>(&device).init_weights();
        let out     = encoder.forward(batch::<TestBackend>(5, &device));
        assert_eq!(out.mu.dims(),  [5, 8, 1]);
        assert_eq!(out.var.dims(), [5, 8, 1]);
    }

    #[test]
    fn test_block_widths_double() {
        let device  = Default::default();
        let encoder = small().init::<TestBackend>(&device);
        let widths: Vec<usize> = encoder.blocks.iter().map(|b| b.conv.weight.dims()[0]).collect();
        assert_eq!(widths, vec![4, 8, 16, 32, 64]);
        assert_eq!(encoder.mu.weight.dims(), [8, 64, 4]);
    }

    #[test]
    fn test_variance_above_floor() {
        let device  = Default::default();
        let encoder = small().init::<TestBackend>(&device).init_weights();
        let input   = batch::<TestBackend>(4, &device).mul_scalar(50.0);
        let var     = encoder.forward(input).var.into_data().to_vec::<f32>().unwrap();
        assert!(var.iter().all(|&v| v > 0.0 && v >= VARIANCE_FLOOR as f32));
    }

    #[test]
    fn test_softplus_is_positive_and_stable() {
        let device = Default::default();
        let x = Tensor::<TestBackend, 1>::from_floats([-30.0, -1.0, 0.0, 1.0, 100.0], &device);
        let y = softplus(x).into_data().to_vec::<f32>().unwrap();
        assert!(y.iter().all(|&v| v > 0.0 && v.is_finite()));
        assert!((y[2] - std::f32::consts::LN_2).abs() < 1e-6);
        assert!((y[4] - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_sample_uses_mean_when_variance_vanishes() {
        let device = Default::default();
        let mu  = Tensor::<TestBackend, 3>::ones([2, 3, 1], &device);
        let var = Tensor::<TestBackend, 3>::zeros([2, 3, 1], &device);
        let z   = Posterior { mu, var }.sample().into_data().to_vec::<f32>().unwrap();
        assert!(z.iter().all(|&v| v == 1.0));
    }

    #[test]
    #[should_panic]
    fn test_wrong_channel_count_panics() {
        let device  = Default::default();
        let encoder = small().init::<TestBackend>(&device);
        let input   = Tensor::<TestBackend, 3>::zeros([1, 2, 128], &device);
        let _ = encoder.forward(input);
    }

    #[test]
    fn test_training_mode_updates_running_stats() {
        type Train = Autodiff<NdArray>;
        let device  = Default::default();
        let encoder = small().init::<Train>(&device);

        let before = encoder.blocks[0].norm.running_mean.value_sync().into_data().to_vec::<f32>().unwrap();
        let _ = encoder.forward(batch::<Train>(4, &device).add_scalar(1.0));
        let after = encoder.blocks[0].norm.running_mean.value_sync().into_data().to_vec::<f32>().unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_eval_mode_keeps_running_stats() {
        type Train = Autodiff<NdArray>;
        let device  = Default::default();
        let encoder = small().init::<Train>(&device).valid();

        let before = encoder.blocks[0].norm.running_mean.value_sync().into_data().to_vec::<f32>().unwrap();
        let _ = encoder.forward(batch::<TestBackend>(4, &device).add_scalar(1.0));
        let after = encoder.blocks[0].norm.running_mean.value_sync().into_data().to_vec::<f32>().unwrap();
        assert_eq!(before, after);
    }
}
