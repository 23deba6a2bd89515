// ============================================================
// Layer 5 - Decoder
// ============================================================
// Mirror of the encoder: latent code back to a sequence.
//
//   input      [batch, nz,      1]
//   block 1    [batch, ngf*16,  4]   ConvTranspose1d k4 s1 p0 → BN → ReLU
//   block 2    [batch, ngf*8,   8]   ConvTranspose1d k4 s2 p1 → BN → ReLU
//   block 3    [batch, ngf*4,  16]
//   block 4    [batch, ngf*2,  32]
//   block 5    [batch, ngf,    64]
//   output     [batch, dim,   128]   ConvTranspose1d k4 s2 p1 → sigmoid
//
// The sigmoid keeps reconstructions in (0, 1), matching inputs
// normalised to that range.

use burn::{
    nn::{
        conv::{ConvTranspose1d, ConvTranspose1dConfig},
        BatchNorm, BatchNormConfig,
    },
    prelude::*,
    tensor::activation::{relu, sigmoid},
};

use crate::ml::init::init_layer;
use crate::ml::params::{prefixed, ParameterShapes};

/// Normalised blocks before the output layer.
pub const DEPTH: usize = 5;

const KERNEL: usize = 4;

#[derive(Config, Debug)]
pub struct DecoderConfig {
    /// Output channels
    pub dim: usize,
    /// Width of the last normalised block; the first is `ngf * 16`
    pub ngf: usize,
    /// Latent channels consumed
    pub nz:  usize,
}

impl DecoderConfig {
    /// Build the decoder with Burn's default parameter initialisation.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Decoder<B> {
        let mut blocks = Vec::with_capacity(DEPTH);
        let mut channels_in = self.nz;
        for level in 0..DEPTH {
            let channels_out = self.ngf << (DEPTH - 1 - level);
            // The first block expands length 1 → 4; the rest double it.
            let (stride, padding) = if level == 0 { (1, 0) } else { (2, 1) };
            blocks.push(UpBlock {
                deconv: ConvTranspose1dConfig::new([channels_in, channels_out], KERNEL)
                    .with_stride(stride)
                    .with_padding(padding)
                    .init(device),
                norm: BatchNormConfig::new(channels_out).init(device),
            });
            channels_in = channels_out;
        }

        let output = ConvTranspose1dConfig::new([channels_in, self.dim], KERNEL)
            .with_stride(2)
            .with_padding(1)
            .init(device);

        Decoder { blocks, output }
    }
}

#[derive(Module, Debug)]
pub struct UpBlock<B: Backend> {
    pub deconv: ConvTranspose1d<B>,
    pub norm:   BatchNorm<B, 1>,
}

impl<B: Backend> UpBlock<B> {
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        relu(self.norm.forward(self.deconv.forward(x)))
    }

    fn initialize(self) -> Self {
        Self {
            deconv: init_layer(self.deconv),
            norm:   init_layer(self.norm),
        }
    }
}

#[derive(Module, Debug)]
pub struct Decoder<B: Backend> {
    pub blocks: Vec<UpBlock<B>>,
    pub output: ConvTranspose1d<B>,
}

impl<B: Backend> Decoder<B> {
    /// input: [batch, nz, 1] → [batch, dim, 128], values in (0, 1)
    pub fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 3> {
        let x = self
            .blocks
            .iter()
            .fold(input, |x, block| block.forward(x));
        sigmoid(self.output.forward(x))
    }

    /// Apply the per-kind initialisation policy to every layer.
    pub fn init_weights(self) -> Self {
        Self {
            blocks: self.blocks.into_iter().map(UpBlock::initialize).collect(),
            output: init_layer(self.output),
        }
    }
}

impl<B: Backend> ParameterShapes for Decoder<B> {
    fn parameter_shapes(&self) -> Vec<(String, Vec<usize>)> {
        let mut shapes = Vec::new();
        for (i, block) in self.blocks.iter().enumerate() {
            shapes.extend(prefixed(&format!("blocks.{i}.deconv"), block.deconv.parameter_shapes()));
            shapes.extend(prefixed(&format!("blocks.{i}.norm"), block.norm.parameter_shapes()));
        }
        shapes.extend(prefixed("output", self.output.parameter_shapes()));
        shapes
    }
}
