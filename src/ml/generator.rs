// ============================================================
// Layer 5 - Generator (Encoder + Decoder)
// ============================================================
// The network the model coordinator persists as `G`.
//
//   x ──Encoder──▶ (mu, var) ──sample──▶ z ──Decoder──▶ x̂
//
// The encoder heads emit `nz` channels so the latent code
// feeds the decoder directly.
//
// Training vs evaluation is carried by the backend type:
//   Generator<Autodiff<B>>       batch norm uses batch stats
//                                and updates running stats
//   generator.valid()            Generator<B>, running stats only

use burn::prelude::*;

use crate::domain::config::RunConfig;
use crate::ml::{
    decoder::{Decoder, DecoderConfig},
    encoder::{Encoder, EncoderConfig, Posterior},
    params::{prefixed, ParameterShapes},
};

#[derive(Config, Debug)]
pub struct GeneratorConfig {
    pub dim: usize,
    pub ndf: usize,
    pub ngf: usize,
    pub nz:  usize,
}

impl From<&RunConfig> for GeneratorConfig {
    fn from(cfg: &RunConfig) -> Self {
        GeneratorConfig::new(cfg.dim, cfg.ndf, cfg.ngf, cfg.nz)
    }
}

impl GeneratorConfig {
    pub fn encoder(&self) -> EncoderConfig {
        EncoderConfig::new(self.dim, self.ndf, self.nz)
    }

    pub fn decoder(&self) -> DecoderConfig {
        DecoderConfig::new(self.dim, self.ngf, self.nz)
    }

    /// Build with Burn's default parameter initialisation.
    pub fn init<B: Backend>(&self, device: &B::Device) -> Generator<B> {
        Generator {
            encoder: self.encoder().init(device),
            decoder: self.decoder().init(device),
        }
    }

    /// Build and apply the per-kind initialisation policy.
    pub fn init_with_weights<B: Backend>(&self, device: &B::Device) -> Generator<B> {
        let generator = self.init(device).init_weights();
        tracing::debug!(
            "Initialised generator: dim={}, ndf={}, ngf={}, nz={}, {} parameters",
            self.dim, self.ndf, self.ngf, self.nz, generator.num_params(),
        );
        generator
    }

    /// Build a generator that owns a separate copy of `source`'s state.
    ///
    /// `Module::clone` shares batch-norm running statistics between the
    /// clones; a copy made here does not. Parameter shapes follow
    /// `source`, whatever widths this config names.
    pub fn copy_of<B: Backend>(&self, source: &Generator<B>) -> Generator<B> {
        self.init(&source.device()).load_record(source.clone().into_record())
    }
}

#[derive(Module, Debug)]
pub struct Generator<B: Backend> {
    pub encoder: Encoder<B>,
    pub decoder: Decoder<B>,
}

pub struct GeneratorOutput<B: Backend> {
    /// Decoder output - [batch, dim, 128]
    pub reconstruction: Tensor<B, 3>,
    /// Latent Gaussian - [batch, nz, 1] each
    pub posterior:      Posterior<B>,
    /// Sampled latent code - [batch, nz, 1]
    pub z:              Tensor<B, 3>,
}

impl<B: Backend> Generator<B> {
    /// Encode, draw a reparameterised sample, decode.
    pub fn forward(&self, input: Tensor<B, 3>) -> GeneratorOutput<B> {
        let posterior      = self.encoder.forward(input);
        let z              = posterior.sample();
        let reconstruction = self.decoder.forward(z.clone());
        GeneratorOutput { reconstruction, posterior, z }
    }

    /// Deterministic reconstruction through the latent mean.
    pub fn reconstruct(&self, input: Tensor<B, 3>) -> Tensor<B, 3> {
        self.decoder.forward(self.encoder.forward(input).mu)
    }

    /// Device the parameters live on.
    pub fn device(&self) -> B::Device {
        self.decoder.output.weight.val().device()
    }

    pub fn init_weights(self) -> Self {
        Self {
            encoder: self.encoder.init_weights(),
            decoder: self.decoder.init_weights(),
        }
    }
}

impl<B: Backend> ParameterShapes for Generator<B> {
    fn parameter_shapes(&self) -> Vec<(String, Vec<usize>)> {
        prefixed("encoder", self.encoder.parameter_shapes())
            .chain(prefixed("decoder", self.decoder.parameter_shapes()))
            .collect()
    }
}
