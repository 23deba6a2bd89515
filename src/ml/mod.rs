// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// All network definitions and the coordinator that persists
// them.
//
//   init.rs        - per-kind weight initialisation
//                    (Conv → Xavier normal, BatchNorm → N(1, 0.02),
//                     Linear → Xavier uniform + 0.01 bias)
//
//   params.rs      - flat name → shape listing of a model's
//                    parameters, used to validate checkpoints
//
//   encoder.rs     - 5 stride-2 Conv1d blocks + mean/variance
//                    heads (amortised inference)
//
//   decoder.rs     - 5 ConvTranspose1d blocks + sigmoid output
//
//   generator.rs   - Encoder + Decoder with reparameterised
//                    sampling
//
//   coordinator.rs - owns the generator, the run config and the
//                    Trainer seam; saves/loads checkpoints
//
// Reference: Burn Book §3 (Building Blocks)
//            Kingma & Welling (2014) Auto-Encoding Variational Bayes

/// Weight initialisation by layer kind
pub mod init;

/// Parameter name/shape listings
pub mod params;

/// Sequence → latent Gaussian
pub mod encoder;

/// Latent code → sequence
pub mod decoder;

/// Encoder/decoder pair
pub mod generator;

/// Model coordinator and the Trainer trait
pub mod coordinator;

/// Backend used by the CLI for inference-mode work.
#[cfg(not(feature = "wgpu"))]
pub type AppBackend = burn::backend::NdArray;

#[cfg(feature = "wgpu")]
pub type AppBackend = burn::backend::Wgpu;

/// Training-mode backend: batch norm uses batch statistics.
pub type TrainBackend = burn::backend::Autodiff<AppBackend>;
