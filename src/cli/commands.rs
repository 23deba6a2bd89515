// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Three subcommands share one set of run flags:
//
//   init     build + initialise a generator, save it
//   inspect  reload a saved generator and report on it
//   train    run the training lifecycle (needs a Trainer)
//
// The run flags mirror RunConfig one to one. The bookkeeping
// flags (model, dataset, filename, update-method, delta, ratio,
// sample-method) decide which checkpoint files are touched.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::domain::config::RunConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build an initialised generator and save it as a checkpoint
    Init(RunArgs),

    /// Load a saved generator and print its structure and output shapes
    Inspect(InspectArgs),

    /// Train the generator and save history and weights
    Train(RunArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Number of input channels
    #[arg(long, default_value_t = 1)]
    pub dim: usize,

    /// Encoder width multiplier
    #[arg(long, default_value_t = 32)]
    pub ndf: usize,

    /// Decoder width multiplier
    #[arg(long, default_value_t = 32)]
    pub ngf: usize,

    /// Latent dimensionality
    #[arg(long, default_value_t = 50)]
    pub nz: usize,

    /// Number of training iterations
    #[arg(long, default_value_t = 100)]
    pub niter: usize,

    #[arg(long, default_value = "ecg")]
    pub dataset: String,

    #[arg(long, default_value = "seqvae")]
    pub model: String,

    /// Root directory for checkpoints: {outf}/{model}/{dataset}/
    #[arg(long, default_value = "output")]
    pub outf: PathBuf,

    #[arg(long, default_value = "0")]
    pub filename: String,

    #[arg(long, default_value = "adam")]
    pub update_method: String,

    #[arg(long, default_value_t = 0.1)]
    pub delta: f64,

    #[arg(long, default_value_t = 0.1)]
    pub ratio: f64,

    #[arg(long, default_value = "random")]
    pub sample_method: String,
}

impl From<RunArgs> for RunConfig {
    fn from(a: RunArgs) -> Self {
        RunConfig {
            dim:           a.dim,
            ndf:           a.ndf,
            ngf:           a.ngf,
            nz:            a.nz,
            niter:         a.niter,
            dataset:       a.dataset,
            model:         a.model,
            outf:          a.outf,
            filename:      a.filename,
            update_method: a.update_method,
            delta:         a.delta,
            ratio:         a.ratio,
            sample_method: a.sample_method,
        }
    }
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Size of the random batch pushed through the generator
    #[arg(long, default_value_t = 4)]
    pub batch_size: usize,
}
