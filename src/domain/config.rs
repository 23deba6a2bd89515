// ============================================================
// Layer 3 - Run Configuration
// ============================================================
// Every knob of a run in one serialisable struct:
//
//   architecture   dim, ndf, ngf, nz
//   schedule       niter
//   bookkeeping    dataset, model, outf, filename,
//                  update_method, delta, ratio, sample_method
//
// The bookkeeping fields never touch the tensors. They only
// decide where checkpoints live and what they are called, so
// two runs with different hyperparameters never overwrite
// each other's weights.
//
// Shapes are fixed by the network topology:
//   input length 128 → five stride-2 convs → bottleneck 4
//   (128 / 2^5 = 4)
//
// Reference: Rust Book §5 (Structs), §9 (Error Handling)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Sequence length the encoder consumes and the decoder produces.
pub const SEQ_LEN: usize = 128;

/// Sequence length at the bottom of the encoder stack.
pub const BOTTLENECK_LEN: usize = 4;

/// Raised when a configuration cannot describe a valid run.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("`{0}` must be a positive number")]
    NonPositive(&'static str),

    #[error("`{0}` must not be empty")]
    Empty(&'static str),
}

// ─── RunConfig ────────────────────────────────────────────────────────────────
/// Immutable description of a run. Built from CLI flags, validated
/// once, then shared read-only by the model coordinator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Input channel count
    pub dim: usize,
    /// Encoder feature-width multiplier
    pub ndf: usize,
    /// Decoder feature-width multiplier
    pub ngf: usize,
    /// Latent dimensionality
    pub nz: usize,
    /// Number of training iterations (epochs)
    pub niter: usize,

    pub dataset:       String,
    pub model:         String,
    /// Root output directory for every checkpoint of every model
    pub outf:          PathBuf,
    pub filename:      String,
    pub update_method: String,
    pub delta:         f64,
    pub ratio:         f64,
    pub sample_method: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dim:           1,
            ndf:           32,
            ngf:           32,
            nz:            50,
            niter:         100,
            dataset:       "ecg".to_string(),
            model:         "seqvae".to_string(),
            outf:          PathBuf::from("output"),
            filename:      "0".to_string(),
            update_method: "adam".to_string(),
            delta:         0.1,
            ratio:         0.1,
            sample_method: "random".to_string(),
        }
    }
}

impl RunConfig {
    /// Check every invariant the model and the checkpoint layout rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let counts = [
            ("dim",   self.dim),
            ("ndf",   self.ndf),
            ("ngf",   self.ngf),
            ("nz",    self.nz),
            ("niter", self.niter),
        ];
        if let Some((field, _)) = counts.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::NonPositive(*field));
        }

        // `!(x > 0.0)` also rejects NaN
        if !(self.delta > 0.0) {
            return Err(ConfigError::NonPositive("delta"));
        }
        if !(self.ratio > 0.0) {
            return Err(ConfigError::NonPositive("ratio"));
        }

        let names = [
            ("dataset",       self.dataset.as_str()),
            ("model",         self.model.as_str()),
            ("filename",      self.filename.as_str()),
            ("update_method", self.update_method.as_str()),
            ("sample_method", self.sample_method.as_str()),
        ];
        if let Some((field, _)) = names.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ConfigError::Empty(*field));
        }
        if self.outf.as_os_str().is_empty() {
            return Err(ConfigError::Empty("outf"));
        }

        Ok(())
    }

    /// Stem shared by every per-run artefact:
    /// `{model}_{filename}_{update_method}_{delta}_{ratio}_{sample_method}`.
    ///
    /// Floats are written by [`float_tag`].
    pub fn run_tag(&self) -> String {
        format!(
            "{}_{}_{}_{}_{}_{}",
            self.model,
            self.filename,
            self.update_method,
            float_tag(self.delta),
            float_tag(self.ratio),
            self.sample_method,
        )
    }
}

/// Shortest digits that read back to `x`, laid out for file names:
///
///   1e-4 ≤ |x| < 1e16   positional, always with a fraction (`1.0`, `0.0001`)
///   otherwise           `d.ddde±XX`, exponent at least two digits (`1e-05`, `2.5e+16`)
pub fn float_tag(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_string();
    }
    if x.is_infinite() {
        let word = if x > 0.0 { "inf" } else { "-inf" };
        return word.to_string();
    }

    let sign = if x.is_sign_negative() && x != 0.0 { "-" } else { "" };
    // `{:e}` yields the shortest round-trip mantissa, e.g. "1.235e2"
    let sci = format!("{:e}", x.abs());
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if !(-4..16).contains(&exp) {
        let exp_sign = if exp < 0 { '-' } else { '+' };
        return format!("{sign}{mantissa}e{exp_sign}{:02}", exp.unsigned_abs());
    }

    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let body = if exp < 0 {
        format!("0.{}{digits}", "0".repeat((-exp - 1) as usize))
    } else {
        let int_len = exp as usize + 1;
        if digits.len() <= int_len {
            format!("{digits}{}.0", "0".repeat(int_len - digits.len()))
        } else {
            format!("{}.{}", &digits[..int_len], &digits[int_len..])
        }
    };
    format!("{sign}{body}")
}
