// ============================================================
// Layer 6 - Checkpoint Storage
// ============================================================
// Where run artefacts live and how they are written.
//
// Layout (every path derived from RunConfig):
//
//   {outf}/{model}/{dataset}/
//     {run_tag}_G.mpk            ← generator weights
//     {model}_history.json       ← training history
//     {run_tag}_config.json      ← RunConfig, to rebuild the model
//
//   run_tag = {model}_{filename}_{update_method}_{delta}_{ratio}_{sample_method}
//
// Weights go through Burn's NamedMpkFileRecorder at full
// precision: parameters are stored under their field names and
// reload bit-for-bit. The recorder replaces the file extension,
// so paths already carry `.mpk` (delta/ratio contain dots).
//
// Loading checks, in order:
//   1. the file exists                     → NotFound
//   2. the record decodes into this model  → Mismatch
//   3. every parameter has the same shape  → Mismatch
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use std::{
    fs,
    path::{Path, PathBuf},
};

use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder, RecorderError},
};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::domain::config::RunConfig;
use crate::ml::params::{first_difference, ParameterShapes};

/// Extension written by the weight recorder.
pub const WEIGHTS_EXT: &str = "mpk";

type WeightRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("checkpoint '{}' does not match the model: {reason}", .path.display())]
    Mismatch { path: PathBuf, reason: String },

    #[error("recorder failed on '{}': {reason}", .path.display())]
    Recorder { path: PathBuf, reason: String },

    #[error("I/O error on '{}'", .path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in '{}'", .path.display())]
    Json {
        path:   PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ─── CheckpointPaths ──────────────────────────────────────────────────────────
/// Deterministic file locations for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointPaths {
    dir:     PathBuf,
    model:   String,
    run_tag: String,
}

impl CheckpointPaths {
    pub fn from_config(cfg: &RunConfig) -> Self {
        Self {
            dir:     cfg.outf.join(&cfg.model).join(&cfg.dataset),
            model:   cfg.model.clone(),
            run_tag: cfg.run_tag(),
        }
    }

    /// `{outf}/{model}/{dataset}`
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn generator(&self) -> PathBuf {
        self.dir.join(format!("{}_G.{WEIGHTS_EXT}", self.run_tag))
    }

    pub fn history(&self) -> PathBuf {
        self.dir.join(format!("{}_history.json", self.model))
    }

    pub fn config(&self) -> PathBuf {
        self.dir.join(format!("{}_config.json", self.run_tag))
    }
}

// ─── Weights ──────────────────────────────────────────────────────────────────
/// Write every parameter of `module` to `path`.
pub fn save_module<B, M>(module: &M, path: &Path) -> Result<(), CheckpointError>
where
    B: Backend,
    M: Module<B>,
{
    ensure_parent(path)?;

    Recorder::<B>::record(&WeightRecorder::new(), module.clone().into_record(), path.to_path_buf())
        .map_err(|err| CheckpointError::Recorder {
            path:   path.to_path_buf(),
            reason: format!("{err:?}"),
        })?;

    tracing::debug!("Saved weights to '{}'", path.display());
    Ok(())
}

/// Read the record at `path` into `module` and verify it fits.
///
/// `module` is consumed and may be left holding the file's values even
/// when the check fails. Pass one that shares no state with a module
/// you keep: clones share batch-norm running statistics.
pub fn load_module<B, M>(module: M, path: &Path, device: &B::Device) -> Result<M, CheckpointError>
where
    B: Backend,
    M: Module<B> + ParameterShapes,
{
    if !path.is_file() {
        return Err(CheckpointError::NotFound(path.to_path_buf()));
    }

    let expected = module.parameter_shapes();

    let record: M::Record = Recorder::<B>::load(&WeightRecorder::new(), path.to_path_buf(), device)
        .map_err(|err| match err {
            RecorderError::DeserializeError(reason) => CheckpointError::Mismatch {
                path: path.to_path_buf(),
                reason,
            },
            other => CheckpointError::Recorder {
                path:   path.to_path_buf(),
                reason: format!("{other:?}"),
            },
        })?;

    let loaded = module.load_record(record);
    if let Some(reason) = first_difference(&expected, &loaded.parameter_shapes()) {
        return Err(CheckpointError::Mismatch { path: path.to_path_buf(), reason });
    }

    tracing::debug!("Loaded weights from '{}'", path.display());
    Ok(loaded)
}

// ─── JSON artefacts ───────────────────────────────────────────────────────────
/// Pretty-print `value` as JSON to `path`, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), CheckpointError> {
    ensure_parent(path)?;

    let json = serde_json::to_string_pretty(value).map_err(|source| CheckpointError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| CheckpointError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CheckpointError> {
    if !path.is_file() {
        return Err(CheckpointError::NotFound(path.to_path_buf()));
    }

    let json = fs::read_to_string(path).map_err(|source| CheckpointError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| CheckpointError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent(path: &Path) -> Result<(), CheckpointError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|source| CheckpointError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
