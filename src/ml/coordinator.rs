// ============================================================
// Layer 5 - Model Coordinator
// ============================================================
// Owns what a run needs between training steps:
//
//   generator   the Encoder/Decoder pair (`G`), attached after
//               construction
//   trainer     the training routine, supplied from outside
//   config      the immutable RunConfig
//   paths       checkpoint locations derived from the config
//
// Lifecycle:
//
//   ModelCoordinator::new(cfg)
//       .with_generator(g)
//       .with_trainer(t)
//   train()            → TrainHistory       (delegates to Trainer)
//   save(&history)     → {model}_history.json
//   save_weight_gd()   → {run_tag}_G.mpk
//   load(&device)      ← {run_tag}_G.mpk
//
// Without a trainer, `train()` reports Unimplemented: the
// coordinator has no training routine of its own.

use std::path::PathBuf;

use burn::prelude::*;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::domain::{config::RunConfig, history::TrainHistory};
use crate::infra::checkpoint::{self, CheckpointError, CheckpointPaths};
use crate::ml::{
    generator::{Generator, GeneratorConfig},
    params::{first_difference, ParameterShapes},
};

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("`{0}` is not implemented by the base model; attach a trainer")]
    Unimplemented(&'static str),

    #[error("no generator is attached to the model")]
    MissingGenerator,

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),

    #[error(transparent)]
    Training(#[from] anyhow::Error),
}

/// A training routine for the generator.
///
/// Receives a copy of the current generator and returns the trained
/// one together with its history. Losses, data and optimisers are the
/// implementor's business.
pub trait Trainer<B: Backend> {
    fn train(
        &mut self,
        generator: Generator<B>,
        config:    &RunConfig,
    ) -> anyhow::Result<(Generator<B>, TrainHistory)>;
}

pub struct ModelCoordinator<B: Backend> {
    generator: Option<Generator<B>>,
    trainer:   Option<Box<dyn Trainer<B>>>,
    config:    RunConfig,
    paths:     CheckpointPaths,
}

impl<B: Backend> ModelCoordinator<B> {
    pub fn new(config: RunConfig) -> Self {
        let paths = CheckpointPaths::from_config(&config);
        Self { generator: None, trainer: None, config, paths }
    }

    pub fn with_generator(mut self, generator: Generator<B>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_trainer(mut self, trainer: impl Trainer<B> + 'static) -> Self {
        self.trainer = Some(Box::new(trainer));
        self
    }

    pub fn set_trainer(&mut self, trainer: Box<dyn Trainer<B>>) {
        self.trainer = Some(trainer);
    }

    pub fn generator(&self) -> Option<&Generator<B>> {
        self.generator.as_ref()
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn paths(&self) -> &CheckpointPaths {
        &self.paths
    }

    /// Run the attached trainer and keep the generator it returns.
    ///
    /// The trainer works on a separate copy, so the generator in place
    /// before the call survives a failed run untouched.
    pub fn train(&mut self) -> Result<TrainHistory, CoordinatorError> {
        let trainer = self
            .trainer
            .as_mut()
            .ok_or(CoordinatorError::Unimplemented("train"))?;
        let current = self
            .generator
            .as_ref()
            .ok_or(CoordinatorError::MissingGenerator)?;
        let generator = GeneratorConfig::from(&self.config).copy_of(current);

        tracing::info!(
            "Training '{}' on '{}' for {} iterations",
            self.config.model, self.config.dataset, self.config.niter,
        );
        let (trained, history) = trainer.train(generator, &self.config)?;
        self.generator = Some(trained);

        tracing::info!("Training finished after {} epochs", history.epochs());
        Ok(history)
    }

    /// Serialise a training history next to the checkpoints.
    pub fn save<H: Serialize + ?Sized>(&self, train_hist: &H) -> Result<PathBuf, CoordinatorError> {
        let path = self.paths.history();
        checkpoint::write_json(train_hist, &path)?;
        tracing::info!("Saved history to '{}'", path.display());
        Ok(path)
    }

    pub fn load_history<H: DeserializeOwned>(&self) -> Result<H, CoordinatorError> {
        Ok(checkpoint::read_json(&self.paths.history())?)
    }

    /// Write the generator's parameters to the run's weight file.
    pub fn save_weight_gd(&self) -> Result<PathBuf, CoordinatorError> {
        let generator = self
            .generator
            .as_ref()
            .ok_or(CoordinatorError::MissingGenerator)?;

        let path = self.paths.generator();
        checkpoint::save_module(generator, &path)?;
        tracing::info!("Saved generator weights to '{}'", path.display());
        Ok(path)
    }

    /// Restore the generator's parameters from the run's weight file.
    ///
    /// The file is read into a freshly built generator, which replaces
    /// the attached one only if every parameter shape matches it. On
    /// failure the attached generator is left unchanged.
    pub fn load(&mut self, device: &B::Device) -> Result<(), CoordinatorError> {
        let current = self
            .generator
            .as_ref()
            .ok_or(CoordinatorError::MissingGenerator)?;

        let path   = self.paths.generator();
        let fresh  = GeneratorConfig::from(&self.config).init(device);
        let loaded = checkpoint::load_module(fresh, &path, device)?;
        if let Some(reason) = first_difference(&current.parameter_shapes(), &loaded.parameter_shapes()) {
            return Err(CheckpointError::Mismatch { path, reason }.into());
        }
        self.generator = Some(loaded);

        tracing::info!("Loaded generator weights from '{}'", path.display());
        Ok(())
    }

    /// Store the run configuration so the generator can be rebuilt later.
    pub fn save_config(&self) -> Result<PathBuf, CoordinatorError> {
        let path = self.paths.config();
        checkpoint::write_json(&self.config, &path)?;
        tracing::debug!("Saved run config to '{}'", path.display());
        Ok(path)
    }
}
