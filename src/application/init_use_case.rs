// ============================================================
// Layer 2 - InitUseCase
// ============================================================
// Creates a fresh, initialised generator for a run and writes
// everything a later step needs to pick it up:
//
//   Step 1: Validate the run configuration
//   Step 2: Build the generator and apply the init policy (Layer 5)
//   Step 3: Save run config, weights and an empty history (Layer 6)

use anyhow::{Context, Result};
use burn::prelude::*;
use std::path::PathBuf;

use crate::domain::{config::RunConfig, history::TrainHistory};
use crate::ml::{coordinator::ModelCoordinator, generator::GeneratorConfig, AppBackend};

pub struct InitUseCase {
    config: RunConfig,
}

impl InitUseCase {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Returns the path of the written weight file.
    pub fn execute(&self) -> Result<PathBuf> {
        self.config.validate().context("Invalid run configuration")?;

        let device = <AppBackend as Backend>::Device::default();
        let generator =
            GeneratorConfig::from(&self.config).init_with_weights::<AppBackend>(&device);
        tracing::info!("Generator ready: {} parameters", generator.num_params());

        let coordinator = ModelCoordinator::new(self.config.clone()).with_generator(generator);
        coordinator.save_config()?;
        coordinator.save(&TrainHistory::new())?;
        let weights = coordinator
            .save_weight_gd()
            .context("Failed to write initial generator weights")?;

        Ok(weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::checkpoint::CheckpointPaths;

    #[test]
    fn test_writes_all_artefacts() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = RunConfig {
            dim: 1, ndf: 2, ngf: 2, nz: 4,
            outf: tmp.path().to_path_buf(),
            ..RunConfig::default()
        };

        let weights = InitUseCase::new(cfg.clone()).execute().unwrap();
        let paths   = CheckpointPaths::from_config(&cfg);
        assert_eq!(weights, paths.generator());
        assert!(paths.generator().is_file());
        assert!(paths.config().is_file());
        assert!(paths.history().is_file());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let cfg = RunConfig { nz: 0, ..RunConfig::default() };
        assert!(InitUseCase::new(cfg).execute().is_err());
    }
}
