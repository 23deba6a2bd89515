// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates one training run around the coordinator:
//
//   Step 1: Validate the run configuration
//   Step 2: Build the generator on the training backend and
//           apply the init policy (Layer 5)
//   Step 3: Hand it to the attached Trainer via the coordinator
//   Step 4: Save history, weights and run config (Layer 6)
//
// The training routine itself (data, losses, optimiser) is an
// external Trainer implementation. Without one, Step 3 fails
// with the coordinator's Unimplemented error.
//
// Reference: Burn Book §5 (Training)

use anyhow::{Context, Result};
use burn::prelude::*;

use crate::domain::{config::RunConfig, history::TrainHistory};
use crate::ml::{
    coordinator::{ModelCoordinator, Trainer},
    generator::GeneratorConfig,
    TrainBackend,
};

pub struct TrainUseCase {
    config:  RunConfig,
    trainer: Option<Box<dyn Trainer<TrainBackend>>>,
}

impl TrainUseCase {
    pub fn new(config: RunConfig) -> Self {
        Self { config, trainer: None }
    }

    pub fn with_trainer(mut self, trainer: impl Trainer<TrainBackend> + 'static) -> Self {
        self.trainer = Some(Box::new(trainer));
        self
    }

    /// Execute the run end to end and return its history.
    pub fn execute(self) -> Result<TrainHistory> {
        self.config.validate().context("Invalid run configuration")?;

        let device = <TrainBackend as Backend>::Device::default();
        let generator =
            GeneratorConfig::from(&self.config).init_with_weights::<TrainBackend>(&device);

        let mut coordinator = ModelCoordinator::new(self.config).with_generator(generator);
        if let Some(trainer) = self.trainer {
            coordinator.set_trainer(trainer);
        }

        let history = coordinator.train()?;

        coordinator.save(&history)?;
        coordinator.save_weight_gd()?;
        coordinator.save_config()?;
        tracing::info!(
            "Run artefacts written to '{}'",
            coordinator.paths().dir().display()
        );

        Ok(history)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::checkpoint::CheckpointPaths;
    use crate::ml::{coordinator::CoordinatorError, generator::Generator};
    use burn::tensor::{Distribution, ElementConversion};

    /// Records the mean reconstruction of a random batch once per epoch.
    struct ProbeTrainer;

    impl Trainer<TrainBackend> for ProbeTrainer {
        fn train(
            &mut self,
            generator: Generator<TrainBackend>,
            config:    &RunConfig,
        ) -> anyhow::Result<(Generator<TrainBackend>, TrainHistory)> {
            let device = Default::default();
            let mut history = TrainHistory::new();
            for _ in 0..config.niter {
                let x = Tensor::<TrainBackend, 3>::random(
                    [2, config.dim, 128],
                    Distribution::Uniform(0.0, 1.0),
                    &device,
                );
                let mean = generator.forward(x).reconstruction.mean().into_scalar().elem::<f64>();
                history.record("mean_reconstruction", mean);
                history.end_epoch(0.0);
            }
            Ok((generator, history))
        }
    }

    fn config_in(outf: &std::path::Path) -> RunConfig {
        RunConfig {
            dim: 1, ndf: 2, ngf: 2, nz: 4, niter: 2,
            outf: outf.to_path_buf(),
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_run_saves_artefacts() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config_in(tmp.path());

        let history = TrainUseCase::new(cfg.clone())
            .with_trainer(ProbeTrainer)
            .execute()
            .unwrap();

        assert_eq!(history.epochs(), 2);
        let mean = history.last("mean_reconstruction").unwrap();
        assert!(mean > 0.0 && mean < 1.0);

        let paths = CheckpointPaths::from_config(&cfg);
        assert!(paths.history().is_file());
        assert!(paths.generator().is_file());
        assert!(paths.config().is_file());
    }

    #[test]
    fn test_run_without_trainer_is_unimplemented() {
        let tmp = tempfile::tempdir().unwrap();
        let err = TrainUseCase::new(config_in(tmp.path())).execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CoordinatorError>(),
            Some(CoordinatorError::Unimplemented("train"))
        ));
        assert!(!CheckpointPaths::from_config(&config_in(tmp.path())).generator().exists());
    }
}
