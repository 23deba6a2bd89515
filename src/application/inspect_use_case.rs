// ============================================================
// Layer 2 - InspectUseCase
// ============================================================
// Loads a saved generator and reports what is inside:
//
//   Step 1: Read the run config saved next to the weights (Layer 6)
//   Step 2: Rebuild the generator from it and load the weights
//   Step 3: List parameter shapes
//   Step 4: Push a random batch through and record output shapes
//           and the range of the predicted variance
//
// The lookup config only needs the fields that name the files
// (outf, model, dataset, filename, ...). Architecture widths are
// taken from the saved config.

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    tensor::{Distribution, ElementConversion},
};

use crate::domain::config::{RunConfig, SEQ_LEN};
use crate::infra::checkpoint::{self, CheckpointPaths};
use crate::ml::{
    coordinator::ModelCoordinator,
    generator::GeneratorConfig,
    params::ParameterShapes,
    AppBackend,
};

#[derive(Debug, Clone)]
pub struct InspectReport {
    pub config:              RunConfig,
    pub parameters:          Vec<(String, Vec<usize>)>,
    pub num_params:          usize,
    pub mu_dims:             [usize; 3],
    pub reconstruction_dims: [usize; 3],
    pub var_min:             f32,
    pub var_max:             f32,
}

pub struct InspectUseCase {
    lookup:     RunConfig,
    batch_size: usize,
}

impl InspectUseCase {
    pub fn new(lookup: RunConfig, batch_size: usize) -> Self {
        Self { lookup, batch_size }
    }

    pub fn execute(&self) -> Result<InspectReport> {
        let config_path = CheckpointPaths::from_config(&self.lookup).config();
        let config: RunConfig = checkpoint::read_json(&config_path).with_context(|| {
            format!(
                "Cannot read run config '{}'. Have you run 'init' first?",
                config_path.display()
            )
        })?;
        config.validate().context("Saved run configuration is invalid")?;

        let device    = <AppBackend as Backend>::Device::default();
        let generator = GeneratorConfig::from(&config).init::<AppBackend>(&device);
        let mut coordinator = ModelCoordinator::new(config.clone()).with_generator(generator);
        coordinator.load(&device)?;

        let generator = coordinator
            .generator()
            .context("Coordinator lost its generator after loading")?;

        let input = Tensor::<AppBackend, 3>::random(
            [self.batch_size.max(1), config.dim, SEQ_LEN],
            Distribution::Uniform(0.0, 1.0),
            &device,
        );
        let out = generator.forward(input);

        let var_min = out.posterior.var.clone().min().into_scalar().elem::<f32>();
        let var_max = out.posterior.var.clone().max().into_scalar().elem::<f32>();
        tracing::debug!("Variance range [{var_min:.6}, {var_max:.6}]");

        Ok(InspectReport {
            parameters:          generator.parameter_shapes(),
            num_params:          generator.num_params(),
            mu_dims:             out.posterior.mu.dims(),
            reconstruction_dims: out.reconstruction.dims(),
            var_min,
            var_max,
            config,
        })
    }
}
