// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and hands off to Layer 2. The
// only printing in the program happens here.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, InspectArgs, RunArgs};

#[derive(Parser, Debug)]
#[command(
    name = "seqvae",
    version = "0.1.0",
    about = "Convolutional sequence autoencoder: initialise, inspect and train generator checkpoints."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Init(args)    => Self::run_init(args),
            Commands::Inspect(args) => Self::run_inspect(args),
            Commands::Train(args)   => Self::run_train(args),
        }
    }

    fn run_init(args: RunArgs) -> Result<()> {
        use crate::application::init_use_case::InitUseCase;

        let weights = InitUseCase::new(args.into()).execute()?;
        println!("Initial generator saved to {}", weights.display());
        Ok(())
    }

    fn run_inspect(args: InspectArgs) -> Result<()> {
        use crate::application::inspect_use_case::InspectUseCase;

        let report = InspectUseCase::new(args.run.into(), args.batch_size).execute()?;

        println!(
            "Generator dim={} ndf={} ngf={} nz={} ({} parameters)",
            report.config.dim, report.config.ndf, report.config.ngf,
            report.config.nz, report.num_params,
        );
        for (name, dims) in &report.parameters {
            println!("  {name:<32} {dims:?}");
        }
        println!("mu:             {:?}", report.mu_dims);
        println!("reconstruction: {:?}", report.reconstruction_dims);
        println!("variance range: [{:.6}, {:.6}]", report.var_min, report.var_max);
        Ok(())
    }

    fn run_train(args: RunArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting run '{}' on '{}'", args.model, args.dataset);
        let history = TrainUseCase::new(args.into()).execute()?;
        println!(
            "Training complete: {} epochs in {:.1}s",
            history.epochs(),
            history.total_time
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::RunConfig;
    use std::path::PathBuf;

    #[test]
    fn test_flags_map_to_run_config() {
        let cli = Cli::try_parse_from([
            "seqvae", "init",
            "--dim", "2", "--nz", "16",
            "--outf", "runs", "--delta", "0.25",
            "--sample-method", "lhs",
        ])
        .unwrap();

        let Commands::Init(args) = cli.command else {
            panic!("expected init");
        };
        let cfg: RunConfig = args.into();
        assert_eq!(cfg.dim, 2);
        assert_eq!(cfg.nz, 16);
        assert_eq!(cfg.ndf, 32);
        assert_eq!(cfg.outf, PathBuf::from("runs"));
        assert_eq!(cfg.delta, 0.25);
        assert_eq!(cfg.sample_method, "lhs");
    }

    #[test]
    fn test_inspect_batch_size() {
        let cli = Cli::try_parse_from(["seqvae", "inspect", "--batch-size", "7"]).unwrap();
        let Commands::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.batch_size, 7);
        assert_eq!(args.run.model, "seqvae");
    }
}
