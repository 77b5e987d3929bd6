use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(about = "Chromosome surface features cli.")]
#[command(author, version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute bead distances and the surface of a PDB structure
    Compute(chrom_io::features::ComputeArgs),
    /// Merge physical features with annotations into parquet
    Compile(chrom_io::compile::CompileArgs),
}

fn main() -> anyhow::Result<()> {
    // load .env
    dotenvy::dotenv().ok();

    // setup tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chrom_core=info,chrom_io=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Compute(args) => {
            let params = args.params();
            tracing::info!("Feature parameters {params:?}");

            chrom_io::features::compute(
                &args.pdb,
                &args.chromosome,
                &args.outdir,
                args.format,
                &params,
            )
            .with_context(|| format!("computing features of {}", args.pdb.display()))?;
        }
        Commands::Compile(args) => {
            args.run()
                .with_context(|| format!("compiling chromosome {}", args.chromosome))?;
        }
    }

    Ok(())
}
