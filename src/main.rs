use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use grid_process::{process_file, BatchJob, Cli, Command, ProcessingArgs};

fn init_tracing(options: &ProcessingArgs) {
    let default_level = if options.quiet {
        "error"
    } else if options.verbose {
        "debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.options());

    let config = cli
        .options()
        .config()
        .context("Invalid processing options")?;

    match &cli.command {
        Command::Batch {
            input_dir,
            output_dir,
            ..
        } => {
            info!("Grid Interface Image Processor");
            let summary = BatchJob::new(input_dir, output_dir, config)
                .run()
                .with_context(|| format!("Batch processing failed: {:?}", input_dir))?;

            let (successful, failed) = summary.counts();
            if successful > 0 {
                info!("Successfully processed {} images", successful);
            }
            if failed > 0 {
                bail!("Failed to process {} images", failed);
            }
        }
        Command::Single { input, output, .. } => {
            process_file(input, output, &config)
                .with_context(|| format!("Failed to process {:?}", input))?;
            info!("Successfully processed {:?}", input);
        }
    }

    Ok(())
}
