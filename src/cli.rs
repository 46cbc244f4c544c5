use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{
    ProcessingConfig, DEFAULT_BRACKET_INSET, DEFAULT_TARGET_HEIGHT, DEFAULT_TARGET_WIDTH,
};
use crate::error::Result;

#[derive(Parser, Debug)]
#[command(name = "grid-process")]
#[command(version, about = "Crop grid controller screenshots to their corner brackets and resize them")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process every PNG image in a directory
    Batch {
        /// Input directory containing PNG images to process
        #[arg(short, long, default_value = "images")]
        input_dir: PathBuf,

        /// Output directory for processed images
        #[arg(short, long, default_value = "images/processed")]
        output_dir: PathBuf,

        #[command(flatten)]
        options: ProcessingArgs,
    },

    /// Process a single screenshot
    Single {
        /// Input image path
        input: PathBuf,

        /// Output PNG path
        output: PathBuf,

        #[command(flatten)]
        options: ProcessingArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ProcessingArgs {
    /// Target width for output images
    #[arg(short, long, default_value_t = DEFAULT_TARGET_WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Target height for output images
    #[arg(short = 'H', long, default_value_t = DEFAULT_TARGET_HEIGHT, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Pixels to crop inside brackets to exclude black lines
    #[arg(long, default_value_t = DEFAULT_BRACKET_INSET)]
    pub bracket_offset: u32,

    /// Suppress progress output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show detection details
    #[arg(short, long)]
    pub verbose: bool,
}

impl ProcessingArgs {
    pub fn config(&self) -> Result<ProcessingConfig> {
        ProcessingConfig::new(self.width, self.height, self.bracket_offset)
    }
}

impl Cli {
    pub fn options(&self) -> &ProcessingArgs {
        match &self.command {
            Command::Batch { options, .. } | Command::Single { options, .. } => options,
        }
    }
}
