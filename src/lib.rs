pub mod batch;
pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod transform;

#[cfg(test)]
mod testing;

pub use batch::{process_file, BatchFailure, BatchJob, BatchSummary, FileReport};
pub use cli::{Cli, Command, ProcessingArgs};
pub use config::ProcessingConfig;
pub use detection::{locate_bounds, DetectedBounds, DetectionMethod};
pub use error::{Error, Result};
pub use geometry::BoundingRect;
pub use transform::{encode_png, process_image, ProcessedImage};
