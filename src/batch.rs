use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use tracing::{error, info};

use crate::config::ProcessingConfig;
use crate::detection::DetectedBounds;
use crate::error::{Error, Result};
use crate::transform::{encode_png, process_image};

/// File extensions picked up by a batch run, compared case-insensitively
pub const IMAGE_EXTENSIONS: &[&str] = &["png"];

/// Outcome of processing one file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub source_size: (u32, u32),
    pub bounds: DetectedBounds,
    pub output_size: (u32, u32),
}

#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Success and failure counts for a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub successful: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// `(successful, failed)`
    pub fn counts(&self) -> (usize, usize) {
        (self.successful, self.failed())
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

pub fn load_image(path: &Path) -> Result<DynamicImage> {
    ImageReader::open(path)
        .map_err(|e| Error::io(path, e))?
        .with_guessed_format()
        .map_err(|e| Error::io(path, e))?
        .decode()
        .map_err(|source| Error::Decode {
            path: path.to_path_buf(),
            source,
        })
}

/// Process one screenshot from `input` into a PNG at `output`.
///
/// The parent directory of `output` is created when missing.
pub fn process_file(input: &Path, output: &Path, config: &ProcessingConfig) -> Result<FileReport> {
    let img = load_image(input)?;
    info!(
        "Processing {} ({}x{})",
        input.file_name().unwrap_or_default().to_string_lossy(),
        img.width(),
        img.height()
    );

    let processed = process_image(&img, config)?;
    let rect = processed.bounds.rect;
    info!("  Cropped to: {}x{}", rect.width(), rect.height());
    info!(
        "  Resized to: {}x{}",
        processed.image.width(),
        processed.image.height()
    );

    let bytes = encode_png(&processed.image)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(output, bytes).map_err(|e| Error::io(output, e))?;
    info!("  Saved: {}", output.display());

    Ok(FileReport {
        source_size: (img.width(), img.height()),
        bounds: processed.bounds,
        output_size: processed.image.dimensions(),
    })
}

/// Every screenshot in one directory, written under the same names to another
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub config: ProcessingConfig,
}

impl BatchJob {
    pub fn new(
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        config: ProcessingConfig,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            config,
        }
    }

    /// Matching files in the input directory, sorted by path
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        if !self.input_dir.is_dir() {
            return Err(Error::MissingInputDir(self.input_dir.clone()));
        }

        let entries = fs::read_dir(&self.input_dir).map_err(|e| Error::io(&self.input_dir, e))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::io(&self.input_dir, e))?.path();
            if path.is_file() && has_image_extension(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    pub fn output_path(&self, input: &Path) -> PathBuf {
        self.output_dir.join(input.file_name().unwrap_or_default())
    }

    /// Process every matching file. A file that fails is logged and counted;
    /// only problems with the directories themselves return an error.
    pub fn run(&self) -> Result<BatchSummary> {
        let files = self.files()?;
        fs::create_dir_all(&self.output_dir).map_err(|e| Error::io(&self.output_dir, e))?;

        if files.is_empty() {
            info!("No PNG files found in {}", self.input_dir.display());
            return Ok(BatchSummary::default());
        }

        info!("Found {} PNG files to process", files.len());
        info!(
            "Target size: {}x{}",
            self.config.target_width, self.config.target_height
        );

        let summary = files
            .iter()
            .fold(BatchSummary::default(), |mut summary, input| {
                match process_file(input, &self.output_path(input), &self.config) {
                    Ok(_) => summary.successful += 1,
                    Err(err) => {
                        error!("Error processing {}: {}", input.display(), err);
                        summary.failures.push(BatchFailure {
                            path: input.clone(),
                            message: err.to_string(),
                        });
                    }
                }
                summary
            });

        info!(
            "Processing complete: {} successful, {} failed",
            summary.successful,
            summary.failed()
        );
        info!("Processed images saved to: {}", self.output_dir.display());

        Ok(summary)
    }
}
