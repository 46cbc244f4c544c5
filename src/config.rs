use crate::error::{Error, Result};

pub const DEFAULT_TARGET_WIDTH: u32 = 670;
pub const DEFAULT_TARGET_HEIGHT: u32 = 366;
pub const DEFAULT_BRACKET_INSET: u32 = 2;

/// Settings for one processing run, shared read-only by every image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingConfig {
    /// Output width in pixels
    pub target_width: u32,
    /// Output height in pixels
    pub target_height: u32,
    /// Pixels to move inward from each detected bracket corner,
    /// so the bracket lines themselves are not part of the crop
    pub bracket_inset: u32,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            target_width: DEFAULT_TARGET_WIDTH,
            target_height: DEFAULT_TARGET_HEIGHT,
            bracket_inset: DEFAULT_BRACKET_INSET,
        }
    }
}

impl ProcessingConfig {
    pub fn new(target_width: u32, target_height: u32, bracket_inset: u32) -> Result<Self> {
        let config = Self {
            target_width,
            target_height,
            bracket_inset,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_target_size(mut self, width: u32, height: u32) -> Self {
        self.target_width = width;
        self.target_height = height;
        self
    }

    pub fn with_bracket_inset(mut self, inset: u32) -> Self {
        self.bracket_inset = inset;
        self
    }

    pub fn target_size(&self) -> (u32, u32) {
        (self.target_width, self.target_height)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(Error::InvalidConfig(format!(
                "target size must be non-zero, got {}x{}",
                self.target_width, self.target_height
            )));
        }
        Ok(())
    }
}
