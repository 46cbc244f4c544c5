use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::{self, FilterType};
use image::{
    DynamicImage, ExtendedColorType, ImageEncoder, Rgb, RgbImage, Rgba, Rgba32FImage, RgbaImage,
};
use tracing::debug;

use crate::config::ProcessingConfig;
use crate::detection::{locate_bounds, DetectedBounds};
use crate::error::{Error, Result};
use crate::geometry::BoundingRect;

/// A screenshot after cropping, resizing and flattening
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub image: RgbImage,
    /// Crop rectangle in source pixel coordinates
    pub bounds: DetectedBounds,
}

/// Copy out the pixels of `rect`, right and bottom edges included
pub fn crop_to_bounds(img: &RgbaImage, rect: &BoundingRect) -> Result<RgbaImage> {
    let (width, height) = img.dimensions();
    let region = rect
        .crop_region()
        .filter(|_| rect.fits_within(width, height))
        .ok_or(Error::DetectionFailure { width, height })?;

    Ok(imageops::crop_imm(
        img,
        region.left() as u32,
        region.top() as u32,
        region.width(),
        region.height(),
    )
    .to_image())
}

/// Premultiply alpha: RGB values are multiplied by alpha, all channels in 0..=1
fn premultiply_alpha(img: &RgbaImage) -> Rgba32FImage {
    let (width, height) = img.dimensions();
    Rgba32FImage::from_fn(width, height, |x, y| {
        let Rgba([r, g, b, a]) = *img.get_pixel(x, y);
        let alpha = a as f32 / 255.0;
        Rgba([
            r as f32 / 255.0 * alpha,
            g as f32 / 255.0 * alpha,
            b as f32 / 255.0 * alpha,
            alpha,
        ])
    })
}

/// Unpremultiply alpha: divide RGB by alpha
fn unpremultiply_alpha(premultiplied: &Rgba<f32>) -> Rgba<u8> {
    let Rgba([r, g, b, a]) = *premultiplied;
    let alpha = a.clamp(0.0, 1.0);
    if alpha * 255.0 < 0.5 {
        return Rgba([0, 0, 0, 0]);
    }

    let to_u8 = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([
        to_u8(r / alpha),
        to_u8(g / alpha),
        to_u8(b / alpha),
        to_u8(alpha),
    ])
}

/// Resize to exactly the configured output size with a Lanczos filter.
///
/// Interpolates premultiplied colors so transparent pixels do not bleed
/// their RGB into opaque neighbours.
pub fn resize_to_target(img: &RgbaImage, config: &ProcessingConfig) -> RgbaImage {
    let resized = imageops::resize(
        &premultiply_alpha(img),
        config.target_width,
        config.target_height,
        FilterType::Lanczos3,
    );

    let (width, height) = resized.dimensions();
    RgbaImage::from_fn(width, height, |x, y| {
        unpremultiply_alpha(resized.get_pixel(x, y))
    })
}

fn blend_over_white(channel: u8, alpha: u8) -> u8 {
    let (channel, alpha) = (channel as u32, alpha as u32);
    ((channel * alpha + 255 * (255 - alpha) + 127) / 255) as u8
}

/// Composite onto an opaque white background, dropping the alpha channel
pub fn flatten_onto_white(img: &RgbaImage) -> RgbImage {
    let (width, height) = img.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let Rgba([r, g, b, a]) = *img.get_pixel(x, y);
        Rgb([
            blend_over_white(r, a),
            blend_over_white(g, a),
            blend_over_white(b, a),
        ])
    })
}

/// Encode as PNG using the strongest lossless compression
pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilterType::Adaptive);
    encoder
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(Error::Encode)?;
    Ok(buffer)
}

/// Crop a screenshot to its brackets, resize it and flatten it onto white
pub fn process_image(img: &DynamicImage, config: &ProcessingConfig) -> Result<ProcessedImage> {
    config.validate()?;
    let rgba = img.to_rgba8();
    let bounds = locate_bounds(&rgba, config.bracket_inset)?;

    let cropped = crop_to_bounds(&rgba, &bounds.rect)?;
    debug!(
        "Cropped: {}x{} -> {}x{} ({:?})",
        rgba.width(),
        rgba.height(),
        cropped.width(),
        cropped.height(),
        bounds.method
    );

    let resized = resize_to_target(&cropped, config);
    debug!(
        "Resized: {}x{} -> {}x{}",
        cropped.width(),
        cropped.height(),
        resized.width(),
        resized.height()
    );

    Ok(ProcessedImage {
        image: flatten_onto_white(&resized),
        bounds,
    })
}
