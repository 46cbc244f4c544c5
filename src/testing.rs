//! Synthetic screenshots for unit tests.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::geometry::Corner;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

const ARM_LENGTH: u32 = 20;
const LINE_WIDTH: u32 = 2;

/// Draw an L-shaped bracket whose outer corner pixel is `(x, y)`, with both
/// arms pointing toward the image interior.
pub fn draw_bracket(img: &mut RgbaImage, corner: Corner, x: i32, y: i32) {
    let toward = |origin: i32, length: u32, backwards: bool| {
        if backwards {
            origin - length as i32 + 1
        } else {
            origin
        }
    };

    let arm_x = toward(x, ARM_LENGTH, corner.scans_left());
    let arm_y = toward(y, ARM_LENGTH, corner.scans_up());
    let line_x = toward(x, LINE_WIDTH, corner.scans_left());
    let line_y = toward(y, LINE_WIDTH, corner.scans_up());

    draw_filled_rect_mut(
        img,
        Rect::at(arm_x, line_y).of_size(ARM_LENGTH, LINE_WIDTH),
        BLACK,
    );
    draw_filled_rect_mut(
        img,
        Rect::at(line_x, arm_y).of_size(LINE_WIDTH, ARM_LENGTH),
        BLACK,
    );
}

/// White `width`x`height` image with brackets whose corners sit at
/// `(margin, margin)` and `(width - margin, height - margin)`.
pub fn bracketed_image(width: u32, height: u32, margin: i32) -> RgbaImage {
    bracketed_image_on(width, height, margin, WHITE)
}

pub fn bracketed_image_on(width: u32, height: u32, margin: i32, fill: Rgba<u8>) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width, height, fill);
    let right = width as i32 - margin;
    let bottom = height as i32 - margin;
    draw_bracket(&mut img, Corner::TopLeft, margin, margin);
    draw_bracket(&mut img, Corner::TopRight, right, margin);
    draw_bracket(&mut img, Corner::BottomLeft, margin, bottom);
    draw_bracket(&mut img, Corner::BottomRight, right, bottom);
    img
}
