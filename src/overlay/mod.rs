mod font;

pub use font::draw_text_line;

use crate::tracking::RoiBounds;
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;

const ROI_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const CONTOUR_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const TEXT_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

/// Outlines the detection rectangle on the frame.
pub fn draw_roi_box(frame: &mut RgbImage, roi: &RoiBounds) {
    let rect = Rect::at(roi.left as i32, roi.top as i32).of_size(roi.width(), roi.height());
    draw_hollow_rect_mut(frame, rect, ROI_COLOR);
}

/// Traces the hand contour on the frame. Contour points are in ROI space
/// and get offset into frame coordinates here.
pub fn draw_contour(frame: &mut RgbImage, contour: &[Point<i32>], roi: &RoiBounds) {
    let offset = |p: Point<i32>| {
        (
            (p.x + roi.left as i32) as f32,
            (p.y + roi.top as i32) as f32,
        )
    };
    if contour.len() < 2 {
        if let Some(&p) = contour.first() {
            let (x, y) = offset(p);
            if x >= 0.0 && y >= 0.0 && (x as u32) < frame.width() && (y as u32) < frame.height() {
                frame.put_pixel(x as u32, y as u32, CONTOUR_COLOR);
            }
        }
        return;
    }
    for window in contour.windows(2) {
        draw_line_segment_mut(frame, offset(window[0]), offset(window[1]), CONTOUR_COLOR);
    }
    // Close the loop.
    if let (Some(&first), Some(&last)) = (contour.first(), contour.last()) {
        draw_line_segment_mut(frame, offset(last), offset(first), CONTOUR_COLOR);
    }
}

/// Writes the status text centered near the bottom edge of the frame.
pub fn draw_status(frame: &mut RgbImage, text: &str) {
    let scale = 1;
    let width = font::text_width(text, scale);
    let x = (frame.width() as i32 - width as i32) / 2;
    let y = frame.height() as i32 - 10 - font::GLYPH_HEIGHT as i32;
    draw_text_line(frame, x, y, text, TEXT_COLOR, scale);
}

/// Expands the binary mask to a grayscale RGB image for presentation,
/// e.g. when the mask view replaces the camera view.
pub fn mask_to_rgb(mask: &GrayImage) -> RgbImage {
    RgbImage::from_fn(mask.width(), mask.height(), |x, y| {
        let value = mask.get_pixel(x, y)[0];
        Rgb([value, value, value])
    })
}
