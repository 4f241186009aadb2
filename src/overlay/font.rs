//! Minimal built-in 5x7 bitmap font for overlay text.
//!
//! Status labels are short and drawn uppercase, so a small letter set
//! keeps the renderer free of font-file assets.

use image::{Rgb, RgbImage};

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal advance per character: glyph plus one column of spacing.
pub const ADVANCE: u32 = GLYPH_WIDTH + 1;

/// Pixel width of a rendered line at the given scale.
pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * ADVANCE * scale
}

/// Draws one line of text with its top-left corner at (x, y).
/// Characters without a glyph render as blanks; pixels falling outside
/// the frame are clipped.
pub fn draw_text_line(
    frame: &mut RgbImage,
    x: i32,
    y: i32,
    text: &str,
    color: Rgb<u8>,
    scale: u32,
) {
    let scale = scale.max(1);
    let (frame_width, frame_height) = frame.dimensions();

    let mut pen_x = x;
    for c in text.chars() {
        let rows = glyph(c);
        for (row_index, row) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if row & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = pen_x + (col * scale + dx) as i32;
                        let py = y + (row_index as u32 * scale + dy) as i32;
                        if px >= 0 && py >= 0 && (px as u32) < frame_width && (py as u32) < frame_height
                        {
                            frame.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
        pen_x += (ADVANCE * scale) as i32;
    }
}

/// Row bitmaps for one character, 5 bits per row, top to bottom.
/// Lowercase letters share the uppercase glyphs.
fn glyph(c: char) -> [u8; 7] {
    match c.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00110, 0b00110],
        _ => [0; 7],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_within_bounds_only() {
        let mut frame = RgbImage::from_pixel(20, 10, Rgb([0, 0, 0]));
        // Partially off-screen on every side; must not panic.
        draw_text_line(&mut frame, -3, -2, "WAVING", Rgb([255, 255, 255]), 1);
        draw_text_line(&mut frame, 15, 6, "WAVING", Rgb([255, 255, 255]), 1);
        assert!(frame.pixels().any(|p| p[0] == 255));
    }

    #[test]
    fn blank_text_leaves_frame_untouched() {
        let mut frame = RgbImage::from_pixel(30, 10, Rgb([0, 0, 0]));
        draw_text_line(&mut frame, 0, 0, "   ", Rgb([255, 255, 255]), 1);
        assert!(frame.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn width_scales_with_text_and_scale() {
        assert_eq!(text_width("WAVING", 1), 36);
        assert_eq!(text_width("WAVING", 2), 72);
        assert_eq!(text_width("", 1), 0);
    }

    #[test]
    fn lowercase_shares_uppercase_glyphs() {
        let mut upper = RgbImage::from_pixel(10, 8, Rgb([0, 0, 0]));
        let mut lower = RgbImage::from_pixel(10, 8, Rgb([0, 0, 0]));
        draw_text_line(&mut upper, 0, 0, "W", Rgb([255, 255, 255]), 1);
        draw_text_line(&mut lower, 0, 0, "w", Rgb([255, 255, 255]), 1);
        assert_eq!(upper.as_raw(), lower.as_raw());
    }
}
