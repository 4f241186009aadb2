use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;

/// Binary mask plus the contour selected as the hand, both in ROI space.
pub struct Segmentation {
    /// Thresholded foreground mask (0 or 255 per pixel).
    pub mask: GrayImage,
    /// Largest-area external contour of the mask.
    pub contour: Vec<Point<i32>>,
}

/// Separates foreground from background by differencing the current ROI
/// against the calibrated reference and keeping the largest external
/// contour of the thresholded result.
///
/// "No hand this frame" is a normal, frequent result and comes back as
/// `None`; the segmenter has no failure modes of its own.
pub struct Segmenter {
    threshold: u8,
}

impl Segmenter {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    pub fn segment(&self, reference: &GrayImage, roi: &GrayImage) -> Option<Segmentation> {
        let diff = absolute_difference(reference, roi);
        let mask = binarize(&diff, self.threshold);
        let contour = largest_external_contour(&mask)?;
        Some(Segmentation { mask, contour })
    }
}

/// Per-pixel absolute difference of two equally sized grayscale images.
pub fn absolute_difference(reference: &GrayImage, roi: &GrayImage) -> GrayImage {
    GrayImage::from_fn(roi.width(), roi.height(), |x, y| {
        let a = reference.get_pixel(x, y)[0] as i16;
        let b = roi.get_pixel(x, y)[0] as i16;
        image::Luma([(a - b).unsigned_abs() as u8])
    })
}

/// Hard 0/255 threshold; differences at or above `threshold` count as
/// foreground. This is the sensitivity knob of the whole pipeline.
pub fn binarize(diff: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(diff.width(), diff.height(), |x, y| {
        if diff.get_pixel(x, y)[0] >= threshold {
            image::Luma([255u8])
        } else {
            image::Luma([0u8])
        }
    })
}

/// All external contours of the mask, holes ignored, reduced to the one
/// with maximum enclosed area. Ties keep the first maximal contour in
/// traversal order.
fn largest_external_contour(mask: &GrayImage) -> Option<Vec<Point<i32>>> {
    let mut best: Option<(i64, Vec<Point<i32>>)> = None;
    for contour in find_contours::<i32>(mask) {
        if contour.border_type == BorderType::Hole {
            continue;
        }
        let area = doubled_area(&contour.points);
        match best {
            Some((best_area, _)) if area <= best_area => {}
            _ => best = Some((area, contour.points)),
        }
    }
    best.map(|(_, points)| points)
}

/// Twice the enclosed polygon area (shoelace formula), kept doubled so
/// comparisons stay in integer arithmetic.
fn doubled_area(points: &[Point<i32>]) -> i64 {
    if points.len() < 3 {
        return 0;
    }
    let mut sum = 0i64;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        sum += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    sum.abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn blank(width: u32, height: u32) -> GrayImage {
        GrayImage::from_pixel(width, height, Luma([0]))
    }

    fn fill_rect(image: &mut GrayImage, x0: u32, y0: u32, x1: u32, y1: u32, value: u8) {
        for y in y0..y1 {
            for x in x0..x1 {
                image.put_pixel(x, y, Luma([value]));
            }
        }
    }

    #[test]
    fn identical_images_yield_no_contour() {
        let reference = GrayImage::from_pixel(10, 10, Luma([40]));
        let roi = reference.clone();
        assert!(Segmenter::new(18).segment(&reference, &roi).is_none());
    }

    #[test]
    fn threshold_is_inclusive() {
        let diff = GrayImage::from_pixel(3, 3, Luma([18]));
        let mask = binarize(&diff, 18);
        assert!(mask.pixels().all(|p| p[0] == 255));

        let diff = GrayImage::from_pixel(3, 3, Luma([17]));
        let mask = binarize(&diff, 18);
        assert!(mask.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn absolute_difference_is_symmetric() {
        let a = GrayImage::from_pixel(2, 2, Luma([30]));
        let b = GrayImage::from_pixel(2, 2, Luma([90]));
        assert!(absolute_difference(&a, &b).pixels().all(|p| p[0] == 60));
        assert!(absolute_difference(&b, &a).pixels().all(|p| p[0] == 60));
    }

    #[test]
    fn picks_largest_of_several_blobs() {
        let reference = blank(20, 20);
        let mut roi = blank(20, 20);
        // Two separated bright blobs; the 5x5 one must win over the 2x2.
        fill_rect(&mut roi, 1, 1, 3, 3, 200);
        fill_rect(&mut roi, 8, 8, 13, 13, 200);

        let seg = Segmenter::new(18).segment(&reference, &roi).unwrap();
        let xs: Vec<i32> = seg.contour.iter().map(|p| p.x).collect();
        let ys: Vec<i32> = seg.contour.iter().map(|p| p.y).collect();
        assert!(xs.iter().all(|&x| (8..13).contains(&x)), "contour {:?}", seg.contour);
        assert!(ys.iter().all(|&y| (8..13).contains(&y)));
    }

    #[test]
    fn mask_keeps_only_changed_pixels() {
        let reference = blank(8, 8);
        let mut roi = blank(8, 8);
        fill_rect(&mut roi, 2, 2, 5, 5, 120);

        let seg = Segmenter::new(18).segment(&reference, &roi).unwrap();
        assert_eq!(seg.mask.get_pixel(3, 3)[0], 255);
        assert_eq!(seg.mask.get_pixel(0, 0)[0], 0);
        assert_eq!(seg.mask.get_pixel(6, 6)[0], 0);
    }

    #[test]
    fn doubled_area_of_square() {
        let square = vec![
            Point::new(0, 0),
            Point::new(4, 0),
            Point::new(4, 4),
            Point::new(0, 4),
        ];
        assert_eq!(doubled_area(&square), 32);
        assert_eq!(doubled_area(&square[..2].to_vec()), 0);
    }
}
