use imageproc::point::Point;

/// Coarse hand geometry read off the convex hull of the segmented
/// contour, in ROI coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmarks {
    pub top: Point<i32>,
    pub bottom: Point<i32>,
    pub left: Point<i32>,
    pub right: Point<i32>,
    /// Midpoint of the horizontal bounding extent, a cheap palm-center
    /// proxy (not a centroid of mass).
    pub center_x: i32,
}

/// Extracts the four extremal hull points and the horizontal centroid
/// from a contour.
///
/// The hull bridges gaps from finger spread, so extremity detection stays
/// robust against a non-convex silhouette. Any non-empty contour produces
/// an answer; tiny contours give degenerate but valid landmarks.
pub fn extract(contour: &[Point<i32>]) -> Option<Landmarks> {
    let hull = convex_hull(contour);
    let first = *hull.first()?;

    let mut top = first;
    let mut bottom = first;
    let mut left = first;
    let mut right = first;
    for &p in &hull[1..] {
        if p.y < top.y {
            top = p;
        }
        if p.y > bottom.y {
            bottom = p;
        }
        if p.x < left.x {
            left = p;
        }
        if p.x > right.x {
            right = p;
        }
    }

    Some(Landmarks {
        top,
        bottom,
        left,
        right,
        center_x: (left.x + right.x) / 2,
    })
}

/// Smallest convex polygon containing all input points, via Andrew's
/// monotone chain. Collinear boundary points are dropped. Inputs with
/// fewer than three distinct points come back as-is.
pub fn convex_hull(points: &[Point<i32>]) -> Vec<Point<i32>> {
    let mut sorted: Vec<Point<i32>> = points.to_vec();
    sorted.sort_unstable_by_key(|p| (p.x, p.y));
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }

    let mut lower: Vec<Point<i32>> = Vec::with_capacity(sorted.len());
    for &p in &sorted {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point<i32>> = Vec::with_capacity(sorted.len());
    for &p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0 {
            upper.pop();
        }
        upper.push(p);
    }

    // The last point of each chain is the first point of the other.
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Cross product of (a - o) and (b - o); positive for a counter-clockwise
/// turn in a y-down coordinate system sweep.
fn cross(o: Point<i32>, a: Point<i32>, b: Point<i32>) -> i64 {
    (a.x - o.x) as i64 * (b.y - o.y) as i64 - (a.y - o.y) as i64 * (b.x - o.x) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point<i32> {
        Point::new(x, y)
    }

    #[test]
    fn hull_of_square_with_interior_points() {
        let points = vec![
            p(0, 0),
            p(6, 0),
            p(6, 6),
            p(0, 6),
            p(3, 3),
            p(2, 4),
            p(1, 1),
        ];
        let hull = convex_hull(&points);
        assert_eq!(hull.len(), 4);
        for corner in [p(0, 0), p(6, 0), p(6, 6), p(0, 6)] {
            assert!(hull.contains(&corner), "missing {:?}", corner);
        }
    }

    #[test]
    fn hull_of_tiny_inputs_is_the_inputs() {
        assert!(convex_hull(&[]).is_empty());
        assert_eq!(convex_hull(&[p(2, 5)]), vec![p(2, 5)]);
        assert_eq!(convex_hull(&[p(2, 5), p(4, 1)]), vec![p(2, 5), p(4, 1)]);
    }

    #[test]
    fn extremes_bound_every_hull_point() {
        let points = vec![
            p(5, 0),
            p(9, 4),
            p(7, 9),
            p(1, 8),
            p(0, 3),
            p(4, 4),
            p(6, 5),
        ];
        let lm = extract(&points).unwrap();
        for &q in &convex_hull(&points) {
            assert!(lm.top.y <= q.y);
            assert!(lm.bottom.y >= q.y);
            assert!(lm.left.x <= q.x);
            assert!(lm.right.x >= q.x);
        }
    }

    #[test]
    fn center_x_is_horizontal_midpoint() {
        let points = vec![p(2, 0), p(10, 3), p(6, 8)];
        let lm = extract(&points).unwrap();
        assert_eq!(lm.left.x, 2);
        assert_eq!(lm.right.x, 10);
        assert_eq!(lm.center_x, 6);
    }

    #[test]
    fn single_point_contour_is_degenerate_but_accepted() {
        let lm = extract(&[p(7, 7)]).unwrap();
        assert_eq!(lm.top, p(7, 7));
        assert_eq!(lm.bottom, p(7, 7));
        assert_eq!(lm.center_x, 7);
    }

    #[test]
    fn empty_contour_yields_nothing() {
        assert!(extract(&[]).is_none());
    }
}
