// src/picker/geometry.rs
//! Container-space geometry. All coordinates are CSS pixels relative to the
//! top-left corner of the image container.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn minus(self, other: Point) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Point at the given fractions of the width and height.
    pub fn at_fraction(self, fx: f64, fy: f64) -> Point {
        Point::new(self.width * fx, self.height * fy)
    }
}

/// Clamps a box of `extent × extent` whose top-left is `pos` into `bounds`.
/// When the box is larger than the bounds it is pinned to the origin.
pub fn clamp_box(pos: Point, extent: f64, bounds: Size) -> Point {
    let max_x = (bounds.width - extent).max(0.0);
    let max_y = (bounds.height - extent).max(0.0);
    let x = if pos.x.is_finite() { pos.x } else { 0.0 };
    let y = if pos.y.is_finite() { pos.y } else { 0.0 };
    Point::new(x.clamp(0.0, max_x), y.clamp(0.0, max_y))
}

/// Maps a display coordinate onto a source pixel index along one axis.
/// Out-of-range coordinates land on the nearest edge pixel.
pub fn to_source_index(coord: f64, display_len: f64, source_len: u32) -> u32 {
    if source_len == 0 {
        return 0;
    }
    let last = source_len - 1;
    if !(display_len > 0.0) {
        return 0;
    }
    let scaled = (coord * source_len as f64 / display_len).floor();
    if scaled <= 0.0 {
        0
    } else if scaled >= last as f64 {
        last
    } else {
        scaled as u32
    }
}

/// Largest size with the image's aspect ratio that fits inside `bounds`.
pub fn fit_within(natural: (u32, u32), bounds: Size) -> Size {
    let (w, h) = (natural.0 as f64, natural.1 as f64);
    if w <= 0.0 || h <= 0.0 || bounds.is_empty() {
        return Size::default();
    }
    let scale = (bounds.width / w).min(bounds.height / h);
    Size::new((w * scale).floor().max(1.0), (h * scale).floor().max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_box_keeps_marker_inside() {
        let bounds = Size::new(200.0, 100.0);
        assert_eq!(clamp_box(Point::new(-50.0, 40.0), 20.0, bounds), Point::new(0.0, 40.0));
        assert_eq!(clamp_box(Point::new(500.0, 500.0), 20.0, bounds), Point::new(180.0, 80.0));
        assert_eq!(clamp_box(Point::new(f64::NAN, 10.0), 20.0, bounds), Point::new(0.0, 10.0));
    }

    #[test]
    fn clamp_box_pins_oversized_marker_to_origin() {
        let p = clamp_box(Point::new(5.0, 5.0), 40.0, Size::new(30.0, 30.0));
        assert_eq!(p, Point::new(0.0, 0.0));
    }

    #[test]
    fn source_index_scales_and_clamps() {
        // 100px display of a 2px image: each source pixel covers 50px.
        assert_eq!(to_source_index(0.0, 100.0, 2), 0);
        assert_eq!(to_source_index(49.9, 100.0, 2), 0);
        assert_eq!(to_source_index(50.0, 100.0, 2), 1);
        assert_eq!(to_source_index(100.0, 100.0, 2), 1);
        assert_eq!(to_source_index(-3.0, 100.0, 2), 0);
        assert_eq!(to_source_index(9_999.0, 100.0, 2), 1);
    }

    #[test]
    fn source_index_handles_degenerate_sizes() {
        assert_eq!(to_source_index(10.0, 0.0, 8), 0);
        assert_eq!(to_source_index(10.0, 100.0, 0), 0);
    }

    #[test]
    fn fit_within_keeps_aspect_ratio() {
        let bounds = Size::new(800.0, 480.0);
        assert_eq!(fit_within((1600, 900), bounds), Size::new(800.0, 450.0));
        assert_eq!(fit_within((300, 600), bounds), Size::new(240.0, 480.0));
        assert_eq!(fit_within((2, 2), bounds), Size::new(480.0, 480.0));
        assert_eq!(fit_within((0, 10), bounds), Size::default());
    }
}
