// src/picker/zoom.rs
use super::color::Rgb;
use super::geometry::{clamp_box, Point, Size};
use super::sampler::Bitmap;
use super::swatch::SwatchId;

/// Space between the marker and the preview circle.
pub const PREVIEW_GAP: f64 = 12.0;

/// Where the preview is looking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTarget {
    pub swatch: SwatchId,
    pub marker: Point,
    pub sample: Point,
}

/// Everything needed to paint one preview frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomFrame {
    pub swatch: SwatchId,
    /// Top-left of the preview circle in container space.
    pub placement: Point,
    /// Diameter of the preview circle.
    pub size: f64,
    /// Source pixels per side; always odd so one cell sits in the middle.
    pub cells: u32,
    /// Row-major, `cells * cells`; `None` outside the image.
    pub colors: Vec<Option<Rgb>>,
    pub center_pixel: (u32, u32),
}

impl ZoomFrame {
    pub fn cell_size(&self) -> f64 {
        self.size / self.cells as f64
    }

    pub fn center_color(&self) -> Option<Rgb> {
        let mid = (self.cells / 2) as usize;
        self.colors
            .get(mid * self.cells as usize + mid)
            .copied()
            .flatten()
    }
}

/// Visibility and redraw bookkeeping for the magnifier.
#[derive(Debug, Default)]
pub struct ZoomPreview {
    target: Option<ZoomTarget>,
    redraws: u64,
}

impl ZoomPreview {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.target.is_some()
    }

    #[cfg(test)]
    pub fn target(&self) -> Option<ZoomTarget> {
        self.target
    }

    /// Number of committed redraws. Views repaint when this changes.
    pub fn redraws(&self) -> u64 {
        self.redraws
    }

    pub fn update(&mut self, target: ZoomTarget) {
        self.target = Some(target);
        self.redraws += 1;
    }

    pub fn hide(&mut self) {
        self.target = None;
    }

    pub fn frame(
        &self,
        bitmap: &Bitmap,
        display: Size,
        container: Size,
        diameter: f64,
        size: f64,
        zoom: u32,
    ) -> Option<ZoomFrame> {
        let target = self.target?;
        let cells = cells_for(size, zoom);
        let center_pixel = bitmap.source_pixel(target.sample, display);
        Some(ZoomFrame {
            swatch: target.swatch,
            placement: placement(target.marker, diameter, size, container),
            size,
            cells,
            colors: crop(bitmap, center_pixel, cells),
            center_pixel,
        })
    }
}

pub fn cells_for(size: f64, zoom: u32) -> u32 {
    let zoom = zoom.max(1) as f64;
    let n = (size / zoom).floor().max(3.0) as u32;
    if n % 2 == 0 {
        n + 1
    } else {
        n
    }
}

pub fn crop(bitmap: &Bitmap, center: (u32, u32), cells: u32) -> Vec<Option<Rgb>> {
    let half = (cells / 2) as i64;
    let (cx, cy) = (center.0 as i64, center.1 as i64);
    let mut out = Vec::with_capacity((cells * cells) as usize);
    for dy in -half..=half {
        for dx in -half..=half {
            let (x, y) = (cx + dx, cy + dy);
            let color = if x < 0 || y < 0 {
                None
            } else {
                bitmap.pixel(x as u32, y as u32)
            };
            out.push(color);
        }
    }
    out
}

/// Right of and below the marker unless that would clip; then left or above.
pub fn placement(marker: Point, diameter: f64, size: f64, container: Size) -> Point {
    let right = marker.x + diameter + PREVIEW_GAP;
    let below = marker.y + diameter + PREVIEW_GAP;
    let x = if right + size <= container.width {
        right
    } else {
        marker.x - PREVIEW_GAP - size
    };
    let y = if below + size <= container.height {
        below
    } else {
        marker.y - PREVIEW_GAP - size
    };
    clamp_box(Point::new(x, y), size, container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::sampler::tests::{quad, BLUE, GREEN, RED};
    use crate::picker::swatch::SwatchSet;

    #[test]
    fn cells_are_odd_and_at_least_three() {
        assert_eq!(cells_for(120.0, 8), 15);
        assert_eq!(cells_for(128.0, 8), 17);
        assert_eq!(cells_for(10.0, 8), 3);
        assert_eq!(cells_for(9.0, 0), 9);
    }

    #[test]
    fn crop_pads_outside_pixels() {
        let grid = crop(&quad(), (0, 0), 3);
        assert_eq!(
            grid,
            vec![
                None, None, None,
                None, Some(RED), Some(GREEN),
                None, Some(BLUE), Some(Rgb::WHITE),
            ]
        );
    }

    #[test]
    fn placement_flips_near_edges() {
        let container = Size::new(400.0, 300.0);
        let p = placement(Point::new(10.0, 10.0), 24.0, 100.0, container);
        assert_eq!(p, Point::new(46.0, 46.0));

        let p = placement(Point::new(350.0, 250.0), 24.0, 100.0, container);
        assert_eq!(p, Point::new(238.0, 138.0));
    }

    #[test]
    fn placement_stays_inside_small_containers() {
        let container = Size::new(120.0, 120.0);
        let p = placement(Point::new(48.0, 48.0), 24.0, 100.0, container);
        assert!(p.x >= 0.0 && p.x + 100.0 <= 120.0);
        assert!(p.y >= 0.0 && p.y + 100.0 <= 120.0);
    }

    #[test]
    fn frame_is_hidden_without_target() {
        let mut preview = ZoomPreview::new();
        let bitmap = quad();
        let args = (Size::new(100.0, 100.0), Size::new(100.0, 100.0));
        assert!(preview.frame(&bitmap, args.0, args.1, 24.0, 60.0, 20).is_none());

        let id = SwatchSet::new().insert(Point::default(), Rgb::BLACK);
        preview.update(ZoomTarget {
            swatch: id,
            marker: Point::new(68.0, 8.0),
            sample: Point::new(80.0, 20.0),
        });
        let frame = preview.frame(&bitmap, args.0, args.1, 24.0, 60.0, 20).unwrap();
        assert_eq!(frame.cells, 3);
        assert_eq!(frame.center_pixel, (1, 0));
        assert_eq!(frame.center_color(), Some(GREEN));
        assert_eq!(preview.redraws(), 1);

        preview.hide();
        assert!(!preview.is_visible());
    }
}
