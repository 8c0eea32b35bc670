// src/picker/sampler.rs
use std::rc::Rc;

use thiserror::Error;

use super::color::Rgb;
use super::geometry::{to_source_index, Point, Size};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitmapError {
    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
    #[error("expected {expected} RGBA bytes for {width}x{height}, got {actual}")]
    Length {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("rasterization failed: {0}")]
    Raster(String),
}

/// Row-major RGBA pixels at the image's natural size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, BitmapError> {
        if width == 0 || height == 0 {
            return Err(BitmapError::Empty { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(BitmapError::Length {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Builds a bitmap from opaque colors, row by row.
    #[cfg(test)]
    pub fn from_rgb(width: u32, height: u32, pixels: &[Rgb]) -> Result<Self, BitmapError> {
        let rgba = pixels
            .iter()
            .flat_map(|c| [c.r, c.g, c.b, 255])
            .collect();
        Self::new(width, height, rgba)
    }

    #[cfg(test)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[cfg(test)]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some(Rgb::new(self.rgba[i], self.rgba[i + 1], self.rgba[i + 2]))
    }

    /// Source pixel under a display-space point, clamped to the image.
    pub fn source_pixel(&self, at: Point, display: Size) -> (u32, u32) {
        (
            to_source_index(at.x, display.width, self.width),
            to_source_index(at.y, display.height, self.height),
        )
    }
}

/// Something that can be drawn once into an off-screen buffer.
pub trait ImageSource {
    fn natural_size(&self) -> (u32, u32);
    fn rasterize(&self) -> Result<Bitmap, BitmapError>;
}

/// A source that is already decoded.
impl ImageSource for Bitmap {
    fn natural_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn rasterize(&self) -> Result<Bitmap, BitmapError> {
        Ok(self.clone())
    }
}

/// Issued by [`Sampler::begin_load`]. A ticket from an older load is stale
/// once a newer load begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

enum State {
    Empty,
    Loading,
    Ready {
        source: Rc<dyn ImageSource>,
        cache: Option<Rc<Bitmap>>,
        failed: bool,
    },
}

pub struct Sampler {
    state: State,
    generation: u64,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Sampler {
    pub fn new() -> Self {
        Self {
            state: State::Empty,
            generation: 0,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready { failed: false, .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, State::Loading)
    }

    pub fn natural_size(&self) -> Option<(u32, u32)> {
        match &self.state {
            State::Ready { source, .. } => Some(source.natural_size()),
            _ => None,
        }
    }

    /// Drops the current image and its buffer before any new pixels arrive.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = State::Loading;
        LoadTicket(self.generation)
    }

    /// Returns `false` if the ticket was superseded; the source is dropped.
    pub fn finish_load(&mut self, ticket: LoadTicket, source: Rc<dyn ImageSource>) -> bool {
        if ticket.0 != self.generation || !self.is_loading() {
            return false;
        }
        self.state = State::Ready {
            source,
            cache: None,
            failed: false,
        };
        true
    }

    /// Abandons a load that failed to decode.
    pub fn fail_load(&mut self, ticket: LoadTicket) {
        if ticket.0 == self.generation && self.is_loading() {
            self.state = State::Empty;
        }
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.state = State::Empty;
    }

    /// The rasterized buffer, produced on first call after a load.
    pub fn bitmap(&mut self) -> Result<Option<Rc<Bitmap>>, BitmapError> {
        let State::Ready {
            source,
            cache,
            failed,
        } = &mut self.state
        else {
            return Ok(None);
        };
        if *failed {
            return Ok(None);
        }
        if let Some(bitmap) = cache {
            return Ok(Some(Rc::clone(bitmap)));
        }
        match source.rasterize() {
            Ok(bitmap) => {
                let bitmap = Rc::new(bitmap);
                *cache = Some(Rc::clone(&bitmap));
                Ok(Some(bitmap))
            }
            Err(e) => {
                // stays failed until the next load
                *failed = true;
                Err(e)
            }
        }
    }

    /// Color under a container-space point. `None` means "keep what you have":
    /// no image yet, rasterization failed, or a non-finite coordinate.
    pub fn sample(&mut self, at: Point, display: Size) -> Option<Rgb> {
        if !at.is_finite() {
            return None;
        }
        let bitmap = self.bitmap().ok().flatten()?;
        let (x, y) = bitmap.source_pixel(at, display);
        bitmap.pixel(x, y)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;

    use super::*;

    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);

    /// 2×2: red, green / blue, white.
    pub fn quad() -> Bitmap {
        Bitmap::from_rgb(2, 2, &[RED, GREEN, BLUE, Rgb::WHITE]).unwrap()
    }

    pub fn solid(color: Rgb, w: u32, h: u32) -> Bitmap {
        Bitmap::from_rgb(w, h, &vec![color; (w * h) as usize]).unwrap()
    }

    /// Counts how often the sampler asks for pixels.
    pub struct CountingSource {
        pub bitmap: Bitmap,
        pub rasterized: Rc<Cell<u32>>,
    }

    impl ImageSource for CountingSource {
        fn natural_size(&self) -> (u32, u32) {
            (self.bitmap.width(), self.bitmap.height())
        }

        fn rasterize(&self) -> Result<Bitmap, BitmapError> {
            self.rasterized.set(self.rasterized.get() + 1);
            Ok(self.bitmap.clone())
        }
    }

    /// Rasterization always fails, like a tainted canvas.
    pub struct BrokenSource;

    impl ImageSource for BrokenSource {
        fn natural_size(&self) -> (u32, u32) {
            (4, 4)
        }

        fn rasterize(&self) -> Result<Bitmap, BitmapError> {
            Err(BitmapError::Raster("tainted canvas".into()))
        }
    }

    fn loaded(source: Rc<dyn ImageSource>) -> Sampler {
        let mut sampler = Sampler::new();
        let ticket = sampler.begin_load();
        assert!(sampler.finish_load(ticket, source));
        sampler
    }

    #[test]
    fn bitmap_rejects_wrong_length() {
        let err = Bitmap::new(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            BitmapError::Length {
                width: 2,
                height: 2,
                expected: 16,
                actual: 15
            }
        );
        assert!(matches!(Bitmap::new(0, 3, vec![]), Err(BitmapError::Empty { .. })));
    }

    #[test]
    fn samples_scaled_source_pixel() {
        let mut sampler = loaded(Rc::new(quad()));
        let display = Size::new(300.0, 150.0);
        assert_eq!(sampler.sample(Point::new(10.0, 10.0), display), Some(RED));
        assert_eq!(sampler.sample(Point::new(290.0, 10.0), display), Some(GREEN));
        assert_eq!(sampler.sample(Point::new(10.0, 140.0), display), Some(BLUE));
        assert_eq!(sampler.sample(Point::new(151.0, 76.0), display), Some(Rgb::WHITE));
    }

    #[test]
    fn every_display_point_matches_its_source_pixel() {
        let pixels: Vec<Rgb> = (0..12u8).map(|i| Rgb::new(i * 20, 255 - i * 20, i)).collect();
        let bitmap = Bitmap::from_rgb(4, 3, &pixels).unwrap();
        let mut sampler = loaded(Rc::new(bitmap.clone()));
        let display = Size::new(80.0, 30.0);
        for y in 0..30 {
            for x in 0..80 {
                let got = sampler.sample(Point::new(x as f64, y as f64), display);
                let expected = bitmap.pixel(x / 20, y / 10);
                assert_eq!(got, expected, "at ({x},{y})");
            }
        }
    }

    #[test]
    fn out_of_bounds_points_clamp_to_edge() {
        let mut sampler = loaded(Rc::new(quad()));
        let display = Size::new(100.0, 100.0);
        assert_eq!(sampler.sample(Point::new(-40.0, -40.0), display), Some(RED));
        assert_eq!(sampler.sample(Point::new(1e9, 1e9), display), Some(Rgb::WHITE));
        assert_eq!(sampler.sample(Point::new(f64::INFINITY, 0.0), display), None);
    }

    #[test]
    fn no_color_before_image_is_ready() {
        let mut sampler = Sampler::new();
        assert_eq!(sampler.sample(Point::new(1.0, 1.0), Size::new(10.0, 10.0)), None);
        sampler.begin_load();
        assert!(sampler.is_loading());
        assert_eq!(sampler.sample(Point::new(1.0, 1.0), Size::new(10.0, 10.0)), None);
    }

    #[test]
    fn rasterizes_once_per_image() {
        let count = Rc::new(Cell::new(0));
        let mut sampler = loaded(Rc::new(CountingSource {
            bitmap: quad(),
            rasterized: Rc::clone(&count),
        }));
        assert_eq!(count.get(), 0);
        for i in 0..50 {
            sampler.sample(Point::new(i as f64, i as f64), Size::new(50.0, 50.0));
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn new_image_replaces_cached_pixels() {
        let mut sampler = loaded(Rc::new(solid(RED, 3, 3)));
        let at = Point::new(5.0, 5.0);
        let display = Size::new(30.0, 30.0);
        assert_eq!(sampler.sample(at, display), Some(RED));

        let ticket = sampler.begin_load();
        assert_eq!(sampler.sample(at, display), None);
        assert!(sampler.finish_load(ticket, Rc::new(solid(BLUE, 3, 3))));
        assert_eq!(sampler.sample(at, display), Some(BLUE));
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let mut sampler = Sampler::new();
        let first = sampler.begin_load();
        let second = sampler.begin_load();
        assert!(!sampler.finish_load(first, Rc::new(solid(RED, 1, 1))));
        assert!(sampler.is_loading());
        assert!(sampler.finish_load(second, Rc::new(solid(GREEN, 1, 1))));
        assert_eq!(sampler.sample(Point::new(0.0, 0.0), Size::new(1.0, 1.0)), Some(GREEN));
    }

    #[test]
    fn failed_load_only_clears_its_own_ticket() {
        let mut sampler = Sampler::new();
        let first = sampler.begin_load();
        let second = sampler.begin_load();
        sampler.fail_load(first);
        assert!(sampler.is_loading());
        sampler.fail_load(second);
        assert!(!sampler.is_loading());
    }

    #[test]
    fn rasterization_failure_is_reported_once() {
        let mut sampler = loaded(Rc::new(BrokenSource));
        assert!(sampler.bitmap().is_err());
        assert_eq!(sampler.bitmap(), Ok(None));
        assert_eq!(sampler.sample(Point::new(1.0, 1.0), Size::new(4.0, 4.0)), None);
        assert!(!sampler.is_ready());
    }
}
