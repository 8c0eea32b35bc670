// src/picker/swatch.rs
use std::fmt;

use super::color::Rgb;
use super::geometry::Point;

/// Stable swatch identity. Ids are handed out in increasing order and never
/// reused, so a deleted swatch cannot come back under a palette index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SwatchId(u32);

impl SwatchId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SwatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "swatch-{}", self.0)
    }
}

/// Whether the color still follows the marker position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Color is whatever the sampler reports under the marker.
    Sampled,
    /// Color was set by hand; the next drag switches back to `Sampled`.
    Manual,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Swatch {
    pub id: SwatchId,
    /// Marker top-left in container space.
    pub position: Point,
    pub color: Rgb,
    pub mode: ColorMode,
}

impl Swatch {
    pub fn center(&self, diameter: f64) -> Point {
        self.position.offset(diameter / 2.0, diameter / 2.0)
    }
}

/// Swatches in creation order.
#[derive(Debug, Default)]
pub struct SwatchSet {
    swatches: Vec<Swatch>,
    next_id: u32,
}

impl SwatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, position: Point, color: Rgb) -> SwatchId {
        self.next_id += 1;
        let id = SwatchId(self.next_id);
        self.swatches.push(Swatch {
            id,
            position,
            color,
            mode: ColorMode::Sampled,
        });
        id
    }

    pub fn remove(&mut self, id: SwatchId) -> Option<Swatch> {
        let index = self.index_of(id)?;
        Some(self.swatches.remove(index))
    }

    /// Removes everything; ids keep counting up.
    pub fn clear(&mut self) {
        self.swatches.clear();
    }

    pub fn get(&self, id: SwatchId) -> Option<&Swatch> {
        self.swatches.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: SwatchId) -> Option<&mut Swatch> {
        self.swatches.iter_mut().find(|s| s.id == id)
    }

    pub fn index_of(&self, id: SwatchId) -> Option<usize> {
        self.swatches.iter().position(|s| s.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Swatch> {
        self.swatches.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Swatch> {
        self.swatches.iter_mut()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }
}
