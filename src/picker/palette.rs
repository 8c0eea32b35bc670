// src/picker/palette.rs
use serde::Serialize;

use super::color::Rgb;
use super::swatch::{ColorMode, SwatchId, SwatchSet};

#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEntry {
    pub index: usize,
    pub id: SwatchId,
    pub color: Rgb,
    pub mode: ColorMode,
}

impl PaletteEntry {
    pub fn hex(&self) -> String {
        self.color.to_hex()
    }
}

pub fn project(swatches: &SwatchSet) -> Vec<PaletteEntry> {
    swatches
        .iter()
        .enumerate()
        .map(|(index, s)| PaletteEntry {
            index,
            id: s.id,
            color: s.color,
            mode: s.mode,
        })
        .collect()
}

/// One hex code per line, in palette order.
pub fn as_hex_lines(entries: &[PaletteEntry]) -> String {
    entries
        .iter()
        .map(PaletteEntry::hex)
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
struct ExportedColor {
    hex: String,
    rgb: [u8; 3],
    mode: &'static str,
}

pub fn as_json(entries: &[PaletteEntry]) -> Result<String, String> {
    let out: Vec<ExportedColor> = entries
        .iter()
        .map(|e| ExportedColor {
            hex: e.hex(),
            rgb: [e.color.r, e.color.g, e.color.b],
            mode: match e.mode {
                ColorMode::Sampled => "sampled",
                ColorMode::Manual => "manual",
            },
        })
        .collect();
    serde_json::to_string_pretty(&out).map_err(|e| format!("JSON stringify error: {e}"))
}

/// Result of the last clipboard write, shown next to the entry it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyState {
    #[default]
    Idle,
    Copied(SwatchId),
    Failed(SwatchId),
}

/// Transient copy confirmation. Each write bumps a sequence number so an
/// expiry timer from an older write cannot clear a newer confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CopyFeedback {
    state: CopyState,
    seq: u64,
}

impl CopyFeedback {
    #[cfg(test)]
    pub fn state(&self) -> CopyState {
        self.state
    }

    pub fn for_swatch(&self, id: SwatchId) -> Option<bool> {
        match self.state {
            CopyState::Copied(s) if s == id => Some(true),
            CopyState::Failed(s) if s == id => Some(false),
            _ => None,
        }
    }

    /// Returns the sequence number to hand to [`CopyFeedback::expire`].
    pub fn record(&mut self, id: SwatchId, ok: bool) -> u64 {
        self.seq += 1;
        self.state = if ok {
            CopyState::Copied(id)
        } else {
            CopyState::Failed(id)
        };
        self.seq
    }

    pub fn expire(&mut self, seq: u64) {
        if seq == self.seq {
            self.state = CopyState::Idle;
        }
    }

    /// Forget feedback for a swatch that no longer exists.
    pub fn forget(&mut self, id: SwatchId) {
        if self.for_swatch(id).is_some() {
            self.state = CopyState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::geometry::Point;

    fn set_of(colors: &[Rgb]) -> (SwatchSet, Vec<SwatchId>) {
        let mut set = SwatchSet::new();
        let ids = colors
            .iter()
            .map(|c| set.insert(Point::default(), *c))
            .collect();
        (set, ids)
    }

    #[test]
    fn projection_follows_creation_order() {
        let (set, ids) = set_of(&[Rgb::new(1, 0, 0), Rgb::new(2, 0, 0)]);
        let entries = project(&set);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, ids[0]);
        assert_eq!(entries[1].index, 1);
        assert_eq!(entries[1].hex(), "#020000");
    }

    #[test]
    fn hex_lines_and_json_export() {
        let (set, _) = set_of(&[Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)]);
        let entries = project(&set);
        assert_eq!(as_hex_lines(&entries), "#FF0000\n#0000FF");

        let json = as_json(&entries).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v[1]["hex"], "#0000FF");
        assert_eq!(v[0]["rgb"], serde_json::json!([255, 0, 0]));
        assert_eq!(v[0]["mode"], "sampled");
    }

    #[test]
    fn stale_expiry_keeps_newer_feedback() {
        let (_, ids) = set_of(&[Rgb::BLACK, Rgb::WHITE]);
        let mut fb = CopyFeedback::default();
        let first = fb.record(ids[0], true);
        let second = fb.record(ids[1], false);
        fb.expire(first);
        assert_eq!(fb.state(), CopyState::Failed(ids[1]));
        assert_eq!(fb.for_swatch(ids[0]), None);
        assert_eq!(fb.for_swatch(ids[1]), Some(false));
        fb.expire(second);
        assert_eq!(fb.state(), CopyState::Idle);
    }

    #[test]
    fn forgetting_a_deleted_swatch_clears_its_feedback() {
        let (_, ids) = set_of(&[Rgb::BLACK, Rgb::WHITE]);
        let mut fb = CopyFeedback::default();
        fb.record(ids[0], true);
        fb.forget(ids[1]);
        assert_eq!(fb.state(), CopyState::Copied(ids[0]));
        fb.forget(ids[0]);
        assert_eq!(fb.state(), CopyState::Idle);
    }
}
