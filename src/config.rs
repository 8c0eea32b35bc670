// src/config.rs
use gloo_storage::{LocalStorage, Storage};
use serde::{Deserialize, Serialize};

use crate::picker::upload::MAX_IMAGE_BYTES;
use crate::tools::Tool;

const STORAGE_KEY: &str = "toolbench_settings_v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerSettings {
    /// Marker diameter in CSS pixels.
    pub swatch_diameter: f64,
    /// Magnifier diameter in CSS pixels.
    pub preview_size: f64,
    /// Screen pixels per source pixel in the magnifier.
    pub zoom: u32,
    pub max_upload_bytes: u64,
    /// How long "Copied" stays up.
    pub copy_feedback_ms: u32,
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            swatch_diameter: 24.0,
            preview_size: 120.0,
            zoom: 8,
            max_upload_bytes: MAX_IMAGE_BYTES,
            copy_feedback_ms: 1500,
        }
    }
}

impl PickerSettings {
    /// Pulls hand-edited or corrupted values back into usable ranges.
    pub fn normalized(mut self) -> Self {
        let d = Self::default();
        if !self.swatch_diameter.is_finite() {
            self.swatch_diameter = d.swatch_diameter;
        }
        if !self.preview_size.is_finite() {
            self.preview_size = d.preview_size;
        }
        self.swatch_diameter = self.swatch_diameter.clamp(8.0, 64.0);
        self.preview_size = self.preview_size.clamp(48.0, 320.0);
        self.zoom = self.zoom.clamp(2, 32);
        if self.max_upload_bytes == 0 {
            self.max_upload_bytes = d.max_upload_bytes;
        }
        self.copy_feedback_ms = self.copy_feedback_ms.clamp(250, 10_000);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub picker: PickerSettings,
    pub last_tool: Tool,
}

impl Settings {
    /// Nothing stored yet means defaults.
    pub fn from_stored(raw: Option<&str>) -> Self {
        raw.map(Settings::from_json).unwrap_or_default()
    }

    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str::<Settings>(raw)
            .map(Settings::normalized)
            .unwrap_or_default()
    }

    pub fn normalized(mut self) -> Self {
        self.picker = self.picker.normalized();
        self
    }
}

/// Whatever is stored under the settings key, read as a raw JSON string.
pub fn load() -> Settings {
    let raw = LocalStorage::raw().get_item(STORAGE_KEY).ok().flatten();
    Settings::from_stored(raw.as_deref())
}

pub fn save(settings: &Settings) -> Result<(), String> {
    LocalStorage::set(STORAGE_KEY, settings).map_err(|e| format!("Failed to save settings: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let s = Settings::from_json(r#"{ "picker": { "zoom": 4 } }"#);
        assert_eq!(s.picker.zoom, 4);
        assert_eq!(s.picker.swatch_diameter, 24.0);
        assert_eq!(s.last_tool, Tool::default());
    }

    #[test]
    fn nothing_stored_gives_defaults() {
        assert_eq!(Settings::from_stored(None), Settings::default());
        let s = Settings::from_stored(Some(r#"{ "last_tool": "Json" }"#));
        assert_eq!(s.last_tool, Tool::Json);
        assert_eq!(s.picker, PickerSettings::default());
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        assert_eq!(Settings::from_json("not json"), Settings::default());
        assert_eq!(Settings::from_json("[1,2]"), Settings::default());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let s = Settings::from_json(
            r#"{ "picker": { "zoom": 500, "swatch_diameter": 1, "preview_size": 9000,
                 "max_upload_bytes": 0, "copy_feedback_ms": 5 } }"#,
        );
        assert_eq!(s.picker.zoom, 32);
        assert_eq!(s.picker.swatch_diameter, 8.0);
        assert_eq!(s.picker.preview_size, 320.0);
        assert_eq!(s.picker.max_upload_bytes, MAX_IMAGE_BYTES);
        assert_eq!(s.picker.copy_feedback_ms, 250);
    }

    #[test]
    fn round_trips_through_json() {
        let mut s = Settings::default();
        s.last_tool = Tool::Diff;
        s.picker.zoom = 12;
        let raw = serde_json::to_string(&s).unwrap();
        assert_eq!(Settings::from_stored(Some(&raw)), s);
    }
}
