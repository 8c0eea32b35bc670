// src/tools/mod.rs
use serde::{Deserialize, Serialize};

pub mod api;
pub mod commit;
pub mod diff;
pub mod json;
pub mod regex_builder;
pub mod shortener;
pub mod time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    ColorPicker,
    Json,
    Regex,
    Diff,
    Commit,
    Api,
    Time,
    Shortener,
}

impl Tool {
    pub const ALL: [Tool; 8] = [
        Tool::ColorPicker,
        Tool::Json,
        Tool::Regex,
        Tool::Diff,
        Tool::Commit,
        Tool::Api,
        Tool::Time,
        Tool::Shortener,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tool::ColorPicker => "Color Picker",
            Tool::Json => "JSON",
            Tool::Regex => "Regex",
            Tool::Diff => "Diff",
            Tool::Commit => "Commit",
            Tool::Api => "API",
            Tool::Time => "Time",
            Tool::Shortener => "URL Shortener",
        }
    }
}
