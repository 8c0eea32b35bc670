// src/picker/listeners.rs
//! Document-wide paste and drag-and-drop image input.

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent, File, FileList};
use yew::Callback;

use super::upload::{pick_image, FileMeta, UploadError};

/// Paste/dragover/drop listeners on `document`. They are removed when this
/// value is dropped.
pub struct ImageInputSubscription {
    _listeners: Vec<EventListener>,
}

impl ImageInputSubscription {
    /// `on_files` receives the files of every paste or drop that carried any.
    pub fn attach(on_files: Callback<Vec<File>>) -> Option<Self> {
        let document = web_sys::window()?.document()?;

        let paste = {
            let on_files = on_files.clone();
            EventListener::new(&document, "paste", move |event| {
                let files = event
                    .dyn_ref::<ClipboardEvent>()
                    .and_then(|e| e.clipboard_data())
                    .and_then(|d| d.files())
                    .map(|list| files_of(&list))
                    .unwrap_or_default();
                if !files.is_empty() {
                    on_files.emit(files);
                }
            })
        };

        // without preventDefault on dragover the browser never fires drop
        let dragover = EventListener::new_with_options(
            &document,
            "dragover",
            EventListenerOptions::enable_prevent_default(),
            |event| event.prevent_default(),
        );

        let drop = EventListener::new_with_options(
            &document,
            "drop",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                let files = event
                    .dyn_ref::<DragEvent>()
                    .and_then(|e| e.data_transfer())
                    .and_then(|d| d.files())
                    .map(|list| files_of(&list))
                    .unwrap_or_default();
                if !files.is_empty() {
                    on_files.emit(files);
                }
            },
        );

        Some(Self {
            _listeners: vec![paste, dragover, drop],
        })
    }
}

pub fn files_of(list: &FileList) -> Vec<File> {
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

pub fn meta_of(file: &File) -> FileMeta {
    FileMeta::new(file.name(), file.type_(), file.size().max(0.0) as u64)
}

/// First acceptable image among `files`.
pub fn choose_image(files: Vec<File>, max_bytes: u64) -> Result<File, UploadError> {
    let metas: Vec<FileMeta> = files.iter().map(meta_of).collect();
    let index = pick_image(&metas, max_bytes)?;
    files.into_iter().nth(index).ok_or(UploadError::Missing)
}
