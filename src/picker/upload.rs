// src/picker/upload.rs
use std::borrow::Borrow;

use thiserror::Error;

/// 10 MiB.
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// The parts of a browser `File` that decide whether we accept it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            size,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime.trim().to_ascii_lowercase().starts_with("image/")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("No file selected.")]
    Missing,
    #[error("\"{name}\" is not an image (type: {mime}).")]
    NotAnImage { name: String, mime: String },
    #[error("\"{name}\" is empty.")]
    Empty { name: String },
    #[error("\"{name}\" is {}; the limit is {}.", human_size(.size), human_size(.limit))]
    TooLarge { name: String, size: u64, limit: u64 },
    #[error("Could not decode \"{name}\" as an image.")]
    Decode { name: String },
}

pub fn validate(meta: &FileMeta, max_bytes: u64) -> Result<(), UploadError> {
    if !meta.is_image() {
        let mime = if meta.mime.trim().is_empty() {
            "unknown".to_string()
        } else {
            meta.mime.clone()
        };
        return Err(UploadError::NotAnImage {
            name: meta.name.clone(),
            mime,
        });
    }
    if meta.size == 0 {
        return Err(UploadError::Empty {
            name: meta.name.clone(),
        });
    }
    if meta.size > max_bytes {
        return Err(UploadError::TooLarge {
            name: meta.name.clone(),
            size: meta.size,
            limit: max_bytes,
        });
    }
    Ok(())
}

/// Picks the first image out of a pasted or dropped file list, then checks it.
/// Returns the index of the accepted file.
pub fn pick_image(files: &[FileMeta], max_bytes: u64) -> Result<usize, UploadError> {
    let Some(first) = files.first() else {
        return Err(UploadError::Missing);
    };
    match files.iter().position(FileMeta::is_image) {
        Some(index) => validate(&files[index], max_bytes).map(|_| index),
        None => validate(first, max_bytes).map(|_| 0),
    }
}

pub fn human_size<B: Borrow<u64>>(bytes: B) -> String {
    const KIB: f64 = 1024.0;
    let bytes = *bytes.borrow();
    let b = bytes as f64;
    if b < KIB {
        format!("{bytes} B")
    } else if b < KIB * KIB {
        format!("{:.1} KB", b / KIB)
    } else {
        format!("{:.1} MB", b / (KIB * KIB))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_images_under_the_limit() {
        let meta = FileMeta::new("cat.png", "image/png", 2_000);
        assert_eq!(validate(&meta, MAX_IMAGE_BYTES), Ok(()));
        let meta = FileMeta::new("x.JPG", "IMAGE/JPEG", MAX_IMAGE_BYTES);
        assert_eq!(validate(&meta, MAX_IMAGE_BYTES), Ok(()));
    }

    #[test]
    fn rejects_non_images() {
        let meta = FileMeta::new("notes.txt", "text/plain", 10);
        let err = validate(&meta, MAX_IMAGE_BYTES).unwrap_err();
        assert_eq!(err.to_string(), "\"notes.txt\" is not an image (type: text/plain).");

        let meta = FileMeta::new("blob", "", 10);
        assert!(matches!(
            validate(&meta, MAX_IMAGE_BYTES),
            Err(UploadError::NotAnImage { mime, .. }) if mime == "unknown"
        ));
    }

    #[test]
    fn rejects_oversized_and_empty_files() {
        let meta = FileMeta::new("huge.png", "image/png", MAX_IMAGE_BYTES + 1);
        let err = validate(&meta, MAX_IMAGE_BYTES).unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { .. }));
        assert!(err.to_string().contains("10.0 MB"));

        let meta = FileMeta::new("zero.png", "image/png", 0);
        assert!(matches!(validate(&meta, MAX_IMAGE_BYTES), Err(UploadError::Empty { .. })));
    }

    #[test]
    fn pick_image_prefers_first_image_in_list() {
        let files = vec![
            FileMeta::new("a.txt", "text/plain", 5),
            FileMeta::new("b.gif", "image/gif", 5),
            FileMeta::new("c.png", "image/png", 5),
        ];
        assert_eq!(pick_image(&files, MAX_IMAGE_BYTES), Ok(1));
        assert_eq!(pick_image(&[], MAX_IMAGE_BYTES), Err(UploadError::Missing));
        assert!(matches!(
            pick_image(&files[..1], MAX_IMAGE_BYTES),
            Err(UploadError::NotAnImage { .. })
        ));
    }

    #[test]
    fn human_sizes() {
        assert_eq!(human_size(512u64), "512 B");
        assert_eq!(human_size(2048u64), "2.0 KB");
        assert_eq!(human_size(MAX_IMAGE_BYTES), "10.0 MB");
    }
}
