//! Locally addressable handles for received images.
//!
//! A handle stays valid until it is released; the controller releases the
//! previous one before it can hold another.
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::generation::GeneratedImage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHandle {
    pub id: Uuid,
    pub content_type: String,
    pub size: usize,
    /// `memory://<id>` or a filesystem path.
    pub location: String,
}

pub trait ImageStore {
    fn store(&mut self, image: GeneratedImage) -> io::Result<ImageHandle>;
    fn release(&mut self, handle: &ImageHandle);
}

/// File extension for an image MIME type, ignoring parameters.
pub fn extension_for(content_type: &str) -> &'static str {
    let essence = content_type.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    match essence.as_str() {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "bin",
    }
}

#[derive(Debug, Default)]
pub struct MemoryImageStore {
    images: HashMap<Uuid, GeneratedImage>,
}

impl MemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: &ImageHandle) -> Option<&GeneratedImage> {
        self.images.get(&handle.id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageStore for MemoryImageStore {
    fn store(&mut self, image: GeneratedImage) -> io::Result<ImageHandle> {
        let id = Uuid::new_v4();
        let handle = ImageHandle {
            id,
            content_type: image.content_type.clone(),
            size: image.bytes.len(),
            location: format!("memory://{}", id),
        };
        self.images.insert(id, image);
        Ok(handle)
    }

    fn release(&mut self, handle: &ImageHandle) {
        self.images.remove(&handle.id);
    }
}

/// Writes each image to `<dir>/<uuid>.<ext>` and deletes it on release.
#[derive(Debug, Clone)]
pub struct DirImageStore {
    dir: PathBuf,
}

impl DirImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirImageStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageStore for DirImageStore {
    fn store(&mut self, image: GeneratedImage) -> io::Result<ImageHandle> {
        fs::create_dir_all(&self.dir)?;
        let id = Uuid::new_v4();
        let path = self.dir.join(format!("{}.{}", id, extension_for(&image.content_type)));
        fs::write(&path, &image.bytes)?;
        Ok(ImageHandle {
            id,
            content_type: image.content_type,
            size: image.bytes.len(),
            location: path.display().to_string(),
        })
    }

    fn release(&mut self, handle: &ImageHandle) {
        if let Err(e) = fs::remove_file(&handle.location) {
            tracing::warn!("Could not remove {}: {}", handle.location, e);
        }
    }
}
