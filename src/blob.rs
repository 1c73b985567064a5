//! Object-URL style preview materialization
//!
//! `BlobRegistry` keeps preview bytes alive under a `blob:` URL until the
//! URL is revoked. It is the default `Materializer` for the preview cache:
//! wrapping registers the bytes, releasing revokes the URL.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use humansize::{format_size, BINARY};
use tracing::warn;

use crate::preview::{LoadError, Materializer, PreviewKey};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// MIME type assumed when the bytes are not recognised
pub const DEFAULT_MIME: &str = "image/png";

/// A registered preview image
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewBlob {
    /// Snapshot the preview belongs to
    pub key: PreviewKey,
    /// `blob:snapview/<n>` URL, unique for the registry's lifetime
    pub url: String,
    pub mime: &'static str,
    pub size: usize,
    /// Pixel dimensions, when the header could be read
    pub dimensions: Option<(u32, u32)>,
}

impl PreviewBlob {
    /// Get human-readable size
    pub fn size_human(&self) -> String {
        format_size(self.size, BINARY)
    }
}

/// Registry of live blob URLs
#[derive(Debug, Default)]
pub struct BlobRegistry {
    next_id: AtomicU64,
    revoked: AtomicU64,
    blobs: Mutex<HashMap<String, Arc<[u8]>>>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` and describe them.
    pub fn create(&self, key: PreviewKey, bytes: Vec<u8>) -> Result<PreviewBlob, LoadError> {
        if bytes.is_empty() {
            return Err(LoadError::Decode("preview image is empty".to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let blob = PreviewBlob {
            key,
            url: format!("blob:snapview/{}", id),
            mime: sniff_mime(&bytes),
            size: bytes.len(),
            dimensions: image_dimensions(&bytes),
        };
        self.lock().insert(blob.url.clone(), Arc::from(bytes));
        Ok(blob)
    }

    /// Revoke a URL. Returns false if it was not live.
    pub fn revoke(&self, url: &str) -> bool {
        let removed = self.lock().remove(url).is_some();
        if removed {
            self.revoked.fetch_add(1, Ordering::Relaxed);
        } else {
            warn!(url, "revoking unknown blob url");
        }
        removed
    }

    /// Bytes behind a live URL
    pub fn bytes(&self, url: &str) -> Option<Arc<[u8]>> {
        self.lock().get(url).cloned()
    }

    /// Number of live URLs
    pub fn live(&self) -> usize {
        self.lock().len()
    }

    /// Number of URLs revoked so far
    pub fn revoked(&self) -> u64 {
        self.revoked.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<[u8]>>> {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Materializer for BlobRegistry {
    type Handle = PreviewBlob;

    fn wrap(&self, key: PreviewKey, bytes: Vec<u8>) -> Result<PreviewBlob, LoadError> {
        self.create(key, bytes)
    }

    fn release(&self, handle: PreviewBlob) {
        self.revoke(&handle.url);
    }
}

/// Guess an image MIME type from its magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(PNG_SIGNATURE) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        DEFAULT_MIME
    }
}

/// Read width and height from a PNG or GIF header.
pub fn image_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.starts_with(PNG_SIGNATURE) {
        // signature, chunk length, "IHDR", then big-endian width and height
        if bytes.len() < 24 || &bytes[12..16] != b"IHDR" {
            return None;
        }
        let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
        let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
        return Some((width, height));
    }
    if bytes.starts_with(b"GIF8") && bytes.len() >= 10 {
        let width = u16::from_le_bytes([bytes[6], bytes[7]]) as u32;
        let height = u16::from_le_bytes([bytes[8], bytes[9]]) as u32;
        return Some((width, height));
    }
    None
}
