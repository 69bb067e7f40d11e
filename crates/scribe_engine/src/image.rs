use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Only clipboard/drop/picker candidates with an image MIME type are staged.
const IMAGE_MIME_PREFIX: &str = "image/";

/// One staged attachment awaiting the next outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImage {
    pub name: String,
    pub mime: String,
    /// Self-contained `data:{mime};base64,...` payload.
    pub data_url: String,
}

/// Staging list for pasted, dropped or picked images, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct ImageTray {
    pending: Vec<PendingImage>,
}

impl ImageTray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes and stages an accepted file; rejects non-image MIME types.
    pub fn accept(&mut self, name: &str, mime: &str, bytes: &[u8]) -> bool {
        if !mime.starts_with(IMAGE_MIME_PREFIX) {
            return false;
        }
        let encoded = STANDARD.encode(bytes);
        self.pending.push(PendingImage {
            name: name.to_string(),
            mime: mime.to_string(),
            data_url: format!("data:{mime};base64,{encoded}"),
        });
        true
    }

    pub fn pending(&self) -> &[PendingImage] {
        &self.pending
    }

    /// Deletes by position; the only mutation besides accept and drain.
    pub fn remove(&mut self, index: usize) -> Option<PendingImage> {
        if index < self.pending.len() {
            Some(self.pending.remove(index))
        } else {
            None
        }
    }

    /// Copies the staged data URLs into the outgoing message and clears the
    /// tray.
    pub fn drain(&mut self) -> Vec<String> {
        self.pending
            .drain(..)
            .map(|image| image.data_url)
            .collect()
    }
}

/// MIME guess for the file-picker path, by extension.
pub fn mime_for_path(path: &str) -> Option<&'static str> {
    let extension = path.rsplit('.').next()?;
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
