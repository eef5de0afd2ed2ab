//! Request-side data for a garment swap.

use std::path::Path;

use bytes::Bytes;

use crate::traits::MultipartForm;

/// Form field carrying the subject photo.
pub const IMAGE_FIELD: &str = "image";
/// Form field carrying the target clothing item id.
pub const ITEM_ID_FIELD: &str = "item_id";
/// Form field carrying the kiosk device id (device flow only).
pub const DEVICE_ID_FIELD: &str = "device_id";

/// The photo of the person the garment is swapped onto.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectImage {
    pub bytes: Bytes,
    pub file_name: String,
    pub mime_type: String,
}

impl SubjectImage {
    pub fn new(
        bytes: impl Into<Bytes>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Load an image from disk, guessing the MIME type from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self::new(bytes, file_name, mime_for_path(path)))
    }
}

/// Guess an image MIME type from a file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

/// Which request shape to use.
///
/// Both flows share the decoder; they differ only in route and form fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SwapFlow {
    /// Consumer wizard upload
    #[default]
    General,
    /// In-store camera device
    Device { device_id: String },
}

impl SwapFlow {
    pub fn name(&self) -> &'static str {
        match self {
            SwapFlow::General => "general",
            SwapFlow::Device { .. } => "device",
        }
    }
}

/// Everything needed to start one swap job.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapUpload {
    pub image: SubjectImage,
    /// Id of the clothing item to put on the subject
    pub item_id: String,
    pub flow: SwapFlow,
}

impl SwapUpload {
    pub fn new(image: SubjectImage, item_id: impl Into<String>) -> Self {
        Self {
            image,
            item_id: item_id.into(),
            flow: SwapFlow::General,
        }
    }

    /// Switch to the device flow.
    pub fn for_device(mut self, device_id: impl Into<String>) -> Self {
        self.flow = SwapFlow::Device {
            device_id: device_id.into(),
        };
        self
    }

    /// Build the multipart body for this upload.
    pub fn to_form(&self) -> MultipartForm {
        let form = MultipartForm::new()
            .file(
                IMAGE_FIELD,
                self.image.file_name.clone(),
                self.image.mime_type.clone(),
                self.image.bytes.clone(),
            )
            .text(ITEM_ID_FIELD, self.item_id.clone());

        match &self.flow {
            SwapFlow::General => form,
            SwapFlow::Device { device_id } => form.text(DEVICE_ID_FIELD, device_id.clone()),
        }
    }
}
