//! Optimistic image uploads.
//!
//! An upload goes through three steps that only talk to each other through values:
//! 1. [`ImageSelection::placeholder`] gives a `data:` URL that can be displayed (and saved) immediately.
//! 2. [`StagedUpload`] carries the bytes, the destination path and the owning record's id to the gateway.
//! 3. The gateway answers with a [`ResolvedAsset`], which the coordinator splices into the *current* record.
use std::path::Path;

use base64::Engine as _;

use crate::{
    error::{Error, Result},
    record::Record,
    remote::RemoteGateway,
};

/// Content type and extension every uploaded asset is stored under.
pub const ASSET_CONTENT_TYPE: &str = "image/png";
const ASSET_EXTENSION: &str = "png";

/// Raw image bytes the user picked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageSelection {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl ImageSelection {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }

    /// Reads an image file, guessing its content type from the extension.
    pub async fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let content_type = match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("svg") => "image/svg+xml",
            _ => "application/octet-stream",
        };
        Ok(Self::new(bytes, content_type))
    }

    /// Locally-encoded stand-in for the durable URL.
    pub fn placeholder(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{encoded}", self.content_type)
    }
}

/// True for values produced by [`ImageSelection::placeholder`], as opposed to durable URLs.
pub fn is_placeholder(value: &str) -> bool {
    value.starts_with("data:")
}

/// Builds `"{folder}/{sanitized-name}-{timestamp}.png"`.
///
/// Every character outside `[a-zA-Z0-9]` becomes `_` and the result is lowercased, so the same display name
/// always maps to the same stem.
pub fn asset_path(folder: &str, display_name: &str, timestamp_millis: i64) -> String {
    let clean_name: String = display_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{folder}/{clean_name}-{timestamp_millis}.{ASSET_EXTENSION}")
}

/// An upload that has been decided on but not sent.
#[derive(Clone, Debug)]
pub struct StagedUpload {
    pub table: &'static str,
    pub record_id: String,
    pub path: String,
    pub bytes: Vec<u8>,
}

impl StagedUpload {
    pub fn new<R: Record>(record_id: &str, display_name: &str, image: ImageSelection) -> Self {
        let timestamp = chrono::Utc::now().timestamp_millis();
        Self {
            table: R::TABLE,
            record_id: record_id.to_string(),
            path: asset_path(R::ASSET_FOLDER, display_name, timestamp),
            bytes: image.bytes,
        }
    }

    /// Sends the bytes. The returned value is all the coordinator needs to patch the record later.
    ///
    /// A missing bucket comes back as [`Error::StorageMisconfigured`]; every other failure as
    /// [`Error::AssetUploadFailed`].
    pub async fn send(self, gateway: &impl RemoteGateway) -> Result<ResolvedAsset> {
        let StagedUpload {
            table,
            record_id,
            path,
            bytes,
        } = self;

        let url = gateway
            .upload_asset(&path, bytes, ASSET_CONTENT_TYPE)
            .await
            .map_err(|e| match e {
                Error::AssetUploadFailed(_) | Error::StorageMisconfigured(_) => e,
                other => Error::AssetUploadFailed(other.to_string()),
            })?;

        log::info!("Uploaded {path} for {table} record {record_id}");
        Ok(ResolvedAsset {
            table,
            record_id,
            url,
        })
    }
}

/// A finished upload, keyed by the record it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub table: &'static str,
    pub record_id: String,
    pub url: String,
}

/// What the record's image field ended up holding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The durable remote URL replaced the placeholder.
    Durable(String),
    /// The upload failed; the placeholder stays.
    Placeholder,
    /// No remote service; the placeholder is all there will be.
    LocalOnly,
    /// The record was deleted before the upload finished.
    Discarded,
}
