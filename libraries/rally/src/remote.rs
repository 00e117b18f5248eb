use crate::{error::Result, record::Record};

/// The remote relational record service plus its asset bucket.
///
/// Implementations must treat [`RemoteGateway::is_available`] as a pure configuration check. Every other
/// method may hit the network and reports failures as [`crate::Error::RemoteUnavailable`] or
/// [`crate::Error::RemoteRequestFailed`]; callers on the load path treat both the same way.
///
/// Futures returned here are not required to be `Send`: the engine runs on a single thread and
/// interleaves operations cooperatively.
#[allow(async_fn_in_trait)]
pub trait RemoteGateway {
    fn is_available(&self) -> bool;

    async fn fetch_all<R: Record>(&self) -> Result<Vec<R>>;

    /// Sends the full record and returns the stored (canonical) form.
    async fn upsert_one<R: Record>(&self, record: &R) -> Result<R>;

    async fn delete_one<R: Record>(&self, id: &str) -> Result<()>;

    /// Uploads `bytes` to `path` in the asset bucket, replacing any existing object, and returns its public URL.
    async fn upload_asset(&self, path: &str, bytes: Vec<u8>, content_type: &str)
    -> Result<String>;

    async fn check_storage_health(&self) -> StorageHealth;
}

/// Result of probing the asset bucket. Each failure needs a different fix, so each gets its own message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageHealth {
    Ok,
    /// Bucket missing, permissions wrong, or the service not configured at all.
    Misconfigured(String),
    /// Network or CORS-class failure before any response arrived.
    Unreachable(String),
}

impl StorageHealth {
    pub fn is_ok(&self) -> bool {
        matches!(self, StorageHealth::Ok)
    }

    pub fn message(&self) -> String {
        match self {
            StorageHealth::Ok => "Storage is correctly configured and accessible!".to_string(),
            StorageHealth::Misconfigured(reason) => format!("STORAGE MISCONFIGURED: {reason}"),
            StorageHealth::Unreachable(reason) => format!("STORAGE UNREACHABLE: {reason}"),
        }
    }
}
