use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// No usable remote configuration. Expected; callers switch to local-only mode.
    #[error("remote record service is not configured")]
    RemoteUnavailable,

    /// A live remote call failed (network, permissions, schema). The message is meant for the user.
    #[error("remote request failed: {0}")]
    RemoteRequestFailed(String),

    /// The asset bucket is missing or refuses access.
    #[error("asset storage is misconfigured: {0}")]
    StorageMisconfigured(String),

    #[error("local cache entry `{key}` is corrupt: {source}")]
    LocalCacheCorrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("asset upload failed: {0}")]
    AssetUploadFailed(String),

    #[error("no {table} record with id `{id}`")]
    RecordNotFound { table: &'static str, id: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("local cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failures that should be shown to the user as "your change did not reach the server".
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::RemoteUnavailable | Error::RemoteRequestFailed(_)
        )
    }

    pub(crate) fn request_failed(context: impl std::fmt::Display) -> Self {
        Error::RemoteRequestFailed(context.to_string())
    }
}
