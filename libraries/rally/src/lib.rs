//! Rally keeps typed record collections consistent across three places:
//! an in-memory store that views read from, an optional remote record service, and a durable
//! local cache that the app falls back to when the remote service is missing or unreachable.
//! It was created for an academy roster app, so it only covers what that app needs.
//!
//! Syncing strategy:
//! 1. Every record carries a caller-assigned string id that never changes.
//! 2. Writes always send the whole record. When the remote service is configured, the write goes there
//!    first and only the canonical record it returns is merged locally. When it isn't, the write is merged locally.
//! 3. Merging a record moves it to the front of its collection and drops any older copy with the same id.
//! 4. After every successful merge, the full collection is mirrored to the local cache, so the last-known-good
//!    snapshot is always there for the next startup.
//!
//! Image uploads are optimistic: a `data:` URL placeholder is saved right away, and the durable URL is
//! spliced into whatever the record looks like when the upload finishes.
//!
//! Two remote backends ship with the crate: [`SupabaseGateway`] for a real project, and [`MemoryGateway`],
//! which keeps everything in process for offline use and tests.

pub mod asset;
pub mod cache;
pub mod collection;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod memory;
pub mod record;
pub mod remote;
pub mod store;
pub mod supabase;

pub use asset::{ImageSelection, ResolvedAsset, StagedUpload, UploadOutcome, asset_path};
pub use cache::{FileCache, LocalCache, MemoryCache};
pub use collection::EntityCollection;
pub use config::{CacheConfig, RemoteConfig};
pub use coordinator::{LoadSource, PersistenceCoordinator, SyncMode};
pub use error::{Error, Result};
pub use memory::MemoryGateway;
pub use record::Record;
pub use remote::{RemoteGateway, StorageHealth};
pub use store::Store;
pub use supabase::SupabaseGateway;
