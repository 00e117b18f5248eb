use serde::{Serialize, de::DeserializeOwned};

/// A record kind the sync engine can store.
///
/// The engine never looks inside a record except through [`Record::id`]; everything else is
/// carried through serde untouched.
pub trait Record: Clone + Serialize + DeserializeOwned + 'static {
    /// Remote table holding this kind, one row per record.
    const TABLE: &'static str;

    /// Suffix of the local cache key. The full key is `"{prefix}_{CACHE_KEY}"`.
    const CACHE_KEY: &'static str = Self::TABLE;

    /// Folder uploaded images for this kind are placed in.
    const ASSET_FOLDER: &'static str = Self::TABLE;

    fn id(&self) -> &str;
}
