//! In-process remote service.
//!
//! A supported backend in its own right: use it for offline demos, previews, or a single-process deployment
//! that still wants the remote-mode save semantics. Everything lives in memory and is gone when it is dropped,
//! so pair it with a durable [`crate::LocalCache`] if the data matters.
//!
//! Rows round-trip through JSON exactly like they would over the wire. Reachability, failing tables, bucket
//! presence and upload completion can all be controlled from the outside, which is what the integration
//! tests use it for.
use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, VecDeque},
};

use futures::channel::oneshot;

use crate::{
    error::{Error, Result},
    record::Record,
    remote::{RemoteGateway, StorageHealth},
};

/// Remote service kept entirely in memory. See the module docs.
pub struct MemoryGateway {
    configured: bool,
    reachable: Cell<bool>,
    bucket_present: Cell<bool>,
    fail_uploads: Cell<bool>,
    failing_tables: RefCell<Vec<&'static str>>,
    tables: RefCell<BTreeMap<&'static str, Vec<serde_json::Value>>>,
    assets: RefCell<BTreeMap<String, Vec<u8>>>,
    held_uploads: RefCell<VecDeque<oneshot::Receiver<()>>>,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGateway {
    /// A configured, reachable service with an empty database and an existing bucket.
    pub fn new() -> Self {
        Self {
            configured: true,
            reachable: Cell::new(true),
            bucket_present: Cell::new(true),
            fail_uploads: Cell::new(false),
            failing_tables: RefCell::default(),
            tables: RefCell::default(),
            assets: RefCell::default(),
            held_uploads: RefCell::default(),
        }
    }

    /// A gateway with no configuration: local-only mode.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.set(reachable);
    }

    pub fn set_bucket_present(&self, present: bool) {
        self.bucket_present.set(present);
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.set(fail);
    }

    /// Makes every call against `R`'s table fail while leaving other tables alone.
    pub fn fail_table<R: Record>(&self) {
        self.failing_tables.borrow_mut().push(R::TABLE);
    }

    /// Undoes [`MemoryGateway::fail_table`] for `R`.
    pub fn restore_table<R: Record>(&self) {
        self.failing_tables
            .borrow_mut()
            .retain(|failing| *failing != R::TABLE);
    }

    /// The next upload waits until the returned sender fires (or is dropped).
    pub fn hold_next_upload(&self) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        self.held_uploads.borrow_mut().push_back(receiver);
        sender
    }

    /// Puts rows straight into the remote table, bypassing the upsert path.
    pub fn insert_rows<R: Record>(&self, records: &[R]) -> Result<()> {
        let rows = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        self.tables
            .borrow_mut()
            .entry(R::TABLE)
            .or_default()
            .extend(rows);
        Ok(())
    }

    /// Puts raw JSON rows into `R`'s table, e.g. rows with NULL columns a typed record can't express.
    pub fn insert_json_rows<R: Record>(&self, rows: impl IntoIterator<Item = serde_json::Value>) {
        self.tables
            .borrow_mut()
            .entry(R::TABLE)
            .or_default()
            .extend(rows);
    }

    pub fn rows<R: Record>(&self) -> Vec<R> {
        self.tables
            .borrow()
            .get(R::TABLE)
            .map(|rows| {
                rows.iter()
                    .filter_map(|row| serde_json::from_value(row.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn asset(&self, path: &str) -> Option<Vec<u8>> {
        self.assets.borrow().get(path).cloned()
    }

    pub fn asset_paths(&self) -> Vec<String> {
        self.assets.borrow().keys().cloned().collect()
    }

    pub fn public_url(path: &str) -> String {
        format!("https://assets.invalid/{path}")
    }

    fn check(&self, table: &str) -> Result<()> {
        if !self.configured {
            return Err(Error::RemoteUnavailable);
        }
        if !self.reachable.get() {
            return Err(Error::request_failed(format!(
                "Request to {table} failed: remote service unreachable"
            )));
        }
        if self.failing_tables.borrow().iter().any(|failing| *failing == table) {
            return Err(Error::request_failed(format!(
                "Request to {table} failed with status 500: simulated failure"
            )));
        }
        Ok(())
    }
}

impl RemoteGateway for MemoryGateway {
    fn is_available(&self) -> bool {
        self.configured
    }

    async fn fetch_all<R: Record>(&self) -> Result<Vec<R>> {
        self.check(R::TABLE)?;
        let rows = self.tables.borrow().get(R::TABLE).cloned().unwrap_or_default();
        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row).map_err(|e| {
                    Error::request_failed(format!("Failed to parse {} row: {e}", R::TABLE))
                })
            })
            .collect()
    }

    async fn upsert_one<R: Record>(&self, record: &R) -> Result<R> {
        self.check(R::TABLE)?;
        let row = serde_json::to_value(record)?;
        let canonical: R = serde_json::from_value(row.clone())?;

        let mut tables = self.tables.borrow_mut();
        let rows = tables.entry(R::TABLE).or_default();
        match rows
            .iter()
            .position(|existing| existing.get("id").and_then(|id| id.as_str()) == Some(record.id()))
        {
            Some(index) => rows[index] = row,
            None => rows.push(row),
        }
        Ok(canonical)
    }

    async fn delete_one<R: Record>(&self, id: &str) -> Result<()> {
        self.check(R::TABLE)?;
        if let Some(rows) = self.tables.borrow_mut().get_mut(R::TABLE) {
            rows.retain(|row| row.get("id").and_then(|v| v.as_str()) != Some(id));
        }
        Ok(())
    }

    async fn upload_asset(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String> {
        if !self.configured {
            return Err(Error::RemoteUnavailable);
        }

        let held = self.held_uploads.borrow_mut().pop_front();
        if let Some(release) = held {
            // a dropped sender counts as a release too
            let _ = release.await;
        }

        if !self.reachable.get() || self.fail_uploads.get() {
            return Err(Error::AssetUploadFailed(format!(
                "Upload of {path} failed: simulated failure"
            )));
        }
        if !self.bucket_present.get() {
            return Err(Error::StorageMisconfigured(format!(
                "Bucket missing, {path} was not stored"
            )));
        }

        self.assets.borrow_mut().insert(path.to_string(), bytes);
        Ok(Self::public_url(path))
    }

    async fn check_storage_health(&self) -> StorageHealth {
        if !self.configured {
            return StorageHealth::Misconfigured("Remote service is not configured.".to_string());
        }
        if !self.reachable.get() {
            return StorageHealth::Unreachable("The request never reached storage.".to_string());
        }
        if !self.bucket_present.get() {
            return StorageHealth::Misconfigured("Bucket missing.".to_string());
        }
        StorageHealth::Ok
    }
}
