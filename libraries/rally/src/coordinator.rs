//! Routes every mutation through the remote service or the local cache and keeps the in-memory store,
//! the cache and the remote rows in step.
//!
//! The store lives in a `RefCell` that is only borrowed between suspension points, never across an
//! `.await`, so several saves, deletes and uploads can be in flight at once on one thread. For a single id,
//! whichever operation finishes last decides what is visible.
use std::cell::RefCell;

use crate::{
    asset::{ImageSelection, ResolvedAsset, StagedUpload, UploadOutcome},
    cache::LocalCache,
    collection::EntityCollection,
    error::{Error, Result},
    record::Record,
    remote::{RemoteGateway, StorageHealth},
    store::Store,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Writes go to the remote service first.
    Remote,
    /// No remote configuration; the local cache is the only durable copy.
    LocalOnly,
}

/// Where a kind's startup data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    Cache,
    Seed,
}

pub struct PersistenceCoordinator<G, C> {
    gateway: G,
    cache: C,
    store: RefCell<Store>,
}

impl<G: RemoteGateway, C: LocalCache> PersistenceCoordinator<G, C> {
    pub fn new(gateway: G, cache: C) -> Self {
        Self {
            gateway,
            cache,
            store: RefCell::new(Store::new()),
        }
    }

    pub fn mode(&self) -> SyncMode {
        if self.gateway.is_available() {
            SyncMode::Remote
        } else {
            SyncMode::LocalOnly
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Read-only snapshot of every record of kind `R`, most recently touched first.
    pub fn snapshot<R: Record>(&self) -> EntityCollection<R> {
        self.store.borrow().collection::<R>()
    }

    pub fn get<R: Record>(&self, id: &str) -> Option<R> {
        self.store.borrow().get::<R>(id)
    }

    /// Startup load for one kind: remote rows if there are any, else the cached snapshot, else `seed`.
    ///
    /// Never fails. Meant to run once per kind; it replaces whatever the store held.
    pub async fn load<R: Record>(&self, seed: Vec<R>) -> LoadSource {
        let table = R::TABLE;

        if self.gateway.is_available() {
            match self.gateway.fetch_all::<R>().await {
                Ok(records) if !records.is_empty() => {
                    log::info!("Loaded {} {table} from the remote service", records.len());
                    let collection = EntityCollection::from_records(records);
                    self.store.borrow_mut().set(collection.clone());
                    self.mirror(&collection);
                    return LoadSource::Remote;
                }
                Ok(_) => log::info!("Remote {table} table is empty, falling back to the local cache"),
                Err(e) => log::warn!("Using local data for {table} due to remote fetch failure: {e}"),
            }
        }

        let (collection, source) = match self.cache.try_load::<R>() {
            Some(collection) => (collection, LoadSource::Cache),
            None => (EntityCollection::from_records(seed), LoadSource::Seed),
        };
        log::info!("Loaded {} {table} from {source:?}", collection.len());
        self.store.borrow_mut().set(collection);
        source
    }

    /// Saves a full record.
    ///
    /// With a remote service, the record is merged only after the service accepts it, and the merged value is
    /// the canonical one it returns. A failed remote write leaves local state untouched and returns the error.
    /// Without a remote service the record is merged directly and this never fails.
    pub async fn save<R: Record>(&self, record: R) -> Result<R> {
        let stored = if self.gateway.is_available() {
            match self.gateway.upsert_one(&record).await {
                Ok(canonical) => canonical,
                Err(e) => {
                    log::error!("Failed to save {} {}: {e}", R::TABLE, record.id());
                    return Err(e);
                }
            }
        } else {
            record
        };

        let next = self
            .store
            .borrow_mut()
            .update::<R>(|collection| collection.upsert(stored.clone()));
        self.mirror(&next);
        Ok(stored)
    }

    /// Deletes by id, remote first when there is a remote service. Deleting an unknown id is not an error.
    pub async fn delete<R: Record>(&self, id: &str) -> Result<()> {
        if self.gateway.is_available() {
            if let Err(e) = self.gateway.delete_one::<R>(id).await {
                log::error!("Failed to delete {} {id}: {e}", R::TABLE);
                return Err(e);
            }
        }

        let next = self
            .store
            .borrow_mut()
            .update::<R>(|collection| collection.remove(id));
        self.mirror(&next);
        Ok(())
    }

    pub async fn check_storage_health(&self) -> StorageHealth {
        self.gateway.check_storage_health().await
    }

    /// Saves `record` with a placeholder image and, at the same time, uploads the real image. Once both are
    /// done the durable URL is swapped in.
    ///
    /// `set_image` writes a value into the image field it is given. It runs once with the placeholder and, if
    /// the upload succeeds, once more against the record as it looks *after* the upload, so edits made in the
    /// meantime survive. Upload failures are logged and leave the placeholder in place. A failed placeholder
    /// save does not stop the upload; it is only returned if there is no stored record to put the URL on.
    pub async fn upload_asset<R: Record>(
        &self,
        mut record: R,
        display_name: &str,
        image: ImageSelection,
        set_image: impl Fn(&mut R, String),
    ) -> Result<UploadOutcome> {
        set_image(&mut record, image.placeholder());
        let id = record.id().to_string();

        if !self.gateway.is_available() {
            self.save(record).await?;
            return Ok(UploadOutcome::LocalOnly);
        }

        let staged = self.stage_asset::<R>(&id, display_name, image);
        let (saved, uploaded) = futures::join!(self.save(record), self.resolve_asset(staged));

        let resolved = match uploaded {
            Ok(resolved) => resolved,
            Err(e) => {
                log::warn!("{e}, keeping the local placeholder for {} {id}", R::TABLE);
                saved?;
                return Ok(UploadOutcome::Placeholder);
            }
        };

        if let Err(e) = &saved {
            log::warn!(
                "Placeholder for {} {id} was not saved ({e}), applying the uploaded image to the stored record",
                R::TABLE
            );
        }

        let url = resolved.url.clone();
        match (self.apply_asset(resolved, set_image).await?, saved) {
            (Some(_), _) => Ok(UploadOutcome::Durable(url)),
            (None, Ok(_)) => Ok(UploadOutcome::Discarded),
            (None, Err(e)) => Err(e),
        }
    }

    /// Decides where `image` will live for record `record_id`. Nothing is sent yet.
    pub fn stage_asset<R: Record>(
        &self,
        record_id: &str,
        display_name: &str,
        image: ImageSelection,
    ) -> StagedUpload {
        StagedUpload::new::<R>(record_id, display_name, image)
    }

    pub async fn resolve_asset(&self, staged: StagedUpload) -> Result<ResolvedAsset> {
        staged.send(&self.gateway).await
    }

    /// Read-modify-write of a finished upload into the current version of its record.
    ///
    /// Returns `Ok(None)` if the record no longer exists.
    pub async fn apply_asset<R: Record>(
        &self,
        resolved: ResolvedAsset,
        set_image: impl FnOnce(&mut R, String),
    ) -> Result<Option<R>> {
        if resolved.table != R::TABLE {
            return Err(Error::RecordNotFound {
                table: R::TABLE,
                id: resolved.record_id,
            });
        }

        let Some(mut current) = self.get::<R>(&resolved.record_id) else {
            log::warn!(
                "{} {} was removed before its upload finished, dropping {}",
                R::TABLE,
                resolved.record_id,
                resolved.url
            );
            return Ok(None);
        };

        set_image(&mut current, resolved.url);
        self.save(current).await.map(Some)
    }

    fn mirror<R: Record>(&self, collection: &EntityCollection<R>) {
        if let Err(e) = self.cache.save(collection) {
            log::error!("Failed to mirror {} to the local cache: {e}", R::TABLE);
        }
    }
}
