//! Owned state container: one [`EntityCollection`] per record kind.
//!
//! Collections are stored type-erased so a single store can hold every kind the app defines.
//! Reads hand out snapshots; writes swap a whole collection in.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
};

use crate::{collection::EntityCollection, record::Record};

#[derive(Default)]
pub struct Store {
    collections: HashMap<TypeId, Box<dyn Any>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collection for `R`. Kinds that were never written read as empty.
    pub fn collection<R: Record>(&self) -> EntityCollection<R> {
        self.collections
            .get(&TypeId::of::<R>())
            .and_then(|boxed| boxed.downcast_ref::<EntityCollection<R>>())
            .cloned()
            .unwrap_or_default()
    }

    pub fn get<R: Record>(&self, id: &str) -> Option<R> {
        self.collections
            .get(&TypeId::of::<R>())
            .and_then(|boxed| boxed.downcast_ref::<EntityCollection<R>>())
            .and_then(|collection| collection.get(id).cloned())
    }

    pub fn set<R: Record>(&mut self, collection: EntityCollection<R>) {
        self.collections
            .insert(TypeId::of::<R>(), Box::new(collection));
    }

    /// Applies `f` to the current collection for `R`, stores the result, and returns a snapshot of it.
    pub fn update<R: Record>(
        &mut self,
        f: impl FnOnce(&EntityCollection<R>) -> EntityCollection<R>,
    ) -> EntityCollection<R> {
        let next = f(&self.collection::<R>());
        self.set(next.clone());
        next
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("kinds", &self.collections.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::test_records::Note;

    #[test]
    fn test_unknown_kind_reads_empty() {
        let store = Store::new();
        assert!(store.collection::<Note>().is_empty());
        assert!(store.get::<Note>("a").is_none());
    }

    #[test]
    fn test_snapshot_is_not_affected_by_later_writes() {
        let mut store = Store::new();
        store.update::<Note>(|notes| notes.upsert(Note::new("a", "1")));
        let snapshot = store.collection::<Note>();

        store.update::<Note>(|notes| notes.upsert(Note::new("a", "2")).upsert(Note::new("b", "3")));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("a").unwrap().text, "1");
        assert_eq!(store.collection::<Note>().len(), 2);
        assert_eq!(store.get::<Note>("a").unwrap().text, "2");
    }
}
