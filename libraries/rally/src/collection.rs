//! # EntityCollection
//! An ordered, id-keyed set of records of one kind. The most recently touched record is always first.
//!
//! Collections are values: every operation returns a new collection and leaves `self` alone. The backing
//! `im::Vector` shares structure between versions, so keeping old snapshots around is cheap.

use std::collections::HashSet;

use crate::record::Record;

#[derive(Clone, Debug)]
pub struct EntityCollection<R: Record> {
    records: im::Vector<R>,
}

impl<R: Record> Default for EntityCollection<R> {
    fn default() -> Self {
        Self {
            records: im::Vector::new(),
        }
    }
}

impl<R: Record> EntityCollection<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from a full result set, same as [`EntityCollection::replace_all`].
    pub fn from_records(records: impl IntoIterator<Item = R>) -> Self {
        Self::new().replace_all(records)
    }

    /// Places `record` first and drops any older record with the same id.
    pub fn upsert(&self, record: R) -> Self {
        let mut records = self.records.clone();
        records.retain(|existing| existing.id() != record.id());
        records.push_front(record);
        Self { records }
    }

    /// Drops the record with `id`. Removing an id that isn't there returns an identical collection.
    pub fn remove(&self, id: &str) -> Self {
        let mut records = self.records.clone();
        records.retain(|existing| existing.id() != id);
        Self { records }
    }

    /// Discards everything and takes `records` in the given order.
    ///
    /// If an id shows up more than once, the last occurrence wins and keeps its position.
    pub fn replace_all(&self, records: impl IntoIterator<Item = R>) -> Self {
        let records: Vec<R> = records.into_iter().collect();
        let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
        let mut kept: Vec<R> = Vec::with_capacity(records.len());

        for record in records.into_iter().rev() {
            if seen.insert(record.id().to_string()) {
                kept.push(record);
            } else {
                log::warn!(
                    "Dropping earlier duplicate of {} record {}",
                    R::TABLE,
                    record.id()
                );
            }
        }
        kept.reverse();

        Self {
            records: kept.into_iter().collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    pub fn to_vec(&self) -> Vec<R> {
        self.records.iter().cloned().collect()
    }
}

impl<R: Record> FromIterator<R> for EntityCollection<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}

impl<R: Record> serde::Serialize for EntityCollection<R> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.records.iter())
    }
}

impl<'de, R: Record> serde::Deserialize<'de> for EntityCollection<R> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<R>::deserialize(deserializer)?;
        Ok(Self::from_records(records))
    }
}
