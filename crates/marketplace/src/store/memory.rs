//! In-memory document store.
//!
//! Backs the test suite and local development. Semantics match the managed
//! backend: single-document atomicity, last-write-wins across documents,
//! versions bumped on every write.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

use super::{Document, DocumentStore, FieldOp, Fields, Filter, SetMode, StoreError, Version};

/// Mutex-guarded map of `(collection, id)` to versioned field maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<(String, String), (Fields, Version)>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently stored, across all collections.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[allow(clippy::unwrap_used)] // lock poisoning means a test already panicked
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), (Fields, Version)>> {
        self.documents.lock().unwrap()
    }
}

fn key(collection: &str, id: &str) -> (String, String) {
    (collection.to_owned(), id.to_owned())
}

/// Apply one field op to a field map.
fn apply_op(fields: &mut Fields, field: &str, op: FieldOp) {
    match op {
        FieldOp::Set(value) => {
            fields.insert(field.to_owned(), value);
        }
        FieldOp::Increment(delta) => {
            let current = fields.get(field).and_then(Value::as_i64).unwrap_or(0);
            fields.insert(field.to_owned(), Value::from(current + delta));
        }
        FieldOp::ArrayUnion(value) => match fields.get_mut(field) {
            Some(Value::Array(items)) => {
                if !items.contains(&value) {
                    items.push(value);
                }
            }
            _ => {
                fields.insert(field.to_owned(), Value::Array(vec![value]));
            }
        },
    }
}

impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let documents = self.lock();
        Ok(documents
            .get(&key(collection, id))
            .map(|(fields, version)| Document {
                fields: fields.clone(),
                version: *version,
            }))
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: SetMode,
    ) -> Result<Version, StoreError> {
        let mut documents = self.lock();
        match documents.entry(key(collection, id)) {
            std::collections::hash_map::Entry::Occupied(mut occupied) => {
                let (stored, version) = occupied.get_mut();
                match mode {
                    SetMode::Replace => *stored = fields,
                    SetMode::Merge => stored.extend(fields),
                }
                *version = version.next();
                Ok(*version)
            }
            std::collections::hash_map::Entry::Vacant(vacant) => {
                vacant.insert((fields, Version::FIRST));
                Ok(Version::FIRST)
            }
        }
    }

    async fn set_if(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        expected: Option<Version>,
    ) -> Result<Version, StoreError> {
        let mut documents = self.lock();
        let current = documents.get(&key(collection, id)).map(|(_, v)| *v);

        if current != expected {
            return Err(StoreError::VersionMismatch {
                collection: collection.to_owned(),
                id: id.to_owned(),
            });
        }

        let next = current.map_or(Version::FIRST, Version::next);
        documents.insert(key(collection, id), (fields, next));
        Ok(next)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        ops: Vec<(String, FieldOp)>,
    ) -> Result<Version, StoreError> {
        let mut documents = self.lock();
        let Some((fields, version)) = documents.get_mut(&key(collection, id)) else {
            return Err(StoreError::NotFound {
                collection: collection.to_owned(),
                id: id.to_owned(),
            });
        };

        for (field, op) in ops {
            apply_op(fields, &field, op);
        }
        *version = version.next();
        Ok(*version)
    }

    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        let documents = self.lock();
        let mut hits: Vec<(String, Document)> = documents
            .iter()
            .filter(|((coll, _), (fields, _))| {
                coll == collection && fields.get(&filter.field) == Some(&filter.value)
            })
            .map(|((_, id), (fields, version))| {
                (
                    id.clone(),
                    Document {
                        fields: fields.clone(),
                        version: *version,
                    },
                )
            })
            .collect();
        // Deterministic order for tests; the managed backend makes no such promise.
        hits.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(hits)
    }
}
