//! Document-store abstraction.
//!
//! The production backend is a managed, schemaless document database reached
//! over the network; every method on [`DocumentStore`] suspends at that
//! round-trip boundary. Documents are nested string-keyed maps of
//! JSON-compatible values, addressed by `(collection, id)` where both parts
//! are opaque strings.
//!
//! Each document carries a [`Version`] that increases on every write. Writers
//! that need read-modify-write safety use [`DocumentStore::set_if`] with the
//! version they read; a losing concurrent writer gets
//! [`StoreError::VersionMismatch`] and can re-run its cycle instead of
//! silently overwriting.

mod memory;

pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// The top-level field map of a document.
pub type Fields = serde_json::Map<String, Value>;

/// Errors surfaced by a document-store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed document does not exist (only raised by operations that
    /// require an existing document, such as field-level updates).
    #[error("document not found: {collection}/{id}")]
    NotFound {
        /// Collection part of the key.
        collection: String,
        /// Document part of the key.
        id: String,
    },

    /// A conditional write lost to a concurrent writer.
    #[error("version conflict on {collection}/{id}")]
    VersionMismatch {
        /// Collection part of the key.
        collection: String,
        /// Document part of the key.
        id: String,
    },

    /// Transport or availability failure; propagated unchanged to callers.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Optimistic-concurrency token carried by every document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version(u64);

impl Version {
    /// Version of a freshly created document.
    pub const FIRST: Self = Self(1);

    /// Create a version from a raw counter value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The version after one more write.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// A document read from the store: its fields plus the version they were
/// read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Top-level field map.
    pub fields: Fields,
    /// Version token for conditional writes.
    pub version: Version,
}

impl Document {
    /// Decode the fields into a typed model.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error when the stored shape does not
    /// match the model; callers surface this as document corruption.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.fields.clone()))
    }
}

/// Encode a typed model into a document field map.
///
/// # Errors
///
/// Returns the underlying serde error if the value fails to serialize or
/// does not serialize to a JSON object (models are always structs, so the
/// latter indicates a programming error in the model definition).
pub fn encode<T: Serialize>(value: &T) -> Result<Fields, serde_json::Error> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        other => Err(serde::ser::Error::custom(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// A field-level mutation applied atomically within one document.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    /// Replace (or create) the field with the given value.
    Set(Value),
    /// Numeric increment; a missing or non-numeric field counts as zero.
    Increment(i64),
    /// Append the value to an array field unless an equal element is already
    /// present; a missing field becomes a one-element array.
    ArrayUnion(Value),
}

/// How `set` treats fields already present on the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetMode {
    /// Replace the whole document.
    Replace,
    /// Merge the given fields over the existing ones, leaving the rest.
    Merge,
}

/// An equality predicate over a top-level document field.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Field name as stored (camelCase).
    pub field: String,
    /// Value the field must equal.
    pub value: Value,
}

impl Filter {
    /// Equality filter on a top-level field.
    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// The injected persistence collaborator.
///
/// Implementations must apply each call atomically at the single-document
/// level; nothing here coordinates across documents. The business layer
/// performs no retries on [`StoreError::Unavailable`] - transport failures
/// propagate to the caller.
#[allow(async_fn_in_trait)] // ledgers are generic over the store type; no dyn use
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, or `None` if it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Write a document, creating it if absent.
    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: SetMode,
    ) -> Result<Version, StoreError>;

    /// Replace a document only if its current version matches `expected`.
    ///
    /// `expected = None` asserts the document does not exist yet (create-only
    /// write). Returns [`StoreError::VersionMismatch`] when the assertion
    /// fails.
    async fn set_if(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        expected: Option<Version>,
    ) -> Result<Version, StoreError>;

    /// Apply field-level operations to an existing document.
    ///
    /// Returns [`StoreError::NotFound`] if the document is absent.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        ops: Vec<(String, FieldOp)>,
    ) -> Result<Version, StoreError>;

    /// Fetch all documents in a collection matching the filter, as
    /// `(id, document)` pairs.
    async fn query(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<(String, Document)>, StoreError>;
}
