//! Persistence gateway.
//!
//! Repositories talk to storage only through [`Store`] and [`StoreTx`].
//! Every operation runs inside a transaction: writes become visible when
//! the transaction is committed, and dropping it without committing
//! discards them.

pub mod memory;
mod query;

pub use memory::MemoryStore;
pub use query::{Filter, Patch, Query, Sort};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use soquy_shared::types::PageResponse;
use std::fmt;
use thiserror::Error;

/// A document stored in a named collection.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Identifier type; its `Display` form is the storage key.
    type Id: fmt::Display + Send + Sync + 'static;

    /// Collection name.
    const COLLECTION: &'static str;

    /// Field that must be unique across the collection, if any.
    const CODE_FIELD: Option<&'static str> = None;

    /// Returns the record's identifier.
    fn id(&self) -> Self::Id;
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this id.
    #[error("{collection} record {id} not found")]
    NotFound {
        /// Collection name.
        collection: &'static str,
        /// Record id.
        id: String,
    },

    /// Unique code already used by another record.
    #[error("{collection} code {code} already exists")]
    DuplicateCode {
        /// Collection name.
        collection: &'static str,
        /// The colliding code.
        code: String,
    },

    /// A record with this id already exists.
    #[error("{collection} record {id} already exists")]
    DuplicateId {
        /// Collection name.
        collection: &'static str,
        /// Record id.
        id: String,
    },

    /// Patch cannot be applied.
    #[error("Invalid patch: {0}")]
    InvalidPatch(String),

    /// Document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend failure.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// A storage backend.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Transaction type.
    type Tx: StoreTx;

    /// Starts a transaction.
    async fn begin(&self) -> Result<Self::Tx, StoreError>;
}

/// An open storage transaction.
///
/// Reads observe the transaction's own uncommitted writes.
#[async_trait]
pub trait StoreTx: Send {
    /// Fetches a record by id.
    async fn get<R: Record>(&mut self, id: &R::Id) -> Result<Option<R>, StoreError>;

    /// Returns one page of the records matching `query`.
    async fn find<R: Record>(&mut self, query: &Query) -> Result<PageResponse<R>, StoreError>;

    /// Inserts a new record.
    ///
    /// Fails with `DuplicateId` or `DuplicateCode` on a uniqueness clash.
    async fn insert<R: Record>(&mut self, record: &R) -> Result<(), StoreError>;

    /// Merges `patch` into the top-level fields of a record and returns
    /// the updated record.
    async fn update<R: Record>(&mut self, id: &R::Id, patch: Patch) -> Result<R, StoreError>;

    /// Overwrites an existing record.
    async fn replace<R: Record>(&mut self, record: &R) -> Result<(), StoreError>;

    /// Deletes a record.
    async fn delete<R: Record>(&mut self, id: &R::Id) -> Result<(), StoreError>;

    /// Returns true if some record already uses `code`.
    async fn code_exists<R: Record>(&mut self, code: &str) -> Result<bool, StoreError>;

    /// Makes every write of this transaction visible.
    async fn commit(self) -> Result<(), StoreError>;
}
