//! In-memory document store.
//!
//! Collections are JSON documents keyed by id. A transaction takes the
//! store-wide lock for its whole lifetime and works on a private view of
//! the data, so transactions run one at a time and a commit publishes all
//! of its writes at once.
//!
//! Collections are shared between the store and its transactions and are
//! copied on first write, so a transaction only pays for the collections
//! it modifies.

use async_trait::async_trait;
use serde_json::Value;
use soquy_shared::types::PageResponse;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use super::query::lookup;
use super::{Patch, Query, Record, Store, StoreError, StoreTx};

type Collection = BTreeMap<String, Value>;
type Collections = HashMap<&'static str, Arc<Collection>>;

/// Shared in-memory store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<Collections>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, StoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(MemoryTx {
            guard,
            working,
            writes: 0,
        })
    }
}

/// Transaction over a [`MemoryStore`].
pub struct MemoryTx {
    guard: OwnedMutexGuard<Collections>,
    working: Collections,
    writes: usize,
}

impl MemoryTx {
    fn collection(&self, name: &'static str) -> Option<&Collection> {
        self.working.get(name).map(Arc::as_ref)
    }

    fn collection_mut(&mut self, name: &'static str) -> &mut Collection {
        self.writes += 1;
        Arc::make_mut(self.working.entry(name).or_default())
    }

    /// Returns true if a record other than `except` uses `code`.
    fn code_taken<R: Record>(&self, code: &str, except: Option<&str>) -> bool {
        let Some(field) = R::CODE_FIELD else {
            return false;
        };
        self.collection(R::COLLECTION).is_some_and(|docs| {
            docs.iter().any(|(key, doc)| {
                Some(key.as_str()) != except
                    && lookup(doc, field).and_then(Value::as_str) == Some(code)
            })
        })
    }

    fn check_code<R: Record>(&self, doc: &Value, except: Option<&str>) -> Result<(), StoreError> {
        let Some(field) = R::CODE_FIELD else {
            return Ok(());
        };
        if let Some(code) = lookup(doc, field).and_then(Value::as_str)
            && self.code_taken::<R>(code, except)
        {
            return Err(StoreError::DuplicateCode {
                collection: R::COLLECTION,
                code: code.to_string(),
            });
        }
        Ok(())
    }

    fn not_found<R: Record>(key: String) -> StoreError {
        StoreError::NotFound {
            collection: R::COLLECTION,
            id: key,
        }
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn get<R: Record>(&mut self, id: &R::Id) -> Result<Option<R>, StoreError> {
        let key = id.to_string();
        self.collection(R::COLLECTION)
            .and_then(|docs| docs.get(&key))
            .map(|doc| serde_json::from_value(doc.clone()))
            .transpose()
            .map_err(StoreError::from)
    }

    async fn find<R: Record>(&mut self, query: &Query) -> Result<PageResponse<R>, StoreError> {
        let mut matched: Vec<&Value> = self
            .collection(R::COLLECTION)
            .map(|docs| docs.values().filter(|doc| query.matches(doc)).collect())
            .unwrap_or_default();
        matched.sort_by(|a, b| query.compare(a, b));

        let total = u64::try_from(matched.len()).unwrap_or(u64::MAX);
        let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.page.limit()).unwrap_or(usize::MAX);

        let data = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|doc| serde_json::from_value(doc.clone()))
            .collect::<Result<Vec<R>, _>>()?;

        Ok(PageResponse::new(
            data,
            query.page.page,
            query.page.per_page,
            total,
        ))
    }

    async fn insert<R: Record>(&mut self, record: &R) -> Result<(), StoreError> {
        let key = record.id().to_string();
        let doc = serde_json::to_value(record)?;

        if self
            .collection(R::COLLECTION)
            .is_some_and(|docs| docs.contains_key(&key))
        {
            return Err(StoreError::DuplicateId {
                collection: R::COLLECTION,
                id: key,
            });
        }
        self.check_code::<R>(&doc, None)?;

        self.collection_mut(R::COLLECTION).insert(key, doc);
        Ok(())
    }

    async fn update<R: Record>(&mut self, id: &R::Id, patch: Patch) -> Result<R, StoreError> {
        let key = id.to_string();
        let mut doc = self
            .collection(R::COLLECTION)
            .and_then(|docs| docs.get(&key))
            .cloned()
            .ok_or_else(|| Self::not_found::<R>(key.clone()))?;

        let touches_code = R::CODE_FIELD.is_some_and(|field| patch.touches(field));
        patch.apply(&mut doc)?;
        if touches_code {
            self.check_code::<R>(&doc, Some(key.as_str()))?;
        }

        let record: R = serde_json::from_value(doc.clone())?;
        self.collection_mut(R::COLLECTION).insert(key, doc);
        Ok(record)
    }

    async fn replace<R: Record>(&mut self, record: &R) -> Result<(), StoreError> {
        let key = record.id().to_string();
        if !self
            .collection(R::COLLECTION)
            .is_some_and(|docs| docs.contains_key(&key))
        {
            return Err(Self::not_found::<R>(key));
        }

        let doc = serde_json::to_value(record)?;
        self.check_code::<R>(&doc, Some(key.as_str()))?;

        self.collection_mut(R::COLLECTION).insert(key, doc);
        Ok(())
    }

    async fn delete<R: Record>(&mut self, id: &R::Id) -> Result<(), StoreError> {
        let key = id.to_string();
        if !self
            .collection(R::COLLECTION)
            .is_some_and(|docs| docs.contains_key(&key))
        {
            return Err(Self::not_found::<R>(key));
        }
        self.collection_mut(R::COLLECTION).remove(&key);
        Ok(())
    }

    async fn code_exists<R: Record>(&mut self, code: &str) -> Result<bool, StoreError> {
        Ok(self.code_taken::<R>(code, None))
    }

    async fn commit(self) -> Result<(), StoreError> {
        let Self {
            mut guard,
            working,
            writes,
        } = self;
        if writes > 0 {
            *guard = working;
        }
        debug!(writes, "memory transaction committed");
        Ok(())
    }
}
