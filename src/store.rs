//! Record store collaborator boundary for the journal service.
//!
//! The journal RPCs are a thin adapter over this trait; they never touch
//! storage directly. [`MemoryStore`] is the in-process implementation the
//! daemon ships with — durability is explicitly not this crate's concern,
//! so a store backed by a real database only needs to implement
//! [`RecordStore`] and report misses as [`ReckonerError::NotFound`].

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream};
use tokio::sync::RwLock;

use crate::{ReckonerError, Result};

/// A stored journal entry, identity included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    pub id: u64,
    pub author_id: String,
    pub title: String,
    pub content: String,
}

/// The caller-supplied fields of an entry, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub author_id: String,
    pub title: String,
    pub content: String,
}

impl EntryDraft {
    fn into_record(self, id: u64) -> EntryRecord {
        EntryRecord {
            id,
            author_id: self.author_id,
            title: self.title,
            content: self.content,
        }
    }
}

/// Key-indexed record storage.
///
/// `find`, `replace`, and `delete` fail with [`ReckonerError::NotFound`]
/// when the id is absent. `scan` yields records lazily, in id order, from
/// a snapshot taken when the scan starts.
#[async_trait]
pub trait RecordStore: Send + Sync + 'static {
    /// Store a new entry and return it with its assigned id.
    async fn insert(&self, draft: EntryDraft) -> Result<EntryRecord>;

    /// Look up an entry by id.
    async fn find(&self, id: u64) -> Result<EntryRecord>;

    /// Replace the fields of an existing entry, keeping its id.
    async fn replace(&self, id: u64, draft: EntryDraft) -> Result<EntryRecord>;

    /// Remove an entry by id.
    async fn delete(&self, id: u64) -> Result<()>;

    /// Stream every stored entry.
    async fn scan(&self) -> Result<BoxStream<'static, Result<EntryRecord>>>;
}

/// In-memory [`RecordStore`] used by the daemon and the tests.
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<u64, EntryRecord>>,
    next_id: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store. Ids start at 1.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn missing(id: u64) -> ReckonerError {
        ReckonerError::NotFound(format!("no entry with id {id}"))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, draft: EntryDraft) -> Result<EntryRecord> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = draft.into_record(id);
        self.entries.write().await.insert(id, record.clone());
        Ok(record)
    }

    async fn find(&self, id: u64) -> Result<EntryRecord> {
        self.entries
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::missing(id))
    }

    async fn replace(&self, id: u64, draft: EntryDraft) -> Result<EntryRecord> {
        let mut entries = self.entries.write().await;
        let slot = entries.get_mut(&id).ok_or_else(|| Self::missing(id))?;
        *slot = draft.into_record(id);
        Ok(slot.clone())
    }

    async fn delete(&self, id: u64) -> Result<()> {
        self.entries
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Self::missing(id))
    }

    async fn scan(&self) -> Result<BoxStream<'static, Result<EntryRecord>>> {
        // Snapshot under the read lock; the stream itself borrows nothing.
        let snapshot: Vec<EntryRecord> = self.entries.read().await.values().cloned().collect();
        Ok(Box::pin(stream::iter(snapshot.into_iter().map(Ok))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    fn draft(title: &str) -> EntryDraft {
        EntryDraft {
            author_id: "tester".into(),
            title: title.into(),
            content: "body".into(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let a = store.insert(draft("a")).await.unwrap();
        let b = store.insert(draft("b")).await.unwrap();
        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn find_miss_is_not_found() {
        let store = MemoryStore::new();
        let err = store.find(99).await.unwrap_err();
        assert!(matches!(err, ReckonerError::NotFound(_)), "got: {err}");
    }

    #[tokio::test]
    async fn replace_keeps_id() {
        let store = MemoryStore::new();
        let created = store.insert(draft("before")).await.unwrap();
        let updated = store.replace(created.id, draft("after")).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "after");
        assert_eq!(store.find(created.id).await.unwrap().title, "after");
    }

    #[tokio::test]
    async fn delete_then_find_misses() {
        let store = MemoryStore::new();
        let created = store.insert(draft("gone")).await.unwrap();
        store.delete(created.id).await.unwrap();
        assert!(store.find(created.id).await.is_err());
        // Deleting again is a miss, not a silent success.
        assert!(store.delete(created.id).await.is_err());
    }

    #[tokio::test]
    async fn scan_yields_snapshot_in_id_order() {
        let store = MemoryStore::new();
        for title in ["one", "two", "three"] {
            store.insert(draft(title)).await.unwrap();
        }
        let titles: Vec<String> = store
            .scan()
            .await
            .unwrap()
            .map(|r| r.unwrap().title)
            .collect()
            .await;
        assert_eq!(titles, vec!["one", "two", "three"]);
    }
}
