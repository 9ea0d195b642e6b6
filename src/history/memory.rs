use crate::error::StoreError;
use crate::history::ConversationStore;
use async_trait::async_trait;
use std::collections::{ HashMap, VecDeque };
use std::sync::atomic::{ AtomicBool, AtomicUsize, Ordering };
use tokio::sync::Mutex;

/// In-process store with Redis list semantics. Counts reads and can be
/// switched into a failing state.
#[derive(Default)]
pub struct MemoryConversationStore {
    lists: Mutex<HashMap<String, VecDeque<String>>>,
    reads: AtomicUsize,
    unavailable: AtomicBool,
    failing_writes: AtomicUsize,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `entries` calls made so far, including failed ones.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// When set, every operation fails with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Makes the next `count` writes fail, then recovers on its own.
    pub fn fail_next_writes(&self, count: usize) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn push_entry(&self, key: &str, entry: String) -> Result<(), StoreError> {
        self.check_available()?;
        let rejected = self.failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if rejected {
            return Err(StoreError::Unavailable("write rejected".into()));
        }
        let mut lists = self.lists.lock().await;
        lists.entry(key.to_string()).or_default().push_front(entry);
        Ok(())
    }

    async fn entries(&self, key: &str) -> Result<Vec<String>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let lists = self.lists.lock().await;
        Ok(
            lists
                .get(key)
                .map(|list| list.iter().cloned().collect())
                .unwrap_or_default()
        )
    }
}
