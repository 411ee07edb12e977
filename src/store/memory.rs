//! In-process item store
//!
//! Keeps documents in a map for the lifetime of the process. Loads and
//! saves can be made to fail on demand, which is how the scheduler's
//! error paths are exercised.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{merge_into, ItemStore, Result, StoreError, UserData};

#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, UserData>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent loads fail (or succeed again)
    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of save calls received, failed ones included
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Snapshot of a user's current document
    pub async fn document(&self, user_id: &str) -> Option<UserData> {
        self.documents.lock().await.get(user_id).cloned()
    }

    /// Replace a user's document wholesale
    pub async fn insert_document(&self, user_id: &str, document: UserData) {
        self.documents
            .lock()
            .await
            .insert(user_id.to_string(), document);
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn load(&self, user_id: &str) -> Result<Option<UserData>> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("read denied".to_string()));
        }
        Ok(self.document(user_id).await)
    }

    async fn save(&self, user_id: &str, partial: UserData) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("write denied".to_string()));
        }

        let mut documents = self.documents.lock().await;
        let document = documents.entry(user_id.to_string()).or_default();
        merge_into(document, partial);
        Ok(())
    }
}
