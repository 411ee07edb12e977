//! Per-user document storage consumed by the review scheduler
//!
//! A user's state is a single JSON object. Callers save partial
//! documents; stores merge the given top-level keys into whatever is
//! already there.

pub mod file;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// A user's stored state: top-level keys to JSON values
pub type UserData = serde_json::Map<String, serde_json::Value>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid user ID: {0:?}")]
    InvalidUserId(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed schedule: {0}")]
    MalformedSchedule(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Durable load/save of user documents
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Load the document previously saved for a user, if any
    async fn load(&self, user_id: &str) -> Result<Option<UserData>>;

    /// Merge `partial` into the user's document
    async fn save(&self, user_id: &str, partial: UserData) -> Result<()>;
}

/// Merge the top-level keys of `partial` into `document`
pub(crate) fn merge_into(document: &mut UserData, partial: UserData) {
    for (key, value) in partial {
        document.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_keeps_unrelated_keys() {
        let mut document = UserData::new();
        document.insert("quizHistory".to_string(), json!([1, 2]));
        document.insert("spacedRepetitionSchedule".to_string(), json!([]));

        let mut partial = UserData::new();
        partial.insert("spacedRepetitionSchedule".to_string(), json!([{"id": "a"}]));
        merge_into(&mut document, partial);

        assert_eq!(document["quizHistory"], json!([1, 2]));
        assert_eq!(document["spacedRepetitionSchedule"], json!([{"id": "a"}]));
    }
}
