//! Filesystem-backed item store
//!
//! Directory structure:
//! ```text
//! {data_dir}/users/
//! └── {user-id}.json   # One JSON object per user
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;

use super::{merge_into, ItemStore, Result, StoreError, UserData};

/// Bookkeeping key stamped on every save
pub const UPDATED_AT_KEY: &str = "updatedAt";

/// Storage manager for per-user documents
pub struct FileStore {
    users_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            users_dir: data_dir.as_ref().join("users"),
        }
    }

    /// Get the document path for a user
    fn user_path(&self, user_id: &str) -> Result<PathBuf> {
        validate_user_id(user_id)?;
        Ok(self.users_dir.join(format!("{}.json", user_id)))
    }

    async fn read_document(&self, path: &Path) -> Result<Option<UserData>> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn validate_user_id(user_id: &str) -> Result<()> {
    let invalid = user_id.is_empty()
        || user_id == "."
        || user_id.contains("..")
        || user_id.contains(|c| matches!(c, '/' | '\\' | '\0'));
    if invalid {
        return Err(StoreError::InvalidUserId(user_id.to_string()));
    }
    Ok(())
}

#[async_trait]
impl ItemStore for FileStore {
    async fn load(&self, user_id: &str) -> Result<Option<UserData>> {
        let path = self.user_path(user_id)?;
        self.read_document(&path).await
    }

    async fn save(&self, user_id: &str, partial: UserData) -> Result<()> {
        let path = self.user_path(user_id)?;
        fs::create_dir_all(&self.users_dir).await?;

        let mut document = self.read_document(&path).await?.unwrap_or_default();
        merge_into(&mut document, partial);
        document.insert(
            UPDATED_AT_KEY.to_string(),
            serde_json::Value::String(Utc::now().to_rfc3339()),
        );

        // Atomic write: write to .tmp then rename
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string_pretty(&document)?).await?;
        fs::rename(&tmp_path, &path).await?;

        log::debug!("Saved document for user {} to {}", user_id, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        (store, temp_dir)
    }

    fn partial(key: &str, value: serde_json::Value) -> UserData {
        let mut data = UserData::new();
        data.insert(key.to_string(), value);
        data
    }

    #[tokio::test]
    async fn test_load_without_document() {
        let (store, _temp) = create_test_store();
        assert!(store.load("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let (store, temp) = create_test_store();
        store
            .save("alice", partial("spacedRepetitionSchedule", json!([])))
            .await
            .unwrap();

        assert!(temp.path().join("users").join("alice.json").exists());

        let document = store.load("alice").await.unwrap().unwrap();
        assert_eq!(document["spacedRepetitionSchedule"], json!([]));
        assert!(document.contains_key(UPDATED_AT_KEY));
    }

    #[tokio::test]
    async fn test_save_keeps_other_keys() {
        let (store, _temp) = create_test_store();
        store
            .save("alice", partial("quizHistory", json!(["q1"])))
            .await
            .unwrap();
        store
            .save("alice", partial("spacedRepetitionSchedule", json!([{"id": "x"}])))
            .await
            .unwrap();

        let document = store.load("alice").await.unwrap().unwrap();
        assert_eq!(document["quizHistory"], json!(["q1"]));
        assert_eq!(document["spacedRepetitionSchedule"], json!([{"id": "x"}]));
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let (store, _temp) = create_test_store();
        store.save("alice", partial("a", json!(1))).await.unwrap();

        assert!(store.load("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejects_path_like_user_ids() {
        let (store, _temp) = create_test_store();
        for bad in ["", "..", "../etc", "a/b", "a\\b"] {
            assert!(matches!(
                store.load(bad).await,
                Err(StoreError::InvalidUserId(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_corrupt_document_is_an_error() {
        let (store, temp) = create_test_store();
        let users_dir = temp.path().join("users");
        std::fs::create_dir_all(&users_dir).unwrap();
        std::fs::write(users_dir.join("alice.json"), "{not json").unwrap();

        assert!(matches!(store.load("alice").await, Err(StoreError::Json(_))));
    }
}
