//! Review scheduler
//!
//! Owns one user's ordered review schedule for the length of a session.
//! Every mutation is applied in memory first and then the whole
//! collection is written to the item store under [`SCHEDULE_KEY`]. A
//! failed write is logged and reported through [`PersistStatus`]; the
//! in-memory change is kept.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use super::algorithm::{apply_review, preview_intervals};
use super::models::{ReviewItem, ReviewStats};
use crate::store::{ItemStore, StoreError, UserData};

/// Document key holding the ordered schedule
pub const SCHEDULE_KEY: &str = "spacedRepetitionSchedule";

/// Outcome of the most recent load or save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PersistState {
    /// Nothing attempted yet
    Idle,
    /// Initial load in flight
    Loading,
    /// Initial load finished (possibly with nothing stored)
    Loaded,
    /// Last save succeeded
    Saved,
    /// Initial load failed, running on an empty schedule
    LoadFailed,
    /// Last save failed, memory is ahead of the store
    SaveFailed,
}

/// Persistence status for the scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistStatus {
    pub state: PersistState,
    /// Last successful save timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_saved: Option<DateTime<Utc>>,
    /// Error message from the most recent failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Saves that failed during this session
    pub failed_saves: usize,
}

impl Default for PersistStatus {
    fn default() -> Self {
        Self {
            state: PersistState::Idle,
            last_saved: None,
            last_error: None,
            failed_saves: 0,
        }
    }
}

pub struct ReviewScheduler {
    store: Arc<dyn ItemStore>,
    user_id: Option<String>,
    items: Vec<ReviewItem>,
    is_loading: bool,
    status_tx: watch::Sender<PersistStatus>,
}

impl ReviewScheduler {
    /// Create a scheduler that is loading until [`initialize`](Self::initialize) completes
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        let (status_tx, _) = watch::channel(PersistStatus::default());
        Self {
            store,
            user_id: None,
            items: Vec::new(),
            is_loading: true,
            status_tx,
        }
    }

    /// Load the schedule for `user_id`, or start empty when there is no user.
    ///
    /// A failed load is logged and leaves the schedule empty.
    pub async fn initialize(&mut self, user_id: Option<&str>) {
        self.items.clear();
        self.user_id = user_id.map(str::to_string);

        let Some(user_id) = user_id else {
            self.is_loading = false;
            return;
        };

        self.is_loading = true;
        self.update_status(|status| status.state = PersistState::Loading);

        let loaded = match self.store.load(user_id).await {
            Ok(Some(document)) => decode_schedule(&document),
            Ok(None) => Ok(Vec::new()),
            Err(e) => Err(e),
        };

        match loaded {
            Ok(items) => {
                log::info!("Loaded {} review items for user {}", items.len(), user_id);
                self.items = items;
                self.update_status(|status| {
                    status.state = PersistState::Loaded;
                    status.last_error = None;
                });
            }
            Err(e) => {
                log::error!("Error loading schedule for user {}: {}", user_id, e);
                self.update_status(|status| {
                    status.state = PersistState::LoadFailed;
                    status.last_error = Some(e.to_string());
                });
            }
        }

        self.is_loading = false;
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// The whole schedule in insertion order
    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, item_id: &str) -> Option<&ReviewItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    /// Add a new item, due immediately
    pub async fn add_item(&mut self, question: String, answer: String, item_type: String) -> ReviewItem {
        self.add_item_at(question, answer, item_type, Utc::now()).await
    }

    pub async fn add_item_at(
        &mut self,
        question: String,
        answer: String,
        item_type: String,
        now: DateTime<Utc>,
    ) -> ReviewItem {
        let mut item = ReviewItem::new(question, answer, item_type, now);
        while self.get(&item.id).is_some() {
            item = ReviewItem::new(item.question, item.answer, item.item_type, now);
        }

        log::info!("Added review item {} ({})", item.id, item.item_type);
        self.items.push(item.clone());
        self.persist().await;
        item
    }

    /// Record a graded review.
    ///
    /// Returns `None` without touching anything when `item_id` is unknown.
    pub async fn record_review(&mut self, item_id: &str, quality: i32) -> Option<ReviewItem> {
        self.record_review_at(item_id, quality, Utc::now()).await
    }

    pub async fn record_review_at(
        &mut self,
        item_id: &str,
        quality: i32,
        now: DateTime<Utc>,
    ) -> Option<ReviewItem> {
        let index = self.items.iter().position(|item| item.id == item_id)?;

        let updated = apply_review(&self.items[index], quality, now);
        log::debug!(
            "Reviewed {} with quality {}: interval {}d, repetition {}, ease {:.2}",
            updated.id,
            quality,
            updated.interval,
            updated.repetition,
            updated.ease_factor
        );

        self.items[index] = updated.clone();
        self.persist().await;
        Some(updated)
    }

    /// Items due now, in schedule order
    pub fn due_items(&self) -> Vec<&ReviewItem> {
        self.due_items_at(Utc::now())
    }

    pub fn due_items_at(&self, now: DateTime<Utc>) -> Vec<&ReviewItem> {
        self.items.iter().filter(|item| item.is_due_at(now)).collect()
    }

    /// Interval each quality 1..=5 would give the item, if it exists
    pub fn preview_intervals(&self, item_id: &str) -> Option<[u32; 5]> {
        self.get(item_id).map(preview_intervals)
    }

    pub fn stats(&self) -> ReviewStats {
        self.stats_at(Utc::now())
    }

    pub fn stats_at(&self, now: DateTime<Utc>) -> ReviewStats {
        ReviewStats::collect(&self.items, now)
    }

    pub fn persist_status(&self) -> PersistStatus {
        self.status_tx.borrow().clone()
    }

    /// Watch persistence status changes
    pub fn subscribe(&self) -> watch::Receiver<PersistStatus> {
        self.status_tx.subscribe()
    }

    fn update_status(&self, f: impl FnOnce(&mut PersistStatus)) {
        self.status_tx.send_modify(f);
    }

    /// Write the whole schedule to the store.
    ///
    /// Without a signed-in user the schedule lives in memory only.
    async fn persist(&self) {
        let Some(user_id) = self.user_id.clone() else {
            return;
        };

        let result = match encode_schedule(&self.items) {
            Ok(partial) => self.store.save(&user_id, partial).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => self.update_status(|status| {
                status.state = PersistState::Saved;
                status.last_saved = Some(Utc::now());
                status.last_error = None;
            }),
            Err(e) => {
                log::error!("Error saving schedule for user {}: {}", user_id, e);
                self.update_status(|status| {
                    status.state = PersistState::SaveFailed;
                    status.last_error = Some(e.to_string());
                    status.failed_saves += 1;
                });
            }
        }
    }
}

/// Read the schedule out of a stored user document
fn decode_schedule(document: &UserData) -> Result<Vec<ReviewItem>, StoreError> {
    let value = match document.get(SCHEDULE_KEY) {
        None | Some(serde_json::Value::Null) => return Ok(Vec::new()),
        Some(value) => value.clone(),
    };

    let items: Vec<ReviewItem> = serde_json::from_value(value)
        .map_err(|e| StoreError::MalformedSchedule(e.to_string()))?;

    Ok(items.into_iter().map(ReviewItem::normalized).collect())
}

fn encode_schedule(items: &[ReviewItem]) -> Result<UserData, StoreError> {
    let mut partial = UserData::new();
    partial.insert(SCHEDULE_KEY.to_string(), serde_json::to_value(items)?);
    Ok(partial)
}
