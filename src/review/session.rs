//! A single study sitting over the items that were due when it started

use chrono::{DateTime, Utc};

use super::models::ReviewItem;
use super::scheduler::ReviewScheduler;

/// Cursor over a snapshot of due item ids.
///
/// Grading advances to the next item and wraps back to the first after
/// the last one. The snapshot is not refreshed during the sitting.
#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    item_ids: Vec<String>,
    index: usize,
    revealed: bool,
}

impl ReviewSession {
    /// Start a session over everything due now
    pub fn start(scheduler: &ReviewScheduler) -> Self {
        Self::start_at(scheduler, Utc::now())
    }

    pub fn start_at(scheduler: &ReviewScheduler, now: DateTime<Utc>) -> Self {
        Self {
            item_ids: scheduler
                .due_items_at(now)
                .into_iter()
                .map(|item| item.id.clone())
                .collect(),
            index: 0,
            revealed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.item_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_ids.is_empty()
    }

    /// 1-based position of the current item
    pub fn position(&self) -> usize {
        self.index + 1
    }

    pub fn current<'a>(&self, scheduler: &'a ReviewScheduler) -> Option<&'a ReviewItem> {
        self.item_ids
            .get(self.index)
            .and_then(|id| scheduler.get(id))
    }

    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Grade the current item and move on
    pub async fn grade(&mut self, scheduler: &mut ReviewScheduler, quality: i32) -> Option<ReviewItem> {
        let id = self.item_ids.get(self.index)?.clone();
        let updated = scheduler.record_review(&id, quality).await;

        self.revealed = false;
        self.index = (self.index + 1) % self.item_ids.len();
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Duration;
    use std::sync::Arc;

    async fn scheduler_with(questions: &[&str]) -> ReviewScheduler {
        let mut scheduler = ReviewScheduler::new(Arc::new(MemoryStore::new()));
        scheduler.initialize(Some("user-1")).await;
        for question in questions {
            scheduler
                .add_item(question.to_string(), "A".to_string(), "flashcard".to_string())
                .await;
        }
        scheduler
    }

    #[tokio::test]
    async fn test_empty_session() {
        let mut scheduler = scheduler_with(&[]).await;
        let mut session = ReviewSession::start(&scheduler);

        assert!(session.is_empty());
        assert!(session.current(&scheduler).is_none());
        assert!(session.grade(&mut scheduler, 5).await.is_none());
    }

    #[tokio::test]
    async fn test_grade_advances_and_wraps() {
        let mut scheduler = scheduler_with(&["Q1", "Q2"]).await;
        let mut session = ReviewSession::start(&scheduler);
        assert_eq!(session.len(), 2);

        assert_eq!(session.current(&scheduler).unwrap().question, "Q1");
        session.reveal();
        assert!(session.is_revealed());

        let graded = session.grade(&mut scheduler, 4).await.unwrap();
        assert_eq!(graded.question, "Q1");
        assert!(!session.is_revealed());
        assert_eq!(session.position(), 2);
        assert_eq!(session.current(&scheduler).unwrap().question, "Q2");

        session.grade(&mut scheduler, 1).await;
        assert_eq!(session.position(), 1);
        assert_eq!(session.current(&scheduler).unwrap().question, "Q1");
    }

    #[tokio::test]
    async fn test_snapshot_skips_future_items() {
        let mut scheduler = scheduler_with(&["Q1"]).await;
        let now = Utc::now();
        scheduler
            .add_item_at(
                "later".to_string(),
                "A".to_string(),
                "flashcard".to_string(),
                now + Duration::hours(2),
            )
            .await;

        let session = ReviewSession::start_at(&scheduler, now);
        assert_eq!(session.len(), 1);
        assert_eq!(session.current(&scheduler).unwrap().question, "Q1");
    }
}
