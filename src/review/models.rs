//! Data models for the review scheduler

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease factor given to every new item
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Interval (days) given to every new item
pub const DEFAULT_INTERVAL: u32 = 1;

/// Longest interval ever scheduled (100 years)
pub const MAX_INTERVAL: u32 = 36_500;

/// Tag used when an item arrives without one
pub const DEFAULT_ITEM_TYPE: &str = "flashcard";

/// A single learnable unit in the review schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub id: String,
    pub question: String,
    pub answer: String,
    /// Provenance tag, e.g. "flashcard" or "quiz"
    #[serde(rename = "type", default = "default_item_type")]
    pub item_type: String,
    /// Consecutive passing reviews since the last lapse
    #[serde(default)]
    pub repetition: u32,
    /// SM-2 ease factor (default 2.5, never below 1.3)
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    /// Days until the next review
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// When the item is next due
    #[serde(default = "Utc::now")]
    pub next_review: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
}

fn default_item_type() -> String {
    DEFAULT_ITEM_TYPE.to_string()
}

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

fn default_interval() -> u32 {
    DEFAULT_INTERVAL
}

impl ReviewItem {
    /// Create a new item that is due immediately
    pub fn new(question: String, answer: String, item_type: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            question,
            answer,
            item_type,
            repetition: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            interval: DEFAULT_INTERVAL,
            next_review: now,
            last_reviewed: None,
        }
    }

    /// Check if the item is due at the given instant
    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }

    pub fn phase(&self) -> ItemPhase {
        match self.repetition {
            0 if self.last_reviewed.is_none() => ItemPhase::New,
            0 => ItemPhase::Lapsed,
            1 => ItemPhase::Learning,
            _ => ItemPhase::Reviewing,
        }
    }

    /// Bring a freshly loaded item back inside the scheduling invariants.
    ///
    /// Only applied once when a stored schedule is read; live state is
    /// kept valid by the update algorithm itself.
    pub fn normalized(mut self) -> Self {
        if !self.ease_factor.is_finite() {
            self.ease_factor = DEFAULT_EASE_FACTOR;
        } else if self.ease_factor < MIN_EASE_FACTOR {
            self.ease_factor = MIN_EASE_FACTOR;
        }
        self.interval = self.interval.clamp(DEFAULT_INTERVAL, MAX_INTERVAL);
        self
    }
}

/// Where an item sits in the spaced repetition lifecycle.
///
/// Derived from the numeric fields on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemPhase {
    /// Never reviewed
    New,
    /// Passed once, inside the fixed bootstrap intervals
    Learning,
    /// Interval grows by the ease factor
    Reviewing,
    /// Failed the most recent review
    Lapsed,
}

impl ItemPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Learning => "learning",
            Self::Reviewing => "reviewing",
            Self::Lapsed => "lapsed",
        }
    }
}

/// Statistics over a review schedule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_items: usize,
    pub new_items: usize,
    pub learning_items: usize,
    pub reviewing_items: usize,
    pub lapsed_items: usize,
    pub due_items: usize,
}

impl ReviewStats {
    pub fn collect(items: &[ReviewItem], now: DateTime<Utc>) -> Self {
        let mut stats = Self {
            total_items: items.len(),
            ..Default::default()
        };

        for item in items {
            match item.phase() {
                ItemPhase::New => stats.new_items += 1,
                ItemPhase::Learning => stats.learning_items += 1,
                ItemPhase::Reviewing => stats.reviewing_items += 1,
                ItemPhase::Lapsed => stats.lapsed_items += 1,
            }

            if item.is_due_at(now) {
                stats.due_items += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item() -> ReviewItem {
        ReviewItem::new(
            "Capital of France?".to_string(),
            "Paris".to_string(),
            "flashcard".to_string(),
            Utc::now(),
        )
    }

    #[test]
    fn test_new_item_defaults() {
        let now = Utc::now();
        let item = ReviewItem::new("Q".to_string(), "A".to_string(), "quiz".to_string(), now);

        assert_eq!(item.repetition, 0);
        assert_eq!(item.ease_factor, 2.5);
        assert_eq!(item.interval, 1);
        assert_eq!(item.next_review, now);
        assert!(item.last_reviewed.is_none());
        assert_eq!(item.item_type, "quiz");
        assert!(item.is_due_at(now));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = item();
        let b = item();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serialized_keys_are_camel_case() {
        let item = item();
        let value = serde_json::to_value(&item).unwrap();

        assert!(value.get("easeFactor").is_some());
        assert!(value.get("nextReview").is_some());
        assert_eq!(value["type"], "flashcard");
        // Absent until the first review
        assert!(value.get("lastReviewed").is_none());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let json = r#"{"id": "1700000000000", "question": "Q", "answer": "A"}"#;
        let before = Utc::now();
        let item: ReviewItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.item_type, "flashcard");
        assert_eq!(item.repetition, 0);
        assert_eq!(item.ease_factor, 2.5);
        assert_eq!(item.interval, 1);
        assert!(item.next_review >= before);
        assert!(item.last_reviewed.is_none());
    }

    #[test]
    fn test_normalized_restores_invariants() {
        let mut broken = item();
        broken.ease_factor = 0.7;
        broken.interval = 0;

        let fixed = broken.normalized();
        assert_eq!(fixed.ease_factor, MIN_EASE_FACTOR);
        assert_eq!(fixed.interval, 1);

        let mut runaway = item();
        runaway.interval = u32::MAX;
        assert_eq!(runaway.normalized().interval, MAX_INTERVAL);

        let mut nan = item();
        nan.ease_factor = f64::NAN;
        assert_eq!(nan.normalized().ease_factor, DEFAULT_EASE_FACTOR);
    }

    #[test]
    fn test_phase_derivation() {
        let mut item = item();
        assert_eq!(item.phase(), ItemPhase::New);

        item.last_reviewed = Some(Utc::now());
        assert_eq!(item.phase(), ItemPhase::Lapsed);

        item.repetition = 1;
        assert_eq!(item.phase(), ItemPhase::Learning);

        item.repetition = 4;
        assert_eq!(item.phase(), ItemPhase::Reviewing);
    }

    #[test]
    fn test_stats_counts() {
        let now = Utc::now();
        let mut fresh = item();
        fresh.next_review = now;
        let mut learning = item();
        learning.repetition = 1;
        learning.last_reviewed = Some(now);
        learning.next_review = now + Duration::days(1);
        let mut lapsed = item();
        lapsed.last_reviewed = Some(now);
        lapsed.next_review = now - Duration::hours(1);

        let stats = ReviewStats::collect(&[fresh, learning, lapsed], now);
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.new_items, 1);
        assert_eq!(stats.learning_items, 1);
        assert_eq!(stats.lapsed_items, 1);
        assert_eq!(stats.reviewing_items, 0);
        assert_eq!(stats.due_items, 2);
    }
}
