//! SM-2 Spaced Repetition Algorithm
//!
//! Modified SuperMemo 2 update used by the review scheduler.
//!
//! Quality ratings (intended 1-5, not clamped):
//! - 1: Incorrect, but upon seeing answer, remembered
//! - 2: Incorrect, but answer seemed easy to recall
//! - 3: Correct response with serious difficulty
//! - 4: Correct response after hesitation
//! - 5: Perfect response with no hesitation
//!
//! A grade of 3 or more is a pass. Passing items climb through two fixed
//! bootstrap intervals (1 day, then 6 days) before the interval starts to
//! grow by the ease factor. A lapse resets the streak and the interval to
//! one day. The ease factor is adjusted after every review, in both cases,
//! and never drops below 1.3.

use chrono::{DateTime, Duration, Utc};

use super::models::{ReviewItem, MAX_INTERVAL, MIN_EASE_FACTOR};

/// Lowest quality that counts as a pass
pub const PASS_THRESHOLD: i32 = 3;

/// Interval after the first pass
const FIRST_INTERVAL: u32 = 1;

/// Interval after the second consecutive pass
const SECOND_INTERVAL: u32 = 6;

/// Result of calculating the next review
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewResult {
    pub repetition: u32,
    pub ease_factor: f64,
    pub interval: u32,
    pub next_review: DateTime<Utc>,
}

/// Calculate the next scheduling parameters for an item
///
/// # Arguments
/// * `item` - Current item state
/// * `quality` - Quality rating, used as given
/// * `now` - Instant the review happened
pub fn calculate_next_review(item: &ReviewItem, quality: i32, now: DateTime<Utc>) -> ReviewResult {
    let (interval, repetition) = if quality >= PASS_THRESHOLD {
        let interval = match item.repetition {
            0 => FIRST_INTERVAL,
            1 => SECOND_INTERVAL,
            // Pre-update ease factor drives the growth
            _ => (item.interval as f64 * item.ease_factor).round() as u32,
        };
        (interval.clamp(1, MAX_INTERVAL), item.repetition.saturating_add(1))
    } else {
        (FIRST_INTERVAL, 0)
    };

    // EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02))
    let distance = 5.0 - quality as f64;
    let ease_factor =
        (item.ease_factor + (0.1 - distance * (0.08 + distance * 0.02))).max(MIN_EASE_FACTOR);

    ReviewResult {
        repetition,
        ease_factor,
        interval,
        next_review: now
            .checked_add_signed(Duration::days(interval as i64))
            .unwrap_or(DateTime::<Utc>::MAX_UTC),
    }
}

/// Produce the replacement for `item` after a graded review.
///
/// Identity and content fields are carried over untouched.
pub fn apply_review(item: &ReviewItem, quality: i32, now: DateTime<Utc>) -> ReviewItem {
    let ReviewResult {
        repetition,
        ease_factor,
        interval,
        next_review,
    } = calculate_next_review(item, quality, now);

    ReviewItem {
        id: item.id.clone(),
        question: item.question.clone(),
        answer: item.answer.clone(),
        item_type: item.item_type.clone(),
        repetition,
        ease_factor,
        interval,
        next_review,
        last_reviewed: Some(now),
    }
}

/// Calculate the interval each quality rating (1 through 5) would give.
/// Used to show users what each grade button does.
pub fn preview_intervals(item: &ReviewItem) -> [u32; 5] {
    let now = Utc::now();
    [1, 2, 3, 4, 5].map(|quality| calculate_next_review(item, quality, now).interval)
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
