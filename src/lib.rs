//! Spaced repetition core for the StudyBuddy study aid.
//!
//! A [`review::ReviewScheduler`] owns one user's review items, applies the
//! SM-2 update after each graded review and answers which items are due.
//! Durable state goes through an [`store::ItemStore`].

pub mod config;
pub mod review;
pub mod store;
