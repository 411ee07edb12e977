//! Spaced repetition review scheduling
//!
//! This module provides:
//! - Review item model and derived lifecycle phases
//! - SM-2 update algorithm
//! - Per-user scheduler with persistence through an item store
//! - Study sessions over the due set

pub mod algorithm;
pub mod models;
pub mod scheduler;
pub mod session;

pub use models::*;
pub use scheduler::{PersistState, PersistStatus, ReviewScheduler, SCHEDULE_KEY};
pub use session::ReviewSession;
