pub mod add;
pub mod list;
pub mod review;
pub mod stats;
pub mod study;
