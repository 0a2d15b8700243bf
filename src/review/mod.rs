// file: src/review/mod.rs
// description: daily review scheduling and rating aggregation
// reference: internal module structure

pub mod rating;
pub mod schedule;

pub use rating::{ARCHIVE_AFTER_LOW_RATINGS, Rating, RatingSummary, should_archive, summarize};
pub use schedule::{daily_selection, days_in_month, month_key, per_day};
