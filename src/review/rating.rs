// file: src/review/rating.rs
// description: review ratings, their running average and the auto-archive rule
// reference: internal data structures

use crate::error::{HighlightError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of "low" ratings after which a highlight is archived.
pub const ARCHIVE_AFTER_LOW_RATINGS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Low,
    Med,
    High,
}

impl Rating {
    pub fn value(self) -> u8 {
        match self {
            Rating::Low => 0,
            Rating::Med => 1,
            Rating::High => 2,
        }
    }
}

impl FromStr for Rating {
    type Err = HighlightError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Rating::Low),
            "med" | "medium" => Ok(Rating::Med),
            "high" => Ok(Rating::High),
            other => Err(HighlightError::Validation(format!(
                "Unknown rating: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: usize,
    pub archived: bool,
}

/// Average and count over every rating a highlight has received.
pub fn summarize(ratings: &[Rating]) -> RatingSummary {
    let count = ratings.len();
    let average = if count == 0 {
        0.0
    } else {
        ratings.iter().map(|r| f64::from(r.value())).sum::<f64>() / count as f64
    };

    RatingSummary {
        average,
        count,
        archived: should_archive(ratings),
    }
}

pub fn should_archive(ratings: &[Rating]) -> bool {
    ratings.iter().filter(|r| **r == Rating::Low).count() >= ARCHIVE_AFTER_LOW_RATINGS
}
