//! Visitor feedback left after an open-house visit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{FeedbackId, VisitorId};

/// Feedback left by a visitor.
///
/// Strictly one-per-visitor; the store enforces the uniqueness constraint
/// when the record is attached. Presence of this record is what flips a
/// visitor's has-feedback status, and `interested` is what the
/// `interested` campaign trigger selects on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub visitor_id: VisitorId,
    /// Whether the visitor expressed interest in the property
    pub interested: bool,
    /// Rating from 1 to 5
    pub rating: u8,
    pub comments: Option<String>,
    pub left_at: DateTime<Utc>,
}

impl Feedback {
    /// Create a new feedback record for a visitor.
    #[must_use]
    pub fn new(visitor_id: VisitorId, interested: bool, rating: u8) -> Self {
        Self {
            id: FeedbackId::generate(),
            visitor_id,
            interested,
            rating,
            comments: None,
            left_at: Utc::now(),
        }
    }

    /// Attach free-form comments.
    #[must_use]
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }
}
