//! Outcomes of processing an article and of a whole crawl

use crate::model::ArticleRecord;
use chrono::{DateTime, FixedOffset};
use std::fmt;

/// What the article processor reports back to the controller
///
/// Transport and layout failures are not outcomes; they surface as errors and
/// the controller skips the article.
#[derive(Debug, Clone, PartialEq)]
pub enum ArticleOutcome {
    /// The article is inside the recency window and fully extracted
    Recorded(Box<ArticleRecord>),

    /// The article is older than the window, or its timestamp is unusable.
    /// This triggers the stopping rule.
    OutOfWindow {
        url: String,
        published: Option<DateTime<FixedOffset>>,
    },
}

/// Why pagination ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// An article older than the recency window was reached
    OutOfWindow { url: String },

    /// An index page had no article links
    EndOfIndex { page: u32 },

    /// The configured page limit was reached
    PageLimit { pages: u32 },

    /// The run was interrupted by the user
    Interrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfWindow { url } => write!(f, "out-of-window article {}", url),
            Self::EndOfIndex { page } => write!(f, "end of index at page {}", page),
            Self::PageLimit { pages } => write!(f, "page limit of {} reached", pages),
            Self::Interrupted => write!(f, "interrupted"),
        }
    }
}
