//! URL handling module for Advisory-Harvest
//!
//! This module provides title derivation from article slugs and construction
//! of every URL the crawler requests.

mod links;
mod slug;

// Re-export main functions
pub use links::SiteLinks;
pub use slug::{path_of, thread_slug, title_from_slug};
