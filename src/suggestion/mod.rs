//! Suggestion Module
//!
//! Recommends a few articles to a Wikode user.
//!
//! ## Architecture
//!
//! 1. **Store** - `SuggestionStore` and `SocialGraph` traits answering the lookups the heuristics need
//! 2. **Postgres / Memory** - implementations of those traits over the Wikode database or in-process fixtures
//! 3. **Engine** - walks the heuristic waterfall and converts picks into suggestion records
//!
//! ## Waterfall
//!
//! Sources are consulted in order until the list holds `limit` articles:
//! - Articles other users tagged with tags the owner also used
//! - Articles tagged by followees
//! - Articles viewed by followees
//! - The globally most viewed article
//! - The most recently tagged article
//! - Random catalog articles
//!
//! Articles the owner already viewed never appear, and no article appears twice.

pub mod engine;
pub mod memory;
pub mod metrics;
pub mod models;
pub mod postgres;
pub mod store;

pub use engine::SuggestionEngine;
pub use memory::MemoryStore;
pub use models::{ArticleSuggestion, SuggestedArticle, SuggestionSource};
pub use postgres::PgSuggestionStore;
pub use store::{SocialGraph, SuggestionStore};
