//! Read-only persistence layer split across logical submodules.

mod chapters;
mod connection;
mod details;

pub use chapters::{fetch_chapter, fetch_chapter_count};
pub use connection::{Store, StoreError};
pub use details::{fetch_greek_tokens, fetch_insights, fetch_verse_base, fetch_verse_details};
