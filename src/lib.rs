//! Core library for the Koine Greek interlinear reader.
//!
//! The crate reads a bundled, read-only SQLite store of verses, Greek tokens,
//! lexicon entries and verse insights, and presents it in a terminal UI. The
//! binary in `main.rs` only parses flags and wires these pieces together.
pub mod config;
pub mod db;
pub mod loader;
pub mod models;
pub mod ui;

/// Read-only store handle and the synchronous queries behind the loaders.
pub use db::{fetch_chapter, fetch_verse_details, Store, StoreError};

pub use loader::{load_chapter, load_verse_details};

/// Domain types that every layer passes around.
pub use models::{GreekToken, OsisCode, VerseDetails, VerseInsight, VerseKey, VerseRow};

/// The interactive application entry point and state container.
pub use ui::{run_app, App, ChapterView, EventHandler};
