//! Ratatui front-end: the chapter screen, its detail overlay, and the async
//! event loop that feeds loader results back into the view.

mod app;
mod helpers;
mod overlay;
mod terminal;
mod view;

pub use app::App;
pub use overlay::{insight_lines, overlay_content, word_study_lines, OverlayContent};
pub use terminal::{run_app, AppEvent, EventHandler};
pub use view::{ChapterRequest, ChapterState, ChapterView, DetailState, Overlay, OverlayPane};
