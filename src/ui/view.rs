//! State machine behind the chapter screen. It knows nothing about terminals or
//! threads: the app hands it user intents and finished loads, and it decides
//! which loads to issue and which results are still current.

use crate::models::{OsisCode, VerseDetails, VerseKey, VerseRow};

/// Verses of the chapter on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterState {
    /// Nothing loaded yet for the current book/chapter.
    Idle,
    Loaded(Vec<VerseRow>),
}

/// A chapter load the app should run. The generation tags the request so
/// answers to superseded requests can be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterRequest {
    pub generation: u64,
    pub osis: OsisCode,
    pub chapter: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Ready(VerseDetails),
    /// The store has no row for the selected verse.
    Missing,
}

/// Which section of the overlay body is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPane {
    #[default]
    Text,
    WordStudy,
    Insights,
}

impl OverlayPane {
    pub fn next(self) -> Self {
        match self {
            OverlayPane::Text => OverlayPane::WordStudy,
            OverlayPane::WordStudy => OverlayPane::Insights,
            OverlayPane::Insights => OverlayPane::Text,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OverlayPane::Text => "Text",
            OverlayPane::WordStudy => "Word study",
            OverlayPane::Insights => "Insights",
        }
    }
}

/// Detail overlay. The selected verse and its detail share one variant, so
/// closing the overlay drops both at once and an open overlay can never hold
/// detail for a verse other than the selected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Closed,
    Open {
        selected: VerseRow,
        detail: DetailState,
        pane: OverlayPane,
    },
}

impl Overlay {
    pub fn is_open(&self) -> bool {
        matches!(self, Overlay::Open { .. })
    }

    pub fn selected_key(&self) -> Option<VerseKey> {
        match self {
            Overlay::Open { selected, .. } => Some(selected.key()),
            Overlay::Closed => None,
        }
    }
}

pub struct ChapterView {
    book: OsisCode,
    chapter: u32,
    chapter_count: Option<u32>,
    verses: ChapterState,
    cursor: usize,
    generation: u64,
    overlay: Overlay,
}

impl ChapterView {
    pub fn new(book: OsisCode, chapter: u32) -> Self {
        Self {
            book,
            chapter: chapter.max(1),
            chapter_count: None,
            verses: ChapterState::Idle,
            cursor: 0,
            generation: 0,
            overlay: Overlay::Closed,
        }
    }

    pub fn book(&self) -> OsisCode {
        self.book
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn chapter_count(&self) -> Option<u32> {
        self.chapter_count
    }

    pub fn state(&self) -> &ChapterState {
        &self.verses
    }

    /// Loaded verses, empty while idle.
    pub fn verses(&self) -> &[VerseRow] {
        match &self.verses {
            ChapterState::Loaded(verses) => verses,
            ChapterState::Idle => &[],
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// `John 1` style heading for the chapter on screen.
    pub fn heading(&self) -> String {
        format!("{} {}", self.book.display_name(), self.chapter)
    }

    /// The screen gained focus: always reload, never reuse what is on screen.
    pub fn focus(&mut self) -> ChapterRequest {
        self.generation += 1;
        ChapterRequest {
            generation: self.generation,
            osis: self.book,
            chapter: self.chapter,
        }
    }

    /// Commit a finished chapter load. Returns `false` when a newer request
    /// has been issued since, in which case the verses are dropped.
    pub fn apply_chapter(&mut self, request: ChapterRequest, verses: Vec<VerseRow>) -> bool {
        if !self.is_current(&request) {
            return false;
        }

        self.cursor = self.cursor.min(verses.len().saturating_sub(1));
        self.verses = ChapterState::Loaded(verses);
        true
    }

    /// Whether `request` is the latest chapter load for the book and chapter
    /// on screen.
    pub fn is_current(&self, request: &ChapterRequest) -> bool {
        request.generation == self.generation
            && request.osis == self.book
            && request.chapter == self.chapter
    }

    /// Record how many chapters the current book has; ignored if the book
    /// changed while the count was loading.
    pub fn set_chapter_count(&mut self, osis: OsisCode, count: u32) {
        if osis == self.book {
            self.chapter_count = Some(count);
        }
    }

    /// Open the overlay for `verse` in the loading state, replacing any
    /// previous selection. The returned key tags the detail fetch.
    pub fn select(&mut self, verse: VerseRow) -> VerseKey {
        let key = verse.key();
        let pane = match &self.overlay {
            Overlay::Open { pane, .. } => *pane,
            Overlay::Closed => OverlayPane::default(),
        };
        self.overlay = Overlay::Open {
            selected: verse,
            detail: DetailState::Loading,
            pane,
        };
        key
    }

    pub fn select_cursor(&mut self) -> Option<VerseKey> {
        let verse = self.verses().get(self.cursor).cloned()?;
        Some(self.select(verse))
    }

    /// Commit a finished detail fetch if it still belongs to the selected
    /// verse. Anything else is a stale response and is discarded.
    pub fn apply_detail(&mut self, key: VerseKey, details: Option<VerseDetails>) -> bool {
        match &mut self.overlay {
            Overlay::Open {
                selected, detail, ..
            } if selected.key() == key => {
                *detail = match details {
                    Some(found) => DetailState::Ready(found),
                    None => DetailState::Missing,
                };
                true
            }
            _ => {
                tracing::debug!(verse = %key.title(), "discarding stale verse detail");
                false
            }
        }
    }

    pub fn dismiss(&mut self) {
        self.overlay = Overlay::Closed;
    }

    pub fn cycle_pane(&mut self) {
        if let Overlay::Open { pane, .. } = &mut self.overlay {
            *pane = pane.next();
        }
    }

    pub fn move_cursor(&mut self, offset: isize) {
        let len = self.verses().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = (self.cursor as isize + offset).clamp(0, len as isize - 1);
        self.cursor = next as usize;
    }

    pub fn cursor_first(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_last(&mut self) {
        self.cursor = self.verses().len().saturating_sub(1);
    }

    /// Move to the following chapter unless the book's last chapter is on
    /// screen.
    pub fn next_chapter(&mut self) -> Option<ChapterRequest> {
        if let Some(count) = self.chapter_count {
            if self.chapter >= count {
                return None;
            }
        }
        let chapter = self.chapter.checked_add(1)?;
        Some(self.navigate(self.book, chapter))
    }

    pub fn previous_chapter(&mut self) -> Option<ChapterRequest> {
        if self.chapter <= 1 {
            return None;
        }
        let chapter = self.chapter - 1;
        Some(self.navigate(self.book, chapter))
    }

    pub fn next_book(&mut self) -> Option<ChapterRequest> {
        let book = self.book.step(1);
        (book != self.book).then(|| self.navigate(book, 1))
    }

    pub fn previous_book(&mut self) -> Option<ChapterRequest> {
        let book = self.book.step(-1);
        (book != self.book).then(|| self.navigate(book, 1))
    }

    fn navigate(&mut self, book: OsisCode, chapter: u32) -> ChapterRequest {
        if book != self.book {
            self.chapter_count = None;
        }
        self.book = book;
        self.chapter = chapter;
        self.verses = ChapterState::Idle;
        self.cursor = 0;
        self.overlay = Overlay::Closed;
        self.focus()
    }
}
