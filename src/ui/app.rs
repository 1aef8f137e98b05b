use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use tokio::sync::mpsc::UnboundedSender;

use crate::db::{Store, StoreError};
use crate::loader::{load_chapter, load_chapter_count, load_verse_details};
use crate::models::{OsisCode, VerseKey};

use super::helpers::{surface_error, wrap_text};
use super::overlay::draw_overlay;
use super::terminal::AppEvent;
use super::view::{ChapterRequest, ChapterState, ChapterView};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Verses skipped by PageUp/PageDown.
const PAGE_STEP: isize = 10;

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state for the reader. Loads run as tokio tasks and
/// report back through `events`; only this struct mutates the view.
pub struct App {
    store: Store,
    view: ChapterView,
    status: Option<StatusMessage>,
    events: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(store: Store, view: ChapterView, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            store,
            view,
            status: None,
            events,
        }
    }

    pub fn view(&self) -> &ChapterView {
        &self.view
    }

    /// Footer message, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    /// First focus of the chapter screen.
    pub fn start(&mut self) {
        let request = self.view.focus();
        self.spawn_chapter_load(request);
        self.spawn_chapter_count(request.osis);
    }

    /// Apply one event. Returns `true` when the reader should exit.
    pub fn handle_event(&mut self, event: AppEvent) -> Result<bool> {
        match event {
            AppEvent::Key(key) => return Ok(self.handle_key(key)),
            AppEvent::FocusGained => {
                let request = self.view.focus();
                self.spawn_chapter_load(request);
            }
            AppEvent::Resize => {}
            AppEvent::ChapterLoaded { request, result } => match result {
                Ok(verses) => {
                    if self.view.apply_chapter(request, verses) && self.view.verses().is_empty() {
                        self.set_status(
                            format!("No verses stored for {}.", self.view.heading()),
                            StatusKind::Info,
                        );
                    }
                }
                Err(err) if self.view.is_current(&request) => {
                    self.report_error("chapter load failed", &err)
                }
                Err(err) => {
                    tracing::debug!(
                        chapter = request.chapter,
                        book = %request.osis,
                        error = %err,
                        "discarding stale chapter error"
                    );
                }
            },
            AppEvent::ChapterCountLoaded { osis, result } => match result {
                Ok(count) => self.view.set_chapter_count(osis, count),
                Err(err) if osis == self.view.book() => {
                    self.report_error("chapter count failed", &err)
                }
                Err(err) => {
                    tracing::debug!(book = %osis, error = %err, "discarding stale chapter count error");
                }
            },
            AppEvent::DetailLoaded { key, result } => match result {
                Ok(details) => {
                    self.view.apply_detail(key, details);
                }
                Err(err) => {
                    // Errors for a verse the user already left are as stale as
                    // its results.
                    if self.view.overlay().selected_key() == Some(key) {
                        self.view.dismiss();
                        self.report_error("verse detail load failed", &err);
                    } else {
                        tracing::debug!(verse = %key.title(), error = %err, "discarding stale detail error");
                    }
                }
            },
        }
        Ok(false)
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        if self.view.overlay().is_open() {
            self.handle_overlay_key(key.code);
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up | KeyCode::Char('k') => self.view.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.view.move_cursor(1),
            KeyCode::PageUp => self.view.move_cursor(-PAGE_STEP),
            KeyCode::PageDown => self.view.move_cursor(PAGE_STEP),
            KeyCode::Home => self.view.cursor_first(),
            KeyCode::End => self.view.cursor_last(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(key) = self.view.select_cursor() {
                    self.clear_status();
                    self.spawn_detail_load(key);
                }
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => {
                match self.view.next_chapter() {
                    Some(request) => self.navigated(request),
                    None => self.set_status("Last chapter of this book.", StatusKind::Info),
                }
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => {
                match self.view.previous_chapter() {
                    Some(request) => self.navigated(request),
                    None => self.set_status("First chapter of this book.", StatusKind::Info),
                }
            }
            KeyCode::Char(']') => match self.view.next_book() {
                Some(request) => {
                    self.navigated(request);
                    self.spawn_chapter_count(request.osis);
                }
                None => self.set_status("Last book available.", StatusKind::Info),
            },
            KeyCode::Char('[') => match self.view.previous_book() {
                Some(request) => {
                    self.navigated(request);
                    self.spawn_chapter_count(request.osis);
                }
                None => self.set_status("First book available.", StatusKind::Info),
            },
            KeyCode::Char('r') => {
                let request = self.view.focus();
                self.spawn_chapter_load(request);
                self.set_status("Reloading chapter…", StatusKind::Info);
            }
            _ => {}
        }
        false
    }

    fn handle_overlay_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter | KeyCode::Backspace => {
                self.view.dismiss();
            }
            KeyCode::Tab => self.view.cycle_pane(),
            KeyCode::Up | KeyCode::Char('k') => self.reselect(-1),
            KeyCode::Down | KeyCode::Char('j') => self.reselect(1),
            _ => {}
        }
    }

    /// Step to a neighbouring verse while the overlay stays open. Any fetch
    /// still running for the old verse is left to finish and be discarded.
    fn reselect(&mut self, offset: isize) {
        let before = self.view.cursor();
        self.view.move_cursor(offset);
        if self.view.cursor() == before {
            return;
        }
        if let Some(key) = self.view.select_cursor() {
            self.spawn_detail_load(key);
        }
    }

    fn navigated(&mut self, request: ChapterRequest) {
        self.clear_status();
        self.spawn_chapter_load(request);
    }

    fn spawn_chapter_load(&self, request: ChapterRequest) {
        let store = self.store.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = load_chapter(&store, request.osis, request.chapter).await;
            let _ = events.send(AppEvent::ChapterLoaded { request, result });
        });
    }

    fn spawn_chapter_count(&self, osis: OsisCode) {
        let store = self.store.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = load_chapter_count(&store, osis).await;
            let _ = events.send(AppEvent::ChapterCountLoaded { osis, result });
        });
    }

    fn spawn_detail_load(&self, key: VerseKey) {
        let store = self.store.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = load_verse_details(&store, key).await;
            let _ = events.send(AppEvent::DetailLoaded { key, result });
        });
    }

    fn report_error(&mut self, what: &str, err: &StoreError) {
        tracing::error!(
            db = %self.store.path().display(),
            error = %surface_error(err),
            "{what}"
        );
        self.set_status(
            format!("Something went wrong: {}", surface_error(err)),
            StatusKind::Error,
        );
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_chapter(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        draw_overlay(frame, area, self.view.overlay());
    }

    fn draw_chapter(&self, frame: &mut Frame, area: Rect) {
        let title = match self.view.chapter_count() {
            Some(count) if count > 0 => format!(" {} of {} ", self.view.heading(), count),
            _ => format!(" {} ", self.view.heading()),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = match self.view.state() {
            ChapterState::Idle => vec![Line::from(Span::styled(
                "Loading chapter…",
                Style::default().fg(Color::DarkGray),
            ))],
            ChapterState::Loaded(_) => self.chapter_lines(inner.width as usize),
        };

        let cursor_line = self.cursor_line(inner.width as usize);
        let scroll = cursor_line.saturating_sub(inner.height as usize / 3);
        let scroll = u16::try_from(scroll).unwrap_or(u16::MAX);

        frame.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
    }

    /// Each verse becomes its number followed by its wrapped text; the verse
    /// under the cursor is highlighted.
    fn chapter_lines(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (idx, verse) in self.view.verses().iter().enumerate() {
            let selected = idx == self.view.cursor();
            let text_style = if selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            let number = format!("{} ", verse.verse);
            let wrapped = wrap_text(&verse.text, width.saturating_sub(number.len()));
            for (line_idx, chunk) in wrapped.into_iter().enumerate() {
                let prefix = if line_idx == 0 {
                    Span::styled(
                        number.clone(),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw(" ".repeat(number.len()))
                };
                lines.push(Line::from(vec![prefix, Span::styled(chunk, text_style)]));
            }
        }
        lines
    }

    /// Index of the first rendered line of the verse under the cursor.
    fn cursor_line(&self, width: usize) -> usize {
        self.view
            .verses()
            .iter()
            .take(self.view.cursor())
            .map(|verse| {
                let number_len = verse.verse.to_string().len() + 1;
                wrap_text(&verse.text, width.saturating_sub(number_len)).len()
            })
            .sum()
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let line = match &self.status {
            Some(status) => Line::from(Span::styled(status.text.clone(), status.kind.style())),
            None => self.footer_instructions(),
        };
        frame.render_widget(Paragraph::new(line), inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key = Style::default().add_modifier(Modifier::BOLD);
        let parts: &[(&str, &str)] = if self.view.overlay().is_open() {
            &[
                ("↑/↓", " verse  "),
                ("Tab", " pane  "),
                ("Esc", " close"),
            ]
        } else {
            &[
                ("↑/↓", " verse  "),
                ("Enter", " details  "),
                ("←/→", " chapter  "),
                ("[/]", " book  "),
                ("r", " reload  "),
                ("q", " quit"),
            ]
        };

        let spans = parts
            .iter()
            .flat_map(|(k, label)| {
                [
                    Span::styled(k.to_string(), key),
                    Span::raw(label.to_string()),
                ]
            })
            .collect::<Vec<_>>();
        Line::from(spans)
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}
