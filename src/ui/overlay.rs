//! Rendering of the verse detail overlay. [`overlay_content`] turns the view
//! state into plain strings so the presentation rules can be checked without a
//! terminal; [`draw_overlay`] lays them out.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::models::{VerseDetails, GREEK_LOADING, VERSE_NOT_FOUND};

use super::helpers::centered_rect;
use super::view::{DetailState, Overlay, OverlayPane};

/// Text shown in the overlay, derived from the selected verse and whatever
/// detail has arrived for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayContent {
    pub title: String,
    pub greek: String,
    pub text: String,
    pub pane: OverlayPane,
    pub body: Vec<String>,
}

pub fn overlay_content(overlay: &Overlay) -> Option<OverlayContent> {
    let Overlay::Open {
        selected,
        detail,
        pane,
    } = overlay
    else {
        return None;
    };

    let greek = match detail {
        DetailState::Loading => GREEK_LOADING.to_string(),
        DetailState::Missing => VERSE_NOT_FOUND.to_string(),
        DetailState::Ready(details) => details.greek_line(),
    };

    let body = match (pane, detail) {
        (OverlayPane::Text, _) => Vec::new(),
        (_, DetailState::Loading) => vec!["Loading…".to_string()],
        (_, DetailState::Missing) => vec![VERSE_NOT_FOUND.to_string()],
        (OverlayPane::WordStudy, DetailState::Ready(details)) => word_study_lines(details),
        (OverlayPane::Insights, DetailState::Ready(details)) => insight_lines(details),
    };

    Some(OverlayContent {
        title: selected.key().title(),
        greek,
        text: selected.text.clone(),
        pane: *pane,
        body,
    })
}

/// One row per token: position, surface form, transliteration, gloss and the
/// lexical keys, followed by the lexicon definition when there is one.
pub fn word_study_lines(details: &VerseDetails) -> Vec<String> {
    if details.greek.is_empty() {
        return vec!["No Greek tokens for this verse.".to_string()];
    }

    let mut lines = Vec::new();
    for token in &details.greek {
        let translit = token.transliteration().unwrap_or("-");
        let gloss = token.gloss().unwrap_or("(no lexicon entry)");
        let strongs = token.strongs.as_deref().unwrap_or("-");
        let pos = token.part_of_speech().unwrap_or("-");
        lines.push(format!(
            "{:>3}. {}  {}  {}  [{}; {} {}]",
            token.position, token.surface, translit, gloss, pos, strongs, token.morph
        ));
        if let Some(definition) = token.definition().filter(|d| !d.trim().is_empty()) {
            lines.push(format!("       {definition}"));
        }
    }
    lines
}

pub fn insight_lines(details: &VerseDetails) -> Vec<String> {
    if details.insights.is_empty() {
        return vec!["No insights for this verse.".to_string()];
    }

    let mut lines = Vec::new();
    for insight in &details.insights {
        lines.push(format!("{}: {}", insight.kind, insight.summary));
        if let Some(extra) = insight.details.as_deref().filter(|d| !d.trim().is_empty()) {
            lines.push(format!("    {extra}"));
        }
    }
    lines
}

pub(crate) fn draw_overlay(frame: &mut Frame, area: Rect, overlay: &Overlay) {
    let Some(content) = overlay_content(overlay) else {
        return;
    };

    let popup = centered_rect(80, 70, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", content.title),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center)
        .title_bottom(Line::from(format!(
            " {} · Tab: next pane · Esc: close ",
            content.pane.label()
        )))
        .borders(Borders::ALL);
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    let greek = Paragraph::new(Line::from(Span::styled(
        content.greek.clone(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(greek, chunks[0]);

    let body: Vec<Line> = match content.pane {
        OverlayPane::Text => vec![Line::from(content.text)],
        _ => content.body.into_iter().map(Line::from).collect(),
    };
    let body = Paragraph::new(body).wrap(Wrap { trim: false });
    frame.render_widget(body, chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GreekToken, LexiconEntry, OsisCode, VerseBase, VerseInsight, VerseRow};

    fn selected() -> VerseRow {
        VerseRow {
            osis: OsisCode::Jhn,
            chapter: 1,
            verse: 1,
            text: "In the beginning was the Word".to_string(),
        }
    }

    fn details() -> VerseDetails {
        VerseDetails {
            verse: VerseBase {
                verse_id: 7,
                osis: OsisCode::Jhn,
                book_name: "John".to_string(),
                chapter: 1,
                verse: 1,
                text: "In the beginning was the Word".to_string(),
            },
            greek: vec![
                GreekToken {
                    position: 1,
                    surface: "Ἐν".to_string(),
                    lemma: "en".to_string(),
                    lemma_grc: "ἐν".to_string(),
                    morph: "PREP".to_string(),
                    strongs: Some("G1722".to_string()),
                    pos: Some("P".to_string()),
                    lexicon: Some(LexiconEntry {
                        transliteration: Some("en".to_string()),
                        part_of_speech: Some("Preposition".to_string()),
                        short_gloss: Some("in".to_string()),
                        definition: None,
                    }),
                },
                GreekToken {
                    position: 2,
                    surface: "ἀρχῇ".to_string(),
                    lemma: "arche".to_string(),
                    lemma_grc: "ἀρχή".to_string(),
                    morph: "N-DSF".to_string(),
                    strongs: Some("G9999".to_string()),
                    pos: None,
                    lexicon: None,
                },
            ],
            insights: vec![VerseInsight {
                kind: "theme".to_string(),
                summary: "Creation echo".to_string(),
                details: Some("Recalls Genesis 1:1.".to_string()),
            }],
        }
    }

    fn open(detail: DetailState, pane: OverlayPane) -> Overlay {
        Overlay::Open {
            selected: selected(),
            detail,
            pane,
        }
    }

    #[test]
    fn closed_overlay_has_no_content() {
        assert_eq!(overlay_content(&Overlay::Closed), None);
    }

    #[test]
    fn loading_shows_placeholder_with_title_and_text() {
        let content = overlay_content(&open(DetailState::Loading, OverlayPane::Text)).unwrap();
        assert_eq!(content.title, "John 1:1");
        assert_eq!(content.greek, GREEK_LOADING);
        assert_eq!(content.text, "In the beginning was the Word");
    }

    #[test]
    fn ready_shows_lemma_line() {
        let content =
            overlay_content(&open(DetailState::Ready(details()), OverlayPane::Text)).unwrap();
        assert_eq!(content.greek, "ἐν ἀρχή");
        assert!(content.body.is_empty());
    }

    #[test]
    fn missing_verse_says_so() {
        let content =
            overlay_content(&open(DetailState::Missing, OverlayPane::Insights)).unwrap();
        assert_eq!(content.greek, VERSE_NOT_FOUND);
        assert_eq!(content.body, vec![VERSE_NOT_FOUND.to_string()]);
    }

    #[test]
    fn word_study_marks_tokens_without_lexicon() {
        let lines = word_study_lines(&details());
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("in"));
        assert!(lines[1].contains("(no lexicon entry)"));
        assert!(lines[1].contains("G9999"));
    }

    #[test]
    fn word_study_shows_part_of_speech_and_definition() {
        let mut details = details();
        if let Some(entry) = details.greek[0].lexicon.as_mut() {
            entry.definition = Some("in, on, among".to_string());
        }

        let lines = word_study_lines(&details);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("[Preposition; G1722 PREP]"));
        assert_eq!(lines[1].trim(), "in, on, among");
        // Without a lexicon row the token's own tag is shown.
        assert!(lines[2].contains("[-; G9999 N-DSF]"));

        details.greek[1].pos = Some("N".to_string());
        assert!(word_study_lines(&details)[2].contains("[N; G9999 N-DSF]"));
    }

    #[test]
    fn insights_include_details_line() {
        let lines = insight_lines(&details());
        assert_eq!(
            lines,
            vec![
                "theme: Creation echo".to_string(),
                "    Recalls Genesis 1:1.".to_string()
            ]
        );
    }
}
