//! Domain models that mirror the rows read from the bundled SQLite store and get
//! passed between the loaders and the TUI. They stay plain data holders; the
//! only behavior they carry is formatting shared by the overlay and the print
//! subcommands.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use thiserror::Error;

/// Placeholder shown in place of the Greek line while a detail fetch is in
/// flight.
pub const GREEK_LOADING: &str = "Loading Greek…";
/// Shown in place of the Greek line when the selected verse has no row.
pub const VERSE_NOT_FOUND: &str = "Verse not found.";

/// OSIS codes of the books the reader supports, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OsisCode {
    Mat,
    Mrk,
    Jhn,
    Rom,
    OneCo,
    TwoCo,
    Gal,
    Eph,
    Php,
    Col,
    OneTh,
    TwoTh,
    OneTm,
    TwoTm,
    Tit,
    Phm,
    Heb,
    Jas,
    OnePe,
    TwoPe,
    OneJn,
    TwoJn,
    ThreeJn,
    Jud,
    Rev,
}

const ALL_BOOKS: [OsisCode; 25] = [
    OsisCode::Mat,
    OsisCode::Mrk,
    OsisCode::Jhn,
    OsisCode::Rom,
    OsisCode::OneCo,
    OsisCode::TwoCo,
    OsisCode::Gal,
    OsisCode::Eph,
    OsisCode::Php,
    OsisCode::Col,
    OsisCode::OneTh,
    OsisCode::TwoTh,
    OsisCode::OneTm,
    OsisCode::TwoTm,
    OsisCode::Tit,
    OsisCode::Phm,
    OsisCode::Heb,
    OsisCode::Jas,
    OsisCode::OnePe,
    OsisCode::TwoPe,
    OsisCode::OneJn,
    OsisCode::TwoJn,
    OsisCode::ThreeJn,
    OsisCode::Jud,
    OsisCode::Rev,
];

impl OsisCode {
    /// Every supported book in canonical order.
    pub fn all() -> &'static [OsisCode] {
        &ALL_BOOKS
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OsisCode::Mat => "MAT",
            OsisCode::Mrk => "MRK",
            OsisCode::Jhn => "JHN",
            OsisCode::Rom => "ROM",
            OsisCode::OneCo => "1CO",
            OsisCode::TwoCo => "2CO",
            OsisCode::Gal => "GAL",
            OsisCode::Eph => "EPH",
            OsisCode::Php => "PHP",
            OsisCode::Col => "COL",
            OsisCode::OneTh => "1TH",
            OsisCode::TwoTh => "2TH",
            OsisCode::OneTm => "1TM",
            OsisCode::TwoTm => "2TM",
            OsisCode::Tit => "TIT",
            OsisCode::Phm => "PHM",
            OsisCode::Heb => "HEB",
            OsisCode::Jas => "JAS",
            OsisCode::OnePe => "1PE",
            OsisCode::TwoPe => "2PE",
            OsisCode::OneJn => "1JN",
            OsisCode::TwoJn => "2JN",
            OsisCode::ThreeJn => "3JN",
            OsisCode::Jud => "JUD",
            OsisCode::Rev => "REV",
        }
    }

    /// English display name used in overlay titles. The match is exhaustive,
    /// so every code the store can hand back has a name.
    pub fn display_name(&self) -> &'static str {
        match self {
            OsisCode::Mat => "Matthew",
            OsisCode::Mrk => "Mark",
            OsisCode::Jhn => "John",
            OsisCode::Rom => "Romans",
            OsisCode::OneCo => "1 Corinthians",
            OsisCode::TwoCo => "2 Corinthians",
            OsisCode::Gal => "Galatians",
            OsisCode::Eph => "Ephesians",
            OsisCode::Php => "Philippians",
            OsisCode::Col => "Colossians",
            OsisCode::OneTh => "1 Thessalonians",
            OsisCode::TwoTh => "2 Thessalonians",
            OsisCode::OneTm => "1 Timothy",
            OsisCode::TwoTm => "2 Timothy",
            OsisCode::Tit => "Titus",
            OsisCode::Phm => "Philemon",
            OsisCode::Heb => "Hebrews",
            OsisCode::Jas => "James",
            OsisCode::OnePe => "1 Peter",
            OsisCode::TwoPe => "2 Peter",
            OsisCode::OneJn => "1 John",
            OsisCode::TwoJn => "2 John",
            OsisCode::ThreeJn => "3 John",
            OsisCode::Jud => "Jude",
            OsisCode::Rev => "Revelation",
        }
    }

    /// Book `offset` steps away in canonical order, clamped to the ends.
    pub fn step(&self, offset: isize) -> OsisCode {
        let idx = ALL_BOOKS.iter().position(|b| b == self).unwrap_or(0) as isize;
        let last = ALL_BOOKS.len() as isize - 1;
        ALL_BOOKS[(idx + offset).clamp(0, last) as usize]
    }
}

impl fmt::Display for OsisCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when text does not name one of the supported books.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("'{0}' is not a supported OSIS book code")]
pub struct UnknownOsisCode(pub String);

impl FromStr for OsisCode {
    type Err = UnknownOsisCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        ALL_BOOKS
            .iter()
            .copied()
            .find(|book| book.as_str() == wanted)
            .ok_or_else(|| UnknownOsisCode(s.to_string()))
    }
}

impl FromSql for OsisCode {
    /// Codes outside the supported set are a defect in the bundled store and
    /// fail the row instead of rendering an unnamed book.
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse().map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

impl ToSql for OsisCode {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

/// Identity of a single verse. Used both as the query key for the detail
/// loader and as the tag that decides whether a finished fetch is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerseKey {
    pub osis: OsisCode,
    pub chapter: u32,
    pub verse: u32,
}

impl VerseKey {
    pub fn new(osis: OsisCode, chapter: u32, verse: u32) -> Self {
        Self {
            osis,
            chapter,
            verse,
        }
    }

    /// `John 1:1` style heading.
    pub fn title(&self) -> String {
        format!(
            "{} {}:{}",
            self.osis.display_name(),
            self.chapter,
            self.verse
        )
    }
}

/// One verse of a chapter listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseRow {
    pub osis: OsisCode,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

impl VerseRow {
    pub fn key(&self) -> VerseKey {
        VerseKey::new(self.osis, self.chapter, self.verse)
    }
}

/// Identity row of a verse including its internal id, which the token and
/// insight queries key on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseBase {
    pub verse_id: i64,
    pub osis: OsisCode,
    /// Book name as stored in the `books` table.
    pub book_name: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

impl VerseBase {
    pub fn key(&self) -> VerseKey {
        VerseKey::new(self.osis, self.chapter, self.verse)
    }
}

/// Lexicon columns joined onto a token by Strong's number.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LexiconEntry {
    pub transliteration: Option<String>,
    pub part_of_speech: Option<String>,
    pub short_gloss: Option<String>,
    pub definition: Option<String>,
}

/// A Greek word of a verse. `position` orders tokens within the verse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreekToken {
    pub position: u32,
    pub surface: String,
    pub lemma: String,
    /// Lemma in original script; this is what the overlay's Greek line shows.
    pub lemma_grc: String,
    pub morph: String,
    pub strongs: Option<String>,
    pub pos: Option<String>,
    /// `None` when no lexicon row shares the token's Strong's number.
    pub lexicon: Option<LexiconEntry>,
}

impl GreekToken {
    pub fn transliteration(&self) -> Option<&str> {
        self.lexicon.as_ref()?.transliteration.as_deref()
    }

    pub fn gloss(&self) -> Option<&str> {
        self.lexicon.as_ref()?.short_gloss.as_deref()
    }

    /// Lexicon part of speech, or the token's own tag when the lexicon has
    /// none.
    pub fn part_of_speech(&self) -> Option<&str> {
        self.lexicon
            .as_ref()
            .and_then(|entry| entry.part_of_speech.as_deref())
            .or(self.pos.as_deref())
    }

    pub fn definition(&self) -> Option<&str> {
        self.lexicon.as_ref()?.definition.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseInsight {
    pub kind: String,
    pub summary: String,
    pub details: Option<String>,
}

/// Everything the overlay needs about one verse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseDetails {
    pub verse: VerseBase,
    pub greek: Vec<GreekToken>,
    pub insights: Vec<VerseInsight>,
}

impl VerseDetails {
    pub fn key(&self) -> VerseKey {
        self.verse.key()
    }

    /// Original-script lemmas in token order, separated by single spaces.
    pub fn greek_line(&self) -> String {
        self.greek
            .iter()
            .map(|token| token.lemma_grc.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
