#![allow(dead_code)]

use std::path::PathBuf;

use koine_reader::Store;
use rusqlite::{params, Connection};
use tempfile::TempDir;

const SCHEMA: &str = "
    CREATE TABLE books (
        id INTEGER PRIMARY KEY,
        osis TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL
    );
    CREATE TABLE verses (
        id INTEGER PRIMARY KEY,
        book_id INTEGER NOT NULL REFERENCES books(id),
        chapter INTEGER NOT NULL,
        verse INTEGER NOT NULL,
        text TEXT NOT NULL,
        UNIQUE (book_id, chapter, verse)
    );
    CREATE TABLE greek_tokens (
        id INTEGER PRIMARY KEY,
        verse_id INTEGER NOT NULL REFERENCES verses(id),
        position INTEGER NOT NULL,
        surface TEXT NOT NULL,
        lemma TEXT NOT NULL,
        lemma_grc TEXT NOT NULL,
        morph TEXT NOT NULL,
        strongs TEXT,
        pos TEXT,
        UNIQUE (verse_id, position)
    );
    CREATE TABLE lexicon (
        strongs TEXT PRIMARY KEY,
        transliteration TEXT,
        part_of_speech TEXT,
        short_gloss TEXT,
        definition TEXT
    );
    CREATE TABLE verse_insights (
        id INTEGER PRIMARY KEY,
        verse_id INTEGER NOT NULL REFERENCES verses(id),
        kind TEXT NOT NULL,
        summary TEXT NOT NULL,
        details TEXT
    );
";

/// Seeded verse database written to a temporary directory.
///
/// Contents:
/// - books JHN, MRK (no verses) and ROM
/// - JHN 1:1-3 inserted out of verse order, JHN 2:1, ROM 1:1
/// - JHN 1:1 has five tokens, one with an unmatched Strong's number and one
///   with none, plus two insights inserted out of kind order
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("bible.db");
        let conn = Connection::open(&path).expect("create fixture database");
        conn.execute_batch(SCHEMA).expect("create fixture schema");
        seed(&conn);
        drop(conn);

        Self { _dir: dir, path }
    }

    pub fn store(&self) -> Store {
        Store::open_read_only(&self.path).expect("open fixture read-only")
    }
}

fn seed(conn: &Connection) {
    for (id, osis, name) in [(1, "JHN", "John"), (2, "MRK", "Mark"), (3, "ROM", "Romans")] {
        conn.execute(
            "INSERT INTO books (id, osis, name) VALUES (?1, ?2, ?3)",
            params![id, osis, name],
        )
        .expect("insert book");
    }

    let verses = [
        (10, 1, 1, 3, "All things were made through him."),
        (11, 1, 1, 1, "In the beginning was the Word, and the Word was with God."),
        (12, 1, 1, 2, "He was in the beginning with God."),
        (20, 1, 2, 1, "On the third day there was a wedding at Cana."),
        (30, 3, 1, 1, "Paul, a servant of Christ Jesus."),
    ];
    for (id, book_id, chapter, verse, text) in verses {
        conn.execute(
            "INSERT INTO verses (id, book_id, chapter, verse, text) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, book_id, chapter, verse, text],
        )
        .expect("insert verse");
    }

    // Inserted out of position order so only ORDER BY can restore it.
    let tokens: [(i64, &str, &str, &str, &str, Option<&str>, Option<&str>); 5] = [
        (3, "ἦν", "eimi", "εἰμί", "V-IAI-3S", Some("G1510"), Some("V")),
        (1, "Ἐν", "en", "ἐν", "PREP", Some("G1722"), Some("P")),
        (5, "λόγος", "logos", "λόγος", "N-NSM", Some("G3056"), Some("N")),
        (2, "ἀρχῇ", "arche", "ἀρχή", "N-DSF", Some("G9999"), Some("N")),
        (4, "ὁ", "ho", "ὁ", "T-NSM", None, None),
    ];
    for (position, surface, lemma, lemma_grc, morph, strongs, pos) in tokens {
        conn.execute(
            "INSERT INTO greek_tokens (verse_id, position, surface, lemma, lemma_grc, morph, strongs, pos)
             VALUES (11, ?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![position, surface, lemma, lemma_grc, morph, strongs, pos],
        )
        .expect("insert token");
    }

    let lexicon = [
        ("G1722", "en", "Preposition", "in", "in, on, among"),
        ("G1510", "eimi", "Verb", "to be", "to be, exist"),
        ("G3056", "logos", "Noun", "word", "a word, speech, reason"),
    ];
    for (strongs, translit, pos, gloss, definition) in lexicon {
        conn.execute(
            "INSERT INTO lexicon (strongs, transliteration, part_of_speech, short_gloss, definition)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![strongs, translit, pos, gloss, definition],
        )
        .expect("insert lexicon entry");
    }

    conn.execute(
        "INSERT INTO verse_insights (verse_id, kind, summary, details) VALUES (11, 'theme', 'Creation echo', NULL)",
        [],
    )
    .expect("insert insight");
    conn.execute(
        "INSERT INTO verse_insights (verse_id, kind, summary, details)
         VALUES (11, 'grammar', 'Imperfect of eimi', 'Continuous existence in the past.')",
        [],
    )
    .expect("insert insight");
}
