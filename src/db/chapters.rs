use rusqlite::{params, Connection};

use crate::models::{OsisCode, VerseRow};

/// Retrieve every verse of a chapter in ascending verse order. The explicit
/// `ORDER BY` is what guarantees reading order; storage order is not relied on.
/// An unknown chapter or a book with no rows yields an empty list.
pub fn fetch_chapter(
    conn: &Connection,
    osis: OsisCode,
    chapter: u32,
) -> rusqlite::Result<Vec<VerseRow>> {
    let mut stmt = conn.prepare_cached(
        "SELECT b.osis, v.chapter, v.verse, v.text
         FROM verses v
         JOIN books b ON b.id = v.book_id
         WHERE b.osis = ?1 AND v.chapter = ?2
         ORDER BY v.verse ASC",
    )?;

    let verses = stmt
        .query_map(params![osis, chapter], |row| {
            Ok(VerseRow {
                osis: row.get(0)?,
                chapter: row.get(1)?,
                verse: row.get(2)?,
                text: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(verses)
}

/// Highest chapter number stored for a book, or 0 when the book has no verses.
/// Chapter navigation uses it as the upper bound.
pub fn fetch_chapter_count(conn: &Connection, osis: OsisCode) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(v.chapter), 0)
         FROM verses v
         JOIN books b ON b.id = v.book_id
         WHERE b.osis = ?1",
        params![osis],
        |row| row.get(0),
    )
}
