use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{
    GreekToken, LexiconEntry, VerseBase, VerseDetails, VerseInsight, VerseKey,
};

/// Resolve the identity row of a verse. `None` is the normal "not found"
/// outcome, not an error.
pub fn fetch_verse_base(
    conn: &Connection,
    key: VerseKey,
) -> rusqlite::Result<Option<VerseBase>> {
    conn.query_row(
        "SELECT v.id, b.osis, b.name, v.chapter, v.verse, v.text
         FROM verses v
         JOIN books b ON b.id = v.book_id
         WHERE b.osis = ?1 AND v.chapter = ?2 AND v.verse = ?3",
        params![key.osis, key.chapter, key.verse],
        |row| {
            Ok(VerseBase {
                verse_id: row.get(0)?,
                osis: row.get(1)?,
                book_name: row.get(2)?,
                chapter: row.get(3)?,
                verse: row.get(4)?,
                text: row.get(5)?,
            })
        },
    )
    .optional()
}

/// Greek tokens of a verse in position order, left-joined with the lexicon so
/// tokens without a matching Strong's entry are still listed.
pub fn fetch_greek_tokens(
    conn: &Connection,
    verse_id: i64,
) -> rusqlite::Result<Vec<GreekToken>> {
    let mut stmt = conn.prepare_cached(
        "SELECT gt.position, gt.surface, gt.lemma, gt.lemma_grc, gt.morph, gt.strongs, gt.pos,
                lx.strongs, lx.transliteration, lx.part_of_speech, lx.short_gloss, lx.definition
         FROM greek_tokens gt
         LEFT JOIN lexicon lx ON lx.strongs = gt.strongs
         WHERE gt.verse_id = ?1
         ORDER BY gt.position ASC",
    )?;

    let tokens = stmt
        .query_map(params![verse_id], |row| {
            // lx.strongs is only non-null when the join found a lexicon row.
            let matched: Option<String> = row.get(7)?;
            let lexicon = match matched {
                Some(_) => Some(LexiconEntry {
                    transliteration: row.get(8)?,
                    part_of_speech: row.get(9)?,
                    short_gloss: row.get(10)?,
                    definition: row.get(11)?,
                }),
                None => None,
            };

            Ok(GreekToken {
                position: row.get(0)?,
                surface: row.get(1)?,
                lemma: row.get(2)?,
                lemma_grc: row.get(3)?,
                morph: row.get(4)?,
                strongs: row.get(5)?,
                pos: row.get(6)?,
                lexicon,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(tokens)
}

/// Insights attached to a verse, ordered by kind.
pub fn fetch_insights(
    conn: &Connection,
    verse_id: i64,
) -> rusqlite::Result<Vec<VerseInsight>> {
    let mut stmt = conn.prepare_cached(
        "SELECT kind, summary, details
         FROM verse_insights
         WHERE verse_id = ?1
         ORDER BY kind ASC",
    )?;

    let insights = stmt
        .query_map(params![verse_id], |row| {
            Ok(VerseInsight {
                kind: row.get(0)?,
                summary: row.get(1)?,
                details: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(insights)
}

/// Run all three detail reads one after another on a single connection.
pub fn fetch_verse_details(
    conn: &Connection,
    key: VerseKey,
) -> rusqlite::Result<Option<VerseDetails>> {
    let Some(verse) = fetch_verse_base(conn, key)? else {
        return Ok(None);
    };

    let greek = fetch_greek_tokens(conn, verse.verse_id)?;
    let insights = fetch_insights(conn, verse.verse_id)?;

    Ok(Some(VerseDetails {
        verse,
        greek,
        insights,
    }))
}
