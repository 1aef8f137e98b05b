//! Async entry points used by the interactive reader. Each read runs on the
//! blocking pool through [`Store::read`], so awaiting them never blocks the
//! event loop.

use crate::db::{
    fetch_chapter, fetch_chapter_count, fetch_greek_tokens, fetch_insights, fetch_verse_base,
    Store, StoreError,
};
use crate::models::{OsisCode, VerseDetails, VerseKey, VerseRow};

/// Load a chapter's verses in ascending verse order.
pub async fn load_chapter(
    store: &Store,
    osis: OsisCode,
    chapter: u32,
) -> Result<Vec<VerseRow>, StoreError> {
    let verses = store
        .read(move |conn| fetch_chapter(conn, osis, chapter))
        .await?;
    tracing::debug!(%osis, chapter, count = verses.len(), "loaded chapter");
    Ok(verses)
}

pub async fn load_chapter_count(store: &Store, osis: OsisCode) -> Result<u32, StoreError> {
    store.read(move |conn| fetch_chapter_count(conn, osis)).await
}

/// Load everything the detail overlay shows. The identity row is resolved
/// first; tokens and insights only depend on its id and are fetched
/// concurrently. Returns `Ok(None)` when the verse does not exist.
pub async fn load_verse_details(
    store: &Store,
    key: VerseKey,
) -> Result<Option<VerseDetails>, StoreError> {
    let Some(verse) = store.read(move |conn| fetch_verse_base(conn, key)).await? else {
        tracing::debug!(verse = %key.title(), "verse not found");
        return Ok(None);
    };

    let verse_id = verse.verse_id;
    let (greek, insights) = tokio::try_join!(
        store.read(move |conn| fetch_greek_tokens(conn, verse_id)),
        store.read(move |conn| fetch_insights(conn, verse_id)),
    )?;

    tracing::debug!(
        verse = %key.title(),
        tokens = greek.len(),
        insights = insights.len(),
        "loaded verse details"
    );

    Ok(Some(VerseDetails {
        verse,
        greek,
        insights,
    }))
}
