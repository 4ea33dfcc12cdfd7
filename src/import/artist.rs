//! Artist step: primary rows, then relation windows.

use std::sync::Arc;

use futures::StreamExt;
use tracing::info;

use super::records::artist::{RawArtist, RawArtistRelation};
use super::window::for_each_window;
use super::Order;
use crate::db::Database;
use crate::dedup::unique;
use crate::outcome::Outcome;
use crate::refcache::RefCache;
use crate::xml::parse_stream;

pub(super) async fn run(db: &Database, cache: &Arc<RefCache>, order: &Order) -> Outcome {
    let mut outcome = insert_artists(db, cache, order).await;
    if outcome.is_err() {
        return outcome;
    }
    outcome.absorb(insert_artist_relations(db, cache, order).await);
    outcome
}

/// First pass: every artist id seen here is registered in the reference
/// cache so the relation pass can validate targets.
async fn insert_artists(db: &Database, cache: &Arc<RefCache>, order: &Order) -> Outcome {
    let reader = match order.open("artists") {
        Ok(reader) => reader,
        Err(err) => return Outcome::fail(err.to_string()),
    };
    let registry = cache.clone();
    let records = parse_stream::<RawArtist, _>(reader, "artist", order.cancel()).map(move |item| {
        item.map(|raw| {
            registry.artists.store(raw.id);
            raw.into_artist()
        })
    });

    let db = db.clone();
    let chunk_size = order.chunk_size;
    let outcome = for_each_window(records, order.window_size, move |artists| {
        let db = db.clone();
        async move { Outcome::from_result(db.upsert_chunked(&artists, chunk_size).await) }
    })
    .await;
    info!(rows = outcome.rows, "updated artists");
    outcome
}

async fn insert_artist_relations(db: &Database, cache: &Arc<RefCache>, order: &Order) -> Outcome {
    let reader = match order.open("artist relations") {
        Ok(reader) => reader,
        Err(err) => return Outcome::fail(err.to_string()),
    };
    let records = parse_stream::<RawArtistRelation, _>(reader, "artist", order.cancel());

    let db = db.clone();
    let cache = cache.clone();
    let chunk_size = order.chunk_size;
    let outcome = for_each_window(records, order.window_size, move |window| {
        let db = db.clone();
        let cache = cache.clone();
        async move { write_relations(&db, &cache, &window, chunk_size).await }
    })
    .await;
    info!(rows = outcome.rows, "updated artist relations");
    outcome
}

async fn write_relations(
    db: &Database,
    cache: &RefCache,
    window: &[RawArtistRelation],
    chunk_size: usize,
) -> Outcome {
    let mut urls = Vec::new();
    let mut name_variations = Vec::new();
    let mut aliases = Vec::new();
    let mut groups = Vec::new();
    for record in window {
        urls.extend(record.urls());
        name_variations.extend(record.name_variations());
        aliases.extend(record.aliases(cache));
        groups.extend(record.groups(cache));
    }
    let urls = unique(urls);
    let name_variations = unique(name_variations);
    let aliases = unique(aliases);
    let groups = unique(groups);

    let mut rows = 0u64;
    let written: Result<(), sqlx::Error> = async {
        rows += db.upsert_chunked(&aliases, chunk_size).await?;
        rows += db.upsert_chunked(&groups, chunk_size).await?;
        rows += db.upsert_chunked(&name_variations, chunk_size).await?;
        rows += db.upsert_chunked(&urls, chunk_size).await?;
        Ok(())
    }
    .await;
    Outcome {
        rows,
        error: written.err().map(|err| err.to_string()),
    }
}
