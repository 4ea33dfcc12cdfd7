//! Master step: whole-file style/genre scan, then primary rows, then
//! relation windows.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::StreamExt;
use tracing::{error, info};

use super::records::master::{RawGenreStyle, RawMaster, RawMasterRelation};
use super::seed_style_genre_cache;
use super::window::for_each_window;
use super::Order;
use crate::db::models::{Genre, Style};
use crate::db::Database;
use crate::dedup::unique;
use crate::outcome::Outcome;
use crate::refcache::RefCache;
use crate::xml::parse_stream;

pub(super) async fn run(db: &Database, cache: &Arc<RefCache>, order: &Order) -> Outcome {
    let mut outcome = scan_styles_genres(db, cache, order).await;
    if outcome.is_err() {
        return outcome;
    }
    outcome.absorb(insert_masters(db, cache, order).await);
    if outcome.is_err() {
        return outcome;
    }
    outcome.absorb(insert_master_relations(db, cache, order).await);
    outcome
}

/// Collect every style and genre name in the dump before any master is
/// processed, upsert them, and seed the name caches with the resulting
/// surrogate ids. A failed insertion is logged, not fatal: the affected
/// names stay unresolved and their relation rows are silently dropped.
async fn scan_styles_genres(db: &Database, cache: &Arc<RefCache>, order: &Order) -> Outcome {
    let reader = match order.open("styles and genres") {
        Ok(reader) => reader,
        Err(err) => return Outcome::fail(err.to_string()),
    };
    let mut records = parse_stream::<RawGenreStyle, _>(reader, "master", order.cancel());

    let mut style_names = BTreeSet::new();
    let mut genre_names = BTreeSet::new();
    while let Some(item) = records.next().await {
        match item {
            Ok(record) => {
                style_names.extend(record.style_names().map(str::to_string));
                genre_names.extend(record.genre_names().map(str::to_string));
            }
            Err(err) => return Outcome::fail(err.to_string()),
        }
    }
    info!(
        styles = style_names.len(),
        genres = genre_names.len(),
        "scanned style and genre names"
    );

    let styles: Vec<Style> = style_names.into_iter().map(|name| Style { name }).collect();
    let genres: Vec<Genre> = genre_names.into_iter().map(|name| Genre { name }).collect();

    let mut rows = 0u64;
    match db.upsert_chunked(&styles, order.chunk_size).await {
        Ok(count) => rows += count,
        Err(err) => error!(%err, "style insertion failed"),
    }
    match db.upsert_chunked(&genres, order.chunk_size).await {
        Ok(count) => rows += count,
        Err(err) => error!(%err, "genre insertion failed"),
    }
    if let Err(err) = seed_style_genre_cache(db, cache).await {
        error!(%err, "style and genre cache seeding failed");
    }
    Outcome::ok(rows)
}

async fn insert_masters(db: &Database, cache: &Arc<RefCache>, order: &Order) -> Outcome {
    let reader = match order.open("masters") {
        Ok(reader) => reader,
        Err(err) => return Outcome::fail(err.to_string()),
    };
    let registry = cache.clone();
    let records = parse_stream::<RawMaster, _>(reader, "master", order.cancel()).map(move |item| {
        item.map(|raw| {
            registry.masters.store(raw.id);
            raw.into_master()
        })
    });

    let db = db.clone();
    let chunk_size = order.chunk_size;
    let outcome = for_each_window(records, order.window_size, move |masters| {
        let db = db.clone();
        async move { Outcome::from_result(db.upsert_chunked(&masters, chunk_size).await) }
    })
    .await;
    info!(rows = outcome.rows, "updated masters");
    outcome
}

async fn insert_master_relations(db: &Database, cache: &Arc<RefCache>, order: &Order) -> Outcome {
    let reader = match order.open("master relations") {
        Ok(reader) => reader,
        Err(err) => return Outcome::fail(err.to_string()),
    };
    let records = parse_stream::<RawMasterRelation, _>(reader, "master", order.cancel());

    let db = db.clone();
    let cache = cache.clone();
    let chunk_size = order.chunk_size;
    let outcome = for_each_window(records, order.window_size, move |window| {
        let db = db.clone();
        let cache = cache.clone();
        async move { write_relations(&db, &cache, &window, chunk_size).await }
    })
    .await;
    info!(rows = outcome.rows, "updated master relations");
    outcome
}

async fn write_relations(
    db: &Database,
    cache: &RefCache,
    window: &[RawMasterRelation],
    chunk_size: usize,
) -> Outcome {
    let mut videos = Vec::new();
    let mut styles = Vec::new();
    let mut genres = Vec::new();
    let mut artists = Vec::new();
    for record in window {
        videos.extend(record.videos());
        styles.extend(record.styles(cache));
        genres.extend(record.genres(cache));
        artists.extend(record.artists(cache));
    }
    let videos = unique(videos);
    let styles = unique(styles);
    let genres = unique(genres);
    let artists = unique(artists);

    let mut rows = 0u64;
    let written: Result<(), sqlx::Error> = async {
        rows += db.upsert_chunked(&videos, chunk_size).await?;
        rows += db.upsert_chunked(&styles, chunk_size).await?;
        rows += db.upsert_chunked(&genres, chunk_size).await?;
        rows += db.upsert_chunked(&artists, chunk_size).await?;
        Ok(())
    }
    .await;
    Outcome {
        rows,
        error: written.err().map(|err| err.to_string()),
    }
}
