//! Release step: a single windowed pass producing the release rows and
//! every satellite relation at once.

use std::sync::Arc;

use tracing::{error, info};

use super::records::release::RawRelease;
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
    let reader = match order.open("releases") {
        Ok(reader) => reader,
        Err(err) => return Outcome::fail(err.to_string()),
    };
    let records = parse_stream::<RawRelease, _>(reader, "release", order.cancel());

    let db = db.clone();
    let cache = cache.clone();
    let chunk_size = order.chunk_size;
    let outcome = for_each_window(records, order.window_size, move |window| {
        let db = db.clone();
        let cache = cache.clone();
        async move { write_window(&db, &cache, &window, chunk_size).await }
    })
    .await;
    info!(rows = outcome.rows, "updated releases");
    outcome
}

async fn write_window(
    db: &Database,
    cache: &RefCache,
    window: &[RawRelease],
    chunk_size: usize,
) -> Outcome {
    // Releases introduce style and genre names the master dump never
    // mentioned; resolve them before extraction so the links can carry
    // surrogate ids. Not counted toward the step result.
    register_new_styles_genres(db, cache, window, chunk_size).await;

    let mut releases = Vec::new();
    let mut artists = Vec::new();
    let mut contracts = Vec::new();
    let mut styles = Vec::new();
    let mut genres = Vec::new();
    let mut labels = Vec::new();
    let mut formats = Vec::new();
    let mut identifiers = Vec::new();
    let mut tracks = Vec::new();
    let mut videos = Vec::new();
    let mut credited = Vec::new();
    let mut main_releases = Vec::new();
    for record in window {
        releases.push(record.release(cache));
        artists.extend(record.artists(cache));
        contracts.extend(record.contracts(cache));
        styles.extend(record.styles(cache));
        genres.extend(record.genres(cache));
        labels.extend(record.labels(cache));
        formats.extend(record.formats());
        identifiers.extend(record.identifiers());
        tracks.extend(record.tracks());
        videos.extend(record.videos());
        credited.extend(record.credited_artists(cache));
        main_releases.extend(record.main_release(cache));
    }
    let artists = unique(artists);
    let contracts = unique(contracts);
    let styles = unique(styles);
    let genres = unique(genres);
    let labels = unique(labels);
    let formats = unique(formats);
    let identifiers = unique(identifiers);
    let tracks = unique(tracks);
    let videos = unique(videos);
    let credited = unique(credited);
    let main_releases = unique(main_releases);

    let mut rows = 0u64;
    let written: Result<(), sqlx::Error> = async {
        rows += db.upsert_chunked(&releases, chunk_size).await?;
        rows += db.upsert_chunked(&artists, chunk_size).await?;
        rows += db.upsert_chunked(&contracts, chunk_size).await?;
        rows += db.upsert_chunked(&styles, chunk_size).await?;
        rows += db.upsert_chunked(&genres, chunk_size).await?;
        rows += db.upsert_chunked(&labels, chunk_size).await?;
        rows += db.upsert_chunked(&formats, chunk_size).await?;
        rows += db.upsert_chunked(&identifiers, chunk_size).await?;
        rows += db.upsert_chunked(&tracks, chunk_size).await?;
        rows += db.upsert_chunked(&videos, chunk_size).await?;
        rows += db.upsert_chunked(&credited, chunk_size).await?;
        rows += db.upsert_chunked(&main_releases, chunk_size).await?;
        Ok(())
    }
    .await;
    Outcome {
        rows,
        error: written.err().map(|err| err.to_string()),
    }
}

/// Insert any style/genre names this window introduces, then refresh the
/// name caches from the store. Failures here are logged and swallowed:
/// unresolved names just mean their link rows are dropped.
async fn register_new_styles_genres(
    db: &Database,
    cache: &RefCache,
    window: &[RawRelease],
    chunk_size: usize,
) {
    let mut styles = Vec::new();
    let mut genres = Vec::new();
    for record in window {
        styles.extend(
            record
                .style_names()
                .filter(|name| !cache.styles.contains(name))
                .map(|name| Style {
                    name: name.to_string(),
                }),
        );
        genres.extend(
            record
                .genre_names()
                .filter(|name| !cache.genres.contains(name))
                .map(|name| Genre {
                    name: name.to_string(),
                }),
        );
    }
    let styles = unique(styles);
    let genres = unique(genres);
    if styles.is_empty() && genres.is_empty() {
        return;
    }

    if let Err(err) = db.upsert_chunked(&styles, chunk_size).await {
        error!(%err, "style insertion failed");
    }
    if let Err(err) = db.upsert_chunked(&genres, chunk_size).await {
        error!(%err, "genre insertion failed");
    }
    if let Err(err) = seed_style_genre_cache(db, cache).await {
        error!(%err, "style and genre cache refresh failed");
    }
}
