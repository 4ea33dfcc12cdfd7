//! Label step: primary rows, then relation windows (urls and the
//! parent-label backfill).

use std::sync::Arc;

use futures::StreamExt;
use tracing::info;

use super::records::label::{RawLabel, RawLabelRelation};
use super::window::for_each_window;
use super::Order;
use crate::db::Database;
use crate::dedup::unique;
use crate::outcome::Outcome;
use crate::refcache::RefCache;
use crate::xml::parse_stream;

pub(super) async fn run(db: &Database, cache: &Arc<RefCache>, order: &Order) -> Outcome {
    let mut outcome = insert_labels(db, cache, order).await;
    if outcome.is_err() {
        return outcome;
    }
    outcome.absorb(insert_label_relations(db, cache, order).await);
    outcome
}

async fn insert_labels(db: &Database, cache: &Arc<RefCache>, order: &Order) -> Outcome {
    let reader = match order.open("labels") {
        Ok(reader) => reader,
        Err(err) => return Outcome::fail(err.to_string()),
    };
    let registry = cache.clone();
    let records = parse_stream::<RawLabel, _>(reader, "label", order.cancel()).map(move |item| {
        item.map(|raw| {
            registry.labels.store(raw.id);
            raw.into_label()
        })
    });

    let db = db.clone();
    let chunk_size = order.chunk_size;
    let outcome = for_each_window(records, order.window_size, move |labels| {
        let db = db.clone();
        async move { Outcome::from_result(db.upsert_chunked(&labels, chunk_size).await) }
    })
    .await;
    info!(rows = outcome.rows, "updated labels");
    outcome
}

async fn insert_label_relations(db: &Database, cache: &Arc<RefCache>, order: &Order) -> Outcome {
    let reader = match order.open("label relations") {
        Ok(reader) => reader,
        Err(err) => return Outcome::fail(err.to_string()),
    };
    let records = parse_stream::<RawLabelRelation, _>(reader, "label", order.cancel());

    let db = db.clone();
    let cache = cache.clone();
    let chunk_size = order.chunk_size;
    let outcome = for_each_window(records, order.window_size, move |window| {
        let db = db.clone();
        let cache = cache.clone();
        async move { write_relations(&db, &cache, &window, chunk_size).await }
    })
    .await;
    info!(rows = outcome.rows, "updated label relations");
    outcome
}

async fn write_relations(
    db: &Database,
    cache: &RefCache,
    window: &[RawLabelRelation],
    chunk_size: usize,
) -> Outcome {
    let mut urls = Vec::new();
    let mut parents = Vec::new();
    for record in window {
        urls.extend(record.urls());
        parents.extend(record.parent(cache));
    }
    let urls = unique(urls);
    let parents = unique(parents);

    let mut rows = 0u64;
    let written: Result<(), sqlx::Error> = async {
        rows += db.upsert_chunked(&parents, chunk_size).await?;
        rows += db.upsert_chunked(&urls, chunk_size).await?;
        Ok(())
    }
    .await;
    Outcome {
        rows,
        error: written.err().map(|err| err.to_string()),
    }
}
