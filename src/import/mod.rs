//! Step orchestration.
//!
//! One step per top-level entity type, run sequentially by the caller;
//! windows inside a step's relation phase run concurrently. Each step
//! returns an [`Outcome`] and the caller decides whether to proceed to
//! the next entity type.

mod artist;
mod label;
mod master;
pub mod records;
mod release;
mod window;

use std::io::BufRead;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::ImportConfig;
use crate::db::Database;
use crate::dump::{DumpError, DumpFile};
use crate::outcome::Outcome;
use crate::refcache::RefCache;

/// Work order for one step: the dump to read, run sizing, and the
/// run-scoped cancellation signal. Cancellation stops the production of
/// new windows; already-dispatched workers run to completion and their
/// rows are still counted.
#[derive(Debug, Clone)]
pub struct Order {
    dump: DumpFile,
    window_size: usize,
    chunk_size: usize,
    cancel: CancellationToken,
}

impl Order {
    pub fn new(dump: DumpFile, config: &ImportConfig, cancel: CancellationToken) -> Self {
        Order {
            dump,
            window_size: config.window_size,
            chunk_size: config.chunk_size,
            cancel,
        }
    }

    pub(crate) fn open(&self, label: &str) -> Result<Box<dyn BufRead + Send>, DumpError> {
        self.dump.open(label)
    }

    pub(crate) fn cancel(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Runs the per-entity-type steps over a shared reference cache.
///
/// The cache starts empty, is populated as primary entities are written,
/// and lives only as long as this importer. Steps consult it to suppress
/// dangling relations, so the natural order is artists, labels, masters,
/// releases.
#[derive(Debug, Clone)]
pub struct Importer {
    db: Database,
    cache: Arc<RefCache>,
}

impl Importer {
    pub fn new(db: Database) -> Self {
        Importer {
            db,
            cache: Arc::new(RefCache::new()),
        }
    }

    pub fn cache(&self) -> &RefCache {
        &self.cache
    }

    pub async fn update_artists(&self, order: &Order) -> Outcome {
        artist::run(&self.db, &self.cache, order).await
    }

    pub async fn update_labels(&self, order: &Order) -> Outcome {
        label::run(&self.db, &self.cache, order).await
    }

    pub async fn update_masters(&self, order: &Order) -> Outcome {
        master::run(&self.db, &self.cache, order).await
    }

    pub async fn update_releases(&self, order: &Order) -> Outcome {
        release::run(&self.db, &self.cache, order).await
    }
}

/// Refresh the style/genre name caches from the store's current contents.
pub(crate) async fn seed_style_genre_cache(
    db: &Database,
    cache: &RefCache,
) -> Result<(), sqlx::Error> {
    for (id, name) in db.fetch_styles().await? {
        cache.styles.store(name, id);
    }
    for (id, name) in db.fetch_genres().await? {
        cache.genres.store(name, id);
    }
    Ok(())
}
