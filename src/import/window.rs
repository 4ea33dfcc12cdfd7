//! Windowed fan-out over a parsed record stream.

use futures::{Future, Stream, StreamExt};
use tokio::task::JoinSet;

use crate::outcome::Outcome;
use crate::xml::XmlError;

/// Partition `records` into windows of `window_size` and run one spawned
/// worker per window, throttled only by upstream production.
///
/// Workers run concurrently with no ordering guarantees between windows.
/// The aggregate sums every worker's rows and keeps the first error. A
/// parse failure is terminal: window production stops, the incomplete
/// trailing window is discarded, and the failure is reported once all
/// in-flight workers have finished (their counts still land).
pub(crate) async fn for_each_window<S, T, F, Fut>(
    mut records: S,
    window_size: usize,
    mut worker: F,
) -> Outcome
where
    S: Stream<Item = Result<T, XmlError>> + Unpin,
    T: Send + 'static,
    F: FnMut(Vec<T>) -> Fut,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    let size = window_size.max(1);
    let mut workers = JoinSet::new();
    let mut window = Vec::with_capacity(size);
    let mut parse_error = None;

    while let Some(item) = records.next().await {
        match item {
            Ok(record) => {
                window.push(record);
                if window.len() == size {
                    let full = std::mem::replace(&mut window, Vec::with_capacity(size));
                    workers.spawn(worker(full));
                }
            }
            Err(err) => {
                parse_error = Some(err.to_string());
                break;
            }
        }
    }
    if parse_error.is_none() && !window.is_empty() {
        workers.spawn(worker(window));
    }

    let mut outcome = Outcome::default();
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(partial) => outcome.absorb(partial),
            Err(err) => outcome.absorb(Outcome::fail(format!("window worker failed: {err}"))),
        }
    }
    if outcome.error.is_none() {
        outcome.error = parse_error;
    }
    outcome
}
