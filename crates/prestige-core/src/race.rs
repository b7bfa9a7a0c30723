//! Combinator for racing alternative checks.

use std::future::Future;

use futures::stream::{FuturesUnordered, StreamExt};

/// Poll all `checks` concurrently.
///
/// The first `Ok` to complete wins. If every check fails, the error of the
/// check that failed *last* is returned. `None` only when `checks` is empty.
pub async fn first_success<I, F, T, E>(checks: I) -> Option<Result<T, E>>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    let mut pending: FuturesUnordered<F> = checks.into_iter().collect();
    let mut last_failure = None;
    while let Some(outcome) = pending.next().await {
        match outcome {
            Ok(value) => return Some(Ok(value)),
            Err(e) => last_failure = Some(e),
        }
    }
    last_failure.map(Err)
}
