use std::future::Future;
use std::sync::{Mutex, PoisonError};

use futures::future::try_join_all;

/// Order-preserving map with at most `concurrency` transforms in flight.
///
/// `min(concurrency, items.len())` workers pull the next unclaimed item from
/// a shared cursor until the input is exhausted, and every result lands in
/// its input slot.  The first error resolves the whole call and drops the
/// remaining workers, so whatever they had in flight is cancelled.  A
/// transform that wants partial results on failure must catch its own
/// errors (return `Ok(None)` and filter later).
///
/// Empty input or `concurrency == 0` yields an empty vector.
pub async fn concurrent_map<T, R, E, F, Fut>(items: Vec<T>, concurrency: usize, f: F) -> Result<Vec<R>, E>
where
    F: Fn(T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let len = items.len();
    let workers = concurrency.min(len);
    if workers == 0 {
        return Ok(Vec::new());
    }

    let cursor = Mutex::new(items.into_iter().enumerate());
    let cursor = &cursor;
    let f = &f;

    let worker = |_: usize| async move {
        let mut done: Vec<(usize, R)> = Vec::new();
        loop {
            let next = cursor.lock().unwrap_or_else(PoisonError::into_inner).next();
            let Some((index, item)) = next else {
                break;
            };
            done.push((index, f(item).await?));
        }
        Ok::<_, E>(done)
    };

    let finished = try_join_all((0..workers).map(worker)).await?;

    let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(len).collect();
    for (index, value) in finished.into_iter().flatten() {
        slots[index] = Some(value);
    }
    Ok(slots.into_iter().flatten().collect())
}
