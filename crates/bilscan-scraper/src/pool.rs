//! Fixed-width fan-out/fan-in over independent async tasks.

use std::future::Future;

use futures::stream::{self, StreamExt};

/// Runs `task` over every item with at most `width` tasks in flight and
/// collects the results in completion order.
///
/// A `width` of zero is treated as one. Returns only once every task has
/// finished.
pub async fn fan_out<I, T, R, F, Fut>(items: I, width: usize, task: F) -> Vec<R>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = R>,
{
    stream::iter(items)
        .map(task)
        .buffer_unordered(width.max(1))
        .collect()
        .await
}
