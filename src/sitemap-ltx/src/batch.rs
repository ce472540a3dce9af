//! Bounded concurrent processing that keeps input order.

use futures::stream::{self, StreamExt};
use std::future::Future;

/// Processes items with at most `concurrency` in flight, returning results in input order.
///
/// All futures are polled from the calling task, so they may borrow from the caller.
/// A `concurrency` of 1 (or 0) processes strictly one item after another.
///
/// # Arguments
///
/// * `items` - Vector of items to process
/// * `processor` - Async function that processes each item, taking the item and its index
/// * `concurrency` - Maximum number of concurrent operations
///
/// # Examples
///
/// ```
/// # use sitemap_ltx::batch::process_in_order;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let urls = vec!["url1", "url2", "url3"];
/// let results = process_in_order(urls, |url, index| async move { format!("{index}: {url}") }, 2).await;
/// assert_eq!(results, vec!["0: url1", "1: url2", "2: url3"]);
/// # }
/// ```
pub async fn process_in_order<T, F, Fut, R>(items: Vec<T>, processor: F, concurrency: usize) -> Vec<R>
where
    F: Fn(T, usize) -> Fut,
    Fut: Future<Output = R>,
{
    stream::iter(items.into_iter().enumerate())
        .map(|(index, item)| processor(item, index))
        .buffered(concurrency.max(1))
        .collect()
        .await
}
