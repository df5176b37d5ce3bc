// src/discovery/fanout.rs
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Run `work` over every input on its own task, at most `limit` at a time.
///
/// Results come back in input order. The first failure cancels the shared
/// token, aborts every sibling and is returned; nothing partial escapes.
/// Cancelling `parent` stops the whole batch with [`Error::Cancelled`].
pub async fn fan_out<I, T, F, Fut>(
    inputs: Vec<I>,
    limit: usize,
    parent: &CancellationToken,
    work: F,
) -> Result<Vec<T>>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let cancel = parent.child_token();
    let permits = Arc::new(Semaphore::new(limit.max(1)));
    let mut slots: Vec<Option<T>> = std::iter::repeat_with(|| None).take(inputs.len()).collect();
    let mut tasks = JoinSet::new();

    for (index, input) in inputs.into_iter().enumerate() {
        let job = work(input);
        let cancel = cancel.clone();
        let permits = Arc::clone(&permits);

        tasks.spawn(async move {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(Error::Cancelled),
                outcome = async move {
                    let _permit = permits
                        .acquire_owned()
                        .await
                        .map_err(|_| Error::Cancelled)?;
                    job.await
                } => outcome,
            };
            (index, result)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined?;
        match result {
            Ok(value) => slots[index] = Some(value),
            Err(err) => {
                cancel.cancel();
                tasks.abort_all();
                return Err(err);
            }
        }
    }

    // Every slot is written exactly once when all tasks succeed
    slots
        .into_iter()
        .collect::<Option<Vec<T>>>()
        .ok_or(Error::Cancelled)
}
