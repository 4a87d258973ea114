use tokio::task::JoinError;

use crate::error::SdkError;

/// Run one blocking native call on tokio's blocking pool.
///
/// The returned future has no cancellation hook: dropping it leaves `work`
/// running to completion on the worker. A panic inside `work` surfaces as
/// [`SdkError::WorkerFailure`].
pub(crate) async fn run_blocking<T, F>(operation: &'static str, work: F) -> Result<T, SdkError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, SdkError> + Send + 'static,
{
    let span = tracing::debug_span!("native_call", operation);
    tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        tracing::debug!("calling native engine");
        work()
    })
    .await
    .map_err(|err| worker_failure(operation, err))?
}

fn worker_failure(operation: &'static str, err: JoinError) -> SdkError {
    let reason = if err.is_panic() {
        format!("{} panicked on the blocking worker", operation)
    } else {
        format!("{} was cancelled before completing", operation)
    };
    SdkError::WorkerFailure { reason }
}
