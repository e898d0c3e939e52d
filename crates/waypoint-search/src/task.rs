use std::future::Future;

use crate::error::{Channel, SearchError};

/// Run a source call on its own task.
///
/// A panic inside the source surfaces as [`SearchError`] instead of
/// silently ending the reporting task, so a result is always sent back.
pub(crate) async fn run_isolated<T, E, F>(channel: Channel, call: F) -> Result<T, SearchError>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    for<'a> SearchError: From<&'a E>,
{
    match tokio::spawn(call).await {
        Ok(result) => result.map_err(|e| SearchError::from(&e)),
        Err(join_error) => {
            tracing::error!(%channel, "Lookup task failed: {}", join_error);
            Err(SearchError::crashed(channel))
        }
    }
}
