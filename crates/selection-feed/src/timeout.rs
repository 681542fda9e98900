//! Optional deadline for collaborator calls.

use std::future::Future;
use std::time::Duration;

use crate::ports::FetchError;

/// Await `fut`, failing with [`FetchError::Timeout`] once `limit` elapses.
///
/// `None` waits indefinitely.
pub async fn with_timeout<F, T>(limit: Option<Duration>, fut: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| FetchError::Timeout(format!("no response after {:?}", limit)))?,
        None => fut.await,
    }
}
