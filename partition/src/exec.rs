//! Cancellable dispatch of single engine calls.

use std::future::Future;

use common::EngineResult;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Runs one engine operation under the caller's cancellation contract.
///
/// If the token is already cancelled the operation is never dispatched and
/// the call fails with [`Error::OperationCancelled`], leaving the engine
/// untouched. Once dispatched, the operation runs to completion on its own
/// task: cancellation signalled mid-flight neither aborts it nor suppresses
/// its result, since an engine call is atomic and non-resumable and an
/// abandoned mutation would leave the caller unsure whether it took effect.
pub(crate) async fn execute<T, F>(token: &CancellationToken, op: F) -> Result<T>
where
    F: Future<Output = EngineResult<T>> + Send + 'static,
    T: Send + 'static,
{
    if token.is_cancelled() {
        return Err(Error::OperationCancelled);
    }
    match tokio::spawn(op).await {
        Ok(result) => result.map_err(Error::from),
        Err(e) => Err(Error::Internal(format!("Engine operation task failed: {}", e))),
    }
}
