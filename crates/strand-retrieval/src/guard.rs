//! Timeout and failure containment for local units of work.
//!
//! A guarded unit that errors or overruns its deadline degrades to a
//! [`PartialFailure`] instead of failing the query.

use std::future::Future;
use std::time::Duration;

use strand_core::errors::{StrandError, StrandResult};
use strand_core::models::{FailureKind, PartialFailure};
use strand_observability::events;

/// Run `fut` under `timeout_ms`. Errors and timeouts become a logged
/// [`PartialFailure`] for `unit`.
pub async fn guarded<T, F>(unit: &str, timeout_ms: u64, fut: F) -> Result<T, PartialFailure>
where
    F: Future<Output = StrandResult<T>>,
{
    match tokio::time::timeout(Duration::from_millis(timeout_ms), fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(contain(unit, &e)),
        Err(_) => {
            let failure = PartialFailure::new(
                unit,
                FailureKind::Timeout,
                format!("timed out after {timeout_ms}ms"),
            );
            events::degradation_triggered(&failure);
            Err(failure)
        }
    }
}

/// Convert an error from a local unit into a logged [`PartialFailure`].
pub fn contain(unit: &str, error: &StrandError) -> PartialFailure {
    let kind = match error {
        StrandError::Cancelled => FailureKind::Cancelled,
        StrandError::Timeout { .. } => FailureKind::Timeout,
        _ => FailureKind::Error,
    };
    let failure = PartialFailure::new(unit, kind, error.to_string());
    events::degradation_triggered(&failure);
    failure
}

/// Errors that must escape containment and fail the whole query.
pub fn is_fatal(error: &StrandError) -> bool {
    use strand_core::errors::ErrorKind;
    matches!(error.kind(), ErrorKind::FatalGraph | ErrorKind::Cancelled)
}
