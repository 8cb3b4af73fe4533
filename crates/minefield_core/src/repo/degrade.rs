//! Swallow-and-degrade adapter.
//!
//! The default repository surface reports "nothing found" for both genuine
//! absence and failure. This module is the only place that conflation
//! happens: checked results come in, sentinels go out, failures are logged.

use super::RepoResult;
use log::warn;

/// Unwraps `result`, or logs the failure and returns `T::default()`.
///
/// `T` is `Option<_>`, `Vec<_>` or `()` in practice, so the sentinel is
/// `None`, an empty sequence or nothing.
pub fn or_sentinel<T: Default>(operation: &'static str, result: RepoResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!("event={operation} module=repo status=degraded error={err}");
            T::default()
        }
    }
}
