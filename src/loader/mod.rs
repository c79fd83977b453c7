pub mod employees;
pub mod report;

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};

pub use employees::EmployeeLoader;
pub use report::ReportLoader;

/// Tracks whether the view that owns a loader is still on screen. Once
/// unmounted, in-flight requests are dropped and nothing is committed.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    token: CancellationToken,
}

impl Lifecycle {
    pub fn is_mounted(&self) -> bool {
        !self.token.is_cancelled()
    }

    pub fn unmount(&self) {
        self.token.cancel();
    }

    /// Drive `fut` to completion unless the owner unmounts first.
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(AppError::Cancelled),
            result = fut => result,
        }
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
