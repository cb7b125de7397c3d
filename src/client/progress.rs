//! Download progress observers.
//!
//! Progress is a side channel only: observers never influence how an
//! exchange settles. A client starts with [`NoopObserver`]; install another
//! one with [`HttpClient::with_progress_observer`](crate::HttpClient::with_progress_observer).
//!
//! ```
//! use courier_http::client::ProgressObserver;
//! use courier_http::transport::Progress;
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//!
//! let seen = Arc::new(AtomicU64::new(0));
//! let sink = seen.clone();
//! let observer = move |_url: &str, progress: &Progress| {
//!     sink.store(progress.loaded, Ordering::SeqCst);
//! };
//! observer.on_progress("http://x/", &Progress { loaded: 512, total: None });
//! assert_eq!(seen.load(Ordering::SeqCst), 512);
//! ```

use crate::transport::Progress;

/// Receives progress for exchanges that asked for it.
pub trait ProgressObserver: Send + Sync {
    /// Called for every chunk of the response body.
    fn on_progress(&self, url: &str, progress: &Progress);
}

impl<F> ProgressObserver for F
where
    F: Fn(&str, &Progress) + Send + Sync,
{
    fn on_progress(&self, url: &str, progress: &Progress) {
        self(url, progress)
    }
}

/// Ignores progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_progress(&self, _url: &str, _progress: &Progress) {}
}

/// Logs transferred bytes at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn on_progress(&self, url: &str, progress: &Progress) {
        tracing::info!(url, total = ?progress.total, "{} bytes transferred...", progress.loaded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_builtin_observers_as_trait_objects() {
        let observers: Vec<Arc<dyn ProgressObserver>> =
            vec![Arc::new(NoopObserver), Arc::new(TracingObserver)];
        for observer in observers {
            observer.on_progress("http://x/", &Progress { loaded: 3, total: Some(9) });
        }
    }
}
