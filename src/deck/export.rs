//! Print scheduling for export mode.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Whatever opens the print dialog. The outcome is not observable.
pub trait PrintTarget: Send + Sync {
    fn print(&self);
}

/// A print waiting for the export layout to settle.
pub struct PrintHandle {
    task: JoinHandle<()>,
}

impl PrintHandle {
    /// Drop the pending print if it hasn't fired yet.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the print. Returns `false` if it was cancelled.
    pub async fn wait(self) -> bool {
        self.task.await.is_ok()
    }
}

/// Invoke `target.print()` once `settle` has elapsed.
pub fn schedule_print(target: Arc<dyn PrintTarget>, settle: Duration) -> PrintHandle {
    let task = tokio::spawn(async move {
        tokio::time::sleep(settle).await;
        debug!("Export layout settled, requesting print");
        target.print();
    });
    PrintHandle { task }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct CountingPrinter(AtomicUsize);

    impl PrintTarget for CountingPrinter {
        fn print(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn prints_after_settle() {
        let printer = Arc::new(CountingPrinter::default());
        let handle = schedule_print(printer.clone(), Duration::from_millis(10));
        assert_eq!(printer.0.load(Ordering::SeqCst), 0);
        assert!(handle.wait().await);
        assert_eq!(printer.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancelled_print_never_fires() {
        let printer = Arc::new(CountingPrinter::default());
        let handle = schedule_print(printer.clone(), Duration::from_secs(60));
        handle.cancel();
        assert!(!handle.wait().await);
        assert_eq!(printer.0.load(Ordering::SeqCst), 0);
    }
}
