//! Scoped handles for spawned background tasks.

use std::future::Future;

use tokio::task::JoinHandle;

/// A spawned task that is aborted when the handle is dropped.
///
/// Holding the handle keeps the task alive; dropping it (or calling
/// [`ScheduledTask::cancel`]) stops it at its next await point.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Spawns `future` on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    /// Aborts the task.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::{sleep, Duration};

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_task() {
        let counter = Arc::new(AtomicU32::new(0));
        let seen = counter.clone();
        let task = ScheduledTask::spawn(async move {
            loop {
                sleep(Duration::from_millis(100)).await;
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        sleep(Duration::from_millis(350)).await;
        let before = counter.load(Ordering::SeqCst);
        assert_eq!(before, 3);

        drop(task);
        sleep(Duration::from_millis(1_000)).await;
        assert_eq!(counter.load(Ordering::SeqCst), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_task() {
        let counter = Arc::new(AtomicU32::new(0));
        let seen = counter.clone();
        let task = ScheduledTask::spawn(async move {
            sleep(Duration::from_millis(100)).await;
            seen.fetch_add(1, Ordering::SeqCst);
        });

        task.cancel();
        sleep(Duration::from_millis(500)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
