use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Delays propagation of rapidly repeated events until input quiesces.
///
/// Each `schedule` cancels the pending run, so only the last value within a
/// quiet window is ever committed.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Run `action` once the window elapses, replacing any pending run.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let window = self.window;
        self.pending = Some(tokio::spawn(async move {
            sleep(window).await;
            action.await;
        }));
    }

    /// Drop the pending run without firing it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Schedule a one-shot completion after `delay`. The completion resumes
/// exactly once; abort the returned handle to cancel it before it fires.
pub fn defer<F>(delay: Duration, action: F) -> JoinHandle<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        sleep(delay).await;
        action.await;
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn only_last_scheduled_value_commits() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(30));

        let first = tx.clone();
        debouncer.schedule(async move {
            let _ = first.send("first");
        });
        sleep(Duration::from_millis(10)).await;
        let second = tx.clone();
        debouncer.schedule(async move {
            let _ = second.send("second");
        });

        sleep(Duration::from_millis(60)).await;
        assert_eq!(rx.try_recv().ok(), Some("second"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn cancel_suppresses_commit() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        debouncer.schedule(async move {
            let _ = tx.send(());
        });
        debouncer.cancel();
        sleep(Duration::from_millis(30)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn defer_fires_exactly_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        defer(Duration::from_millis(10), async move {
            let _ = tx.send(());
        });
        sleep(Duration::from_millis(40)).await;
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn aborted_defer_never_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = defer(Duration::from_millis(10), async move {
            let _ = tx.send(());
        });
        handle.abort();
        sleep(Duration::from_millis(30)).await;
        assert!(rx.try_recv().is_err());
    }
}
