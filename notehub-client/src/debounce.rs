//! Debounced propagation of a raw input value into an effective value.
//!
//! Each submission schedules a cancellable commit after the window; a newer
//! submission supersedes it, so only a value that stayed stable for the full
//! window becomes effective. Pending commits are owned by the debouncer and
//! cancelled on supersede or teardown.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

struct Inner {
    tx: watch::Sender<String>,
    /// Bumped on every submission; a scheduled commit only lands if its
    /// generation is still current when the window elapses.
    generation: AtomicU64,
}

pub struct Debouncer {
    window: Duration,
    inner: Arc<Inner>,
    rx: watch::Receiver<String>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        let (tx, rx) = watch::channel(String::new());
        Self {
            window,
            inner: Arc::new(Inner {
                tx,
                generation: AtomicU64::new(0),
            }),
            rx,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `value` to become effective after the window. Rapid
    /// successive submissions reset the window, so only the final value
    /// commits, and only once the window has elapsed from the last call.
    pub fn submit(&self, value: impl Into<String>) {
        let value = value.into();
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = self.inner.clone();
        let window = self.window;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if inner.generation.load(Ordering::SeqCst) == generation {
                let _ = inner.tx.send(value);
            }
        });

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(superseded) = pending.replace(handle) {
            superseded.abort();
        }
    }

    /// The current effective value.
    pub fn current(&self) -> String {
        self.rx.borrow().clone()
    }

    /// Watch the effective value; receivers are notified on each commit.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.rx.clone()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self
            .pending
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_only_final_value_commits_after_window() {
        let debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.submit("m");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.submit("me");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.submit("meeting");

        // Window has not elapsed since the last submission yet.
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(debouncer.current(), "");

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(debouncer.current(), "meeting");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stable_value_commits_once_per_window() {
        let debouncer = Debouncer::new(Duration::from_millis(200));
        let mut rx = debouncer.subscribe();

        debouncer.submit("first");
        tokio::time::sleep(Duration::from_millis(201)).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "first");

        debouncer.submit("second");
        tokio::time::sleep(Duration::from_millis(201)).await;
        assert_eq!(*rx.borrow_and_update(), "second");
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_pending_commit() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let rx = debouncer.subscribe();

        debouncer.submit("never lands");
        drop(debouncer);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(*rx.borrow(), "");
    }
}
