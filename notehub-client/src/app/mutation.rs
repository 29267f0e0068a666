//! Observable lifecycle for a single mutation kind.
//!
//! `Idle -> Pending -> {Succeeded, Failed}`. While `Pending`, the triggering
//! control stays disabled so duplicate submissions are impossible. Drafts
//! are caller-owned values, so a failure never loses user input: the caller
//! still holds the draft and can resubmit.

use tokio::sync::watch;

use crate::error::ApiError;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum MutationState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(ApiError),
}

pub struct MutationTracker {
    tx: watch::Sender<MutationState>,
    rx: watch::Receiver<MutationState>,
}

impl Default for MutationTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MutationTracker {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(MutationState::Idle);
        Self { tx, rx }
    }

    pub fn state(&self) -> MutationState {
        self.rx.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        matches!(*self.rx.borrow(), MutationState::Pending)
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<MutationState> {
        self.rx.clone()
    }

    /// Move to `Pending` unless a run is already in flight. Returns whether
    /// the transition happened; callers suppress the submission otherwise.
    pub(crate) fn try_begin(&self) -> bool {
        let mut began = false;
        self.tx.send_if_modified(|state| {
            if matches!(state, MutationState::Pending) {
                false
            } else {
                *state = MutationState::Pending;
                began = true;
                true
            }
        });
        began
    }

    pub(crate) fn succeed(&self) {
        let _ = self.tx.send(MutationState::Succeeded);
    }

    pub(crate) fn fail(&self, err: ApiError) {
        let _ = self.tx.send(MutationState::Failed(err));
    }

    /// Return a settled machine to `Idle`, e.g. after the UI has shown the
    /// error. No-op while a run is in flight.
    pub fn acknowledge(&self) {
        self.tx.send_if_modified(|state| {
            if matches!(state, MutationState::Pending | MutationState::Idle) {
                false
            } else {
                *state = MutationState::Idle;
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_is_exclusive_while_pending() {
        let tracker = MutationTracker::new();
        assert!(tracker.try_begin());
        assert!(tracker.is_pending());
        assert!(!tracker.try_begin());

        tracker.succeed();
        assert_eq!(tracker.state(), MutationState::Succeeded);
        // A settled machine accepts the next run.
        assert!(tracker.try_begin());
    }

    #[test]
    fn test_failure_is_observable_then_acknowledged_to_idle() {
        let tracker = MutationTracker::new();
        tracker.try_begin();
        tracker.fail(ApiError::Network("offline".to_string()));

        match tracker.state() {
            MutationState::Failed(err) => assert!(matches!(err, ApiError::Network(_))),
            other => panic!("expected failed state, got {:?}", other),
        }

        tracker.acknowledge();
        assert_eq!(tracker.state(), MutationState::Idle);
    }

    #[test]
    fn test_acknowledge_is_noop_while_pending() {
        let tracker = MutationTracker::new();
        tracker.try_begin();
        tracker.acknowledge();
        assert!(tracker.is_pending());
    }

    #[tokio::test]
    async fn test_transitions_are_observable() {
        let tracker = MutationTracker::new();
        let mut rx = tracker.subscribe();

        tracker.try_begin();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), MutationState::Pending);

        tracker.succeed();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), MutationState::Succeeded);
    }
}
