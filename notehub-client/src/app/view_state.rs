//! View state coordinator: page number, raw search text, modal flag.
//!
//! State transitions commit atomically under one lock, and observers are
//! notified after each committed transition through a watch revision
//! counter. The coordinator also enforces the fetch ordering guarantee: a
//! resolving fetch applies only while its key is still the desired one, so
//! a superseded response never overwrites newer state.

use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tokio::sync::watch;

use crate::api::NotePage;
use crate::query::QueryKey;

/// Caller error: requested a page outside `1..=total_pages`. Out-of-range
/// pages are rejected, never silently clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("page {requested} out of range 1..={total_pages}")]
pub struct PageOutOfRange {
    pub requested: u32,
    pub total_pages: u32,
}

#[derive(Debug)]
struct Inner {
    page: u32,
    raw_search: String,
    modal_open: bool,
    /// Learned from the last applied page result; 0 until one arrives.
    total_pages: u32,
    /// Keep-previous-data buffer: stays visible while a fetch for a newer
    /// key is in flight, so the view never flickers to empty on refetch.
    current: Option<Arc<NotePage>>,
    /// The key the view currently wants; resolutions for any other key are
    /// stale and get discarded. Cleared by every transition that changes the
    /// page or search text, so a fetch in flight at that moment is
    /// superseded immediately rather than at the next key build.
    desired_key: Option<QueryKey>,
}

pub struct ViewState {
    inner: Mutex<Inner>,
    revision: watch::Sender<u64>,
    rev_rx: watch::Receiver<u64>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        let (revision, rev_rx) = watch::channel(0);
        Self {
            inner: Mutex::new(Inner {
                page: 1,
                raw_search: String::new(),
                modal_open: false,
                total_pages: 0,
                current: None,
                desired_key: None,
            }),
            revision,
            rev_rx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Notify observers that a transition committed.
    fn commit(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Set the raw search text. A new search invalidates the old page
    /// position, so the page resets to 1.
    pub fn set_search(&self, text: &str) {
        {
            let mut inner = self.lock();
            inner.raw_search = text.to_string();
            inner.page = 1;
            inner.desired_key = None;
        }
        self.commit();
    }

    /// Move to page `n`. Valid range is `1..=total_pages`; when no pages are
    /// known yet (`total_pages == 0`) only page 1 is valid.
    pub fn set_page(&self, n: u32) -> Result<(), PageOutOfRange> {
        {
            let mut inner = self.lock();
            let valid = if inner.total_pages == 0 {
                n == 1
            } else {
                (1..=inner.total_pages).contains(&n)
            };
            if !valid {
                return Err(PageOutOfRange {
                    requested: n,
                    total_pages: inner.total_pages,
                });
            }
            inner.page = n;
            inner.desired_key = None;
        }
        self.commit();
        Ok(())
    }

    pub fn open_modal(&self) {
        self.lock().modal_open = true;
        self.commit();
    }

    pub fn close_modal(&self) {
        self.lock().modal_open = false;
        self.commit();
    }

    /// After a successful create: back to page 1 (where new notes land) and
    /// close the form modal.
    pub fn on_create_succeeded(&self) {
        {
            let mut inner = self.lock();
            inner.page = 1;
            inner.modal_open = false;
            inner.desired_key = None;
        }
        self.commit();
    }

    /// Build the query key for the current page and the given effective
    /// search term, and record it as the desired key for staleness checks.
    pub fn desired_key(&self, per_page: u32, effective_search: Option<&str>) -> QueryKey {
        let mut inner = self.lock();
        let key = QueryKey::new(inner.page, per_page, effective_search);
        inner.desired_key = Some(key.clone());
        key
    }

    /// Apply a resolved page result. Returns false (and changes nothing)
    /// when `key` is no longer the desired one - either a newer key was
    /// built, or a page/search transition superseded the fetch mid-flight.
    pub fn apply_result(&self, key: &QueryKey, page: Arc<NotePage>) -> bool {
        {
            let mut inner = self.lock();
            if inner.desired_key.as_ref() != Some(key) {
                log::debug!("[VIEW] discarding stale result for {:?}", key);
                return false;
            }
            inner.total_pages = page.total_pages;
            inner.current = Some(page);
        }
        self.commit();
        true
    }

    pub fn page(&self) -> u32 {
        self.lock().page
    }

    pub fn raw_search(&self) -> String {
        self.lock().raw_search.clone()
    }

    pub fn modal_open(&self) -> bool {
        self.lock().modal_open
    }

    pub fn total_pages(&self) -> u32 {
        self.lock().total_pages
    }

    /// The last successfully applied page, kept visible while newer fetches
    /// are in flight.
    pub fn current_page(&self) -> Option<Arc<NotePage>> {
        self.lock().current.clone()
    }

    /// Observe committed transitions; the value is a monotonic revision.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.rev_rx.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NotePage;

    fn page_result(total_pages: u32) -> Arc<NotePage> {
        Arc::new(NotePage {
            notes: vec![],
            total_pages,
        })
    }

    #[test]
    fn test_defaults() {
        let view = ViewState::new();
        assert_eq!(view.page(), 1);
        assert_eq!(view.raw_search(), "");
        assert!(!view.modal_open());
        assert_eq!(view.total_pages(), 0);
        assert!(view.current_page().is_none());
    }

    #[test]
    fn test_set_search_resets_page() {
        let view = ViewState::new();
        let key = view.desired_key(12, None);
        view.apply_result(&key, page_result(5));
        view.set_page(3).unwrap();

        view.set_search("meeting");
        assert_eq!(view.page(), 1);
        assert_eq!(view.raw_search(), "meeting");
    }

    #[test]
    fn test_set_page_rejects_out_of_range() {
        let view = ViewState::new();

        // No pages known yet: only page 1 is valid.
        assert!(view.set_page(1).is_ok());
        assert_eq!(
            view.set_page(2),
            Err(PageOutOfRange {
                requested: 2,
                total_pages: 0
            })
        );

        let key = view.desired_key(12, None);
        view.apply_result(&key, page_result(3));
        assert!(view.set_page(3).is_ok());
        assert!(view.set_page(0).is_err());
        assert!(view.set_page(4).is_err());
        // Rejection does not clamp or move the page.
        assert_eq!(view.page(), 3);
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let view = ViewState::new();

        let old_key = view.desired_key(12, None);
        // The view moves on before the first fetch resolves.
        view.set_search("rust");
        let new_key = view.desired_key(12, Some("rust"));

        assert!(!view.apply_result(&old_key, page_result(9)));
        assert_eq!(view.total_pages(), 0);

        assert!(view.apply_result(&new_key, page_result(2)));
        assert_eq!(view.total_pages(), 2);
    }

    #[test]
    fn test_page_change_supersedes_in_flight_fetch() {
        let view = ViewState::new();
        let key = view.desired_key(12, None);
        view.apply_result(&key, page_result(3));
        view.set_page(2).unwrap();

        // Fetch for page 2 starts, then the user moves again before it
        // resolves. The resolution must not land.
        let in_flight = view.desired_key(12, None);
        view.set_page(1).unwrap();
        assert!(!view.apply_result(&in_flight, page_result(9)));
        assert_eq!(view.page(), 1);
        assert_eq!(view.total_pages(), 3);
    }

    #[test]
    fn test_create_success_supersedes_in_flight_fetch() {
        let view = ViewState::new();
        let key = view.desired_key(12, None);
        view.apply_result(&key, page_result(3));
        view.set_page(3).unwrap();

        let in_flight = view.desired_key(12, None);
        view.on_create_succeeded();
        assert!(!view.apply_result(&in_flight, page_result(4)));
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_previous_page_stays_visible_until_replaced() {
        let view = ViewState::new();

        let key = view.desired_key(12, None);
        view.apply_result(&key, page_result(3));
        let shown = view.current_page().unwrap();

        // A new desired key alone does not clear the displayed data.
        view.set_page(2).unwrap();
        let next_key = view.desired_key(12, None);
        assert_eq!(view.current_page().unwrap(), shown);

        view.apply_result(&next_key, page_result(3));
        assert!(view.current_page().is_some());
    }

    #[test]
    fn test_create_success_resets_page_and_closes_modal() {
        let view = ViewState::new();
        let key = view.desired_key(12, None);
        view.apply_result(&key, page_result(4));
        view.set_page(4).unwrap();
        view.open_modal();

        view.on_create_succeeded();
        assert_eq!(view.page(), 1);
        assert!(!view.modal_open());
    }

    #[tokio::test]
    async fn test_observers_see_each_committed_transition() {
        let view = ViewState::new();
        let mut rx = view.subscribe();
        let start = *rx.borrow_and_update();

        view.set_search("a");
        view.open_modal();
        view.close_modal();

        assert_eq!(*rx.borrow_and_update(), start + 3);
    }
}
