//! Session wiring: API client + query cache + search debouncer + view state.
//!
//! One `NotesSession` owns the cache for its lifetime and passes it to
//! consumers by reference, so tests get isolation from fresh sessions.
//! Mutations run through the observable state machines and, on success,
//! coarsely invalidate the whole cache before the next refresh.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::{NotePage, NotesApi, RemoteNotesClient};
use crate::config::Config;
use crate::debounce::Debouncer;
use crate::error::ApiError;
use crate::models::{Note, NoteDraft};
use crate::query::QueryCache;

use super::mutation::MutationTracker;
use super::view_state::ViewState;

pub struct NotesSession {
    api: Arc<dyn NotesApi>,
    cache: QueryCache,
    view: ViewState,
    search: Debouncer,
    create_mutation: MutationTracker,
    delete_mutation: MutationTracker,
    /// Id of the note currently being deleted, for per-row control state.
    deleting_id: Mutex<Option<String>>,
    per_page: u32,
}

impl NotesSession {
    pub fn new(config: &Config) -> Self {
        Self::from_parts(
            Arc::new(RemoteNotesClient::new(config)),
            config.per_page,
            Duration::from_millis(config.debounce_ms),
        )
    }

    /// Assemble a session from an explicit API implementation. Tests use
    /// this with in-memory fakes.
    pub fn from_parts(api: Arc<dyn NotesApi>, per_page: u32, debounce_window: Duration) -> Self {
        Self {
            api,
            cache: QueryCache::new(),
            view: ViewState::new(),
            search: Debouncer::new(debounce_window),
            create_mutation: MutationTracker::new(),
            delete_mutation: MutationTracker::new(),
            deleting_id: Mutex::new(None),
            per_page,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn create_mutation(&self) -> &MutationTracker {
        &self.create_mutation
    }

    pub fn delete_mutation(&self) -> &MutationTracker {
        &self.delete_mutation
    }

    /// Update the search box: the raw text lands in the view immediately
    /// (resetting the page), while the effective term used for querying
    /// changes only after the debounce window.
    pub fn set_search(&self, text: &str) {
        self.view.set_search(text);
        self.search.submit(text.to_string());
    }

    /// The debounced search term: trimmed, absent when empty.
    pub fn effective_search(&self) -> Option<String> {
        let term = self.search.current();
        let term = term.trim();
        if term.is_empty() {
            None
        } else {
            Some(term.to_string())
        }
    }

    /// Fetch the page the view currently wants, through the cache. Stale
    /// resolutions (the desired key changed while the fetch was in flight)
    /// are discarded by the view; the previous page stays visible either way.
    pub async fn refresh(&self) -> Result<Arc<NotePage>, ApiError> {
        let effective = self.effective_search();
        let key = self.view.desired_key(self.per_page, effective.as_deref());

        let api = self.api.clone();
        let fetch_key = key.clone();
        let result = self
            .cache
            .fetch(&key, move || async move {
                api.list(
                    fetch_key.page,
                    fetch_key.per_page,
                    fetch_key.search_term(),
                    None,
                )
                .await
            })
            .await;

        match result {
            Ok(page) => {
                self.view.apply_result(&key, page.clone());
                Ok(page)
            }
            Err(err) => {
                log::warn!("[SESSION] list fetch failed for {:?}: {}", key, err);
                Err(err)
            }
        }
    }

    /// Create a note. Local validation runs before the mutation starts (and
    /// before any network call), so field errors surface inline without
    /// touching the machine. Returns `Ok(None)` when a create is already
    /// pending - the submission is suppressed, mirroring a disabled submit
    /// control.
    pub async fn create_note(&self, draft: &NoteDraft) -> Result<Option<Note>, ApiError> {
        draft.validate().map_err(ApiError::Validation)?;

        if !self.create_mutation.try_begin() {
            log::debug!("[SESSION] create suppressed: another create is pending");
            return Ok(None);
        }

        match self.api.create(draft).await {
            Ok(note) => {
                self.cache.invalidate_all();
                self.view.on_create_succeeded();
                self.create_mutation.succeed();
                log::info!("[SESSION] created note {}", note.id);
                Ok(Some(note))
            }
            Err(err) => {
                self.create_mutation.fail(err.clone());
                Err(err)
            }
        }
    }

    /// Delete a note. Returns `Ok(None)` when a delete is already pending -
    /// in particular, a second delete for the same id issues no request.
    pub async fn delete_note(&self, id: &str) -> Result<Option<Note>, ApiError> {
        if !self.delete_mutation.try_begin() {
            log::debug!("[SESSION] delete of {} suppressed: a delete is pending", id);
            return Ok(None);
        }
        *self.lock_deleting_id() = Some(id.to_string());

        let result = self.api.delete(id).await;
        *self.lock_deleting_id() = None;

        match result {
            Ok(note) => {
                self.cache.invalidate_all();
                self.delete_mutation.succeed();
                log::info!("[SESSION] deleted note {}", note.id);
                Ok(Some(note))
            }
            Err(err) => {
                if err.is_not_found() {
                    log::warn!("[SESSION] note {} no longer exists server-side", id);
                }
                self.delete_mutation.fail(err.clone());
                Err(err)
            }
        }
    }

    /// The id currently being deleted, if any.
    pub fn deleting_id(&self) -> Option<String> {
        self.lock_deleting_id().clone()
    }

    fn lock_deleting_id(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.deleting_id.lock().unwrap_or_else(|e| e.into_inner())
    }
}
