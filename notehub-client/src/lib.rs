//! Client-side engine for the NoteHub notes service.
//!
//! Lists, paginates, searches, creates, and deletes notes against the remote
//! API, keeping a session-scoped query cache, a debounced search term, and
//! the view state (page, raw search, modal flag) mutually consistent. The
//! remote service is the sole source of truth; every local view is a
//! disposable cache of it. Rendering is left to the frontend: the crate
//! exposes observable state instead.

pub mod api;
pub mod app;
pub mod config;
pub mod debounce;
pub mod error;
pub mod http;
pub mod models;
pub mod query;
