mod client;
mod types;

pub use client::{NotesApi, RemoteNotesClient};
pub use types::NotePage;
