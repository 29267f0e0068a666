//! Wire types for the NoteHub list endpoint.

use serde::{Deserialize, Serialize};

use crate::models::Note;

/// One page of notes as returned by `GET /notes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePage {
    pub notes: Vec<Note>,
    pub total_pages: u32,
}
