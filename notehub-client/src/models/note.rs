//! Note domain types and client-side draft validation.
//!
//! Notes are immutable from the client's perspective except via create and
//! delete; timestamps are owned by the remote system and carried as opaque
//! strings.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};

use crate::error::{FieldError, ValidationError};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 50;
pub const CONTENT_MAX_CHARS: usize = 500;

/// Closed tag set owned by the remote API contract.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    AsRefStr,
    EnumIter,
)]
pub enum NoteTag {
    #[default]
    Todo,
    Work,
    Personal,
    Meeting,
    Shopping,
}

/// A note as stored by the remote service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Payload for creating a note, validated client-side before it is sent.
///
/// The pre-check is a convenience for inline form errors, not a substitute
/// for server-side validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, tag: NoteTag) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tag,
        }
    }

    /// Check the field constraints: title 3-50 chars, content up to 500 chars.
    /// Collects one error per violated field so forms can render them inline.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        let title_chars = self.title.chars().count();
        if title_chars < TITLE_MIN_CHARS {
            errors.push(FieldError {
                field: "title",
                message: format!("must be at least {} characters", TITLE_MIN_CHARS),
            });
        } else if title_chars > TITLE_MAX_CHARS {
            errors.push(FieldError {
                field: "title",
                message: format!("must be at most {} characters", TITLE_MAX_CHARS),
            });
        }

        let content_chars = self.content.chars().count();
        if content_chars > CONTENT_MAX_CHARS {
            errors.push(FieldError {
                field: "content",
                message: format!("must be at most {} characters", CONTENT_MAX_CHARS),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { errors })
        }
    }
}
