mod note;

pub use note::{CONTENT_MAX_CHARS, Note, NoteDraft, NoteTag, TITLE_MAX_CHARS, TITLE_MIN_CHARS};
