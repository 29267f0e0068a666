mod mutation;
mod session;
mod view_state;

pub use mutation::{MutationState, MutationTracker};
pub use session::NotesSession;
pub use view_state::{PageOutOfRange, ViewState};
