// Resume review: the upload → analysis pipeline and the HTTP handlers over it.
// Storage, conversion and AI calls come in through the collaborators in AppState.

pub mod handlers;
pub mod pipeline;
