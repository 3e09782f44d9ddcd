// Resume feedback: normalization of stored AI output, score classification and
// the view models the review pages render from them.

pub mod classify;
pub mod models;
pub mod normalize;
pub mod prompts;
pub mod views;
