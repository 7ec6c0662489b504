//! The submission workflow: the analysis pipeline, its observable status
//! projection, the instruction prompt, stored-record retrieval, and the HTTP
//! handlers tying them together.

pub mod handlers;
pub mod listing;
pub mod pipeline;
pub mod prompts;
pub mod status;
