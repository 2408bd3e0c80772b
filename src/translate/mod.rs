//! Transcript translation: phrase grouping, retry, word redistribution.

pub mod phrase;
pub mod retry;
