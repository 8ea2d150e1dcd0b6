//! Retrieval-augmented answering over the vector store.

pub mod answer;
pub mod types;

pub use answer::{answer, summarize};
pub use types::{Answer, AnswerOptions};
