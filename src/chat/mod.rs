// chat/ — Session state, prompt assembly, and turn orchestration.

pub mod pipeline;
pub mod prompt;
pub mod session;

pub use pipeline::{AnswerLanguage, Assistant};
pub use session::ChatSession;
