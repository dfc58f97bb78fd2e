// providers/ — External collaborators behind narrow interfaces.
//
// The LLM is a required dependency: its failures are hard errors. Everything
// else (geolocation, weather, translation) is best-effort and reports
// Unavailable instead of failing the chat turn.

pub mod gemini;
pub mod geo;
pub mod translate;
pub mod weather;

pub use gemini::{GeminiClient, TextGenerator};
pub use geo::Location;
pub use translate::{GoogleTranslator, Translator};
pub use weather::WeatherReport;

/// Outcome of a best-effort lookup.
///
/// Unlike a swallowed error mapped straight to a default, the unavailable
/// case stays visible to callers and tests; the caller decides what
/// degraded behavior looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability<T> {
    Available(T),
    Unavailable,
}

impl<T> Availability<T> {
    pub fn available(self) -> Option<T> {
        match self {
            Availability::Available(v) => Some(v),
            Availability::Unavailable => None,
        }
    }
}
