//! Input context seen by providers.
//!
//! The host owns the real input context; providers only ask it questions.
//! Today the only question is the language of the active input method, which
//! the spell provider uses to pick a dictionary.

/// Read-only view of the host's input context.
pub trait InputContext {
    /// Language code of the active input method (`"en"`, `"de_DE"`, ...).
    fn language_code(&self) -> Option<&str>;
}

/// Plain-data context for hosts and tests that have no richer object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryContext {
    pub language_code: Option<String>,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language<S: Into<String>>(language: S) -> Self {
        Self {
            language_code: Some(language.into()),
        }
    }
}

impl InputContext for QueryContext {
    fn language_code(&self) -> Option<&str> {
        self.language_code.as_deref()
    }
}
