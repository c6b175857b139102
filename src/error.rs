use thiserror::Error;

/// Shortest custom text accepted, counted in characters after trimming
pub const MIN_CUSTOM_TEXT_CHARS: usize = 10;

/// User-facing rejection of a custom practice text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Text must be at least {min} characters long (got {actual})")]
    CustomTextTooShort { min: usize, actual: usize },
}

/// Failures loading the embedded text bank
#[derive(Debug, Error)]
pub enum TextBankError {
    #[error("text bank resource not found: {0}")]
    Missing(String),
    #[error("text bank resource is not valid utf-8: {0}")]
    Encoding(String),
    #[error("unable to parse text bank {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("text bank {0} has no entries")]
    Empty(String),
}
