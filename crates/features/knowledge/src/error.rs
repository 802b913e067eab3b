use std::borrow::Cow;
use std::path::PathBuf;

/// Error types specific to loading and querying the knowledge base.
#[wspec_derive::wspec_error]
pub enum KnowledgeError {
    /// A knowledge file does not exist.
    #[error("Knowledge file not found{}: {}", format_context(.context), .path.display())]
    NotFound { path: PathBuf, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// YAML syntax or structure error.
    #[error("Parse error{}: {source}", format_context(.context))]
    Parse { source: serde_yaml::Error, context: Option<Cow<'static, str>> },

    #[error("JSON error{}: {source}", format_context(.context))]
    Json { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// A required top-level section is absent.
    #[error("Missing required section{}: {section}", format_context(.context))]
    MissingSection { section: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Identifiers listed as both critical and recommended for removal (strict mode only).
    #[error("Conflicting rules{}: {message}", format_context(.context))]
    Conflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Well-formed input that violates a knowledge file invariant.
    #[error("Invalid knowledge data{}: {message}", format_context(.context))]
    Invalid { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal knowledge error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl KnowledgeError {
    pub(crate) fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Invalid { message: message.into(), context: None }
    }
}
