//! Errors raised while highlighting a code block.

use thiserror::Error;

/// Errors that can occur while rendering a code block.
///
/// None of these are recovered locally: a failing block fails the render
/// that asked for it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HighlightError {
    /// The engine has no grammar for the requested language.
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    /// The engine has no theme with the requested name.
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// Extra grammars or themes could not be loaded.
    #[error("Failed to load highlighting assets: {0}")]
    Assets(String),

    /// The engine failed while rendering.
    #[error("Failed to render code block: {0}")]
    Render(String),

    /// The highlight worker is gone or dropped the request.
    #[error("Highlight worker unavailable: {0}")]
    WorkerUnavailable(String),
}
