// src/error.rs
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by a [`DomSource`](crate::core::dom::DomSource).
#[derive(Debug, Error)]
pub enum DomError {
    /// The handle no longer resolves: the node was re-rendered or removed.
    #[error("element no longer attached: {0}")]
    Detached(String),
    /// Another element sits on top of the target at its click point.
    #[error("click intercepted on {0}")]
    Intercepted(String),
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },
    #[error("browser launch failed: {0}")]
    Launch(String),
    #[error("browser error: {0}")]
    Driver(String),
}

pub type DomResult<T> = Result<T, DomError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Dom(#[from] DomError),

    /// A page-level element the scraper cannot continue without.
    #[error("required element missing: {0}")]
    MissingElement(String),

    #[error("{field} of '{entity}' is not a number: {text:?}")]
    MalformedNumber {
        entity: String,
        field: &'static str,
        text: String,
    },

    #[error("failed to write {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid options file {}: {reason}", path.display())]
    Options { path: PathBuf, reason: String },
}
