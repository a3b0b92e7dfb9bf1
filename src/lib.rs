pub mod config;
pub mod handler;
pub mod payload;
pub mod transport;
pub mod ui;
pub mod verdict;
pub use config::ClientConfig;
pub use handler::{Completion, SentimentRequestHandler};
pub use transport::{HttpReply, HttpTransport, Transport, TransportError};
pub use ui::{Document, Element, UiError, UiPort};
pub use verdict::{Decision, IgnoreReason, Rendition, Tone};

use thiserror::Error;

/// Faults a single invocation can raise. Everything else settles as a
/// silent [`Completion::Ignored`].
#[derive(Error, Debug)]
pub enum SentimentError {
    #[error("UI lookup failed: {0}")]
    Ui(#[from] UiError),
    #[error("Failed to encode request: {0}")]
    Encode(serde_json::Error),
    #[error("Malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),
    #[error("Response body is null")]
    NullBody,
}
