//! External AI integration: the Colab-hosted model client, the manager
//! that fronts it, response enhancement, health monitoring and
//! performance metrics.

pub mod colab;
pub mod enhance;
pub mod manager;
pub mod metrics;
pub mod monitor;

pub use colab::{ChatReply, ChatRequest, ColabClient, ModelClient};
pub use manager::{AiManager, ManagedReply};

use thiserror::Error;

/// Failure taxonomy for the external AI boundary. Each kind carries a
/// distinct human-readable message; nothing downstream matches on
/// message strings.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("External AI service is not enabled. Set COLAB_ENABLED=true and COLAB_API_URL.")]
    Disabled,

    #[error("AI request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("AI endpoint returned error {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Cannot reach AI endpoint at {0}")]
    Connection(String),

    #[error("Invalid response from AI endpoint: {0}")]
    InvalidResponse(String),
}
