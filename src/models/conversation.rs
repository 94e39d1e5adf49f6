use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::Sender;

/// One row of the insert-only chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub conversation_id: String,
    pub patient_id: i64,
    pub content: String,
    pub sender: Sender,
    pub timestamp: NaiveDateTime,
}

/// One user/assistant turn handed to the external model as short-term
/// context, in the wire shape the Colab endpoint expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub message: String,
    #[serde(rename = "type")]
    pub sender: Sender,
    pub timestamp: String,
}

impl From<&ChatMessage> for HistoryTurn {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            message: msg.content.clone(),
            sender: msg.sender,
            timestamp: msg.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}
