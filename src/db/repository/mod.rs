pub mod chat_history;
pub mod feedback;
pub mod suggestion;
