use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::enums::Sender;
use crate::models::ChatMessage;

/// How many history rows are handed to the assistant as context.
pub const HISTORY_WINDOW: usize = 20;

pub fn insert_message(
    conn: &Connection,
    conversation_id: &str,
    patient_id: i64,
    content: &str,
    sender: Sender,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO chat_history (conversation_id, patient_id, message, sender, timestamp)
         VALUES (?1, ?2, ?3, ?4, datetime('now'))",
        params![conversation_id, patient_id, content, sender.as_str()],
    )?;
    Ok(())
}

/// Fetch the last `HISTORY_WINDOW` messages of a conversation, oldest
/// first.
pub fn get_recent_messages(
    conn: &Connection,
    conversation_id: &str,
    patient_id: i64,
) -> Result<Vec<ChatMessage>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT conversation_id, patient_id, message, sender, timestamp
         FROM chat_history
         WHERE conversation_id = ?1 AND patient_id = ?2
         ORDER BY timestamp DESC, id DESC
         LIMIT ?3",
    )?;

    let rows = stmt.query_map(
        params![conversation_id, patient_id, HISTORY_WINDOW as i64],
        |row| {
            Ok(MessageRow {
                conversation_id: row.get(0)?,
                patient_id: row.get(1)?,
                content: row.get(2)?,
                sender: row.get(3)?,
                timestamp: row.get(4)?,
            })
        },
    )?;

    let mut messages = Vec::new();
    for row in rows {
        messages.push(message_from_row(row?)?);
    }
    // Rows were fetched newest-first to apply the window; callers want
    // insertion order.
    messages.reverse();
    Ok(messages)
}

struct MessageRow {
    conversation_id: String,
    patient_id: i64,
    content: String,
    sender: String,
    timestamp: String,
}

fn message_from_row(row: MessageRow) -> Result<ChatMessage, DatabaseError> {
    Ok(ChatMessage {
        conversation_id: row.conversation_id,
        patient_id: row.patient_id,
        content: row.content,
        sender: Sender::from_str(&row.sender)?,
        timestamp: NaiveDateTime::parse_from_str(&row.timestamp, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;

    #[test]
    fn insert_and_read_back_in_order() {
        let conn = open_memory_database().unwrap();
        insert_message(&conn, "conv_1", 7, "bonjour", Sender::User).unwrap();
        insert_message(&conn, "conv_1", 7, "Bonjour, décrivez vos symptômes.", Sender::Assistant)
            .unwrap();

        let messages = get_recent_messages(&conn, "conv_1", 7).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].sender, Sender::User);
        assert_eq!(messages[1].sender, Sender::Assistant);
    }

    #[test]
    fn history_scoped_to_patient() {
        let conn = open_memory_database().unwrap();
        insert_message(&conn, "conv_1", 7, "msg patient 7", Sender::User).unwrap();
        insert_message(&conn, "conv_1", 8, "msg patient 8", Sender::User).unwrap();

        let messages = get_recent_messages(&conn, "conv_1", 7).unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content, "msg patient 7");
    }

    #[test]
    fn window_keeps_most_recent_rows() {
        let conn = open_memory_database().unwrap();
        for i in 0..(HISTORY_WINDOW + 5) {
            insert_message(&conn, "conv_1", 7, &format!("message {i}"), Sender::User).unwrap();
        }

        let messages = get_recent_messages(&conn, "conv_1", 7).unwrap();
        assert_eq!(messages.len(), HISTORY_WINDOW);
        // Oldest rows fell out of the window
        assert_eq!(messages.last().unwrap().content, "message 24");
        assert_eq!(messages[0].content, "message 5");
    }

    #[test]
    fn unknown_conversation_is_empty() {
        let conn = open_memory_database().unwrap();
        let messages = get_recent_messages(&conn, "conv_missing", 1).unwrap();
        assert!(messages.is_empty());
    }
}
