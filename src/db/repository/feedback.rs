use rusqlite::{params, Connection};

use crate::db::DatabaseError;

/// Record a patient's rating of a stored analysis.
///
/// Single atomic upsert: the UNIQUE(suggestion_id, patient_id)
/// constraint replaces the read-then-write pattern, so concurrent
/// submissions cannot race into duplicate rows.
pub fn upsert_feedback(
    conn: &Connection,
    suggestion_id: i64,
    patient_id: i64,
    rating: u8,
    feedback: Option<&str>,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO diagnosis_feedback (suggestion_id, patient_id, rating, feedback)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT (suggestion_id, patient_id)
         DO UPDATE SET rating = excluded.rating,
                       feedback = excluded.feedback,
                       created_at = datetime('now')",
        params![suggestion_id, patient_id, rating, feedback],
    )?;
    Ok(())
}
