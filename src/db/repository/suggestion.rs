use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::StoredAnalysis;

/// Persist one analysis (symptoms + suggestions as JSON blobs) and
/// return its row id.
pub fn insert_analysis(
    conn: &Connection,
    patient_id: i64,
    symptoms: &[String],
    suggestions: &serde_json::Value,
    additional_info: Option<&str>,
) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO diagnosis_suggestions (patient_id, symptoms, suggestions, additional_info)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            patient_id,
            serde_json::to_string(symptoms)?,
            serde_json::to_string(suggestions)?,
            additional_info,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Last 20 analyses for a patient, newest first, with feedback
/// aggregates joined in.
pub fn get_history(conn: &Connection, patient_id: i64) -> Result<Vec<StoredAnalysis>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT ds.id, ds.symptoms, ds.suggestions, ds.additional_info, ds.created_at,
                AVG(df.rating) AS average_rating,
                COUNT(df.id) AS feedback_count
         FROM diagnosis_suggestions ds
         LEFT JOIN diagnosis_feedback df ON ds.id = df.suggestion_id
         WHERE ds.patient_id = ?1
         GROUP BY ds.id
         ORDER BY ds.created_at DESC, ds.id DESC
         LIMIT 20",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| {
        Ok(AnalysisRow {
            id: row.get(0)?,
            symptoms: row.get(1)?,
            suggestions: row.get(2)?,
            additional_info: row.get(3)?,
            created_at: row.get(4)?,
            average_rating: row.get(5)?,
            feedback_count: row.get(6)?,
        })
    })?;

    let mut history = Vec::new();
    for row in rows {
        history.push(analysis_from_row(row?)?);
    }
    Ok(history)
}

/// Check that a stored suggestion row belongs to the given patient.
pub fn analysis_belongs_to_patient(
    conn: &Connection,
    suggestion_id: i64,
    patient_id: i64,
) -> Result<bool, DatabaseError> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM diagnosis_suggestions WHERE id = ?1 AND patient_id = ?2",
            params![suggestion_id, patient_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

struct AnalysisRow {
    id: i64,
    symptoms: String,
    suggestions: String,
    additional_info: Option<String>,
    created_at: String,
    average_rating: Option<f64>,
    feedback_count: i64,
}

fn analysis_from_row(row: AnalysisRow) -> Result<StoredAnalysis, DatabaseError> {
    Ok(StoredAnalysis {
        id: row.id,
        symptoms: serde_json::from_str(&row.symptoms)?,
        suggestions: serde_json::from_str(&row.suggestions)?,
        additional_info: row.additional_info,
        created_at: NaiveDateTime::parse_from_str(&row.created_at, "%Y-%m-%d %H:%M:%S")
            .unwrap_or_default(),
        average_rating: row.average_rating,
        feedback_count: row.feedback_count,
    })
}
