//! Patient identity middleware for the authenticated route group.
//!
//! Authentication itself lives at the platform gateway; this service
//! trusts the `X-Patient-Id` header the gateway injects and turns it
//! into a typed `PatientContext`. Absent or malformed ids are rejected
//! before any handler runs.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::error::ApiError;
use crate::api::types::PatientContext;

pub const PATIENT_ID_HEADER: &str = "x-patient-id";

pub async fn require_patient(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let patient_id = request
        .headers()
        .get(PATIENT_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or(ApiError::Unauthorized)?;

    request
        .extensions_mut()
        .insert(PatientContext { patient_id });
    Ok(next.run(request).await)
}
