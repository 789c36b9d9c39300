//! Therapist directory endpoints.
//!
//! Public: application submission and the accepted-therapist directory.
//! Admin: full listing, status moderation (single and bulk), deletion.

use std::sync::OnceLock;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;

use mitra_domain::error::Error;
use mitra_domain::therapist::{Availability, TherapistDraft, TherapistStatus};

use crate::api::error::{api_error, internal_error};
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request shapes & validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct TherapistApplication {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialization: String,
    pub experience_years: u8,
    #[serde(default)]
    pub qualifications: String,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub bio: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: TherapistStatus,
}

#[derive(Debug, Deserialize)]
pub struct BulkStatusUpdate {
    pub ids: Vec<Uuid>,
    pub status: TherapistStatus,
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{10}$").unwrap())
}

/// Validate an application, returning either a storable draft or the
/// full list of field problems.
fn validate(app: TherapistApplication) -> Result<TherapistDraft, Vec<String>> {
    let mut problems = Vec::new();

    let name = app.name.trim().to_owned();
    if name.chars().count() < 3 || name.chars().count() > 100 {
        problems.push("name must be 3-100 characters".to_owned());
    }

    let email = app.email.trim().to_ascii_lowercase();
    if !email_re().is_match(&email) {
        problems.push("email must be a valid address".to_owned());
    }

    let phone = app.phone.trim().to_owned();
    if !phone_re().is_match(&phone) {
        problems.push("phone must be 10 digits".to_owned());
    }

    let specialization = app.specialization.trim().to_owned();
    if specialization.is_empty() || specialization.chars().count() > 100 {
        problems.push("specialization must be 1-100 characters".to_owned());
    }

    if app.experience_years > 70 {
        problems.push("experience_years must be 0-70".to_owned());
    }
    if app.qualifications.chars().count() > 500 {
        problems.push("qualifications cannot exceed 500 characters".to_owned());
    }
    if app.bio.chars().count() > 1000 {
        problems.push("bio cannot exceed 1000 characters".to_owned());
    }

    if !problems.is_empty() {
        return Err(problems);
    }

    Ok(TherapistDraft {
        name,
        email,
        phone,
        specialization,
        experience_years: app.experience_years,
        qualifications: app.qualifications.trim().to_owned(),
        availability: app.availability,
        bio: app.bio.trim().to_owned(),
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Public endpoints
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `POST /v1/therapists` — submit an application.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<TherapistApplication>,
) -> impl IntoResponse {
    let draft = match validate(body) {
        Ok(d) => d,
        Err(problems) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "invalid therapist data",
                    "details": problems,
                })),
            )
                .into_response();
        }
    };

    match state.therapists.create(draft) {
        Ok(therapist) => {
            tracing::info!(email = %therapist.email, "new therapist application");
            (
                StatusCode::CREATED,
                Json(serde_json::json!({ "therapist": therapist })),
            )
                .into_response()
        }
        Err(Error::Invalid(msg)) => api_error(StatusCode::CONFLICT, msg),
        Err(e) => internal_error(e),
    }
}

/// `GET /v1/therapists` — the public directory (accepted only).
pub async fn list_accepted(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "therapists": state.therapists.list_accepted() }))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Admin endpoints
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `GET /v1/admin/therapists` — every application, newest first.
pub async fn list_all(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "therapists": state.therapists.list_all() }))
}

/// `PUT /v1/admin/therapists/:id/status`
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusUpdate>,
) -> impl IntoResponse {
    match state.therapists.update_status(id, body.status) {
        Ok(therapist) => Json(serde_json::json!({ "therapist": therapist })).into_response(),
        Err(Error::NotFound(msg)) => api_error(StatusCode::NOT_FOUND, msg),
        Err(e) => internal_error(e),
    }
}

/// `PUT /v1/admin/therapists/status` — bulk moderation.
pub async fn bulk_update_status(
    State(state): State<AppState>,
    Json(body): Json<BulkStatusUpdate>,
) -> impl IntoResponse {
    if body.ids.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "ids must be non-empty");
    }
    match state.therapists.bulk_update_status(&body.ids, body.status) {
        Ok(updated) => Json(serde_json::json!({ "updated": updated })).into_response(),
        Err(e) => internal_error(e),
    }
}

/// `DELETE /v1/admin/therapists/:id`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state.therapists.delete(id) {
        Ok(()) => Json(serde_json::json!({ "deleted": id })).into_response(),
        Err(Error::NotFound(msg)) => api_error(StatusCode::NOT_FOUND, msg),
        Err(e) => internal_error(e),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    fn application() -> TherapistApplication {
        TherapistApplication {
            name: "Dr. Meera Das".into(),
            email: "Meera@Example.com".into(),
            phone: "9876543210".into(),
            specialization: "Trauma counselling".into(),
            experience_years: 12,
            qualifications: String::new(),
            availability: Availability::Weekends,
            bio: String::new(),
        }
    }

    #[test]
    fn valid_application_normalizes_email() {
        let draft = validate(application()).unwrap();
        assert_eq!(draft.email, "meera@example.com");
        assert_eq!(draft.availability, Availability::Weekends);
    }

    #[test]
    fn collects_every_field_problem() {
        let app = TherapistApplication {
            name: "ab".into(),
            email: "not-an-email".into(),
            phone: "123".into(),
            specialization: String::new(),
            experience_years: 90,
            qualifications: "q".repeat(501),
            availability: Availability::Flexible,
            bio: "b".repeat(1001),
        };
        let problems = validate(app).unwrap_err();
        assert_eq!(problems.len(), 7);
    }

    #[test]
    fn phone_must_be_exactly_ten_digits() {
        let mut app = application();
        app.phone = "98765432100".into();
        assert!(validate(app).is_err());

        let mut app = application();
        app.phone = "98765 4321".into();
        assert!(validate(app).is_err());
    }
}
