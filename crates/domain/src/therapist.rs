//! Therapist directory entries and the approval workflow status enum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Approval state of a therapist application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TherapistStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

/// Declared availability of a therapist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    FullTime,
    PartTime,
    Weekends,
    Evenings,
    #[default]
    Flexible,
}

/// A validated therapist application, ready to be stored. Field
/// constraints are enforced by the API layer before a draft is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TherapistDraft {
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

/// A therapist directory entry. Created from a public application and
/// moderated through the admin approval workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Therapist {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialization: String,
    pub experience_years: u8,
    #[serde(default)]
    pub qualifications: String,
    #[serde(default)]
    pub status: TherapistStatus,
    #[serde(default)]
    pub availability: Availability,
    #[serde(default)]
    pub bio: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_status_update: DateTime<Utc>,
}
