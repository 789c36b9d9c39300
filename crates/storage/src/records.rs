//! Persisted wellness record shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mitra_domain::wellness::{MetricsSample, ScreeningSample};

/// One metrics data point, appended per turn.
///
/// `fallback` marks records whose values came from provider-failure
/// defaults rather than a real extraction, so trend analysis can
/// distinguish phantom zeros from genuine readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub id: Uuid,
    pub user_id: String,
    /// The user message the sample was derived from.
    pub message: String,
    #[serde(flatten)]
    pub metrics: MetricsSample,
    #[serde(default)]
    pub fallback: bool,
    pub created_at: DateTime<Utc>,
}

impl MetricsRecord {
    pub fn new(
        user_id: impl Into<String>,
        message: impl Into<String>,
        metrics: MetricsSample,
        fallback: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            message: message.into(),
            metrics,
            fallback,
            created_at: Utc::now(),
        }
    }
}

/// One screening data point, appended per turn. Same fallback tagging
/// as [`MetricsRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningRecord {
    pub id: Uuid,
    pub user_id: String,
    pub message: String,
    #[serde(flatten)]
    pub screening: ScreeningSample,
    #[serde(default)]
    pub fallback: bool,
    pub created_at: DateTime<Utc>,
}

impl ScreeningRecord {
    pub fn new(
        user_id: impl Into<String>,
        message: impl Into<String>,
        screening: ScreeningSample,
        fallback: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            message: message.into(),
            screening,
            fallback,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_record_flattens_sample_fields() {
        let record = MetricsRecord::new(
            "u1",
            "rough day",
            MetricsSample {
                stress_level: 30.0,
                happiness_level: 5.0,
                anxiety_level: 20.0,
                overall_mood_level: 12.0,
            },
            false,
        );
        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v["stress_level"], 30.0);
        assert_eq!(v["fallback"], false);
        assert!(v.get("metrics").is_none());
    }

    #[test]
    fn screening_record_roundtrip() {
        let record = ScreeningRecord::new("u1", "msg", ScreeningSample::default(), true);
        let json = serde_json::to_string(&record).unwrap();
        let back: ScreeningRecord = serde_json::from_str(&json).unwrap();
        assert!(back.fallback);
        assert_eq!(back.screening.phq9_score, 0.0);
    }
}
