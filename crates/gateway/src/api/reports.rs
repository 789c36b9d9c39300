//! Report endpoints: a JSON wellness summary and a CSV export.
//!
//! - `GET /v1/report`     — summary statistics, trends, recommendations
//! - `GET /v1/report/csv` — the raw per-turn history, server-rendered CSV

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Json};
use serde::Serialize;

use mitra_domain::wellness::RiskLevel;
use mitra_storage::{MetricsRecord, ScreeningRecord};

use crate::api::auth::UserId;
use crate::api::error::internal_error;
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Statistics helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Trend {
    Improving,
    Stable,
    Declining,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Classify the trajectory of a series by comparing the mean of its
/// first half against its second half, with a 10% dead zone. For
/// stress-like metrics a *drop* is an improvement (`higher_is_better =
/// false`); for happiness-like metrics the opposite.
fn trend_of(values: &[f64], higher_is_better: bool) -> Trend {
    if values.len() < 4 {
        return Trend::Stable;
    }
    let mid = values.len() / 2;
    let first = mean(&values[..mid]);
    let second = mean(&values[mid..]);
    let dead_zone = (first.abs() * 0.1).max(1.0);
    let delta = second - first;
    if delta.abs() <= dead_zone {
        return Trend::Stable;
    }
    let rising = delta > 0.0;
    if rising == higher_is_better {
        Trend::Improving
    } else {
        Trend::Declining
    }
}

/// Coarse overall risk from average screening scores: standard PHQ-9 and
/// GAD-7 moderate/severe cutoffs.
fn overall_risk(avg_phq9: f64, avg_gad7: f64) -> RiskLevel {
    if avg_phq9 >= 15.0 || avg_gad7 >= 15.0 {
        RiskLevel::High
    } else if avg_phq9 >= 10.0 || avg_gad7 >= 10.0 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

fn recommendations(
    avg_stress: f64,
    avg_happiness: f64,
    avg_anxiety: f64,
    risk: RiskLevel,
) -> Vec<&'static str> {
    let mut recs = Vec::new();
    if avg_stress > 30.0 {
        recs.push("Your stress levels have been elevated. Consider scheduling short daily breaks and breathing exercises.");
    }
    if avg_anxiety > 25.0 {
        recs.push("Anxiety has been running high. Grounding techniques and limiting caffeine can help.");
    }
    if avg_happiness < 15.0 {
        recs.push("Happiness has been low. Try planning one small enjoyable activity each day.");
    }
    if risk != RiskLevel::Low {
        recs.push("Your screening estimates suggest talking to a professional counselor would be worthwhile.");
    }
    if recs.is_empty() {
        recs.push("Your wellness indicators look steady. Keep up the habits that are working for you.");
    }
    recs
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/report
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn get_report(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> impl IntoResponse {
    let metrics = match state.metrics.all(&user_id) {
        Ok(r) => r,
        Err(e) => return internal_error(e),
    };
    let screenings = match state.screenings.all(&user_id) {
        Ok(r) => r,
        Err(e) => return internal_error(e),
    };

    // Fallback records hold placeholder zeros, not readings — keep them
    // out of the statistics.
    let genuine_metrics: Vec<&MetricsRecord> = metrics.iter().filter(|r| !r.fallback).collect();
    let genuine_screenings: Vec<&ScreeningRecord> =
        screenings.iter().filter(|r| !r.fallback).collect();

    let stress: Vec<f64> = genuine_metrics.iter().map(|r| r.metrics.stress_level).collect();
    let happiness: Vec<f64> = genuine_metrics
        .iter()
        .map(|r| r.metrics.happiness_level)
        .collect();
    let anxiety: Vec<f64> = genuine_metrics
        .iter()
        .map(|r| r.metrics.anxiety_level)
        .collect();
    let mood: Vec<f64> = genuine_metrics
        .iter()
        .map(|r| r.metrics.overall_mood_level)
        .collect();
    let phq9: Vec<f64> = genuine_screenings
        .iter()
        .map(|r| r.screening.phq9_score)
        .collect();
    let gad7: Vec<f64> = genuine_screenings
        .iter()
        .map(|r| r.screening.gad7_score)
        .collect();
    let ghq: Vec<f64> = genuine_screenings
        .iter()
        .map(|r| r.screening.ghq_score)
        .collect();

    let avg_stress = round2(mean(&stress));
    let avg_happiness = round2(mean(&happiness));
    let avg_anxiety = round2(mean(&anxiety));
    let risk = overall_risk(mean(&phq9), mean(&gad7));

    let tasks = match state.tasks.get(&user_id) {
        Ok(list) => list.map(|l| l.tasks).unwrap_or_default(),
        Err(e) => return internal_error(e),
    };

    Json(serde_json::json!({
        "user_id": user_id,
        "generated_at": chrono::Utc::now(),
        "summary": {
            "total_entries": metrics.len(),
            "genuine_entries": genuine_metrics.len(),
            "fallback_entries": metrics.len() - genuine_metrics.len(),
            "average_stress": avg_stress,
            "average_happiness": avg_happiness,
            "average_anxiety": avg_anxiety,
            "average_mood": round2(mean(&mood)),
            "average_phq9": round2(mean(&phq9)),
            "average_gad7": round2(mean(&gad7)),
            "average_ghq": round2(mean(&ghq)),
            "risk_level": risk,
        },
        "trends": {
            "stress": trend_of(&stress, false),
            "happiness": trend_of(&happiness, true),
            "anxiety": trend_of(&anxiety, false),
            "mood": trend_of(&mood, true),
        },
        "recommendations": recommendations(avg_stress, avg_happiness, avg_anxiety, risk),
        "tasks": tasks,
    }))
    .into_response()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/report/csv
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Quote a CSV field when it contains a comma, quote, or newline.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

/// Render the metrics and screening journals as one CSV table. Records
/// are appended pairwise per turn, so rows are zipped by index.
fn render_csv(metrics: &[MetricsRecord], screenings: &[ScreeningRecord]) -> String {
    let mut out = String::from(
        "date,message,stress_level,happiness_level,anxiety_level,overall_mood_level,\
         phq9_score,gad7_score,ghq_score,risk_level,fallback\n",
    );
    for (i, m) in metrics.iter().enumerate() {
        let s = screenings.get(i);
        let (phq9, gad7, ghq, risk) = match s {
            Some(s) => (
                s.screening.phq9_score.to_string(),
                s.screening.gad7_score.to_string(),
                s.screening.ghq_score.to_string(),
                format!("{:?}", s.screening.risk_level).to_lowercase(),
            ),
            None => (String::new(), String::new(), String::new(), String::new()),
        };
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{}\n",
            m.created_at.to_rfc3339(),
            csv_escape(&m.message),
            m.metrics.stress_level,
            m.metrics.happiness_level,
            m.metrics.anxiety_level,
            m.metrics.overall_mood_level,
            phq9,
            gad7,
            ghq,
            risk,
            m.fallback,
        ));
    }
    out
}

pub async fn get_report_csv(
    State(state): State<AppState>,
    UserId(user_id): UserId,
) -> impl IntoResponse {
    let metrics = match state.metrics.all(&user_id) {
        Ok(r) => r,
        Err(e) => return internal_error(e),
    };
    let screenings = match state.screenings.all(&user_id) {
        Ok(r) => r,
        Err(e) => return internal_error(e),
    };

    let body = render_csv(&metrics, &screenings);
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"wellness-report.csv\"",
            ),
        ],
        body,
    )
        .into_response()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use mitra_domain::wellness::{MetricsSample, ScreeningSample};

    #[test]
    fn trend_needs_enough_points() {
        assert_eq!(trend_of(&[40.0, 10.0], false), Trend::Stable);
    }

    #[test]
    fn falling_stress_is_improving() {
        let values = [40.0, 38.0, 20.0, 18.0];
        assert_eq!(trend_of(&values, false), Trend::Improving);
    }

    #[test]
    fn falling_happiness_is_declining() {
        let values = [30.0, 28.0, 12.0, 10.0];
        assert_eq!(trend_of(&values, true), Trend::Declining);
    }

    #[test]
    fn small_drift_is_stable() {
        let values = [20.0, 21.0, 20.5, 21.5];
        assert_eq!(trend_of(&values, false), Trend::Stable);
    }

    #[test]
    fn risk_thresholds() {
        assert_eq!(overall_risk(3.0, 4.0), RiskLevel::Low);
        assert_eq!(overall_risk(11.0, 4.0), RiskLevel::Moderate);
        assert_eq!(overall_risk(3.0, 16.0), RiskLevel::High);
    }

    #[test]
    fn csv_escapes_embedded_punctuation() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn csv_zips_metrics_and_screenings() {
        let metrics = vec![MetricsRecord::new(
            "u1",
            "tough, long day",
            MetricsSample {
                stress_level: 30.0,
                happiness_level: 10.0,
                anxiety_level: 20.0,
                overall_mood_level: 15.0,
            },
            false,
        )];
        let screenings = vec![ScreeningRecord::new(
            "u1",
            "tough, long day",
            ScreeningSample::default(),
            false,
        )];
        let csv = render_csv(&metrics, &screenings);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("date,message,stress_level"));
        assert!(lines[1].contains("\"tough, long day\""));
        assert!(lines[1].contains("low"));
        assert!(lines[1].ends_with("false"));
    }

    #[test]
    fn default_recommendation_when_all_is_well() {
        let recs = recommendations(10.0, 30.0, 10.0, RiskLevel::Low);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].contains("steady"));
    }
}
