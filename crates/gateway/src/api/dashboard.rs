//! Dashboard endpoints: chart-ready wellness history and task editing.
//!
//! - `GET /v1/dashboard?type=entries|daily` — last 7 raw entries, or last
//!   7 calendar days averaged
//! - `GET /v1/dashboard/tasks` — current task list
//! - `PUT /v1/dashboard/tasks` — replace the task list (manual edits)

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use mitra_domain::wellness::{TaskCategory, TaskItem, TaskPriority};
use mitra_storage::{MetricsRecord, ScreeningRecord};

use crate::api::auth::UserId;
use crate::api::error::internal_error;
use crate::i18n;
use crate::state::AppState;

/// How many entries (or days) a dashboard window shows.
const WINDOW: usize = 7;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request shapes
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    #[serde(default, rename = "type")]
    pub mode: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTasksRequest {
    pub tasks: Vec<TaskEdit>,
}

/// One manually edited task. Priority and category are strict enums
/// here — a manual edit with a bad value is rejected, unlike lenient
/// parsing of generated tasks.
#[derive(Debug, Deserialize)]
pub struct TaskEdit {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub category: TaskCategory,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Chart rows
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, PartialEq)]
struct MetricsRow {
    date: NaiveDate,
    stress_level: f64,
    happiness_level: f64,
    anxiety_level: f64,
    overall_mood_level: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct ScreeningRow {
    date: NaiveDate,
    phq9_score: f64,
    gad7_score: f64,
    ghq_score: f64,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Last `WINDOW` raw metrics entries, chronological.
fn metrics_entries(records: &[MetricsRecord]) -> Vec<MetricsRow> {
    let skip = records.len().saturating_sub(WINDOW);
    records[skip..]
        .iter()
        .map(|r| MetricsRow {
            date: r.created_at.date_naive(),
            stress_level: r.metrics.stress_level,
            happiness_level: r.metrics.happiness_level,
            anxiety_level: r.metrics.anxiety_level,
            overall_mood_level: r.metrics.overall_mood_level,
        })
        .collect()
}

/// Per-day averages over the last `WINDOW` distinct days, chronological.
fn metrics_daily(records: &[MetricsRecord]) -> Vec<MetricsRow> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&MetricsRecord>> = BTreeMap::new();
    for r in records {
        by_day.entry(r.created_at.date_naive()).or_default().push(r);
    }
    let days: Vec<_> = by_day.into_iter().collect();
    let skip = days.len().saturating_sub(WINDOW);
    days[skip..]
        .iter()
        .map(|(date, rs)| {
            let n = rs.len() as f64;
            MetricsRow {
                date: *date,
                stress_level: round2(rs.iter().map(|r| r.metrics.stress_level).sum::<f64>() / n),
                happiness_level: round2(
                    rs.iter().map(|r| r.metrics.happiness_level).sum::<f64>() / n,
                ),
                anxiety_level: round2(rs.iter().map(|r| r.metrics.anxiety_level).sum::<f64>() / n),
                overall_mood_level: round2(
                    rs.iter().map(|r| r.metrics.overall_mood_level).sum::<f64>() / n,
                ),
            }
        })
        .collect()
}

fn screening_entries(records: &[ScreeningRecord]) -> Vec<ScreeningRow> {
    let skip = records.len().saturating_sub(WINDOW);
    records[skip..]
        .iter()
        .map(|r| ScreeningRow {
            date: r.created_at.date_naive(),
            phq9_score: r.screening.phq9_score,
            gad7_score: r.screening.gad7_score,
            ghq_score: r.screening.ghq_score,
        })
        .collect()
}

fn screening_daily(records: &[ScreeningRecord]) -> Vec<ScreeningRow> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&ScreeningRecord>> = BTreeMap::new();
    for r in records {
        by_day.entry(r.created_at.date_naive()).or_default().push(r);
    }
    let days: Vec<_> = by_day.into_iter().collect();
    let skip = days.len().saturating_sub(WINDOW);
    days[skip..]
        .iter()
        .map(|(date, rs)| {
            let n = rs.len() as f64;
            ScreeningRow {
                date: *date,
                phq9_score: round2(rs.iter().map(|r| r.screening.phq9_score).sum::<f64>() / n),
                gad7_score: round2(rs.iter().map(|r| r.screening.gad7_score).sum::<f64>() / n),
                ghq_score: round2(rs.iter().map(|r| r.screening.ghq_score).sum::<f64>() / n),
            }
        })
        .collect()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET /v1/dashboard
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn get_dashboard(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(query): Query<DashboardQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let session_lang = state.sessions.get(&user_id).map(|s| s.language);
    let lang = i18n::resolve_lang(query.lang.as_deref(), session_lang, &headers);
    let mode = query.mode.as_deref().unwrap_or("entries");

    let metrics_records = match state.metrics.all(&user_id) {
        Ok(r) => r,
        Err(e) => return internal_error(e),
    };
    let screening_records = match state.screenings.all(&user_id) {
        Ok(r) => r,
        Err(e) => return internal_error(e),
    };

    let (metrics_rows, screening_rows) = if mode == "daily" {
        (
            metrics_daily(&metrics_records),
            screening_daily(&screening_records),
        )
    } else {
        (
            metrics_entries(&metrics_records),
            screening_entries(&screening_records),
        )
    };

    let chart_labels: Vec<String> = if metrics_rows.is_empty() && screening_rows.is_empty() {
        vec![i18n::no_data(lang).to_owned()]
    } else {
        let longer = metrics_rows.len().max(screening_rows.len());
        (0..longer)
            .map(|i| {
                metrics_rows
                    .get(i)
                    .map(|r| r.date)
                    .or_else(|| screening_rows.get(i).map(|r| r.date))
                    .map(|d| d.to_string())
                    .unwrap_or_default()
            })
            .collect()
    };

    let todos = match state.tasks.get(&user_id) {
        Ok(list) => list.map(|l| l.tasks).unwrap_or_default(),
        Err(e) => return internal_error(e),
    };

    let n = metrics_rows.len() as f64;
    let avg = |f: fn(&MetricsRow) -> f64| {
        if metrics_rows.is_empty() {
            0.0
        } else {
            round2(metrics_rows.iter().map(f).sum::<f64>() / n)
        }
    };
    let summary = serde_json::json!({
        "total_entries": metrics_rows.len(),
        "average_stress": avg(|r| r.stress_level),
        "average_happiness": avg(|r| r.happiness_level),
        "average_anxiety": avg(|r| r.anxiety_level),
        "completed_tasks": todos.iter().filter(|t| t.completed).count(),
        "total_tasks": todos.len(),
    });

    Json(serde_json::json!({
        "chart_labels": chart_labels,
        "chart_data": {
            "stress_level": metrics_rows.iter().map(|r| r.stress_level).collect::<Vec<_>>(),
            "happiness_level": metrics_rows.iter().map(|r| r.happiness_level).collect::<Vec<_>>(),
            "anxiety_level": metrics_rows.iter().map(|r| r.anxiety_level).collect::<Vec<_>>(),
            "overall_mood_level": metrics_rows.iter().map(|r| r.overall_mood_level).collect::<Vec<_>>(),
            "phq9_score": screening_rows.iter().map(|r| r.phq9_score).collect::<Vec<_>>(),
            "gad7_score": screening_rows.iter().map(|r| r.gad7_score).collect::<Vec<_>>(),
            "ghq_score": screening_rows.iter().map(|r| r.ghq_score).collect::<Vec<_>>(),
        },
        "todos": todos,
        "summary": summary,
        "mode": mode,
        "language": lang,
        "labels": i18n::metric_labels(lang),
    }))
    .into_response()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GET / PUT /v1/dashboard/tasks
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn get_tasks(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(query): Query<DashboardQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let session_lang = state.sessions.get(&user_id).map(|s| s.language);
    let lang = i18n::resolve_lang(query.lang.as_deref(), session_lang, &headers);

    let tasks = match state.tasks.get(&user_id) {
        Ok(list) => list.map(|l| l.tasks).unwrap_or_default(),
        Err(e) => return internal_error(e),
    };

    Json(serde_json::json!({
        "tasks": tasks,
        "language": lang,
        "labels": i18n::todo_labels(lang),
    }))
    .into_response()
}

pub async fn update_tasks(
    State(state): State<AppState>,
    UserId(user_id): UserId,
    Query(query): Query<DashboardQuery>,
    headers: HeaderMap,
    Json(body): Json<UpdateTasksRequest>,
) -> impl IntoResponse {
    let session_lang = state.sessions.get(&user_id).map(|s| s.language);
    let lang = i18n::resolve_lang(query.lang.as_deref(), session_lang, &headers);

    let mut tasks = Vec::with_capacity(body.tasks.len());
    for edit in body.tasks {
        let title = edit.title.trim();
        if title.is_empty() || title.chars().count() > 200 {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": "task titles must be 1-200 characters"
                })),
            )
                .into_response();
        }
        tasks.push(TaskItem {
            id: edit.id.unwrap_or_else(Uuid::new_v4),
            title: title.to_owned(),
            completed: edit.completed,
            priority: edit.priority,
            category: edit.category,
        });
    }

    match state.tasks.upsert(&user_id, tasks, lang) {
        Ok(list) => Json(serde_json::json!({
            "tasks": list.tasks,
            "language": lang,
        }))
        .into_response(),
        Err(e) => internal_error(e),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mitra_domain::wellness::MetricsSample;

    fn record(day: u32, stress: f64) -> MetricsRecord {
        let mut r = MetricsRecord::new(
            "u1",
            "msg",
            MetricsSample {
                stress_level: stress,
                happiness_level: 10.0,
                anxiety_level: 5.0,
                overall_mood_level: 20.0,
            },
            false,
        );
        r.created_at = Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap();
        r
    }

    #[test]
    fn entries_takes_last_seven_chronological() {
        let records: Vec<MetricsRecord> = (1..=10).map(|d| record(d, d as f64)).collect();
        let rows = metrics_entries(&records);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].stress_level, 4.0);
        assert_eq!(rows[6].stress_level, 10.0);
    }

    #[test]
    fn daily_averages_same_day_records() {
        let records = vec![record(1, 10.0), record(1, 20.0), record(2, 40.0)];
        let rows = metrics_daily(&records);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].stress_level, 15.0);
        assert_eq!(rows[1].stress_level, 40.0);
    }

    #[test]
    fn daily_window_keeps_most_recent_days() {
        let records: Vec<MetricsRecord> = (1..=9).map(|d| record(d, d as f64)).collect();
        let rows = metrics_daily(&records);
        assert_eq!(rows.len(), 7);
        assert_eq!(
            rows[0].date,
            NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()
        );
        assert_eq!(
            rows[6].date,
            NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
        );
    }

    #[test]
    fn daily_averages_are_rounded_to_two_places() {
        let records = vec![record(1, 10.0), record(1, 10.0), record(1, 11.0)];
        let rows = metrics_daily(&records);
        assert_eq!(rows[0].stress_level, 10.33);
    }

    #[test]
    fn empty_records_produce_no_rows() {
        assert!(metrics_entries(&[]).is_empty());
        assert!(metrics_daily(&[]).is_empty());
        assert!(screening_entries(&[]).is_empty());
        assert!(screening_daily(&[]).is_empty());
    }
}
