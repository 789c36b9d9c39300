//! Wellness data extracted from conversation turns: emotional metrics,
//! standardized screening estimates, and suggested tasks.
//!
//! Everything here parses *untrusted* model output. The extraction
//! helpers accept numbers or numeric strings, clamp every value to its
//! declared range, and substitute defaults for anything missing or
//! malformed — they never fail.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Upper bound shared by all four emotional metrics.
pub const METRIC_MAX: f64 = 50.0;
/// PHQ-9 depression questionnaire maximum.
pub const PHQ9_MAX: f64 = 27.0;
/// GAD-7 anxiety questionnaire maximum.
pub const GAD7_MAX: f64 = 21.0;
/// GHQ general-health questionnaire maximum.
pub const GHQ_MAX: f64 = 36.0;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Metrics
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Per-turn emotional metric estimates, each in `[0, 50]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsSample {
    pub stress_level: f64,
    pub happiness_level: f64,
    pub anxiety_level: f64,
    pub overall_mood_level: f64,
}

impl MetricsSample {
    /// Extract a sample from a model-produced JSON object. Missing keys,
    /// non-numeric values, and out-of-range numbers all degrade to the
    /// clamped default rather than erroring.
    pub fn from_json(v: &Value) -> Self {
        Self {
            stress_level: bounded_number(v, "stress_level", METRIC_MAX),
            happiness_level: bounded_number(v, "happiness_level", METRIC_MAX),
            anxiety_level: bounded_number(v, "anxiety_level", METRIC_MAX),
            overall_mood_level: bounded_number(v, "overall_mood_level", METRIC_MAX),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.stress_level == 0.0
            && self.happiness_level == 0.0
            && self.anxiety_level == 0.0
            && self.overall_mood_level == 0.0
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Screening
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Qualitative risk level estimated alongside the screening scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    fn from_json(v: &Value, key: &str) -> Self {
        match v.get(key).and_then(Value::as_str) {
            Some(s) => match s.trim().to_ascii_lowercase().as_str() {
                "moderate" => RiskLevel::Moderate,
                "high" => RiskLevel::High,
                _ => RiskLevel::Low,
            },
            None => RiskLevel::Low,
        }
    }
}

/// Per-turn standardized screening estimates. These are free-text-derived
/// approximations, not administered clinical instruments.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreeningSample {
    /// PHQ-9 estimate in `[0, 27]`.
    pub phq9_score: f64,
    /// GAD-7 estimate in `[0, 21]`.
    pub gad7_score: f64,
    /// GHQ estimate in `[0, 36]`.
    pub ghq_score: f64,
    pub risk_level: RiskLevel,
}

impl ScreeningSample {
    /// Extract a sample from a model-produced JSON object, clamping each
    /// score to its questionnaire range. Never fails.
    pub fn from_json(v: &Value) -> Self {
        Self {
            phq9_score: bounded_number(v, "phq9_score", PHQ9_MAX),
            gad7_score: bounded_number(v, "gad7_score", GAD7_MAX),
            ghq_score: bounded_number(v, "ghq_score", GHQ_MAX),
            risk_level: RiskLevel::from_json(v, "risk_level"),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tasks
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => TaskPriority::Low,
            "high" => TaskPriority::High,
            _ => TaskPriority::Medium,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskCategory {
    #[default]
    SelfCare,
    Mindfulness,
    Social,
    Physical,
    Professional,
}

impl TaskCategory {
    fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "mindfulness" => TaskCategory::Mindfulness,
            "social" => TaskCategory::Social,
            "physical" => TaskCategory::Physical,
            "professional" => TaskCategory::Professional,
            _ => TaskCategory::SelfCare,
        }
    }
}

/// One suggested wellness task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskItem {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub category: TaskCategory,
}

impl TaskItem {
    pub fn new(title: impl Into<String>, priority: TaskPriority, category: TaskCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            completed: false,
            priority,
            category,
        }
    }

    /// Extract a task from one element of a model-produced `todos` array.
    /// Items without a usable title are dropped (`None`); unknown enum
    /// strings degrade to their defaults.
    pub fn from_json(v: &Value) -> Option<Self> {
        let title = v.get("title")?.as_str()?.trim();
        if title.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            completed: v.get("completed").and_then(Value::as_bool).unwrap_or(false),
            priority: v
                .get("priority")
                .and_then(Value::as_str)
                .map(TaskPriority::parse)
                .unwrap_or_default(),
            category: v
                .get("category")
                .and_then(Value::as_str)
                .map(TaskCategory::parse)
                .unwrap_or_default(),
        })
    }

    /// Extract every usable task from a model-produced `todos` array.
    pub fn list_from_json(v: &Value) -> Vec<Self> {
        v.get("todos")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Self::from_json).collect())
            .unwrap_or_default()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Extraction helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Read `key` from a JSON object as a number in `[0, max]`.
///
/// Accepts JSON numbers and numeric strings. NaN/infinite values and
/// anything unparseable collapse to 0.
fn bounded_number(v: &Value, key: &str, max: f64) -> f64 {
    let raw = match v.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if raw.is_finite() {
        raw.clamp(0.0, max)
    } else {
        0.0
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metrics_from_well_formed_json() {
        let v = json!({
            "stress_level": 30,
            "happiness_level": 12.5,
            "anxiety_level": 8,
            "overall_mood_level": 25
        });
        let m = MetricsSample::from_json(&v);
        assert_eq!(m.stress_level, 30.0);
        assert_eq!(m.happiness_level, 12.5);
        assert_eq!(m.anxiety_level, 8.0);
        assert_eq!(m.overall_mood_level, 25.0);
    }

    #[test]
    fn metrics_clamped_to_bounds() {
        let v = json!({
            "stress_level": 999,
            "happiness_level": -5,
            "anxiety_level": "72",
            "overall_mood_level": 50.0001
        });
        let m = MetricsSample::from_json(&v);
        assert_eq!(m.stress_level, 50.0);
        assert_eq!(m.happiness_level, 0.0);
        assert_eq!(m.anxiety_level, 50.0);
        assert_eq!(m.overall_mood_level, 50.0);
    }

    #[test]
    fn metrics_missing_and_garbage_keys_default_to_zero() {
        let v = json!({ "stress_level": "very stressed", "unrelated": true });
        let m = MetricsSample::from_json(&v);
        assert!(m.is_zero());
    }

    #[test]
    fn metrics_from_non_object_is_zero() {
        let m = MetricsSample::from_json(&json!("not an object"));
        assert!(m.is_zero());
    }

    #[test]
    fn screening_scores_use_per_questionnaire_bounds() {
        let v = json!({
            "phq9_score": 100,
            "gad7_score": 100,
            "ghq_score": 100,
            "risk_level": "HIGH"
        });
        let s = ScreeningSample::from_json(&v);
        assert_eq!(s.phq9_score, PHQ9_MAX);
        assert_eq!(s.gad7_score, GAD7_MAX);
        assert_eq!(s.ghq_score, GHQ_MAX);
        assert_eq!(s.risk_level, RiskLevel::High);
    }

    #[test]
    fn unknown_risk_level_defaults_to_low() {
        let v = json!({ "risk_level": "catastrophic" });
        assert_eq!(ScreeningSample::from_json(&v).risk_level, RiskLevel::Low);
        let v = json!({});
        assert_eq!(ScreeningSample::from_json(&v).risk_level, RiskLevel::Low);
    }

    #[test]
    fn risk_level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::Moderate).unwrap(),
            r#""moderate""#
        );
    }

    #[test]
    fn task_from_json_full() {
        let v = json!({
            "title": "Take a 10-minute walk",
            "completed": false,
            "priority": "high",
            "category": "physical"
        });
        let t = TaskItem::from_json(&v).unwrap();
        assert_eq!(t.title, "Take a 10-minute walk");
        assert_eq!(t.priority, TaskPriority::High);
        assert_eq!(t.category, TaskCategory::Physical);
        assert!(!t.completed);
    }

    #[test]
    fn task_unknown_enums_degrade_to_defaults() {
        let v = json!({
            "title": "Rest",
            "priority": "urgent",
            "category": "finance"
        });
        let t = TaskItem::from_json(&v).unwrap();
        assert_eq!(t.priority, TaskPriority::Medium);
        assert_eq!(t.category, TaskCategory::SelfCare);
    }

    #[test]
    fn task_without_title_is_dropped() {
        assert!(TaskItem::from_json(&json!({ "completed": true })).is_none());
        assert!(TaskItem::from_json(&json!({ "title": "   " })).is_none());
    }

    #[test]
    fn task_list_from_json() {
        let v = json!({
            "todos": [
                { "title": "A" },
                { "completed": true },
                { "title": "B", "priority": "low" }
            ]
        });
        let tasks = TaskItem::list_from_json(&v);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].title, "A");
        assert_eq!(tasks[1].priority, TaskPriority::Low);
    }

    #[test]
    fn task_list_missing_array_is_empty() {
        assert!(TaskItem::list_from_json(&json!({})).is_empty());
        assert!(TaskItem::list_from_json(&json!({ "todos": "nope" })).is_empty());
    }

    #[test]
    fn category_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&TaskCategory::SelfCare).unwrap(),
            r#""self-care""#
        );
    }
}
