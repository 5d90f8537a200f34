use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields stay raw JSON; the coercion helpers absorb shape problems.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RawReport {
    #[serde(default)]
    pub total_students: Value,
    #[serde(default)]
    pub avatar_selection_count: Value,
    #[serde(default)]
    pub stage_completion_counts: Value,
    #[serde(default)]
    pub daily_login_completions: Value,
    #[serde(default)]
    pub evidence_mission_completion_counts: Value,
    #[serde(default)]
    pub school_user_counts: Value,
    #[serde(default)]
    pub new_registrations_counts: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeSeriesRow {
    pub date: String,
    pub label: String,
    pub tooltip_label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MergedRow {
    pub date: String,
    pub label: String,
    pub tooltip_label: String,
    pub logins: f64,
    pub registrations: f64,
}

/// Last seven entries compared against the seven before them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct TrendStat {
    pub current: f64,
    pub previous: f64,
    pub diff: f64,
    pub percentage: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedItem {
    pub name: String,
    pub value: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Kpi {
    pub total_students: f64,
    pub avatar_selected: f64,
    pub avatar_rate: f64,
    pub active_days: usize,
    pub distinct_days: usize,
    pub schools_count: usize,
    pub total_logins: f64,
    pub total_registrations: f64,
    pub average_students_per_school: f64,
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trends {
    pub logins: TrendStat,
    pub registrations: TrendStat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    PeakRegistrationDay,
    TopStage,
    TopMission,
    TopSchool,
    PeakLoginDay,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Gauge {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Everything the dashboard renders, rebuilt from scratch per report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DerivedView {
    pub kpi: Kpi,
    pub stage_progress: Vec<RankedItem>,
    pub stage_ranking: Vec<RankedItem>,
    pub schools: Vec<RankedItem>,
    pub mission_engagement: Vec<RankedItem>,
    pub merged_series: Vec<MergedRow>,
    pub trends: Trends,
    pub insights: Vec<Insight>,
    pub gauges: Vec<Gauge>,
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub is_fallback: bool,
    pub last_error: Option<String>,
    pub last_fetch: Option<String>,
    pub refresh_secs: u64,
    pub theme: String,
}
