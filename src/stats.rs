use crate::coerce::{finite_or_zero, parse_date, percent_of, safe_array, to_calendar_date, to_number, to_text};
use crate::insights::{select_insights, InsightSources};
use crate::merge::merge_series;
use crate::models::{
    DateRange, DerivedView, Gauge, Kpi, RankedItem, RawReport, TimeSeriesRow, Trends,
};
use crate::trend::compute_trend;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeSet;

const TOP_MISSIONS: usize = 6;

/// Builds the full dashboard view from one report, or `None` before any
/// report has arrived.
pub fn build_derived_view(report: Option<&RawReport>) -> Option<DerivedView> {
    report.map(derive)
}

fn derive(report: &RawReport) -> DerivedView {
    let total_students = to_number(&report.total_students, 0.0);
    let avatar_selected = to_number(&report.avatar_selection_count, 0.0);
    let avatar_rate = percent_of(avatar_selected, total_students);

    let stages = safe_array(&report.stage_completion_counts, |entry| {
        named_count(entry, "stage_name")
    });
    let total_stage_completions = total(stages.iter().map(|(_, value)| *value));
    let stage_progress: Vec<RankedItem> = stages
        .into_iter()
        .map(|(name, value)| RankedItem {
            name: name.trim().to_string(),
            value,
            percentage: percent_of(value, total_stage_completions),
        })
        .collect();
    let stage_ranking = sorted_desc(stage_progress.clone());

    let schools = sorted_desc(
        safe_array(&report.school_user_counts, |entry| named_count(entry, "school_name"))
            .into_iter()
            .map(|(name, value)| RankedItem {
                name,
                value,
                percentage: percent_of(value, total_students),
            })
            .collect(),
    );

    let logins = series(&report.daily_login_completions, "completions");
    let registrations = series(&report.new_registrations_counts, "registrations");

    let active_days = logins.iter().filter(|row| row.value > 0.0).count();
    let distinct_days = logins
        .iter()
        .chain(registrations.iter())
        .map(|row| row.date.as_str())
        .collect::<BTreeSet<_>>()
        .len();
    let engagement_rate = percent_of(active_days as f64, distinct_days as f64);

    let missions = sorted_desc(
        safe_array(&report.evidence_mission_completion_counts, |entry| {
            named_count(entry, "mission_name")
        })
        .into_iter()
        .map(|(name, value)| RankedItem {
            name,
            value,
            percentage: 0.0,
        })
        .collect(),
    );
    let top_mission_value = missions.first().map(|mission| mission.value).unwrap_or(0.0);
    let mission_engagement = missions
        .iter()
        .take(TOP_MISSIONS)
        .map(|mission| RankedItem {
            percentage: percent_of(mission.value, top_mission_value),
            ..mission.clone()
        })
        .collect();

    let merged_series = merge_series(&logins, &registrations);

    let trends = Trends {
        logins: compute_trend(&logins),
        registrations: compute_trend(&registrations),
    };

    let insights = select_insights(&InsightSources {
        logins: &logins,
        registrations: &registrations,
        stages: &stage_progress,
        missions: &missions,
        schools: &schools,
    });

    let kpi = Kpi {
        total_students,
        avatar_selected,
        avatar_rate,
        active_days,
        distinct_days,
        schools_count: schools.len(),
        total_logins: total(logins.iter().map(|row| row.value)),
        total_registrations: total(registrations.iter().map(|row| row.value)),
        average_students_per_school: if schools.is_empty() {
            0.0
        } else {
            finite_or_zero(total_students / schools.len() as f64)
        },
        engagement_rate,
    };

    let gauges = vec![
        Gauge {
            name: "Active days".to_string(),
            value: kpi.engagement_rate.min(100.0),
        },
        Gauge {
            name: "Avatar chosen".to_string(),
            value: kpi.avatar_rate.min(100.0),
        },
    ];

    let date_range = match (merged_series.first(), merged_series.last()) {
        (Some(first), Some(last)) => Some(DateRange {
            start: first.tooltip_label.clone(),
            end: last.tooltip_label.clone(),
        }),
        _ => None,
    };

    DerivedView {
        kpi,
        stage_progress,
        stage_ranking,
        schools,
        mission_engagement,
        merged_series,
        trends,
        insights,
        gauges,
        date_range,
    }
}

/// Turns a raw `[{date, <value_key>}]` array into rows keyed by ISO date.
fn series(value: &Value, value_key: &str) -> Vec<TimeSeriesRow> {
    safe_array(value, |entry| {
        let raw_date = to_text(&entry["date"]);
        let parsed = parse_date(&raw_date);
        TimeSeriesRow {
            date: to_calendar_date(&raw_date),
            label: parsed
                .map(|date| date.format("%d %b").to_string())
                .unwrap_or_else(|| raw_date.clone()),
            tooltip_label: parsed
                .map(|date| date.format("%d %B %Y").to_string())
                .unwrap_or_else(|| raw_date.clone()),
            value: to_number(&entry[value_key], 0.0),
        }
    })
}

fn named_count(entry: &Value, name_key: &str) -> (String, f64) {
    (to_text(&entry[name_key]), to_number(&entry["users_count"], 0.0))
}

/// Highest value first; equal values keep their input order.
fn sorted_desc(mut items: Vec<RankedItem>) -> Vec<RankedItem> {
    items.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    items
}

fn total(values: impl Iterator<Item = f64>) -> f64 {
    finite_or_zero(values.sum())
}
