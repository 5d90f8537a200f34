use crate::format::{format_number, format_percent};
use crate::models::{Insight, InsightKind, RankedItem, TimeSeriesRow};

/// Inputs the insight selector reads; all borrowed from the aggregation step.
pub struct InsightSources<'a> {
    pub logins: &'a [TimeSeriesRow],
    pub registrations: &'a [TimeSeriesRow],
    pub stages: &'a [RankedItem],
    /// Missions sorted by raw count, highest first.
    pub missions: &'a [RankedItem],
    /// Schools sorted by student count, highest first.
    pub schools: &'a [RankedItem],
}

/// Picks up to five superlatives. Facts whose source list is empty (or,
/// for the peak-day facts, has no positive entry) are left out.
pub fn select_insights(sources: &InsightSources<'_>) -> Vec<Insight> {
    let mut insights = Vec::with_capacity(5);

    if let Some(day) = peak_day(sources.registrations) {
        insights.push(Insight {
            kind: InsightKind::PeakRegistrationDay,
            title: "Registration peak".to_string(),
            description: format!(
                "{} new registrations on {}",
                format_number(day.value),
                day.tooltip_label.to_lowercase()
            ),
        });
    }

    if let Some(stage) = first_max(sources.stages) {
        insights.push(Insight {
            kind: InsightKind::TopStage,
            title: "Most completed stage".to_string(),
            description: format!(
                "{} accounts for {} of evidence submissions",
                stage.name,
                format_percent(stage.percentage)
            ),
        });
    }

    if let Some(mission) = sources.missions.first() {
        insights.push(Insight {
            kind: InsightKind::TopMission,
            title: "Standout mission".to_string(),
            description: format!(
                "{} received {} submissions",
                mission.name,
                format_number(mission.value)
            ),
        });
    }

    if let Some(school) = sources.schools.first() {
        insights.push(Insight {
            kind: InsightKind::TopSchool,
            title: "Most engaged school".to_string(),
            description: format!(
                "{} holds {} of active students",
                school.name,
                format_percent(school.percentage)
            ),
        });
    }

    if let Some(day) = peak_day(sources.logins) {
        insights.push(Insight {
            kind: InsightKind::PeakLoginDay,
            title: "Busiest login day".to_string(),
            description: format!(
                "{} sessions on {}",
                format_number(day.value),
                day.tooltip_label.to_lowercase()
            ),
        });
    }

    insights
}

/// Highest positive entry; the earliest one wins a tie.
fn peak_day(series: &[TimeSeriesRow]) -> Option<&TimeSeriesRow> {
    series
        .iter()
        .filter(|row| row.value > 0.0)
        .fold(None, |best: Option<&TimeSeriesRow>, row| match best {
            Some(current) if current.value >= row.value => Some(current),
            _ => Some(row),
        })
}

fn first_max(items: &[RankedItem]) -> Option<&RankedItem> {
    items.iter().fold(None, |best: Option<&RankedItem>, item| match best {
        Some(current) if current.value >= item.value => Some(current),
        _ => Some(item),
    })
}
