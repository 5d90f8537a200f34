use crate::coerce::finite_or_zero;
use crate::models::{MergedRow, TimeSeriesRow};
use std::collections::BTreeMap;

/// Joins the login and registration series into one row per date.
///
/// Dates present on only one side get `0` on the other; repeated dates
/// within a series are summed. Rows come out ordered by date key.
pub fn merge_series(logins: &[TimeSeriesRow], registrations: &[TimeSeriesRow]) -> Vec<MergedRow> {
    let mut by_date: BTreeMap<&str, MergedRow> = BTreeMap::new();

    for row in logins {
        let merged = by_date.entry(row.date.as_str()).or_insert_with(|| empty_row(row));
        merged.logins = finite_or_zero(merged.logins + row.value);
    }

    for row in registrations {
        let merged = by_date.entry(row.date.as_str()).or_insert_with(|| empty_row(row));
        merged.registrations = finite_or_zero(merged.registrations + row.value);
    }

    by_date.into_values().collect()
}

fn empty_row(row: &TimeSeriesRow) -> MergedRow {
    MergedRow {
        date: row.date.clone(),
        label: row.label.clone(),
        tooltip_label: row.tooltip_label.clone(),
        logins: 0.0,
        registrations: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, value: f64) -> TimeSeriesRow {
        TimeSeriesRow {
            date: date.to_string(),
            label: format!("label {date}"),
            tooltip_label: format!("tooltip {date}"),
            value,
        }
    }

    #[test]
    fn disjoint_dates_fill_missing_side_with_zero() {
        let merged = merge_series(&[row("2024-01-01", 5.0)], &[row("2024-01-02", 3.0)]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].date, "2024-01-01");
        assert_eq!(merged[0].logins, 5.0);
        assert_eq!(merged[0].registrations, 0.0);
        assert_eq!(merged[1].date, "2024-01-02");
        assert_eq!(merged[1].logins, 0.0);
        assert_eq!(merged[1].registrations, 3.0);
    }

    #[test]
    fn duplicate_dates_accumulate() {
        let logins = [row("2024-01-03", 2.0), row("2024-01-01", 1.0), row("2024-01-03", 4.0)];
        let registrations = [row("2024-01-03", 1.0), row("2024-01-03", 1.0)];
        let merged = merge_series(&logins, &registrations);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].date, "2024-01-01");
        assert_eq!(merged[1].logins, 6.0);
        assert_eq!(merged[1].registrations, 2.0);
    }

    #[test]
    fn labels_come_from_first_occurrence() {
        let merged = merge_series(&[], &[row("2024-02-10", 1.0)]);
        assert_eq!(merged[0].label, "label 2024-02-10");
        assert_eq!(merged[0].tooltip_label, "tooltip 2024-02-10");
    }

    #[test]
    fn empty_inputs_merge_to_nothing() {
        assert!(merge_series(&[], &[]).is_empty());
    }
}
