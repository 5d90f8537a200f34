use crate::coerce::finite_or_zero;
use crate::models::{TimeSeriesRow, TrendStat};

const WINDOW: usize = 7;

/// Compares the sum of the last seven entries with the seven preceding them.
///
/// Entries are ordered by their `date` string, so dates must already be in
/// ISO form. Windows count entries, not calendar days: gaps or repeated
/// dates in the series shift what a "week" covers.
pub fn compute_trend(series: &[TimeSeriesRow]) -> TrendStat {
    if series.is_empty() {
        return TrendStat::default();
    }

    let mut sorted: Vec<&TimeSeriesRow> = series.iter().collect();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    let len = sorted.len();
    let current_start = len.saturating_sub(WINDOW);
    let previous_start = len.saturating_sub(WINDOW * 2);

    let current = sum(&sorted[current_start..]);
    let previous = sum(&sorted[previous_start..current_start]);
    let diff = finite_or_zero(current - previous);
    let percentage = if previous > 0.0 {
        Some(finite_or_zero(diff / previous * 100.0))
    } else {
        None
    };

    TrendStat {
        current,
        previous,
        diff,
        percentage,
    }
}

fn sum(rows: &[&TimeSeriesRow]) -> f64 {
    finite_or_zero(rows.iter().map(|row| row.value).sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn series(values: &[f64]) -> Vec<TimeSeriesRow> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(offset, value)| {
                let date = (start + Duration::days(offset as i64)).to_string();
                TimeSeriesRow {
                    label: date.clone(),
                    tooltip_label: date.clone(),
                    date,
                    value: *value,
                }
            })
            .collect()
    }

    #[test]
    fn empty_series_has_no_trend() {
        let trend = compute_trend(&[]);
        assert_eq!(
            trend,
            TrendStat {
                current: 0.0,
                previous: 0.0,
                diff: 0.0,
                percentage: None,
            }
        );
    }

    #[test]
    fn two_full_weeks_compare_sums() {
        let mut values = vec![50.0 / 7.0; 7];
        values.extend([10.0; 7]);
        let trend = compute_trend(&series(&values));
        assert_eq!(trend.current, 70.0);
        assert!((trend.previous - 50.0).abs() < 1e-9);
        assert!((trend.diff - 20.0).abs() < 1e-9);
        assert!((trend.percentage.unwrap() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn short_series_has_empty_previous_window() {
        let trend = compute_trend(&series(&[1.0, 2.0, 3.0]));
        assert_eq!(trend.current, 6.0);
        assert_eq!(trend.previous, 0.0);
        assert_eq!(trend.diff, 6.0);
        assert_eq!(trend.percentage, None);
    }

    #[test]
    fn partial_previous_window_uses_what_exists() {
        // ten entries: previous window holds entries 0..3
        let trend = compute_trend(&series(&[1.0, 1.0, 2.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0]));
        assert_eq!(trend.previous, 4.0);
        assert_eq!(trend.current, 35.0);
        assert_eq!(trend.percentage, Some(775.0));
    }

    #[test]
    fn unsorted_input_is_ordered_by_date() {
        let mut rows = series(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 4.0]);
        rows.reverse();
        let trend = compute_trend(&rows);
        // the oldest entry (index 0 after sorting) is the only one outside the current window
        assert_eq!(trend.current, 4.0);
        assert_eq!(trend.previous, 0.0);
    }

    #[test]
    fn decline_reports_negative_percentage() {
        let mut values = vec![10.0; 7];
        values.extend([5.0; 7]);
        let trend = compute_trend(&series(&values));
        assert_eq!(trend.diff, -35.0);
        assert_eq!(trend.percentage, Some(-50.0));
    }
}
