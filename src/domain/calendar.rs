use std::cmp::Ordering;

use chrono::Datelike;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use chrono::TimeDelta;
use chrono::Weekday;

use crate::domain::chart::{DayLabel, GridLine};
use crate::domain::issue::Issue;
use crate::domain::sprint::{SprintWindow, WeekendInterval};
use crate::domain::time_point::Timestamped;

pub fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Orders issues by resolution date. Unresolved issues go last and keep
/// their relative order when used with a stable sort.
pub fn compare_resolution_date(a: &Issue, b: &Issue) -> Ordering {
    match (a.resolution_date, b.resolution_date) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn compare_timestamp<T: Timestamped>(a: &T, b: &T) -> Ordering {
    a.timestamp().cmp(&b.timestamp())
}

/// Saturday 00:00 to Monday 00:00 spans that overlap the sprint, clipped to it.
pub fn sprint_weekends(window: &SprintWindow) -> Vec<WeekendInterval> {
    let start = window.start();
    let end = window.end();

    let days_to_monday = 7 - i64::from(start.weekday().num_days_from_monday());
    let mut end_of_week = start.date().and_time(NaiveTime::MIN) + TimeDelta::days(days_to_monday);
    let mut start_of_weekend = end_of_week - TimeDelta::days(2);

    let mut weekends = Vec::new();
    while start_of_weekend < end {
        let non_work_start = start.max(start_of_weekend);
        let non_work_end = end.min(end_of_week);
        weekends.push(WeekendInterval {
            start: non_work_start,
            duration: non_work_end - non_work_start,
        });

        end_of_week += TimeDelta::weeks(1);
        start_of_weekend = end_of_week - TimeDelta::days(2);
    }
    weekends
}

/// One label per working day, placed at noon so it sits in the middle of the day.
pub fn day_labels(window: &SprintWindow) -> Vec<DayLabel> {
    working_days(window, NaiveTime::MIN + TimeDelta::hours(12))
        .map(|timestamp| DayLabel {
            timestamp,
            label: timestamp.format("%a").to_string(),
        })
        .collect()
}

/// One vertical grid line per working day, at midnight.
pub fn day_lines(window: &SprintWindow) -> Vec<GridLine> {
    working_days(window, NaiveTime::MIN)
        .map(|timestamp| GridLine { timestamp })
        .collect()
}

fn working_days(
    window: &SprintWindow,
    time_of_day: NaiveTime,
) -> impl Iterator<Item = NaiveDateTime> {
    let end = window.end();
    let mut day = window.start().date().and_time(time_of_day);
    if day < window.start() {
        day += TimeDelta::days(1);
    }

    std::iter::successors(Some(day), |day| Some(*day + TimeDelta::days(1)))
        .take_while(move |day| *day < end)
        .filter(|day| is_working_day(day.date()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, at_hm, window};

    #[test]
    fn weekdays_are_working_days_and_weekends_are_not() {
        let test_cases = vec![
            (NaiveDate::from_ymd_opt(2026, 2, 16).unwrap(), true),  // Monday
            (NaiveDate::from_ymd_opt(2026, 2, 17).unwrap(), true),  // Tuesday
            (NaiveDate::from_ymd_opt(2026, 2, 18).unwrap(), true),  // Wednesday
            (NaiveDate::from_ymd_opt(2026, 2, 19).unwrap(), true),  // Thursday
            (NaiveDate::from_ymd_opt(2026, 2, 20).unwrap(), true),  // Friday
            (NaiveDate::from_ymd_opt(2026, 2, 21).unwrap(), false), // Saturday
            (NaiveDate::from_ymd_opt(2026, 2, 22).unwrap(), false), // Sunday
        ];

        for (date, expected) in test_cases {
            assert_eq!(
                is_working_day(date),
                expected,
                "Expected working day = {} on {}",
                expected,
                date
            );
        }
    }

    #[test]
    fn unresolved_issues_sort_after_resolved_ones_and_keep_their_order() {
        let mut issues = vec![
            Issue::new("OPEN-1"),
            Issue {
                resolution_date: Some(at(2026, 2, 18, 10)),
                ..Issue::new("LATE")
            },
            Issue::new("OPEN-2"),
            Issue {
                resolution_date: Some(at(2026, 2, 17, 10)),
                ..Issue::new("EARLY")
            },
        ];

        issues.sort_by(compare_resolution_date);

        let keys: Vec<&str> = issues.iter().map(|issue| issue.key.as_str()).collect();
        assert_eq!(keys, vec!["EARLY", "LATE", "OPEN-1", "OPEN-2"]);
    }

    #[test]
    fn two_week_sprint_contains_one_full_weekend() {
        let weekends = sprint_weekends(&window(at(2026, 2, 16, 0), at(2026, 2, 27, 0)));

        assert_eq!(
            weekends,
            vec![WeekendInterval {
                start: at(2026, 2, 21, 0),
                duration: TimeDelta::days(2),
            }]
        );
    }

    #[test]
    fn weekends_are_clipped_to_the_sprint_window() {
        // Starts Sunday 10:00, ends the next Saturday 12:00.
        let weekends = sprint_weekends(&window(at(2026, 2, 22, 10), at(2026, 2, 28, 12)));

        assert_eq!(
            weekends,
            vec![
                WeekendInterval {
                    start: at(2026, 2, 22, 10),
                    duration: TimeDelta::hours(14),
                },
                WeekendInterval {
                    start: at(2026, 2, 28, 0),
                    duration: TimeDelta::hours(12),
                },
            ]
        );
    }

    #[test]
    fn sprint_ending_on_saturday_midnight_has_no_weekend() {
        let weekends = sprint_weekends(&window(at(2026, 2, 16, 0), at(2026, 2, 21, 0)));
        assert!(weekends.is_empty());
    }

    #[test]
    fn weekends_are_ascending_and_do_not_overlap() {
        let weekends = sprint_weekends(&window(at(2026, 2, 4, 13), at(2026, 3, 20, 17)));

        assert_eq!(weekends.len(), 6);
        for pair in weekends.windows(2) {
            assert!(pair[0].end() <= pair[1].start);
        }
    }

    #[test]
    fn day_labels_skip_weekends_and_start_on_the_first_full_noon() {
        // Starts Thursday after noon, so the first label is Friday.
        let labels = day_labels(&window(at_hm(2026, 2, 19, 13, 30), at(2026, 2, 25, 0)));

        let names: Vec<&str> = labels.iter().map(|label| label.label.as_str()).collect();
        assert_eq!(names, vec!["Fri", "Mon", "Tue"]);
        assert_eq!(labels[0].timestamp, at(2026, 2, 20, 12));
    }

    #[test]
    fn day_lines_are_placed_at_midnight_of_every_working_day() {
        let lines = day_lines(&window(at(2026, 2, 16, 0), at(2026, 2, 24, 0)));

        let timestamps: Vec<NaiveDateTime> = lines.iter().map(|line| line.timestamp).collect();
        assert_eq!(
            timestamps,
            vec![
                at(2026, 2, 16, 0),
                at(2026, 2, 17, 0),
                at(2026, 2, 18, 0),
                at(2026, 2, 19, 0),
                at(2026, 2, 20, 0),
                at(2026, 2, 23, 0),
            ]
        );
    }
}
