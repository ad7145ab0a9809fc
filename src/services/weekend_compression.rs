use chrono::TimeDelta;

use crate::domain::sprint::WeekendInterval;
use crate::domain::time_point::Timestamped;

/// Folds weekends out of the time axis.
///
/// Every item is moved back by the total duration of the weekends that lie
/// completely before it; an item that falls inside a weekend is pinned to
/// the start of that weekend. Both `items` and `weekends` must be sorted
/// ascending, and the same `weekends` must be used for every series of a
/// chart so that the series stay aligned.
pub fn compress_weekends<T>(items: &[T], weekends: &[WeekendInterval]) -> Vec<T>
where
    T: Timestamped + Clone,
{
    let mut compressed = Vec::with_capacity(items.len());
    let mut upcoming = weekends.iter().peekable();
    let mut accumulated_offset = TimeDelta::zero();
    let mut index = 0;

    while let Some(item) = items.get(index) {
        let timestamp = item.timestamp();

        match upcoming.peek() {
            Some(weekend) if timestamp > weekend.start => {
                if timestamp > weekend.end() {
                    accumulated_offset += weekend.duration;
                    upcoming.next();
                } else {
                    let mut pinned = item.clone();
                    pinned.set_timestamp(weekend.start - accumulated_offset);
                    compressed.push(pinned);
                    index += 1;
                }
            }
            _ => {
                let mut shifted = item.clone();
                shifted.set_timestamp(timestamp - accumulated_offset);
                compressed.push(shifted);
                index += 1;
            }
        }
    }

    compressed
}
