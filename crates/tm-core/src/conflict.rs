//! Temporal conflict detection and alternative-slot suggestion.
//!
//! Pure functions over in-memory task lists. The reference time is always
//! an argument; nothing here reads the system clock.

use crate::types::chat::AlternativeSlot;
use crate::types::enums::TaskStatus;
use crate::types::task::Task;
use chrono::{DateTime, Duration, Utc};

/// Returns every existing task whose occupied window overlaps the
/// candidate window `[start, start + duration)`.
///
/// Intervals are half-open: windows that merely touch do not conflict.
/// Unscheduled tasks and completed tasks never block a candidate.
pub fn find_time_conflicts(
    start: DateTime<Utc>,
    duration_minutes: u32,
    existing: &[Task],
) -> Vec<Task> {
    let end = start + Duration::minutes(i64::from(duration_minutes));
    existing
        .iter()
        .filter(|task| task.status != TaskStatus::Completed)
        .filter(|task| {
            match (task.start_date, task.end_date()) {
                (Some(task_start), Some(task_end)) => start < task_end && end > task_start,
                _ => false,
            }
        })
        .cloned()
        .collect()
}

/// Proposes conflict-free alternatives to `original_start`, probing in a
/// fixed order: one hour earlier, one hour later, same time next day.
/// Only the conflict-free subset is returned, in that order.
pub fn suggest_alternative_times(
    original_start: DateTime<Utc>,
    duration_minutes: u32,
    existing: &[Task],
) -> Vec<AlternativeSlot> {
    let candidates = [
        original_start - Duration::hours(1),
        original_start + Duration::hours(1),
        original_start + Duration::hours(24),
    ];

    candidates
        .into_iter()
        .filter(|candidate| find_time_conflicts(*candidate, duration_minutes, existing).is_empty())
        .map(|candidate| AlternativeSlot {
            time: candidate,
            description: describe_shift(candidate, original_start),
        })
        .collect()
}

/// Human phrasing of the signed distance between a candidate slot and the
/// originally requested time. Fractional hours round to the nearest whole
/// unit before choosing singular or plural.
fn describe_shift(candidate: DateTime<Utc>, original: DateTime<Utc>) -> String {
    let minutes = (candidate - original).num_minutes();
    let abs_minutes = minutes.abs();
    let direction = if minutes > 0 { "later" } else { "earlier" };

    if abs_minutes < 24 * 60 {
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let hours = ((abs_minutes as f64) / 60.0).round() as i64;
        if hours == 1 {
            format!("1 hour {direction}")
        } else {
            format!("{hours} hours {direction}")
        }
    } else {
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let days = ((abs_minutes as f64) / (24.0 * 60.0)).round() as i64;
        if days == 1 {
            "1 day later".to_string()
        } else {
            format!("{days} days later")
        }
    }
}
