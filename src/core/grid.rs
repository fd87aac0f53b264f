//! Sample grids that sparse series are aligned onto.

use anyhow::{Result, bail};
use chrono::{DateTime, Duration, Months, NaiveDate, NaiveTime, Utc};
use tracing::debug;

/// A strictly ascending sequence of instants used as a common x-axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleGrid {
    points: Vec<DateTime<Utc>>,
}

impl SampleGrid {
    pub fn points(&self) -> &[DateTime<Utc>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<DateTime<Utc>> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<DateTime<Utc>> {
        self.points.last().copied()
    }
}

/// Builds `count` evenly spaced instants from `xmin` to `xmax`, both included.
pub fn build_grid(xmin: DateTime<Utc>, xmax: DateTime<Utc>, count: usize) -> Result<SampleGrid> {
    if count < 2 {
        bail!("A sample grid needs at least 2 points, got {count}");
    }
    if xmax <= xmin {
        bail!("Grid end {xmax} must be after grid start {xmin}");
    }

    let span_ms = (xmax - xmin).num_milliseconds() as i128;
    let steps = (count - 1) as i128;
    if span_ms < steps {
        bail!("Grid span of {span_ms}ms is too short for {count} distinct points");
    }

    let mut points: Vec<DateTime<Utc>> = (0..steps)
        .map(|i| xmin + Duration::milliseconds((span_ms * i / steps) as i64))
        .collect();
    points.push(xmax);

    debug!(count, %xmin, %xmax, "Built sample grid");
    Ok(SampleGrid { points })
}

/// Builds calendar-month period boundaries after `epoch` up to `now`.
///
/// Boundaries are `epoch + k * step_months` for `k >= 1`. The first boundary
/// that reaches `now` is clamped to `now` and closes the grid, so the period
/// in progress is always the last one.
pub fn build_periodic_grid(
    epoch: DateTime<Utc>,
    step_months: u32,
    now: DateTime<Utc>,
) -> Result<SampleGrid> {
    if step_months == 0 {
        bail!("Periodic grid step must be at least one month");
    }
    if now <= epoch {
        bail!("Periodic grid epoch {epoch} must be before {now}");
    }

    let mut points = Vec::new();
    let mut k: u32 = 1;
    loop {
        let boundary = match epoch.checked_add_months(Months::new(step_months * k)) {
            Some(b) => b,
            None => bail!("Periodic grid boundary overflowed after {epoch}"),
        };
        if boundary >= now {
            points.push(now);
            break;
        }
        points.push(boundary);
        k += 1;
    }

    debug!(count = points.len(), step_months, "Built periodic grid");
    Ok(SampleGrid { points })
}

/// Builds the grid for a trailing window ending at `now`.
///
/// The window starts `window_days` before `now` but never before `floor`.
/// One point per whole day in the window, capped at `max_points`. A window
/// too long to represent starts at `floor`; a negative one is rejected.
pub fn recent_window_grid(
    now: DateTime<Utc>,
    window_days: i64,
    floor: NaiveDate,
    max_points: usize,
) -> Result<SampleGrid> {
    if window_days < 0 {
        bail!("Window must not be negative, got {} days", window_days);
    }
    let floor = floor.and_time(NaiveTime::MIN).and_utc();
    let xmin = Duration::try_days(window_days)
        .and_then(|span| now.checked_sub_signed(span))
        .map_or(floor, |start| start.max(floor));
    let days = (now - xmin).num_days().max(0) as usize;
    let count = days.min(max_points).max(2);
    build_grid(xmin, now, count)
}
