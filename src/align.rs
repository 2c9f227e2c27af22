use thiserror::Error;

use crate::model::LapTelemetry;

/// Number of grid points used when the caller does not override it.
pub const DEFAULT_RESOLUTION: usize = 1000;

/// Errors surfaced by the aligner. Returned immediately, never logged here.
#[derive(Debug, Error)]
pub enum AlignError {
    /// A lap has fewer than 2 distance-unique samples, so no interpolant
    /// over distance can be built for it.
    #[error("telemetry for {driver} has {usable} usable sample(s) after distance de-duplication, need at least 2")]
    InvalidTelemetry { driver: String, usable: usize },
    /// The two laps' sampled distance ranges never positively overlap.
    #[error("laps for {driver_a} and {driver_b} share no distance range to compare over")]
    DegenerateRange { driver_a: String, driver_b: String },
}

/// Two laps resampled onto one distance grid and subtracted.
///
/// `delta_s[i]` is driver A's relative lap time minus driver B's at
/// `distance_m[i]`; positive means A has spent more time reaching that
/// point, i.e. A is slower there.
#[derive(Debug, Clone)]
pub struct AlignedComparison {
    /// Evenly spaced distances from 0 to the shorter lap's max, inclusive
    pub distance_m: Vec<f64>,
    /// Time delta in seconds at each grid distance
    pub delta_s: Vec<f64>,
}

impl AlignedComparison {
    pub fn len(&self) -> usize {
        self.distance_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distance_m.is_empty()
    }
}

/// Align two laps on a common distance grid and compute the time delta.
///
/// Each lap's session timestamps are first rebased so the lap starts at
/// t=0, making absolute session clock offsets irrelevant. Both rebased
/// time tracks are then linearly interpolated over distance at `resolution`
/// evenly spaced points from 0 to `min(max_distance(a), max_distance(b))`
/// inclusive, and subtracted.
///
/// Queries outside a lap's sampled distance range clamp flat to the nearest
/// endpoint's time. Duplicate-distance samples are dropped keeping the first
/// occurrence so the interpolant stays well-defined.
///
/// Pure function of its inputs: fixed inputs and resolution give
/// bit-identical output.
///
/// # Arguments
/// * `tel_a` - first driver's lap (delta is A minus B)
/// * `tel_b` - second driver's lap
/// * `resolution` - number of grid points, clamped to at least 2
pub fn align(
    tel_a: &LapTelemetry,
    tel_b: &LapTelemetry,
    resolution: usize,
) -> Result<AlignedComparison, AlignError> {
    let track_a = distance_time_track(tel_a);
    if track_a.len() < 2 {
        return Err(AlignError::InvalidTelemetry {
            driver: tel_a.driver.clone(),
            usable: track_a.len(),
        });
    }
    let track_b = distance_time_track(tel_b);
    if track_b.len() < 2 {
        return Err(AlignError::InvalidTelemetry {
            driver: tel_b.driver.clone(),
            usable: track_b.len(),
        });
    }

    let grid_max = track_a[track_a.len() - 1].0.min(track_b[track_b.len() - 1].0);
    let overlap_start = track_a[0].0.max(track_b[0].0);
    if grid_max <= 0.0 || grid_max <= overlap_start {
        return Err(AlignError::DegenerateRange {
            driver_a: tel_a.driver.clone(),
            driver_b: tel_b.driver.clone(),
        });
    }

    let n = resolution.max(2);
    let step = grid_max / (n - 1) as f64;

    let mut distance_m = Vec::with_capacity(n);
    let mut delta_s = Vec::with_capacity(n);
    for i in 0..n {
        // Pin the final point so the grid ends exactly on the common max.
        let d = if i == n - 1 { grid_max } else { i as f64 * step };
        let t_a = interp_clamped(&track_a, d);
        let t_b = interp_clamped(&track_b, d);
        distance_m.push(d);
        delta_s.push(t_a - t_b);
    }

    Ok(AlignedComparison { distance_m, delta_s })
}

/// Extract a lap's (distance, relative seconds) track: rebased to the first
/// sample's timestamp, sorted by distance, duplicate distances dropped
/// keeping the first occurrence.
fn distance_time_track(lap: &LapTelemetry) -> Vec<(f64, f64)> {
    let Some(first) = lap.samples.first() else {
        return Vec::new();
    };
    let t0 = first.time_s;

    let mut track: Vec<(f64, f64)> = lap
        .samples
        .iter()
        .map(|s| (s.distance_m, s.time_s - t0))
        .collect();

    // Stable sort, so equal distances stay in recording order and dedup
    // keeps the earliest sample at each distance.
    track.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
    track.dedup_by(|next, kept| next.0 == kept.0);
    track
}

/// Evaluate the piecewise-linear interpolant of `track` (sorted by distance,
/// distances strictly increasing) at distance `x`, clamping flat to the
/// endpoint times outside the sampled range.
fn interp_clamped(track: &[(f64, f64)], x: f64) -> f64 {
    let (first_d, first_t) = track[0];
    let (last_d, last_t) = track[track.len() - 1];
    if x <= first_d {
        return first_t;
    }
    if x >= last_d {
        return last_t;
    }

    // First segment whose start lies past x; x sits between idx-1 and idx.
    let idx = track.partition_point(|&(d, _)| d <= x);
    let (d0, t0) = track[idx - 1];
    let (d1, t1) = track[idx];
    t0 + (x - d0) / (d1 - d0) * (t1 - t0)
}
