//! Nearest-timestamp alignment.
//!
//! These functions map a requested time (or window) onto positions in a
//! timestamp sequence. They never reject a target for being outside the data:
//! the closest available entry is returned however far away it is.

use chrono::NaiveDateTime;
use std::ops::Range;

use crate::error::{Result, StratusError};

/// Absolute distance between two timestamps in milliseconds
fn distance_ms(a: NaiveDateTime, b: NaiveDateTime) -> u64 {
    (a - b).num_milliseconds().unsigned_abs()
}

/// Find the index of the timestamp closest to `target`.
///
/// The input does not need to be sorted. When several entries are equally
/// close, the lowest index wins.
pub fn nearest_index(times: &[NaiveDateTime], target: NaiveDateTime) -> Result<usize> {
    let mut best: Option<(usize, u64)> = None;

    for (i, &t) in times.iter().enumerate() {
        let diff = distance_ms(t, target);
        match best {
            Some((_, min_diff)) if diff >= min_diff => {}
            _ => best = Some((i, diff)),
        }
    }

    best.map(|(i, _)| i).ok_or(StratusError::EmptySeries)
}

/// Find the inclusive index window covering `start..=end`.
///
/// Each endpoint snaps to its nearest timestamp independently, so the window
/// can extend past the requested bounds. If the end snaps to an earlier
/// position than the start, the returned range is empty.
pub fn nearest_range(
    times: &[NaiveDateTime],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Range<usize>> {
    let first = nearest_index(times, start)?;
    let last = nearest_index(times, end)? + 1;
    Ok(first..last.max(first))
}

/// Find every index whose timestamp equals the closest timestamp to `target`.
///
/// A sounding file stores one row per level, so a single launch time appears
/// on many rows; all of them are returned in input order.
pub fn nearest_matches(times: &[NaiveDateTime], target: NaiveDateTime) -> Result<Vec<usize>> {
    let closest = times[nearest_index(times, target)?];
    Ok(times
        .iter()
        .enumerate()
        .filter(|&(_, &t)| t == closest)
        .map(|(i, _)| i)
        .collect())
}

/// Like [`nearest_matches`], but equally distant candidates resolve to the
/// chronologically earliest timestamp rather than the first row in the file.
pub fn nearest_matches_earliest(
    times: &[NaiveDateTime],
    target: NaiveDateTime,
) -> Result<Vec<usize>> {
    let min_diff = times
        .iter()
        .map(|&t| distance_ms(t, target))
        .min()
        .ok_or(StratusError::EmptySeries)?;

    let closest = times
        .iter()
        .copied()
        .filter(|&t| distance_ms(t, target) == min_diff)
        .min()
        .ok_or(StratusError::EmptySeries)?;

    Ok(times
        .iter()
        .enumerate()
        .filter(|&(_, &t)| t == closest)
        .map(|(i, _)| i)
        .collect())
}
