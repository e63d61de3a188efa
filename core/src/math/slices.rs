use std::ops::Range;

use crate::entity::MaskedArray;

/// Runs of valid samples at or above `threshold`.
pub fn slices_above(array: &MaskedArray, threshold: f64) -> Vec<Range<usize>> {
    runs_where(array, |value| value >= threshold)
}

fn runs_where<F>(array: &MaskedArray, keep: F) -> Vec<Range<usize>>
where
    F: Fn(f64) -> bool,
{
    let mut runs = Vec::new();
    let mut start = None;
    for (index, sample) in array.iter().enumerate() {
        let inside = sample.map_or(false, &keep);
        match (inside, start) {
            (true, None) => start = Some(index),
            (false, Some(begin)) => {
                runs.push(begin..index);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(begin) = start {
        runs.push(begin..array.len());
    }
    runs
}

/// Fractional index where `array` first reaches `threshold` going upwards
/// inside `range`, interpolated between the straddling samples.
pub fn first_rising_crossing(array: &MaskedArray, range: Range<usize>, threshold: f64) -> Option<f64> {
    let stop = range.end.min(array.len());
    (range.start.saturating_add(1)..stop).find_map(|index| {
        let (before, after) = (array.get(index - 1)?, array.get(index)?);
        (before < threshold && after >= threshold).then(|| crossing(index, before, after, threshold))
    })
}

/// Fractional index where `array` last climbs back through `threshold`
/// inside `range`.
pub fn last_rising_crossing(array: &MaskedArray, range: Range<usize>, threshold: f64) -> Option<f64> {
    let stop = range.end.min(array.len());
    (range.start.saturating_add(1)..stop).rev().find_map(|index| {
        let (before, after) = (array.get(index - 1)?, array.get(index)?);
        (before < threshold && after >= threshold).then(|| crossing(index, before, after, threshold))
    })
}

fn crossing(index: usize, before: f64, after: f64, threshold: f64) -> f64 {
    (index - 1) as f64 + (threshold - before) / (after - before)
}
