use std::collections::BTreeMap;

use crate::entity::MaskedArray;
use crate::prelude::{DeriveError, DeriveResult};

/// How several channels are collapsed into one, sample by sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Mean,
    Min,
    Max,
}

pub struct StatsHelper;

impl StatsHelper {
    /// Reduces across channels using only the valid samples at each index.
    ///
    /// A sample is invalid only where every channel is invalid.
    pub fn reduce(arrays: &[&MaskedArray], reducer: Reducer) -> DeriveResult<MaskedArray> {
        let Some(first) = arrays.first() else {
            return Err(DeriveError::InvalidInput("nothing to reduce".into()));
        };
        let len = first.len();
        if arrays.iter().any(|a| a.len() != len) {
            return Err(DeriveError::RateOrOffsetMismatch(
                "channels differ in length".into(),
            ));
        }
        let mut result = MaskedArray::invalid(len);
        for index in 0..len {
            let samples = arrays.iter().filter_map(|a| a.get(index));
            let reduced = match reducer {
                Reducer::Mean => {
                    let (sum, count) = samples.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
                    (count > 0).then(|| sum / count as f64)
                }
                Reducer::Min => samples.reduce(f64::min),
                Reducer::Max => samples.reduce(f64::max),
            };
            if let Some(value) = reduced {
                result.set(index, value);
            }
        }
        Ok(result)
    }

    /// Sum of absolute sample-to-sample movement over valid neighbours.
    pub fn total_movement(samples: &[Option<f64>]) -> f64 {
        samples
            .windows(2)
            .filter_map(|w| match (w[0], w[1]) {
                (Some(a), Some(b)) => Some((b - a).abs()),
                _ => None,
            })
            .sum()
    }

    /// Most frequent value; ties go to the smallest.
    pub fn mode<I>(values: I) -> Option<i64>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        for value in values {
            *counts.entry(value).or_default() += 1;
        }
        counts
            .into_iter()
            .fold(None, |best: Option<(i64, usize)>, (value, count)| match best {
                Some((_, top)) if top >= count => best,
                _ => Some((value, count)),
            })
            .map(|(value, _)| value)
    }
}
