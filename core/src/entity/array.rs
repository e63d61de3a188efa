use std::ops::Range;

use ndarray::{Array1, ArrayView1, Zip};

use crate::prelude::{DeriveError, DeriveResult};

/// Sample values paired with an independent per-sample validity flag.
///
/// Invalid samples keep a placeholder value so that positional arithmetic stays
/// simple; the placeholder must never be read as data. Binary operations AND the
/// validity of their operands, so invalidity propagates instead of raising.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedArray {
    values: Array1<f64>,
    valid: Array1<bool>,
}

impl MaskedArray {
    pub fn new(values: Vec<f64>, valid: Vec<bool>) -> DeriveResult<Self> {
        if values.len() != valid.len() {
            return Err(DeriveError::InvalidInput(format!(
                "{} values but {} validity flags",
                values.len(),
                valid.len()
            )));
        }
        Ok(Self {
            values: Array1::from(values),
            valid: Array1::from(valid),
        })
    }

    /// Every sample valid.
    pub fn from_values(values: Vec<f64>) -> Self {
        let valid = Array1::from_elem(values.len(), true);
        Self {
            values: Array1::from(values),
            valid,
        }
    }

    /// `None` entries become invalid samples.
    pub fn from_options(samples: &[Option<f64>]) -> Self {
        let values = samples.iter().map(|s| s.unwrap_or(0.0)).collect::<Vec<_>>();
        let valid = samples.iter().map(Option::is_some).collect::<Vec<_>>();
        Self {
            values: Array1::from(values),
            valid: Array1::from(valid),
        }
    }

    pub fn filled(value: f64, len: usize) -> Self {
        Self {
            values: Array1::from_elem(len, value),
            valid: Array1::from_elem(len, true),
        }
    }

    /// A fully-invalid array, the result of exhausting all valid data.
    pub fn invalid(len: usize) -> Self {
        Self {
            values: Array1::zeros(len),
            valid: Array1::from_elem(len, false),
        }
    }

    pub(crate) fn from_parts(values: Array1<f64>, valid: Array1<bool>) -> Self {
        debug_assert_eq!(values.len(), valid.len());
        Self { values, valid }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    pub fn validity(&self) -> ArrayView1<'_, bool> {
        self.valid.view()
    }

    /// Value at `index` including placeholders behind invalid samples.
    pub fn raw(&self, index: usize) -> f64 {
        self.values[index]
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.valid.get(index).copied().unwrap_or(false)
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        if self.is_valid(index) {
            Some(self.values[index])
        } else {
            None
        }
    }

    pub fn set(&mut self, index: usize, value: f64) {
        self.values[index] = value;
        self.valid[index] = true;
    }

    pub fn set_invalid(&mut self, index: usize) {
        self.valid[index] = false;
    }

    /// Overwrites the value but keeps the validity flag.
    pub(crate) fn set_raw(&mut self, index: usize, value: f64) {
        self.values[index] = value;
    }

    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|v| **v).count()
    }

    /// True when no valid sample remains.
    pub fn is_exhausted(&self) -> bool {
        !self.valid.iter().any(|v| *v)
    }

    pub fn first_valid(&self) -> Option<usize> {
        self.valid.iter().position(|v| *v)
    }

    pub fn last_valid(&self) -> Option<usize> {
        self.valid.iter().rposition(|v| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.values
            .iter()
            .zip(self.valid.iter())
            .map(|(value, valid)| if *valid { Some(*value) } else { None })
    }

    pub fn to_options(&self) -> Vec<Option<f64>> {
        self.iter().collect()
    }

    pub fn valid_values(&self) -> Vec<f64> {
        self.iter().flatten().collect()
    }

    /// Applies `f` to every value, validity untouched.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            values: self.values.mapv(f),
            valid: self.valid.clone(),
        }
    }

    /// Elementwise combination; the result is valid only where both inputs are.
    pub fn zip_map<F>(&self, other: &MaskedArray, f: F) -> DeriveResult<Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.len() != other.len() {
            return Err(DeriveError::RateOrOffsetMismatch(format!(
                "cannot combine arrays of length {} and {}",
                self.len(),
                other.len()
            )));
        }
        let values = Zip::from(&self.values)
            .and(&other.values)
            .map_collect(|a, b| f(*a, *b));
        let valid = Zip::from(&self.valid)
            .and(&other.valid)
            .map_collect(|a, b| *a && *b);
        Ok(Self { values, valid })
    }

    pub fn add(&self, other: &MaskedArray) -> DeriveResult<Self> {
        self.zip_map(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &MaskedArray) -> DeriveResult<Self> {
        self.zip_map(other, |a, b| a - b)
    }

    pub fn mul(&self, other: &MaskedArray) -> DeriveResult<Self> {
        self.zip_map(other, |a, b| a * b)
    }

    /// Division; a zero divisor invalidates the sample.
    pub fn div(&self, other: &MaskedArray) -> DeriveResult<Self> {
        let mut result = self.zip_map(other, |a, b| if b == 0.0 { 0.0 } else { a / b })?;
        for (index, divisor) in other.values.iter().enumerate() {
            if *divisor == 0.0 {
                result.valid[index] = false;
            }
        }
        Ok(result)
    }

    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        Self {
            values: self.values.slice(ndarray::s![start..end]).to_owned(),
            valid: self.valid.slice(ndarray::s![start..end]).to_owned(),
        }
    }

    /// Linear interpolation at a fractional sample index.
    ///
    /// Both bracketing samples must be valid; an exact index only needs itself.
    pub fn value_at(&self, index: f64) -> Option<f64> {
        if !index.is_finite() || index < 0.0 {
            return None;
        }
        let low = index.floor() as usize;
        let fraction = index - low as f64;
        if fraction < 1e-9 {
            return self.get(low);
        }
        let high = low + 1;
        let (a, b) = (self.get(low)?, self.get(high)?);
        Some(a + (b - a) * fraction)
    }

    /// Contiguous runs of valid samples.
    pub fn clumps(&self) -> Vec<Range<usize>> {
        let mut runs = Vec::new();
        let mut start = None;
        for (index, valid) in self.valid.iter().enumerate() {
            match (valid, start) {
                (true, None) => start = Some(index),
                (false, Some(begin)) => {
                    runs.push(begin..index);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(begin) = start {
            runs.push(begin..self.len());
        }
        runs
    }
}
