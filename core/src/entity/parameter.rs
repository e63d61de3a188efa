use crate::entity::array::MaskedArray;
use crate::prelude::{DeriveError, DeriveResult};

/// Tolerance used when comparing sample rates and phase offsets.
pub const TIMEBASE_TOLERANCE: f64 = 1e-6;

/// A sampled time-series on the shared flight time base.
///
/// Sample `i` sits at `i / frequency + offset` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub array: MaskedArray,
    pub frequency: f64,
    pub offset: f64,
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        array: MaskedArray,
        frequency: f64,
        offset: f64,
    ) -> DeriveResult<Self> {
        let name = name.into();
        if !(frequency.is_finite() && frequency > 0.0) {
            return Err(DeriveError::InvalidInput(format!(
                "{name}: sample rate must be positive, got {frequency}"
            )));
        }
        if !(0.0..1.0 / frequency).contains(&offset) {
            return Err(DeriveError::InvalidInput(format!(
                "{name}: offset {offset} outside one sample period at {frequency} Hz"
            )));
        }
        Ok(Self {
            name,
            array,
            frequency,
            offset,
        })
    }

    /// 1 Hz, zero offset.
    pub fn at_1hz(name: impl Into<String>, array: MaskedArray) -> Self {
        Self {
            name: name.into(),
            array,
            frequency: 1.0,
            offset: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    pub fn time_of(&self, index: f64) -> f64 {
        index / self.frequency + self.offset
    }

    pub fn index_at(&self, time: f64) -> f64 {
        (time - self.offset) * self.frequency
    }

    pub fn period(&self) -> f64 {
        1.0 / self.frequency
    }

    /// A new parameter sharing this one's time base.
    pub fn derived(&self, name: impl Into<String>, array: MaskedArray) -> Parameter {
        Parameter {
            name: name.into(),
            array,
            frequency: self.frequency,
            offset: self.offset,
        }
    }

    pub fn same_timebase(&self, other: &Parameter) -> bool {
        (self.frequency - other.frequency).abs() < TIMEBASE_TOLERANCE
            && (self.offset - other.offset).abs() < TIMEBASE_TOLERANCE
            && self.len() == other.len()
    }

    /// Arithmetic across parameters is only defined on a common time base.
    pub fn ensure_aligned(&self, other: &Parameter) -> DeriveResult<()> {
        if self.same_timebase(other) {
            Ok(())
        } else {
            Err(DeriveError::RateOrOffsetMismatch(format!(
                "'{}' ({} Hz, +{} s, {} samples) and '{}' ({} Hz, +{} s, {} samples)",
                self.name,
                self.frequency,
                self.offset,
                self.len(),
                other.name,
                other.frequency,
                other.offset,
                other.len()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_must_fit_within_one_period() {
        let array = MaskedArray::from_values(vec![0.0; 4]);
        assert!(Parameter::new("Pitch", array.clone(), 4.0, 0.2).is_ok());
        assert!(Parameter::new("Pitch", array.clone(), 4.0, 0.25).is_err());
        assert!(Parameter::new("Pitch", array, 0.0, 0.0).is_err());
    }

    #[test]
    fn ensure_aligned_reports_mismatch() {
        let a = Parameter::new("A", MaskedArray::from_values(vec![0.0; 4]), 2.0, 0.0).unwrap();
        let b = Parameter::new("B", MaskedArray::from_values(vec![0.0; 4]), 2.0, 0.1).unwrap();
        assert!(a.ensure_aligned(&a.clone()).is_ok());
        assert!(matches!(
            a.ensure_aligned(&b),
            Err(DeriveError::RateOrOffsetMismatch(_))
        ));
    }
}
