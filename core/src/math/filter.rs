//! First-order discrete filters built with the bilinear transform.
//!
//! A continuous time constant `T` at sample rate `hz` becomes `tc = T * hz`
//! samples, and the difference equation is
//! `y[n] = b0 * x[n] + b1 * x[n-1] - a1 * y[n-1]`.

use crate::entity::MaskedArray;
use crate::prelude::{DeriveError, DeriveResult};

/// Coefficients of a first-order IIR section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirstOrderFilter {
    pub b0: f64,
    pub b1: f64,
    pub a1: f64,
}

impl FirstOrderFilter {
    /// `gain / (1 + T s)`
    pub fn lag(time_constant: f64, hz: f64, gain: f64) -> DeriveResult<Self> {
        let tc = scaled_time_constant(time_constant, hz)?;
        let b = gain / (1.0 + 2.0 * tc);
        Ok(Self {
            b0: b,
            b1: b,
            a1: (1.0 - 2.0 * tc) / (1.0 + 2.0 * tc),
        })
    }

    /// `gain * T s / (1 + T s)`
    pub fn washout(time_constant: f64, hz: f64, gain: f64) -> DeriveResult<Self> {
        let tc = scaled_time_constant(time_constant, hz)?;
        let b = gain * 2.0 * tc / (1.0 + 2.0 * tc);
        Ok(Self {
            b0: b,
            b1: -b,
            a1: (1.0 - 2.0 * tc) / (1.0 + 2.0 * tc),
        })
    }

    /// Output the filter settles at for a constant input.
    pub fn steady_state(&self, input: f64) -> f64 {
        input * (self.b0 + self.b1) / (1.0 + self.a1)
    }

    /// Runs the filter over `array`.
    ///
    /// With `initial_value` the filter starts as if that input had always been
    /// applied; without it the state starts at rest at zero. Invalid samples are
    /// not fed to the filter: the previous input is repeated and the output
    /// sample is marked invalid.
    pub fn apply(&self, array: &MaskedArray, initial_value: Option<f64>) -> MaskedArray {
        let mut result = array.clone();
        let mut previous_input = initial_value.unwrap_or(0.0);
        let mut previous_output = self.steady_state(previous_input);
        for index in 0..array.len() {
            let input = array.get(index).unwrap_or(previous_input);
            let output = self.b0 * input + self.b1 * previous_input - self.a1 * previous_output;
            result.set_raw(index, output);
            previous_input = input;
            previous_output = output;
        }
        result
    }
}

fn scaled_time_constant(time_constant: f64, hz: f64) -> DeriveResult<f64> {
    let tc = time_constant * hz;
    if !(tc.is_finite() && tc >= 0.5) {
        return Err(DeriveError::InvalidInput(format!(
            "time constant {time_constant} s too small for {hz} Hz data"
        )));
    }
    Ok(tc)
}

pub fn first_order_lag(
    array: &MaskedArray,
    time_constant: f64,
    hz: f64,
    gain: f64,
    initial_value: Option<f64>,
) -> DeriveResult<MaskedArray> {
    Ok(FirstOrderFilter::lag(time_constant, hz, gain)?.apply(array, initial_value))
}

pub fn first_order_washout(
    array: &MaskedArray,
    time_constant: f64,
    hz: f64,
    gain: f64,
    initial_value: Option<f64>,
) -> DeriveResult<MaskedArray> {
    Ok(FirstOrderFilter::washout(time_constant, hz, gain)?.apply(array, initial_value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lag_starting_at_steady_state_stays_there() {
        let array = MaskedArray::filled(5.0, 20);
        let lagged = first_order_lag(&array, 2.0, 1.0, 1.0, Some(5.0)).unwrap();
        assert!(lagged.valid_values().iter().all(|v| (v - 5.0).abs() < 1e-12));
    }

    #[test]
    fn lag_step_response_rises_monotonically() {
        let array = MaskedArray::filled(1.0, 50);
        let lagged = first_order_lag(&array, 4.0, 1.0, 1.0, None).unwrap();
        let values = lagged.valid_values();
        assert!(values.windows(2).all(|w| w[1] >= w[0]));
        assert!(values[0] > 0.0 && values[0] < 0.2);
        assert!((values[49] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn washout_removes_constant_bias() {
        let array = MaskedArray::filled(100.0, 30);
        let washed = first_order_washout(&array, 6.0, 1.0, 1.0, Some(100.0)).unwrap();
        assert!(washed.valid_values().iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn washout_with_inverse_gain_differentiates_a_ramp() {
        let ramp = MaskedArray::from_values((0..200).map(|i| i as f64 * 10.0).collect());
        let rate = first_order_washout(&ramp, 6.0, 1.0, 1.0 / 6.0, Some(0.0)).unwrap();
        assert!((rate.raw(199) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn short_time_constant_is_rejected() {
        let array = MaskedArray::filled(1.0, 4);
        assert!(first_order_lag(&array, 0.1, 1.0, 1.0, None).is_err());
    }

    #[test]
    fn invalid_input_is_not_fed_through() {
        let array = MaskedArray::from_options(&[Some(1.0), None, Some(1.0)]);
        let lagged = first_order_lag(&array, 1.0, 1.0, 1.0, Some(1.0)).unwrap();
        assert!(!lagged.is_valid(1));
        assert!((lagged.raw(2) - 1.0).abs() < 1e-12);
    }
}
