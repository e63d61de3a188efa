use crate::entity::{MaskedArray, Parameter};
use crate::prelude::{DeriveError, DeriveResult};

/// Slope per second using a centred difference over `±half_width` seconds.
///
/// Within `half_width` of either end the slope falls back to single-step
/// one-sided differences. A sample is valid only if both samples it was
/// computed from are valid.
pub fn rate_of_change(param: &Parameter, half_width: f64) -> DeriveResult<MaskedArray> {
    let hz = param.frequency;
    let hw = (half_width * hz).round() as usize;
    if hw < 1 {
        return Err(DeriveError::InvalidInput(format!(
            "half width {half_width} s is under one sample at {hz} Hz"
        )));
    }
    let array = &param.array;
    let len = array.len();
    let mut slope = MaskedArray::invalid(len);
    if len < 2 {
        return Ok(slope);
    }
    let span = 2.0 * hw as f64 / hz;
    for index in 0..len {
        let (low, high, scale) = if index >= hw && index + hw < len {
            (index - hw, index + hw, span)
        } else if index < hw && index + 1 < len {
            (index, index + 1, 1.0 / hz)
        } else {
            (index - 1, index, 1.0 / hz)
        };
        let value = (array.raw(high) - array.raw(low)) / scale;
        slope.set_raw(index, value);
        if array.is_valid(low) && array.is_valid(high) {
            slope.set(index, value);
        }
    }
    Ok(slope)
}

/// Trapezoidal running integral starting from `initial`.
///
/// Invalid samples contribute nothing and are marked invalid in the result; the
/// running total carries over them.
pub fn integrate(array: &MaskedArray, hz: f64, initial: f64) -> MaskedArray {
    let mut result = array.clone();
    let mut total = initial;
    let mut previous: Option<f64> = None;
    for index in 0..array.len() {
        match array.get(index) {
            Some(value) => {
                if let Some(last) = previous {
                    total += (value + last) / (2.0 * hz);
                }
                previous = Some(value);
                result.set(index, total);
            }
            None => {
                previous = None;
                result.set_raw(index, total);
            }
        }
    }
    result
}
