use crate::entity::MaskedArray;

/// Schmitt-trigger follower.
///
/// The output holds its value until the input is more than `band` away, then
/// trails the input at exactly `band`. Invalid samples are skipped and stay
/// invalid. Output never leaves `[min(input), max(input)]` over the valid data.
pub fn hysteresis(array: &MaskedArray, band: f64) -> MaskedArray {
    let band = band.abs();
    let mut result = array.clone();
    let mut held: Option<f64> = None;
    for index in 0..array.len() {
        let Some(input) = array.get(index) else {
            if let Some(value) = held {
                result.set_raw(index, value);
            }
            continue;
        };
        let output = match held {
            None => input,
            Some(old) if input - old > band => input - band,
            Some(old) if input - old < -band => input + band,
            Some(old) => old,
        };
        held = Some(output);
        result.set(index, output);
    }
    result
}
