use crate::entity::MaskedArray;

/// Unwraps a heading recorded modulo 360°.
///
/// Whenever consecutive valid samples differ by more than 180° a whole turn is
/// added or removed, so the result can be differentiated. Each output sample is
/// the input plus an integer number of turns, so wrapping it again with
/// [`wrap_360`] gives the input back. Invalid gaps are bridged from the last
/// valid sample.
pub fn make_continuous(heading: &MaskedArray) -> MaskedArray {
    let mut result = heading.clone();
    let mut turns = 0.0_f64;
    let mut previous: Option<f64> = None;
    for index in 0..heading.len() {
        let Some(value) = heading.get(index) else {
            continue;
        };
        if let Some(last) = previous {
            let delta = value - last;
            if delta > 180.0 {
                turns -= 1.0;
            } else if delta < -180.0 {
                turns += 1.0;
            }
        }
        previous = Some(value);
        result.set(index, value + 360.0 * turns);
    }
    result
}

/// Folds an angle into `[0, 360)`.
pub fn wrap_360(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn crossing_north_keeps_counting_up() {
        let wrapped = MaskedArray::from_values(
            (0..10).map(|i| wrap_360(355.0 + i as f64)).collect(),
        );
        assert_eq!(
            make_continuous(&wrapped).valid_values(),
            vec![355.0, 356.0, 357.0, 358.0, 359.0, 360.0, 361.0, 362.0, 363.0, 364.0]
        );
    }

    #[test]
    fn left_turn_through_north_goes_negative() {
        let wrapped = MaskedArray::from_values(vec![2.0, 1.0, 0.0, 359.0, 358.0]);
        assert_eq!(
            make_continuous(&wrapped).valid_values(),
            vec![2.0, 1.0, 0.0, -1.0, -2.0]
        );
    }

    #[test]
    fn gap_is_bridged_from_last_valid_sample() {
        let wrapped = MaskedArray::from_options(&[Some(358.0), None, Some(2.0)]);
        assert_eq!(
            make_continuous(&wrapped).to_options(),
            vec![Some(358.0), None, Some(362.0)]
        );
    }

    proptest! {
        #[test]
        fn rewrapping_reproduces_input(
            whole in prop::collection::vec(0u32..360, 1..100),
        ) {
            let samples: Vec<f64> = whole.iter().map(|v| f64::from(*v)).collect();
            let unwrapped = make_continuous(&MaskedArray::from_values(samples.clone()));
            for (original, value) in samples.iter().zip(unwrapped.valid_values()) {
                prop_assert_eq!(wrap_360(value), *original);
            }
        }
    }
}
