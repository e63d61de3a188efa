use crate::entity::MaskedArray;

/// Bridges short invalid runs by linear interpolation between the valid samples
/// either side.
///
/// Runs longer than `max_run_length` stay invalid, as do leading and trailing
/// runs which have only one neighbour. Applying it twice with the same bound
/// changes nothing.
pub fn repair_mask(array: &MaskedArray, max_run_length: usize) -> MaskedArray {
    let mut repaired = array.clone();
    let len = array.len();
    let mut index = 0;
    while index < len {
        if array.is_valid(index) {
            index += 1;
            continue;
        }
        let start = index;
        while index < len && !array.is_valid(index) {
            index += 1;
        }
        let stop = index;
        if start == 0 || stop == len || stop - start > max_run_length {
            continue;
        }
        let before = array.raw(start - 1);
        let after = array.raw(stop);
        let span = (stop - start + 1) as f64;
        for (step, position) in (start..stop).enumerate() {
            let fraction = (step + 1) as f64 / span;
            repaired.set(position, before + (after - before) * fraction);
        }
    }
    repaired
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn short_gap_is_interpolated() {
        let array = MaskedArray::from_options(&[Some(0.0), None, Some(2.0)]);
        assert_eq!(
            repair_mask(&array, 10).to_options(),
            vec![Some(0.0), Some(1.0), Some(2.0)]
        );
    }

    #[test]
    fn long_gap_and_edges_are_left_alone() {
        let array = MaskedArray::from_options(&[
            None,
            Some(0.0),
            None,
            None,
            None,
            Some(4.0),
            None,
        ]);
        let repaired = repair_mask(&array, 2);
        assert_eq!(repaired, array);

        let bridged = repair_mask(&array, 3);
        assert_eq!(
            bridged.to_options(),
            vec![None, Some(0.0), Some(1.0), Some(2.0), Some(3.0), Some(4.0), None]
        );
    }

    proptest! {
        #[test]
        fn repair_is_idempotent(
            samples in prop::collection::vec(prop::option::weighted(0.7, -1000.0f64..1000.0), 0..64),
            bound in 0usize..6,
        ) {
            let array = MaskedArray::from_options(&samples);
            let once = repair_mask(&array, bound);
            let twice = repair_mask(&once, bound);
            prop_assert_eq!(once, twice);
        }
    }
}
