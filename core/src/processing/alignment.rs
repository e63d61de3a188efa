use crate::entity::{Entity, MaskedArray, Parameter};
use crate::prelude::{DeriveError, DeriveResult};

/// Fraction of a sample treated as an exact hit.
const EXACT_TOLERANCE: f64 = 1e-6;

/// Resamples `source` onto the time base `target_rate` / `target_offset`.
///
/// Each target sample is interpolated linearly between the two source samples
/// that bracket it in physical time and is valid only if both are. A source
/// covers `[offset, offset + len / frequency)`: target times after its last
/// sample but inside that span hold the last sample. Target times before the
/// first sample or past the span are invalid; their placeholder values repeat
/// the nearest edge sample. The output covers the same duration as the source.
pub fn align(source: &Parameter, target_rate: f64, target_offset: f64) -> DeriveResult<MaskedArray> {
    if !(target_rate.is_finite() && target_rate > 0.0) {
        return Err(DeriveError::InvalidInput(format!(
            "cannot align '{}' to {target_rate} Hz",
            source.name
        )));
    }
    let array = &source.array;
    let len = array.len();
    let out_len = (len as f64 * target_rate / source.frequency).round() as usize;
    let mut aligned = MaskedArray::invalid(out_len);
    if len == 0 {
        return Ok(aligned);
    }
    let last = len - 1;
    for index in 0..out_len {
        let time = index as f64 / target_rate + target_offset;
        let position = source.index_at(time);
        if position < -EXACT_TOLERANCE {
            aligned.set_raw(index, array.raw(0));
            continue;
        }
        let low = (position + EXACT_TOLERANCE).floor().max(0.0) as usize;
        let fraction = position - low as f64;
        if low > last || (low == last && fraction.abs() >= EXACT_TOLERANCE) {
            if position < len as f64 - EXACT_TOLERANCE && array.is_valid(last) {
                aligned.set(index, array.raw(last));
            } else {
                aligned.set_raw(index, array.raw(last));
            }
            continue;
        }
        if fraction.abs() < EXACT_TOLERANCE {
            if array.is_valid(low) {
                aligned.set(index, array.raw(low));
            } else {
                aligned.set_raw(index, array.raw(low));
            }
            continue;
        }
        let value = array.raw(low) * (1.0 - fraction) + array.raw(low + 1) * fraction;
        if array.is_valid(low) && array.is_valid(low + 1) {
            aligned.set(index, value);
        } else {
            aligned.set_raw(index, value);
        }
    }
    Ok(aligned)
}

/// `align` wrapped back into a parameter on the target time base.
pub fn align_parameter(source: &Parameter, target_rate: f64, target_offset: f64) -> DeriveResult<Parameter> {
    let array = align(source, target_rate, target_offset)?;
    Ok(Parameter {
        name: source.name.clone(),
        array,
        frequency: target_rate,
        offset: target_offset,
    })
}

/// Moves any time-based entity onto the target time base; attributes pass through.
pub fn align_entity(entity: &Entity, target_rate: f64, target_offset: f64) -> DeriveResult<Entity> {
    let aligned = match entity {
        Entity::Parameter(p) => {
            if (p.frequency - target_rate).abs() < EXACT_TOLERANCE
                && (p.offset - target_offset).abs() < EXACT_TOLERANCE
            {
                Entity::Parameter(p.clone())
            } else {
                Entity::Parameter(align_parameter(p, target_rate, target_offset)?)
            }
        }
        Entity::Attribute(a) => Entity::Attribute(a.clone()),
        Entity::KeyTimeInstances(k) => Entity::KeyTimeInstances(k.aligned(target_rate, target_offset)),
        Entity::KeyPointValues(k) => Entity::KeyPointValues(k.aligned(target_rate, target_offset)),
        Entity::Sections(s) => Entity::Sections(s.aligned(target_rate, target_offset)),
    };
    Ok(aligned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(values: Vec<f64>, frequency: f64, offset: f64) -> Parameter {
        Parameter::new("Source", MaskedArray::from_values(values), frequency, offset).unwrap()
    }

    #[test]
    fn upsampling_interpolates_and_holds_last_sample() {
        let source = param(vec![0.0, 4.0, 8.0, 12.0], 4.0, 0.0);
        let aligned = align(&source, 8.0, 0.0).unwrap();
        assert_eq!(aligned.len(), 8);
        assert_eq!(
            aligned.to_options(),
            vec![
                Some(0.0),
                Some(2.0),
                Some(4.0),
                Some(6.0),
                Some(8.0),
                Some(10.0),
                Some(12.0),
                Some(12.0)
            ]
        );
    }

    #[test]
    fn target_past_the_recorded_span_is_invalid() {
        let source = param(vec![1.0, 2.0], 1.0, 0.0);
        let aligned = align(&source, 2.0, 0.6).unwrap();
        assert_eq!(aligned.len(), 4);
        let options = aligned.to_options();
        assert!((options[0].unwrap() - 1.6).abs() < 1e-12);
        assert_eq!(&options[1..], &[Some(2.0), Some(2.0), None]);
        assert_eq!(aligned.raw(3), 2.0);
    }

    #[test]
    fn downsampling_picks_coincident_samples() {
        let source = param((0..8).map(f64::from).collect(), 8.0, 0.0);
        let aligned = align(&source, 2.0, 0.0).unwrap();
        assert_eq!(aligned.valid_values(), vec![0.0, 4.0]);
    }

    #[test]
    fn target_before_first_sample_is_invalid() {
        let source = param(vec![10.0, 20.0, 30.0], 1.0, 0.5);
        let aligned = align(&source, 1.0, 0.0).unwrap();
        assert_eq!(aligned.to_options(), vec![None, Some(15.0), Some(25.0)]);
    }

    #[test]
    fn invalid_bracket_invalidates_result() {
        let source = Parameter::at_1hz(
            "Source",
            MaskedArray::from_options(&[Some(0.0), None, Some(2.0)]),
        );
        let aligned = align(&source, 2.0, 0.0).unwrap();
        assert_eq!(
            aligned.to_options(),
            vec![Some(0.0), None, None, None, Some(2.0), Some(2.0)]
        );
    }

    #[test]
    fn fully_invalid_source_gives_exhausted_array() {
        let source = Parameter::at_1hz("Source", MaskedArray::invalid(4));
        assert!(align(&source, 4.0, 0.1).unwrap().is_exhausted());
    }
}
