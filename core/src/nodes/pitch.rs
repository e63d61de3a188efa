use crate::entity::{Entity, MaskedArray, Parameter};
use crate::entity::parameter::TIMEBASE_TOLERANCE;
use crate::nodes::names;
use crate::prelude::{
    Alignment, DependencyGroup, DeriveError, DeriveResult, DeriveSettings, DerivedNode, NodeInputs,
};

/// Pitch merged from two attitude sources sampled half a period apart.
///
/// The result runs at twice the sensor rate, starting with whichever sensor
/// samples first.
pub struct Pitch;

impl DerivedNode for Pitch {
    fn name(&self) -> &'static str {
        names::PITCH
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        &[
            DependencyGroup::Required(names::PITCH_1),
            DependencyGroup::Required(names::PITCH_2),
        ]
    }

    fn alignment(&self) -> Alignment {
        Alignment::Unaligned
    }

    fn derive(&self, inputs: &NodeInputs, _settings: &DeriveSettings) -> DeriveResult<Entity> {
        let first = inputs.parameter(names::PITCH_1)?;
        let second = inputs.parameter(names::PITCH_2)?;
        let merged = interleave(self.name(), first, second)?;
        Ok(merged.into())
    }
}

fn interleave(name: &str, a: &Parameter, b: &Parameter) -> DeriveResult<Parameter> {
    if (a.frequency - b.frequency).abs() > TIMEBASE_TOLERANCE {
        return Err(DeriveError::RateOrOffsetMismatch(format!(
            "'{}' at {} Hz and '{}' at {} Hz cannot be interleaved",
            a.name, a.frequency, b.name, b.frequency
        )));
    }
    let half_period = a.period() / 2.0;
    if ((a.offset - b.offset).abs() - half_period).abs() > TIMEBASE_TOLERANCE {
        return Err(DeriveError::RateOrOffsetMismatch(format!(
            "'{}' (+{} s) and '{}' (+{} s) are not half a period apart",
            a.name, a.offset, b.name, b.offset
        )));
    }
    let (early, late) = if a.offset < b.offset { (a, b) } else { (b, a) };
    let len = early.len().min(late.len());
    let mut merged = MaskedArray::invalid(2 * len);
    for index in 0..len {
        for (slot, source) in [(2 * index, early), (2 * index + 1, late)] {
            match source.array.get(index) {
                Some(value) => merged.set(slot, value),
                None => merged.set_raw(slot, source.array.raw(index)),
            }
        }
    }
    Parameter::new(name, merged, 2.0 * a.frequency, early.offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::FlightStore;
    use crate::nodes::derive_from;

    fn sensors(first: (Vec<f64>, f64, f64), second: (Vec<f64>, f64, f64)) -> FlightStore {
        [
            Parameter::new(names::PITCH_1, MaskedArray::from_values(first.0), first.1, first.2),
            Parameter::new(names::PITCH_2, MaskedArray::from_values(second.0), second.1, second.2),
        ]
        .into_iter()
        .map(|p| Entity::from(p.unwrap()))
        .collect()
    }

    fn range(offset: i32) -> Vec<f64> {
        (0..5).map(|v| f64::from(v + offset)).collect()
    }

    #[test]
    fn first_sensor_leads() {
        let store = sensors((range(0), 1.0, 0.1), (range(10), 1.0, 0.6));
        let pitch = derive_from(&Pitch, &store).unwrap();
        let pitch = pitch.as_parameter().unwrap();
        assert_eq!(
            pitch.array.valid_values(),
            vec![0.0, 10.0, 1.0, 11.0, 2.0, 12.0, 3.0, 13.0, 4.0, 14.0]
        );
        assert_eq!(pitch.frequency, 2.0);
        assert!((pitch.offset - 0.1).abs() < 1e-12);
    }

    #[test]
    fn second_sensor_leads() {
        let store = sensors((range(1), 1.0, 0.75), (range(10), 1.0, 0.25));
        let pitch = derive_from(&Pitch, &store).unwrap();
        assert_eq!(
            pitch.as_parameter().unwrap().array.valid_values(),
            vec![10.0, 1.0, 11.0, 2.0, 12.0, 3.0, 13.0, 4.0, 14.0, 5.0]
        );
    }

    #[test]
    fn different_rates_are_rejected() {
        let store = sensors(
            (range(0), 2.0, 0.1),
            ((10..20).map(f64::from).collect(), 4.0, 0.2),
        );
        assert!(matches!(
            derive_from(&Pitch, &store),
            Err(DeriveError::RateOrOffsetMismatch(_))
        ));
    }

    #[test]
    fn offsets_not_half_a_period_apart_are_rejected() {
        let store = sensors((range(0), 1.0, 0.11), (range(0), 1.0, 0.6));
        assert!(matches!(
            derive_from(&Pitch, &store),
            Err(DeriveError::RateOrOffsetMismatch(_))
        ));
    }
}
