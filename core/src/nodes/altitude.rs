use crate::entity::{Entity, MaskedArray, Parameter};
use crate::math::{hysteresis, repair_mask};
use crate::nodes::names;
use crate::prelude::{DependencyGroup, DeriveError, DeriveResult, DeriveSettings, DerivedNode, NodeInputs};

fn repaired(param: &Parameter, settings: &DeriveSettings) -> MaskedArray {
    repair_mask(&param.array, settings.repair_samples(param.frequency))
}

/// Pressure altitude cleaned up for phase detection.
pub struct AltitudeForFlightPhases;

impl DerivedNode for AltitudeForFlightPhases {
    fn name(&self) -> &'static str {
        names::ALTITUDE_FOR_FLIGHT_PHASES
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        &[DependencyGroup::Required(names::ALTITUDE_STD)]
    }

    fn derive(&self, inputs: &NodeInputs, settings: &DeriveSettings) -> DeriveResult<Entity> {
        let alt_std = inputs.parameter(names::ALTITUDE_STD)?;
        let smoothed = hysteresis(&repaired(alt_std, settings), settings.hysteresis_altitude / 2.0);
        Ok(alt_std.derived(self.name(), smoothed).into())
    }
}

/// Radio altitude cleaned up for phase detection.
pub struct AltitudeRadioForFlightPhases;

impl DerivedNode for AltitudeRadioForFlightPhases {
    fn name(&self) -> &'static str {
        names::ALTITUDE_RADIO_FOR_FLIGHT_PHASES
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        &[DependencyGroup::Required(names::ALTITUDE_RADIO)]
    }

    fn derive(&self, inputs: &NodeInputs, settings: &DeriveSettings) -> DeriveResult<Entity> {
        let alt_rad = inputs.parameter(names::ALTITUDE_RADIO)?;
        let smoothed = hysteresis(
            &repaired(alt_rad, settings),
            settings.hysteresis_altitude_radio / 2.0,
        );
        Ok(alt_rad.derived(self.name(), smoothed).into())
    }
}

/// Height above the departure or arrival field, per fast section.
///
/// Up to the highest point of each section the altitude is referenced to the
/// section's first sample; after it, to the first sample following the section.
/// Outside fast sections the aircraft is on the ground and the result is zero.
pub struct AltitudeAALForFlightPhases;

impl DerivedNode for AltitudeAALForFlightPhases {
    fn name(&self) -> &'static str {
        names::ALTITUDE_AAL_FOR_FLIGHT_PHASES
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        &[
            DependencyGroup::Required(names::ALTITUDE_STD),
            DependencyGroup::Required(names::FAST),
        ]
    }

    fn derive(&self, inputs: &NodeInputs, settings: &DeriveSettings) -> DeriveResult<Entity> {
        let alt_std = inputs.parameter(names::ALTITUDE_STD)?;
        let fast = inputs.sections(names::FAST)?;
        let altitude = repaired(alt_std, settings);
        let len = altitude.len();
        let mut aal = MaskedArray::filled(0.0, len);

        for section in &fast.items {
            let range = section.range(len);
            if range.is_empty() {
                continue;
            }
            let Some(peak) = range
                .clone()
                .filter_map(|i| altitude.get(i).map(|v| (i, v)))
                .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
                    Some((_, top)) if top >= v => best,
                    _ => Some((i, v)),
                })
                .map(|(i, _)| i)
            else {
                continue;
            };
            let takeoff_datum = altitude.get(range.start);
            let landing_datum = altitude.get(range.end.min(len - 1));
            for index in range {
                let datum = if index < peak { takeoff_datum } else { landing_datum };
                match (altitude.get(index), datum) {
                    (Some(value), Some(datum)) => aal.set(index, value - datum),
                    _ => aal.set_invalid(index),
                }
            }
        }
        Ok(alt_std.derived(self.name(), aal).into())
    }
}

/// Radio altimeter reading corrected to the main gear.
pub struct AltitudeRadio;

impl DerivedNode for AltitudeRadio {
    fn name(&self) -> &'static str {
        names::ALTITUDE_RADIO
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        &[
            DependencyGroup::Required(names::ALTITUDE_RADIO_SENSOR),
            DependencyGroup::Required(names::PITCH),
            DependencyGroup::Required(names::MAIN_GEAR_TO_ALTITUDE_RADIO),
        ]
    }

    fn derive(&self, inputs: &NodeInputs, _settings: &DeriveSettings) -> DeriveResult<Entity> {
        let sensor = inputs.parameter(names::ALTITUDE_RADIO_SENSOR)?;
        let pitch = inputs.parameter(names::PITCH)?;
        let lever = lever_arm(inputs, names::MAIN_GEAR_TO_ALTITUDE_RADIO)?;
        let corrected = pitch_corrected(sensor, pitch, lever)?;
        Ok(sensor.derived(self.name(), corrected).into())
    }
}

/// Clearance of the tail above the runway.
pub struct AltitudeTail;

impl DerivedNode for AltitudeTail {
    fn name(&self) -> &'static str {
        names::ALTITUDE_TAIL
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        &[
            DependencyGroup::Required(names::ALTITUDE_RADIO),
            DependencyGroup::Required(names::PITCH),
            DependencyGroup::Required(names::DIST_GEAR_TO_TAIL),
        ]
    }

    fn derive(&self, inputs: &NodeInputs, _settings: &DeriveSettings) -> DeriveResult<Entity> {
        let alt_rad = inputs.parameter(names::ALTITUDE_RADIO)?;
        let pitch = inputs.parameter(names::PITCH)?;
        let lever = lever_arm(inputs, names::DIST_GEAR_TO_TAIL)?;
        let clearance = pitch_corrected(alt_rad, pitch, lever)?;
        Ok(alt_rad.derived(self.name(), clearance).into())
    }
}

fn lever_arm(inputs: &NodeInputs, name: &str) -> DeriveResult<f64> {
    inputs
        .attribute(name)?
        .value
        .as_number()
        .ok_or_else(|| DeriveError::InvalidInput(format!("'{name}' is not a distance")))
}

/// `height - sin(pitch) * lever`; nose up lowers a point aft of the gear.
fn pitch_corrected(height: &Parameter, pitch: &Parameter, lever: f64) -> DeriveResult<MaskedArray> {
    height.ensure_aligned(pitch)?;
    height
        .array
        .zip_map(&pitch.array, |h, p| h - p.to_radians().sin() * lever)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Attribute, FlightStore};
    use crate::nodes::derive_from;

    fn store(entities: Vec<Entity>) -> FlightStore {
        entities.into_iter().collect()
    }

    fn output(node: &dyn DerivedNode, entities: Vec<Entity>) -> MaskedArray {
        derive_from(node, &store(entities))
            .unwrap()
            .as_parameter()
            .map(|p| p.array.clone())
            .unwrap()
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-6, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn short_gap_is_repaired_before_hysteresis() {
        let raw = MaskedArray::from_options(&[Some(0.0), None, Some(2.0)]);
        let alt = output(
            &AltitudeForFlightPhases,
            vec![Parameter::at_1hz(names::ALTITUDE_STD, raw.clone()).into()],
        );
        assert_eq!(alt.to_options(), vec![Some(0.0); 3]);

        let rad = output(
            &AltitudeRadioForFlightPhases,
            vec![Parameter::at_1hz(names::ALTITUDE_RADIO, raw).into()],
        );
        assert_eq!(rad.to_options(), vec![Some(0.0); 3]);
    }

    #[test]
    fn altitude_hysteresis_clips_a_sine() {
        let wave: Vec<f64> = (0..60).map(|i| (f64::from(i) * 0.1).sin() * 200.0).collect();
        let alt = output(
            &AltitudeForFlightPhases,
            vec![Parameter::at_1hz(names::ALTITUDE_STD, MaskedArray::from_values(wave)).into()],
        );
        let values = alt.valid_values();
        assert_close(&values[..7], &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 12.92849468]);
        assert_close(&values[16..18], &[99.91472061, 99.91472061]);
        assert_close(&values[32..34], &[88.32517131, 68.45086117]);
        assert_close(&values[59..], &[-99.98465151]);
    }

    fn fast_store(altitude: MaskedArray) -> Vec<Entity> {
        let speed: Vec<f64> = (6..12).chain((6..=12).rev()).map(|v| f64::from(v) * 10.0).collect();
        let fast = derive_from(
            &crate::nodes::phases::Fast,
            &store(vec![Parameter::at_1hz(names::AIRSPEED, MaskedArray::from_values(speed)).into()]),
        )
        .unwrap();
        vec![Parameter::at_1hz(names::ALTITUDE_STD, altitude).into(), fast]
    }

    fn up_and_down() -> Vec<Option<f64>> {
        (6..12)
            .chain((6..=12).rev())
            .map(|v| Some(f64::from(v) * 100.0))
            .collect()
    }

    #[test]
    fn aal_references_each_half_of_the_section() {
        let alt = MaskedArray::from_options(&up_and_down());
        let aal = output(&AltitudeAALForFlightPhases, fast_store(alt));
        assert_eq!(
            aal.valid_values(),
            vec![0.0, 0.0, 0.0, 100.0, 200.0, 300.0, 500.0, 400.0, 300.0, 200.0, 100.0, 0.0, 0.0]
        );
    }

    #[test]
    fn aal_survives_masked_data_at_lift() {
        let mut samples = up_and_down();
        for sample in &mut samples[1..4] {
            *sample = None;
        }
        let aal = output(&AltitudeAALForFlightPhases, fast_store(MaskedArray::from_options(&samples)));
        assert_eq!(
            aal.valid_values(),
            vec![0.0, 0.0, 0.0, 100.0, 200.0, 300.0, 500.0, 400.0, 300.0, 200.0, 100.0, 0.0, 0.0]
        );
    }

    #[test]
    fn radio_altitude_corrected_for_pitch() {
        let sensor = Parameter::at_1hz(names::ALTITUDE_RADIO_SENSOR, MaskedArray::filled(10.0, 10));
        let pitch = Parameter::at_1hz(
            names::PITCH,
            MaskedArray::from_values((0..10).map(|i| f64::from(i - 2) * 5.0).collect()),
        );
        let rad = output(
            &AltitudeRadio,
            vec![
                sensor.into(),
                pitch.into(),
                Attribute::number(names::MAIN_GEAR_TO_ALTITUDE_RADIO, 10.0).into(),
            ],
        );
        assert_close(
            &rad.valid_values(),
            &[
                11.7364817767,
                10.8715574275,
                10.0,
                9.12844257252,
                8.26351822333,
                7.41180954897,
                6.57979856674,
                5.77381738259,
                5.0,
                4.26423563649,
            ],
        );
    }

    #[test]
    fn tail_clearance_shrinks_as_nose_rises() {
        let rad = Parameter::at_1hz(names::ALTITUDE_RADIO, MaskedArray::filled(10.0, 10));
        let pitch = Parameter::at_1hz(
            names::PITCH,
            MaskedArray::from_values((0..10).map(|i| f64::from(i) * 2.0).collect()),
        );
        let tail = output(
            &AltitudeTail,
            vec![
                rad.into(),
                pitch.into(),
                Attribute::number(names::DIST_GEAR_TO_TAIL, 35.0).into(),
            ],
        );
        assert_close(
            &tail.valid_values(),
            &[
                10.0,
                8.77851761541,
                7.55852341896,
                6.34150378563,
                5.1289414664,
                3.92231378166,
                2.72309082138,
                1.53273365401,
                0.352692546405,
                -0.815594803123,
            ],
        );
    }

    #[test]
    fn aal_combination() {
        assert_eq!(
            AltitudeAALForFlightPhases.operational_combinations(),
            vec![vec![names::ALTITUDE_STD, names::FAST]]
        );
    }
}
