use crate::entity::{Entity, MaskedArray, Parameter};
use crate::math::{first_order_washout, hysteresis, integrate, rate_of_change, repair_mask};
use crate::nodes::names;
use crate::prelude::{DependencyGroup, DeriveResult, DeriveSettings, DerivedNode, NodeInputs};
use crate::settings::{AZ_WASHOUT_TC, GRAVITY, RATE_OF_CLIMB_LAG_TC};

/// Vertical speed in ft/min.
///
/// With vertical acceleration and radio altitude available this is a
/// complementary filter: height rates from pressure and radio altitude supply
/// the low frequencies, integrated acceleration the high ones. Otherwise
/// pressure altitude is differentiated directly.
pub struct RateOfClimb;

impl DerivedNode for RateOfClimb {
    fn name(&self) -> &'static str {
        names::RATE_OF_CLIMB
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        &[DependencyGroup::Alternatives(&[
            &[
                names::ACCELERATION_VERTICAL,
                names::ALTITUDE_STD,
                names::ALTITUDE_RADIO,
            ],
            &[names::ALTITUDE_STD],
        ])]
    }

    fn derive(&self, inputs: &NodeInputs, settings: &DeriveSettings) -> DeriveResult<Entity> {
        let alt_std = inputs.parameter(names::ALTITUDE_STD)?;
        let roc = match (
            inputs.optional_parameter(names::ACCELERATION_VERTICAL),
            inputs.optional_parameter(names::ALTITUDE_RADIO),
        ) {
            (Some(az), Some(alt_rad)) => inertial_rate_of_climb(az, alt_std, alt_rad, settings)?,
            _ => {
                let repaired = alt_std.derived(
                    names::ALTITUDE_STD,
                    repair_mask(&alt_std.array, settings.repair_samples(alt_std.frequency)),
                );
                rate_of_change(&repaired, settings.climb_rate_half_width)?.map(|v| v * 60.0)
            }
        };
        Ok(alt_std.derived(self.name(), roc).into())
    }
}

fn first_value(array: &MaskedArray) -> Option<f64> {
    array.first_valid().map(|index| array.raw(index))
}

/// Lagged height rate, ft/s: a washout with gain `1 / tc` is a lagged derivative.
fn height_rate(height: &MaskedArray, hz: f64) -> DeriveResult<MaskedArray> {
    first_order_washout(
        height,
        RATE_OF_CLIMB_LAG_TC,
        hz,
        1.0 / RATE_OF_CLIMB_LAG_TC,
        first_value(height),
    )
}

fn inertial_rate_of_climb(
    az: &Parameter,
    alt_std: &Parameter,
    alt_rad: &Parameter,
    settings: &DeriveSettings,
) -> DeriveResult<MaskedArray> {
    az.ensure_aligned(alt_std)?;
    az.ensure_aligned(alt_rad)?;
    let hz = az.frequency;

    let baro = height_rate(&repair_mask(&alt_std.array, settings.repair_samples(hz)), hz)?;
    let radio = height_rate(&alt_rad.array, hz)?;

    // Fully radio at or below the floor, fully pressure at or above the ceiling
    // or wherever the radio altimeter is invalid.
    let span = (settings.radio_blend_ceiling - settings.radio_blend_floor).max(f64::EPSILON);
    let mut blended = MaskedArray::invalid(az.len());
    for index in 0..az.len() {
        let ratio = alt_rad
            .array
            .get(index)
            .map_or(1.0, |r| ((r - settings.radio_blend_floor) / span).clamp(0.0, 1.0));
        let rate = match (baro.get(index), radio.get(index)) {
            (Some(b), Some(r)) => Some(ratio * b + (1.0 - ratio) * r),
            (Some(b), None) if ratio >= 1.0 => Some(b),
            (None, Some(r)) if ratio <= 0.0 => Some(r),
            _ => None,
        };
        if let Some(rate) = rate {
            blended.set(index, rate);
        }
    }

    let az_unbiased = first_order_washout(
        &az.array.map(|a| a - 1.0),
        AZ_WASHOUT_TC,
        hz,
        1.0,
        first_value(&az.array).map(|a| a - 1.0),
    )?;
    let inertial = integrate(&az_unbiased.map(|a| a * GRAVITY), hz, 0.0);
    let inertial_rate = first_order_washout(&inertial, RATE_OF_CLIMB_LAG_TC, hz, 1.0, None)?;

    Ok(blended.add(&inertial_rate)?.map(|v| v * 60.0))
}

/// Coarse vertical speed for phase detection, ft/min.
pub struct RateOfClimbForFlightPhases;

impl DerivedNode for RateOfClimbForFlightPhases {
    fn name(&self) -> &'static str {
        names::RATE_OF_CLIMB_FOR_FLIGHT_PHASES
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        &[DependencyGroup::Required(names::ALTITUDE_STD)]
    }

    fn derive(&self, inputs: &NodeInputs, settings: &DeriveSettings) -> DeriveResult<Entity> {
        let alt_std = inputs.parameter(names::ALTITUDE_STD)?;
        let repaired = alt_std.derived(
            names::ALTITUDE_STD,
            repair_mask(&alt_std.array, settings.repair_samples(alt_std.frequency)),
        );
        let fpm = rate_of_change(&repaired, settings.phase_climb_rate_half_width)?.map(|v| v * 60.0);
        let smoothed = hysteresis(&fpm, settings.hysteresis_rate_of_climb / 2.0);
        Ok(alt_std.derived(self.name(), smoothed).into())
    }
}

/// Height gained since the last descent, within fast sections.
pub struct ClimbForFlightPhases;

impl DerivedNode for ClimbForFlightPhases {
    fn name(&self) -> &'static str {
        names::CLIMB_FOR_FLIGHT_PHASES
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
        let altitude = repair_mask(&alt_std.array, settings.repair_samples(alt_std.frequency));
        let mut climb = MaskedArray::filled(0.0, altitude.len());
        for section in &fast.items {
            let mut total = 0.0;
            let mut previous: Option<f64> = None;
            for index in section.range(altitude.len()) {
                let Some(value) = altitude.get(index) else {
                    climb.set_invalid(index);
                    continue;
                };
                if let Some(last) = previous {
                    let step = value - last;
                    total = if step > 0.0 { total + step } else { 0.0 };
                }
                previous = Some(value);
                climb.set(index, total);
            }
        }
        Ok(alt_std.derived(self.name(), climb).into())
    }
}
