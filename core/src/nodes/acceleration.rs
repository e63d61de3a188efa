use crate::entity::{Entity, MaskedArray};
use crate::math::{rate_of_change, repair_mask};
use crate::nodes::names;
use crate::prelude::{DependencyGroup, DeriveResult, DeriveSettings, DerivedNode, NodeInputs};
use crate::settings::{GRAVITY, KTS_TO_FPS};

/// Body accelerations resolved into the earth vertical, in g.
///
/// Resolved through roll first, then pitch. Everything is aligned to the
/// normal accelerometer.
pub struct AccelerationVertical;

impl DerivedNode for AccelerationVertical {
    fn name(&self) -> &'static str {
        names::ACCELERATION_VERTICAL
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        &[
            DependencyGroup::Required(names::ACCELERATION_NORMAL),
            DependencyGroup::Required(names::ACCELERATION_LATERAL),
            DependencyGroup::Required(names::ACCELERATION_LONGITUDINAL),
            DependencyGroup::Required(names::PITCH),
            DependencyGroup::Required(names::ROLL),
        ]
    }

    fn derive(&self, inputs: &NodeInputs, _settings: &DeriveSettings) -> DeriveResult<Entity> {
        let norm = inputs.parameter(names::ACCELERATION_NORMAL)?;
        let lat = inputs.parameter(names::ACCELERATION_LATERAL)?;
        let long = inputs.parameter(names::ACCELERATION_LONGITUDINAL)?;
        let pitch = inputs.parameter(names::PITCH)?;
        let roll = inputs.parameter(names::ROLL)?;
        for other in [lat, long, pitch, roll] {
            norm.ensure_aligned(other)?;
        }

        let roll_rad = roll.array.map(f64::to_radians);
        let pitch_rad = pitch.array.map(f64::to_radians);

        // Normal and lateral into the plane of the wings level aircraft.
        let norm_term = norm.array.mul(&roll_rad.map(f64::cos))?;
        let lat_term = lat.array.mul(&roll_rad.map(f64::sin))?;
        let level = norm_term.sub(&lat_term)?;

        let vertical = level
            .mul(&pitch_rad.map(f64::cos))?
            .add(&long.array.mul(&pitch_rad.map(f64::sin))?)?;

        Ok(norm.derived(self.name(), vertical).into())
    }
}

/// Forward acceleration in g, for phase detection only.
///
/// The longitudinal accelerometer is used when recorded; otherwise airspeed is
/// differentiated.
pub struct AccelerationForwardsForFlightPhases;

impl DerivedNode for AccelerationForwardsForFlightPhases {
    fn name(&self) -> &'static str {
        names::ACCELERATION_FORWARDS_FOR_FLIGHT_PHASES
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        &[DependencyGroup::OptionalGroup {
            names: &[names::ACCELERATION_LONGITUDINAL, names::AIRSPEED],
            min_count: 1,
        }]
    }

    fn derive(&self, inputs: &NodeInputs, settings: &DeriveSettings) -> DeriveResult<Entity> {
        if let Some(acc_long) = inputs.optional_parameter(names::ACCELERATION_LONGITUDINAL) {
            let repaired = repair_mask(&acc_long.array, settings.repair_samples(acc_long.frequency));
            return Ok(acc_long.derived(self.name(), repaired).into());
        }
        let airspeed = inputs.parameter(names::AIRSPEED)?;
        let repaired = airspeed.derived(
            names::AIRSPEED,
            repair_mask(&airspeed.array, settings.repair_samples(airspeed.frequency)),
        );
        let kts_per_second = rate_of_change(&repaired, settings.acceleration_half_width)?;
        let accel: MaskedArray = kts_per_second.map(|v| v * KTS_TO_FPS / GRAVITY);
        Ok(airspeed.derived(self.name(), accel).into())
    }
}
