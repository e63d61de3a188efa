//! Built-in derived parameters, phases, events and flight attributes.

pub mod acceleration;
pub mod altitude;
pub mod attributes;
pub mod climb;
pub mod engines;
pub mod flight_type;
pub mod heading;
pub mod instants;
pub mod names;
pub mod phases;
pub mod pilot;
pub mod pitch;
pub mod point_values;

use crate::entity::FlightStore;
use crate::prelude::{DeriveResult, DeriveSettings, DerivedNode, Entity, NodeInputs};

/// Every node shipped with the library, in no particular order.
pub fn builtin_nodes() -> Vec<&'static dyn DerivedNode> {
    vec![
        &acceleration::AccelerationVertical,
        &acceleration::AccelerationForwardsForFlightPhases,
        &altitude::AltitudeForFlightPhases,
        &altitude::AltitudeRadioForFlightPhases,
        &altitude::AltitudeAALForFlightPhases,
        &altitude::AltitudeRadio,
        &altitude::AltitudeTail,
        &climb::RateOfClimb,
        &climb::RateOfClimbForFlightPhases,
        &climb::ClimbForFlightPhases,
        &engines::ENG_N1_AVERAGE,
        &engines::ENG_N1_MINIMUM,
        &engines::ENG_N1_MAXIMUM,
        &engines::ENG_N2_AVERAGE,
        &engines::ENG_N2_MINIMUM,
        &engines::ENG_N2_MAXIMUM,
        &heading::HeadingContinuous,
        &heading::RateOfTurn,
        &pitch::Pitch,
        &phases::AirspeedForFlightPhases,
        &phases::Fast,
        &phases::Takeoff,
        &phases::Landing,
        &instants::Liftoff,
        &instants::Touchdown,
        &point_values::FUEL_QTY_AT_LIFTOFF,
        &point_values::FUEL_QTY_AT_TOUCHDOWN,
        &point_values::GROSS_WEIGHT_AT_LIFTOFF,
        &point_values::GROSS_WEIGHT_AT_TOUCHDOWN,
        &attributes::TAKEOFF_FUEL,
        &attributes::LANDING_FUEL,
        &attributes::TAKEOFF_GROSS_WEIGHT,
        &attributes::LANDING_GROSS_WEIGHT,
        &attributes::TAKEOFF_DATETIME,
        &attributes::LANDING_DATETIME,
        &attributes::Duration,
        &attributes::FlightNumber,
        &flight_type::FlightTypeAttribute,
        &pilot::TAKEOFF_PILOT,
        &pilot::LANDING_PILOT,
    ]
}

/// Resolves `node` against `store` and derives it once with default settings.
pub fn derive_from(node: &dyn DerivedNode, store: &FlightStore) -> DeriveResult<Entity> {
    derive_with(node, store, &DeriveSettings::default())
}

pub fn derive_with(
    node: &dyn DerivedNode,
    store: &FlightStore,
    settings: &DeriveSettings,
) -> DeriveResult<Entity> {
    let inputs = NodeInputs::resolve(node, store)?;
    node.derive(&inputs, settings)
}
