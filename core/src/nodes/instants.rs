use crate::entity::{Entity, KeyTimeInstances};
use crate::math::{first_rising_crossing, last_rising_crossing};
use crate::nodes::names;
use crate::prelude::{DependencyGroup, DeriveResult, DeriveSettings, DerivedNode, NodeInputs};

const INSTANT_DEPENDENCIES: &[DependencyGroup] = &[
    DependencyGroup::Required(names::RATE_OF_CLIMB_FOR_FLIGHT_PHASES),
    DependencyGroup::Required(names::FAST),
];

/// Where the climb rate first passes the liftoff threshold in each fast section.
pub struct Liftoff;

impl DerivedNode for Liftoff {
    fn name(&self) -> &'static str {
        names::LIFTOFF
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        INSTANT_DEPENDENCIES
    }

    fn derive(&self, inputs: &NodeInputs, settings: &DeriveSettings) -> DeriveResult<Entity> {
        let roc = inputs.parameter(names::RATE_OF_CLIMB_FOR_FLIGHT_PHASES)?;
        let fast = inputs.sections(names::FAST)?;
        let mut instants = KeyTimeInstances::new(self.name(), roc.frequency, roc.offset);
        for section in &fast.items {
            let range = section.range(roc.len());
            if let Some(index) = first_rising_crossing(&roc.array, range, settings.rate_of_climb_for_liftoff) {
                instants.push_index(index);
            }
        }
        Ok(instants.into())
    }
}

/// Where the final descent of each fast section levels off.
pub struct Touchdown;

impl DerivedNode for Touchdown {
    fn name(&self) -> &'static str {
        names::TOUCHDOWN
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        INSTANT_DEPENDENCIES
    }

    fn derive(&self, inputs: &NodeInputs, settings: &DeriveSettings) -> DeriveResult<Entity> {
        let roc = inputs.parameter(names::RATE_OF_CLIMB_FOR_FLIGHT_PHASES)?;
        let fast = inputs.sections(names::FAST)?;
        let mut instants = KeyTimeInstances::new(self.name(), roc.frequency, roc.offset);
        for section in &fast.items {
            let range = section.range(roc.len());
            if let Some(index) = last_rising_crossing(&roc.array, range, settings.rate_of_climb_for_touchdown) {
                instants.push_index(index);
            }
        }
        Ok(instants.into())
    }
}
