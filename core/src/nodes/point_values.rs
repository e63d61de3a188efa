use crate::entity::{Entity, KeyPointValues};
use crate::nodes::names;
use crate::prelude::{DependencyGroup, DeriveResult, DeriveSettings, DerivedNode, NodeInputs};

/// A parameter sampled at every instant of a key time instance.
pub struct ValueAtInstant {
    name: &'static str,
    parameter: &'static str,
    instants: &'static str,
    dependencies: &'static [DependencyGroup],
}

macro_rules! value_at_instant {
    ($node:ident, $name:expr, $parameter:expr, $instants:expr) => {
        pub static $node: ValueAtInstant = ValueAtInstant {
            name: $name,
            parameter: $parameter,
            instants: $instants,
            dependencies: &[
                DependencyGroup::Required($parameter),
                DependencyGroup::Required($instants),
            ],
        };
    };
}

value_at_instant!(FUEL_QTY_AT_LIFTOFF, names::FUEL_QTY_AT_LIFTOFF, names::FUEL_QTY, names::LIFTOFF);
value_at_instant!(FUEL_QTY_AT_TOUCHDOWN, names::FUEL_QTY_AT_TOUCHDOWN, names::FUEL_QTY, names::TOUCHDOWN);
value_at_instant!(
    GROSS_WEIGHT_AT_LIFTOFF,
    names::GROSS_WEIGHT_AT_LIFTOFF,
    names::GROSS_WEIGHT,
    names::LIFTOFF
);
value_at_instant!(
    GROSS_WEIGHT_AT_TOUCHDOWN,
    names::GROSS_WEIGHT_AT_TOUCHDOWN,
    names::GROSS_WEIGHT,
    names::TOUCHDOWN
);

impl DerivedNode for ValueAtInstant {
    fn name(&self) -> &'static str {
        self.name
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        self.dependencies
    }

    fn derive(&self, inputs: &NodeInputs, _settings: &DeriveSettings) -> DeriveResult<Entity> {
        let param = inputs.parameter(self.parameter)?;
        let instants = inputs.key_time_instances(self.instants)?;
        let mut kpvs = KeyPointValues::new(self.name, param.frequency, param.offset);
        for instant in &instants.items {
            if let Some(value) = param.array.value_at(instant.index) {
                kpvs.push_value(instant.index, value);
            }
        }
        Ok(kpvs.into())
    }
}
