//! Fleet-wide engine speed summaries over up to four engines.

use crate::entity::{Entity, MaskedArray};
use crate::math::{Reducer, StatsHelper};
use crate::nodes::names;
use crate::prelude::{DependencyGroup, DeriveError, DeriveResult, DeriveSettings, DerivedNode, NodeInputs};

/// Sample-wise reduction over whichever engines recorded the channel.
pub struct EngineAggregate {
    name: &'static str,
    engines: &'static [DependencyGroup],
    reducer: Reducer,
}

const N1_ENGINES: &[DependencyGroup] = &[DependencyGroup::OptionalGroup {
    names: &names::ENG_N1,
    min_count: 1,
}];

const N2_ENGINES: &[DependencyGroup] = &[DependencyGroup::OptionalGroup {
    names: &names::ENG_N2,
    min_count: 1,
}];

pub static ENG_N1_AVERAGE: EngineAggregate = EngineAggregate {
    name: names::ENG_N1_AVERAGE,
    engines: N1_ENGINES,
    reducer: Reducer::Mean,
};
pub static ENG_N1_MINIMUM: EngineAggregate = EngineAggregate {
    name: names::ENG_N1_MINIMUM,
    engines: N1_ENGINES,
    reducer: Reducer::Min,
};
pub static ENG_N1_MAXIMUM: EngineAggregate = EngineAggregate {
    name: names::ENG_N1_MAXIMUM,
    engines: N1_ENGINES,
    reducer: Reducer::Max,
};
pub static ENG_N2_AVERAGE: EngineAggregate = EngineAggregate {
    name: names::ENG_N2_AVERAGE,
    engines: N2_ENGINES,
    reducer: Reducer::Mean,
};
pub static ENG_N2_MINIMUM: EngineAggregate = EngineAggregate {
    name: names::ENG_N2_MINIMUM,
    engines: N2_ENGINES,
    reducer: Reducer::Min,
};
pub static ENG_N2_MAXIMUM: EngineAggregate = EngineAggregate {
    name: names::ENG_N2_MAXIMUM,
    engines: N2_ENGINES,
    reducer: Reducer::Max,
};

impl DerivedNode for EngineAggregate {
    fn name(&self) -> &'static str {
        self.name
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        self.engines
    }

    fn derive(&self, inputs: &NodeInputs, _settings: &DeriveSettings) -> DeriveResult<Entity> {
        let engines: Vec<_> = inputs
            .present()
            .into_iter()
            .filter_map(|name| inputs.optional_parameter(name))
            .collect();
        let Some(first) = engines.first() else {
            return Err(DeriveError::NotComputable(format!("{}: no engine recorded", self.name)));
        };
        for other in &engines[1..] {
            first.ensure_aligned(other)?;
        }
        let arrays: Vec<&MaskedArray> = engines.iter().map(|p| &p.array).collect();
        let reduced = StatsHelper::reduce(&arrays, self.reducer)?;
        Ok(first.derived(self.name, reduced).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{FlightStore, Parameter};
    use crate::nodes::derive_from;

    #[test]
    fn any_of_four_engines_is_enough() {
        let combinations = ENG_N1_AVERAGE.operational_combinations();
        assert_eq!(combinations.len(), 15);
        assert_eq!(combinations[0], vec!["Eng (1) N1"]);
        assert_eq!(combinations[14], names::ENG_N1.to_vec());
        assert_eq!(ENG_N2_MINIMUM.operational_combinations()[0], vec!["Eng (1) N2"]);
    }

    fn two_engines() -> FlightStore {
        let mut a: Vec<Option<f64>> = (0..10).map(|v| Some(f64::from(v))).collect();
        let mut b: Vec<Option<f64>> = (10..20).map(|v| Some(f64::from(v))).collect();
        a[0] = None;
        b[0] = None;
        b[9] = None;
        [
            Entity::from(Parameter::at_1hz("Eng (1) N1", MaskedArray::from_options(&a))),
            Entity::from(Parameter::at_1hz("Eng (2) N1", MaskedArray::from_options(&b))),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn average_uses_whatever_engines_are_valid() {
        let result = derive_from(&ENG_N1_AVERAGE, &two_engines()).unwrap();
        let expected: Vec<Option<f64>> = std::iter::once(None)
            .chain((6..14).map(|v| Some(f64::from(v))))
            .chain(std::iter::once(Some(9.0)))
            .collect();
        assert_eq!(result.as_parameter().unwrap().array.to_options(), expected);
    }

    #[test]
    fn minimum_and_maximum() {
        let store = two_engines();
        let min = derive_from(&ENG_N1_MINIMUM, &store).unwrap();
        let max = derive_from(&ENG_N1_MAXIMUM, &store).unwrap();
        assert_eq!(min.as_parameter().unwrap().array.get(1), Some(1.0));
        assert_eq!(max.as_parameter().unwrap().array.get(1), Some(11.0));
        assert_eq!(max.as_parameter().unwrap().array.get(9), Some(9.0));
    }
}
