use crate::entity::Entity;
use crate::math::{make_continuous, rate_of_change};
use crate::nodes::names;
use crate::prelude::{DependencyGroup, DeriveResult, DeriveSettings, DerivedNode, NodeInputs};

/// Magnetic heading without the 360° wrap, safe to differentiate.
pub struct HeadingContinuous;

impl DerivedNode for HeadingContinuous {
    fn name(&self) -> &'static str {
        names::HEADING_CONTINUOUS
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        &[DependencyGroup::Required(names::HEADING_MAGNETIC)]
    }

    fn derive(&self, inputs: &NodeInputs, _settings: &DeriveSettings) -> DeriveResult<Entity> {
        let heading = inputs.parameter(names::HEADING_MAGNETIC)?;
        Ok(heading.derived(self.name(), make_continuous(&heading.array)).into())
    }
}

/// Turn rate in deg/s.
pub struct RateOfTurn;

impl DerivedNode for RateOfTurn {
    fn name(&self) -> &'static str {
        names::RATE_OF_TURN
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        &[DependencyGroup::Required(names::HEADING_CONTINUOUS)]
    }

    fn derive(&self, inputs: &NodeInputs, settings: &DeriveSettings) -> DeriveResult<Entity> {
        let heading = inputs.parameter(names::HEADING_CONTINUOUS)?;
        let rate = rate_of_change(heading, settings.turn_rate_half_width)?;
        Ok(heading.derived(self.name(), rate).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{FlightStore, MaskedArray, Parameter};
    use crate::math::wrap_360;
    use crate::nodes::derive_from;

    fn single(name: &str, values: Vec<f64>, node: &dyn DerivedNode) -> MaskedArray {
        let store: FlightStore = [Entity::from(Parameter::at_1hz(name, MaskedArray::from_values(values)))]
            .into_iter()
            .collect();
        derive_from(node, &store).unwrap().as_parameter().unwrap().array.clone()
    }

    #[test]
    fn heading_through_north_keeps_counting() {
        let wrapped: Vec<f64> = (355..365).map(|v| wrap_360(f64::from(v))).collect();
        let heading = single(names::HEADING_MAGNETIC, wrapped, &HeadingContinuous);
        assert_eq!(
            heading.valid_values(),
            (355..365).map(f64::from).collect::<Vec<_>>()
        );
    }

    #[test]
    fn steady_turn_rate() {
        let rate = single(names::HEADING_CONTINUOUS, (0..10).map(f64::from).collect(), &RateOfTurn);
        assert_eq!(rate.valid_values(), vec![1.0; 10]);
    }

    #[test]
    fn single_step_spreads_over_the_window() {
        let rate = single(
            names::HEADING_CONTINUOUS,
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
            &RateOfTurn,
        );
        assert_eq!(rate.valid_values(), vec![0.0, 0.0, 0.5, 0.0, -0.5, 0.0, 0.0]);
    }
}
