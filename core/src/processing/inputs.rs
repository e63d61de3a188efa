use crate::entity::{
    Attribute, Entity, FlightStore, KeyPointValues, KeyTimeInstances, Parameter, Sections,
};
use crate::prelude::{Alignment, DeriveError, DeriveResult, DerivedNode};
use crate::processing::alignment::align_entity;
use crate::processing::resolver::{dependency_names, select_combination};

/// The resolved inputs handed to one `derive` call.
///
/// There is a slot for every declared dependency, in declaration order. Names
/// outside the chosen combination are present as explicit `None`.
#[derive(Debug, Clone)]
pub struct NodeInputs {
    node: &'static str,
    slots: Vec<(&'static str, Option<Entity>)>,
}

impl NodeInputs {
    pub fn new(node: &'static str, slots: Vec<(&'static str, Option<Entity>)>) -> Self {
        Self { node, slots }
    }

    /// Chooses the richest satisfiable combination from `store` and aligns it
    /// as the node asks.
    pub fn resolve(node: &dyn DerivedNode, store: &FlightStore) -> DeriveResult<Self> {
        let combinations = node.operational_combinations();
        let chosen = select_combination(&combinations, |name| store.contains(name)).ok_or_else(|| {
            DeriveError::UnsatisfiableDependency {
                node: node.name().to_string(),
            }
        })?;

        let slots: Vec<(&'static str, Option<Entity>)> = dependency_names(node.dependencies())
            .into_iter()
            .map(|name| {
                let entity = if chosen.contains(&name) {
                    store.get(name).cloned()
                } else {
                    None
                };
                (name, entity)
            })
            .collect();

        let target = match node.alignment() {
            Alignment::Unaligned => None,
            Alignment::Fixed { frequency, offset } => Some((frequency, offset)),
            Alignment::FirstAvailable => first_timebase(&slots),
        };

        let slots = match target {
            None => slots,
            Some((frequency, offset)) => slots
                .into_iter()
                .map(|(name, entity)| {
                    let aligned = entity
                        .map(|e| align_entity(&e, frequency, offset))
                        .transpose()?;
                    Ok((name, aligned))
                })
                .collect::<DeriveResult<Vec<_>>>()?,
        };

        Ok(Self {
            node: node.name(),
            slots,
        })
    }

    pub fn node(&self) -> &'static str {
        self.node
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.slots
            .iter()
            .find(|(slot, _)| *slot == name)
            .and_then(|(_, entity)| entity.as_ref())
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names of the slots that hold an entity.
    pub fn present(&self) -> Vec<&'static str> {
        self.slots
            .iter()
            .filter(|(_, entity)| entity.is_some())
            .map(|(name, _)| *name)
            .collect()
    }

    fn missing(&self, name: &str) -> DeriveError {
        DeriveError::MissingInput {
            node: self.node.to_string(),
            dependency: name.to_string(),
        }
    }

    pub fn parameter(&self, name: &str) -> DeriveResult<&Parameter> {
        self.optional_parameter(name).ok_or_else(|| self.missing(name))
    }

    pub fn optional_parameter(&self, name: &str) -> Option<&Parameter> {
        self.get(name).and_then(Entity::as_parameter)
    }

    pub fn attribute(&self, name: &str) -> DeriveResult<&Attribute> {
        self.optional_attribute(name).ok_or_else(|| self.missing(name))
    }

    pub fn optional_attribute(&self, name: &str) -> Option<&Attribute> {
        self.get(name).and_then(Entity::as_attribute)
    }

    pub fn key_time_instances(&self, name: &str) -> DeriveResult<&KeyTimeInstances> {
        self.optional_key_time_instances(name)
            .ok_or_else(|| self.missing(name))
    }

    pub fn optional_key_time_instances(&self, name: &str) -> Option<&KeyTimeInstances> {
        self.get(name).and_then(Entity::as_key_time_instances)
    }

    pub fn key_point_values(&self, name: &str) -> DeriveResult<&KeyPointValues> {
        self.optional_key_point_values(name)
            .ok_or_else(|| self.missing(name))
    }

    pub fn optional_key_point_values(&self, name: &str) -> Option<&KeyPointValues> {
        self.get(name).and_then(Entity::as_key_point_values)
    }

    pub fn sections(&self, name: &str) -> DeriveResult<&Sections> {
        self.optional_sections(name).ok_or_else(|| self.missing(name))
    }

    pub fn optional_sections(&self, name: &str) -> Option<&Sections> {
        self.get(name).and_then(Entity::as_sections)
    }
}

/// Time base of the first parameter present, else of the first time-based entity.
fn first_timebase(slots: &[(&'static str, Option<Entity>)]) -> Option<(f64, f64)> {
    let present = || slots.iter().filter_map(|(_, entity)| entity.as_ref());
    present()
        .find_map(|entity| entity.as_parameter().map(|p| (p.frequency, p.offset)))
        .or_else(|| present().find_map(Entity::timebase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::MaskedArray;
    use crate::prelude::{DependencyGroup, DeriveSettings};

    struct Probe;

    impl DerivedNode for Probe {
        fn name(&self) -> &'static str {
            "Probe"
        }

        fn dependencies(&self) -> &'static [DependencyGroup] {
            &[
                DependencyGroup::Required("Fast Channel"),
                DependencyGroup::OptionalGroup {
                    names: &["Slow Channel", "Spare Channel"],
                    min_count: 0,
                },
            ]
        }

        fn derive(&self, inputs: &NodeInputs, _settings: &DeriveSettings) -> DeriveResult<Entity> {
            Ok(inputs.parameter("Fast Channel")?.clone().into())
        }
    }

    #[test]
    fn unavailable_dependencies_are_explicitly_absent() {
        let mut store = FlightStore::new();
        store
            .insert(Parameter::new("Fast Channel", MaskedArray::filled(1.0, 8), 4.0, 0.0).unwrap())
            .unwrap();
        store
            .insert(Parameter::new("Slow Channel", MaskedArray::filled(2.0, 2), 1.0, 0.0).unwrap())
            .unwrap();

        let inputs = NodeInputs::resolve(&Probe, &store).unwrap();
        assert_eq!(inputs.present(), vec!["Fast Channel", "Slow Channel"]);
        assert!(inputs.get("Spare Channel").is_none());

        let slow = inputs.parameter("Slow Channel").unwrap();
        assert_eq!(slow.frequency, 4.0);
        assert_eq!(slow.len(), 8);
        assert!(matches!(
            inputs.parameter("Spare Channel"),
            Err(DeriveError::MissingInput { .. })
        ));
    }

    #[test]
    fn missing_required_input_is_unsatisfiable() {
        let mut store = FlightStore::new();
        store
            .insert(Parameter::at_1hz("Slow Channel", MaskedArray::filled(2.0, 2)))
            .unwrap();
        assert!(matches!(
            NodeInputs::resolve(&Probe, &store),
            Err(DeriveError::UnsatisfiableDependency { .. })
        ));
    }
}
