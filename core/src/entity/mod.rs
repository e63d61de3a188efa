//! Typed containers for everything a node can read or produce.

pub mod array;
pub mod attribute;
pub mod events;
pub mod parameter;
pub mod store;

pub use array::MaskedArray;
pub use attribute::{Attribute, AttributeValue, Pilot};
pub use events::{
    Events, KeyPointValue, KeyPointValues, KeyTimeInstance, KeyTimeInstances, Section, Sections,
};
pub use parameter::Parameter;
pub use store::FlightStore;

/// Any output a node can write into the per-run store.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Parameter(Parameter),
    Attribute(Attribute),
    KeyTimeInstances(KeyTimeInstances),
    KeyPointValues(KeyPointValues),
    Sections(Sections),
}

impl Entity {
    pub fn name(&self) -> &str {
        match self {
            Entity::Parameter(p) => &p.name,
            Entity::Attribute(a) => &a.name,
            Entity::KeyTimeInstances(k) => &k.name,
            Entity::KeyPointValues(k) => &k.name,
            Entity::Sections(s) => &s.name,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Parameter(_) => "parameter",
            Entity::Attribute(_) => "attribute",
            Entity::KeyTimeInstances(_) => "key time instances",
            Entity::KeyPointValues(_) => "key point values",
            Entity::Sections(_) => "sections",
        }
    }

    /// Rate/offset of time-based entities; attributes have none.
    pub fn timebase(&self) -> Option<(f64, f64)> {
        match self {
            Entity::Parameter(p) => Some((p.frequency, p.offset)),
            Entity::Attribute(_) => None,
            Entity::KeyTimeInstances(k) => Some((k.frequency, k.offset)),
            Entity::KeyPointValues(k) => Some((k.frequency, k.offset)),
            Entity::Sections(s) => Some((s.frequency, s.offset)),
        }
    }

    pub fn as_parameter(&self) -> Option<&Parameter> {
        match self {
            Entity::Parameter(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&Attribute> {
        match self {
            Entity::Attribute(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_key_time_instances(&self) -> Option<&KeyTimeInstances> {
        match self {
            Entity::KeyTimeInstances(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_key_point_values(&self) -> Option<&KeyPointValues> {
        match self {
            Entity::KeyPointValues(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_sections(&self) -> Option<&Sections> {
        match self {
            Entity::Sections(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Parameter> for Entity {
    fn from(value: Parameter) -> Self {
        Entity::Parameter(value)
    }
}

impl From<Attribute> for Entity {
    fn from(value: Attribute) -> Self {
        Entity::Attribute(value)
    }
}

impl From<KeyTimeInstances> for Entity {
    fn from(value: KeyTimeInstances) -> Self {
        Entity::KeyTimeInstances(value)
    }
}

impl From<KeyPointValues> for Entity {
    fn from(value: KeyPointValues) -> Self {
        Entity::KeyPointValues(value)
    }
}

impl From<Sections> for Entity {
    fn from(value: Sections) -> Self {
        Entity::Sections(value)
    }
}
