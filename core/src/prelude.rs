pub use crate::entity::Entity;
pub use crate::processing::inputs::NodeInputs;
pub use crate::processing::resolver::{Combination, DependencyGroup};
pub use crate::settings::DeriveSettings;

/// Common error type for node resolution and derivation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DeriveError {
    #[error("no operational combination available for '{node}'")]
    UnsatisfiableDependency { node: String },
    #[error("inputs not on a common time base: {0}")]
    RateOrOffsetMismatch(String),
    #[error("'{node}' requires '{dependency}' which was not resolved")]
    MissingInput { node: String, dependency: String },
    #[error("not computable: {0}")]
    NotComputable(String),
    #[error("invalid flight type: {0}")]
    InvalidFlightType(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("'{0}' has already been written for this run")]
    AlreadyWritten(String),
    #[error("dependency graph contains a cycle through: {0}")]
    CyclicDependency(String),
    #[error("run cancelled")]
    Cancelled,
}

pub type DeriveResult<T> = Result<T, DeriveError>;

/// Where a node wants its parameter inputs resampled before `derive` runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Alignment {
    /// Rate and offset of the first available parameter in declaration order.
    FirstAvailable,
    Fixed { frequency: f64, offset: f64 },
    /// Inputs are handed over untouched; the node checks time bases itself.
    Unaligned,
}

/// Contract every derived node exposes to the engine.
///
/// `derive` must be pure: it reads only its resolved inputs and the settings and
/// either returns exactly one entity named after the node or an error.
pub trait DerivedNode: Send + Sync {
    fn name(&self) -> &'static str;

    fn dependencies(&self) -> &'static [DependencyGroup];

    fn alignment(&self) -> Alignment {
        Alignment::FirstAvailable
    }

    fn operational_combinations(&self) -> Vec<Combination> {
        crate::processing::resolver::operational_combinations(self.dependencies())
    }

    fn derive(&self, inputs: &NodeInputs, settings: &DeriveSettings) -> DeriveResult<Entity>;
}
