//! Input resolution, multi-rate alignment and dependency-ordered evaluation.

pub mod alignment;
pub mod engine;
pub mod inputs;
pub mod registry;
pub mod resolver;

pub use alignment::{align, align_entity, align_parameter};
pub use engine::{Engine, RunReport};
pub use inputs::NodeInputs;
pub use registry::NodeRegistry;
pub use resolver::{operational_combinations, select_combination, Combination, DependencyGroup};
