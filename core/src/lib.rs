//! Derivation core for the Rust flight-data analysis platform.
//!
//! Raw flight-recorder channels go into a [`FlightStore`]; the [`Engine`]
//! orders every registered [`DerivedNode`] by its dependencies and fills the
//! store with derived parameters, flight phases, events and flight attributes.

pub mod entity;
pub mod math;
pub mod nodes;
pub mod prelude;
pub mod processing;
pub mod settings;
pub mod telemetry;

pub use entity::{Entity, FlightStore};
pub use prelude::{Alignment, DeriveError, DeriveResult, DerivedNode};
pub use processing::{Engine, NodeInputs, NodeRegistry, RunReport};
pub use settings::DeriveSettings;
