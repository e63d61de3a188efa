pub mod angle;
pub mod calculus;
pub mod filter;
pub mod hysteresis;
pub mod mask;
pub mod slices;
pub mod stats;

pub use angle::{make_continuous, wrap_360};
pub use calculus::{integrate, rate_of_change};
pub use filter::{first_order_lag, first_order_washout, FirstOrderFilter};
pub use hysteresis::hysteresis;
pub use mask::repair_mask;
pub use slices::{first_rising_crossing, last_rising_crossing, slices_above};
pub use stats::{Reducer, StatsHelper};
