//! Constants and tunable thresholds shared by the node library.

use serde::{Deserialize, Serialize};

/// Standard gravity, ft/s².
pub const GRAVITY: f64 = 32.2;
/// Lag applied to the barometric climb rate, seconds.
pub const RATE_OF_CLIMB_LAG_TC: f64 = 6.0;
/// Washout removing the bias from normal acceleration, seconds.
pub const AZ_WASHOUT_TC: f64 = 60.0;
pub const KTS_TO_FPS: f64 = 1.68781;

/// Thresholds the node library reads at derivation time.
///
/// Unlike the filter constants above these may be tuned per fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriveSettings {
    /// Longest gap, in seconds, that mask repair will bridge.
    pub repair_duration: f64,
    /// Hysteresis widths, full band (the follower moves at half of each).
    pub hysteresis_airspeed: f64,
    pub hysteresis_altitude: f64,
    pub hysteresis_altitude_radio: f64,
    pub hysteresis_rate_of_climb: f64,
    /// Airspeed at or above which the aircraft is "Fast", kt.
    pub airspeed_threshold: f64,
    pub rate_of_climb_for_liftoff: f64,
    pub rate_of_climb_for_touchdown: f64,
    /// Altitude AAL closing the takeoff phase, ft.
    pub takeoff_end_altitude: f64,
    /// Altitude AAL opening the landing phase, ft.
    pub landing_start_altitude: f64,
    /// Radio altitude below which the climb rate comes from radio altitude only, ft.
    pub radio_blend_floor: f64,
    /// Radio altitude above which the climb rate comes from pressure altitude only, ft.
    pub radio_blend_ceiling: f64,
    /// Control movement, degrees, taken as a pilot actively flying.
    pub controls_in_use_tolerance: f64,
    /// Groundspeed spread, kt, above which a recording without flight is a ground run.
    pub ground_run_speed_change: f64,
    /// Half widths, in seconds, of the differentiating windows.
    pub climb_rate_half_width: f64,
    pub phase_climb_rate_half_width: f64,
    pub turn_rate_half_width: f64,
    pub acceleration_half_width: f64,
}

impl Default for DeriveSettings {
    fn default() -> Self {
        Self {
            repair_duration: 10.0,
            hysteresis_airspeed: 10.0,
            hysteresis_altitude: 200.0,
            hysteresis_altitude_radio: 5.0,
            hysteresis_rate_of_climb: 100.0,
            airspeed_threshold: 80.0,
            rate_of_climb_for_liftoff: 200.0,
            rate_of_climb_for_touchdown: -100.0,
            takeoff_end_altitude: 1500.0,
            landing_start_altitude: 1500.0,
            radio_blend_floor: 50.0,
            radio_blend_ceiling: 100.0,
            controls_in_use_tolerance: 1.0,
            ground_run_speed_change: 10.0,
            climb_rate_half_width: 2.0,
            phase_climb_rate_half_width: 4.0,
            turn_rate_half_width: 1.0,
            acceleration_half_width: 2.0,
        }
    }
}

impl DeriveSettings {
    /// Repair bound in samples for data at `frequency`.
    pub fn repair_samples(&self, frequency: f64) -> usize {
        (self.repair_duration * frequency).round().max(0.0) as usize
    }
}
