//! Entity names shared between nodes, raw channels and reports.

// Raw recorder channels and aircraft attributes.
pub const ACCELERATION_NORMAL: &str = "Acceleration Normal";
pub const ACCELERATION_LATERAL: &str = "Acceleration Lateral";
pub const ACCELERATION_LONGITUDINAL: &str = "Acceleration Longitudinal";
pub const AIRSPEED: &str = "Airspeed";
pub const ALTITUDE_STD: &str = "Altitude STD";
pub const ALTITUDE_RADIO_SENSOR: &str = "Altitude Radio Sensor";
pub const HEADING_MAGNETIC: &str = "Heading Magnetic";
pub const PITCH_1: &str = "Pitch (1)";
pub const PITCH_2: &str = "Pitch (2)";
pub const PITCH_CAPTAIN: &str = "Pitch (Capt)";
pub const PITCH_FIRST_OFFICER: &str = "Pitch (FO)";
pub const ROLL: &str = "Roll";
pub const ROLL_CAPTAIN: &str = "Roll (Capt)";
pub const ROLL_FIRST_OFFICER: &str = "Roll (FO)";
pub const AUTOPILOT_1_ENGAGED: &str = "AP (1) Engaged";
pub const AUTOPILOT_2_ENGAGED: &str = "AP (2) Engaged";
pub const FUEL_QTY: &str = "Fuel Qty";
pub const GROSS_WEIGHT: &str = "Gross Weight";
pub const FLIGHT_NUMBER_CHANNEL: &str = "Flight Number";
pub const START_DATETIME: &str = "Start Datetime";
pub const MAIN_GEAR_TO_ALTITUDE_RADIO: &str = "Main Gear To Altitude Radio";
pub const DIST_GEAR_TO_TAIL: &str = "Dist Gear To Tail";
pub const AFR_TAKEOFF_FUEL: &str = "AFR Takeoff Fuel";
pub const AFR_LANDING_FUEL: &str = "AFR Landing Fuel";
pub const AFR_TYPE: &str = "AFR Type";
pub const GROUNDSPEED: &str = "Groundspeed";
pub const TOUCH_AND_GO: &str = "Touch And Go";

pub const ENG_N1: [&str; 4] = ["Eng (1) N1", "Eng (2) N1", "Eng (3) N1", "Eng (4) N1"];
pub const ENG_N2: [&str; 4] = ["Eng (1) N2", "Eng (2) N2", "Eng (3) N2", "Eng (4) N2"];

// Derived parameters.
pub const ACCELERATION_VERTICAL: &str = "Acceleration Vertical";
pub const ACCELERATION_FORWARDS_FOR_FLIGHT_PHASES: &str = "Acceleration Forwards For Flight Phases";
pub const AIRSPEED_FOR_FLIGHT_PHASES: &str = "Airspeed For Flight Phases";
pub const ALTITUDE_AAL_FOR_FLIGHT_PHASES: &str = "Altitude AAL For Flight Phases";
pub const ALTITUDE_FOR_FLIGHT_PHASES: &str = "Altitude For Flight Phases";
pub const ALTITUDE_RADIO: &str = "Altitude Radio";
pub const ALTITUDE_RADIO_FOR_FLIGHT_PHASES: &str = "Altitude Radio For Flight Phases";
pub const ALTITUDE_TAIL: &str = "Altitude Tail";
pub const CLIMB_FOR_FLIGHT_PHASES: &str = "Climb For Flight Phases";
pub const ENG_N1_AVERAGE: &str = "Eng N1 Average";
pub const ENG_N1_MINIMUM: &str = "Eng N1 Minimum";
pub const ENG_N1_MAXIMUM: &str = "Eng N1 Maximum";
pub const ENG_N2_AVERAGE: &str = "Eng N2 Average";
pub const ENG_N2_MINIMUM: &str = "Eng N2 Minimum";
pub const ENG_N2_MAXIMUM: &str = "Eng N2 Maximum";
pub const HEADING_CONTINUOUS: &str = "Heading Continuous";
pub const PITCH: &str = "Pitch";
pub const RATE_OF_CLIMB: &str = "Rate Of Climb";
pub const RATE_OF_CLIMB_FOR_FLIGHT_PHASES: &str = "Rate Of Climb For Flight Phases";
pub const RATE_OF_TURN: &str = "Rate Of Turn";

// Flight phases.
pub const FAST: &str = "Fast";
pub const TAKEOFF: &str = "Takeoff";
pub const LANDING: &str = "Landing";

// Key time instances.
pub const LIFTOFF: &str = "Liftoff";
pub const TOUCHDOWN: &str = "Touchdown";

// Key point values.
pub const FUEL_QTY_AT_LIFTOFF: &str = "Fuel Qty At Liftoff";
pub const FUEL_QTY_AT_TOUCHDOWN: &str = "Fuel Qty At Touchdown";
pub const GROSS_WEIGHT_AT_LIFTOFF: &str = "Gross Weight At Liftoff";
pub const GROSS_WEIGHT_AT_TOUCHDOWN: &str = "Gross Weight At Touchdown";

// Flight attributes.
pub const TAKEOFF_FUEL: &str = "FDR Takeoff Fuel";
pub const LANDING_FUEL: &str = "FDR Landing Fuel";
pub const TAKEOFF_GROSS_WEIGHT: &str = "FDR Takeoff Gross Weight";
pub const LANDING_GROSS_WEIGHT: &str = "FDR Landing Gross Weight";
pub const TAKEOFF_DATETIME: &str = "FDR Takeoff Datetime";
pub const LANDING_DATETIME: &str = "FDR Landing Datetime";
pub const DURATION: &str = "FDR Duration";
pub const FLIGHT_NUMBER: &str = "FDR Flight Number";
pub const TAKEOFF_PILOT: &str = "FDR Takeoff Pilot";
pub const LANDING_PILOT: &str = "FDR Landing Pilot";
pub const FLIGHT_TYPE: &str = "FDR Type";
