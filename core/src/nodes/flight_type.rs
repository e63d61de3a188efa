use crate::entity::{Attribute, AttributeValue, Entity, KeyTimeInstances};
use crate::nodes::names;
use crate::prelude::{
    Alignment, DependencyGroup, DeriveError, DeriveResult, DeriveSettings, DerivedNode, NodeInputs,
};

/// What kind of recording a flight turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightType {
    Commercial,
    Ferry,
    LineTraining,
    Positioning,
    Test,
    Training,
    Complete,
    RejectedTakeoff,
    EngineRunUp,
    GroundRun,
}

impl FlightType {
    /// Types an operator may declare on the flight record.
    const DECLARABLE: [FlightType; 6] = [
        FlightType::Commercial,
        FlightType::Ferry,
        FlightType::LineTraining,
        FlightType::Positioning,
        FlightType::Test,
        FlightType::Training,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FlightType::Commercial => "COMMERCIAL",
            FlightType::Ferry => "FERRY",
            FlightType::LineTraining => "LINE_TRAINING",
            FlightType::Positioning => "POSITIONING",
            FlightType::Test => "TEST",
            FlightType::Training => "TRAINING",
            FlightType::Complete => "COMPLETE",
            FlightType::RejectedTakeoff => "REJECTED_TAKEOFF",
            FlightType::EngineRunUp => "ENGINE_RUN_UP",
            FlightType::GroundRun => "GROUND_RUN",
        }
    }

    /// A declared type from the flight record; measured types are not accepted.
    pub fn declared(text: &str) -> Option<Self> {
        Self::DECLARABLE.into_iter().find(|t| t.as_str() == text)
    }
}

/// Recordings that cannot be classified as one complete flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidFlight {
    LiftoffOnly,
    TouchdownOnly,
    TouchdownBeforeLiftoff,
}

impl InvalidFlight {
    pub fn as_str(self) -> &'static str {
        match self {
            InvalidFlight::LiftoffOnly => "LIFTOFF_ONLY",
            InvalidFlight::TouchdownOnly => "TOUCHDOWN_ONLY",
            InvalidFlight::TouchdownBeforeLiftoff => "TOUCHDOWN_BEFORE_LIFTOFF",
        }
    }
}

/// Everything the classification looks at, in seconds from the start of data.
#[derive(Debug, Default)]
pub struct FlightEvidence {
    pub declared: Option<FlightType>,
    pub fast: bool,
    pub liftoffs: Vec<f64>,
    pub touchdowns: Vec<f64>,
    pub touch_and_gos: Vec<f64>,
    /// Spread of the valid groundspeed samples, kt.
    pub groundspeed_range: Option<f64>,
}

/// A flight with both a liftoff and a touchdown is complete unless it ended
/// with a touch and go. Without either, the recording is a rejected takeoff
/// if it went fast, a ground run if it moved and an engine run-up otherwise.
pub fn classify(evidence: &FlightEvidence, ground_run_speed_change: f64) -> Result<FlightType, InvalidFlight> {
    match (evidence.liftoffs.first(), evidence.touchdowns.first()) {
        (Some(_), None) => Err(InvalidFlight::LiftoffOnly),
        (None, Some(_)) => Err(InvalidFlight::TouchdownOnly),
        (Some(liftoff), Some(touchdown)) => {
            if touchdown < liftoff {
                return Err(InvalidFlight::TouchdownBeforeLiftoff);
            }
            let last_touchdown = evidence.touchdowns.last().copied().unwrap_or(*touchdown);
            if evidence.touch_and_gos.last().map_or(false, |tng| last_touchdown <= *tng) {
                return Err(InvalidFlight::LiftoffOnly);
            }
            Ok(evidence.declared.unwrap_or(FlightType::Complete))
        }
        (None, None) if evidence.fast => Ok(FlightType::RejectedTakeoff),
        (None, None) => Ok(match evidence.groundspeed_range {
            Some(range) if range > ground_run_speed_change => FlightType::GroundRun,
            _ => FlightType::EngineRunUp,
        }),
    }
}

fn seconds(instants: &KeyTimeInstances) -> Vec<f64> {
    instants.items.iter().map(|item| instants.seconds_at(item.index)).collect()
}

pub struct FlightTypeAttribute;

impl DerivedNode for FlightTypeAttribute {
    fn name(&self) -> &'static str {
        names::FLIGHT_TYPE
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        &[DependencyGroup::Alternatives(&[
            &[names::FAST, names::LIFTOFF, names::TOUCHDOWN],
            &[names::AFR_TYPE, names::FAST, names::LIFTOFF, names::TOUCHDOWN],
            &[names::FAST, names::LIFTOFF, names::TOUCHDOWN, names::TOUCH_AND_GO],
            &[names::FAST, names::LIFTOFF, names::TOUCHDOWN, names::GROUNDSPEED],
            &[names::AFR_TYPE, names::FAST, names::LIFTOFF, names::TOUCHDOWN, names::TOUCH_AND_GO],
            &[names::AFR_TYPE, names::FAST, names::LIFTOFF, names::TOUCHDOWN, names::GROUNDSPEED],
            &[names::FAST, names::LIFTOFF, names::TOUCHDOWN, names::TOUCH_AND_GO, names::GROUNDSPEED],
            &[
                names::AFR_TYPE,
                names::FAST,
                names::LIFTOFF,
                names::TOUCHDOWN,
                names::TOUCH_AND_GO,
                names::GROUNDSPEED,
            ],
        ])]
    }

    fn alignment(&self) -> Alignment {
        Alignment::Unaligned
    }

    fn derive(&self, inputs: &NodeInputs, settings: &DeriveSettings) -> DeriveResult<Entity> {
        let declared = inputs
            .optional_attribute(names::AFR_TYPE)
            .and_then(|a| a.value.as_text())
            .and_then(FlightType::declared);
        let groundspeed_range = inputs.optional_parameter(names::GROUNDSPEED).and_then(|p| {
            let values = p.array.valid_values();
            let max = values.iter().copied().reduce(f64::max)?;
            let min = values.iter().copied().reduce(f64::min)?;
            Some(max - min)
        });
        let evidence = FlightEvidence {
            declared,
            fast: !inputs.sections(names::FAST)?.is_empty(),
            liftoffs: seconds(inputs.key_time_instances(names::LIFTOFF)?),
            touchdowns: seconds(inputs.key_time_instances(names::TOUCHDOWN)?),
            touch_and_gos: inputs
                .optional_key_time_instances(names::TOUCH_AND_GO)
                .map(seconds)
                .unwrap_or_default(),
            groundspeed_range,
        };
        let flight_type = classify(&evidence, settings.ground_run_speed_change)
            .map_err(|invalid| DeriveError::InvalidFlightType(invalid.as_str().to_string()))?;
        Ok(Attribute::new(self.name(), AttributeValue::Text(flight_type.as_str().to_string())).into())
    }
}
