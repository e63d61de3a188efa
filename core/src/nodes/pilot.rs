use std::ops::Range;

use crate::entity::{Attribute, AttributeValue, Entity, MaskedArray, Pilot};
use crate::math::StatsHelper;
use crate::nodes::attributes::Occurrence;
use crate::nodes::names;
use crate::prelude::{
    DependencyGroup, DeriveError, DeriveResult, DeriveSettings, DerivedNode, NodeInputs,
};

/// Pilot implied by the autopilot channels at one instant.
pub fn autopilot_engaged(ap1: Option<f64>, ap2: Option<f64>) -> Option<Pilot> {
    let engaged = |v: Option<f64>| v.map_or(false, |v| v >= 0.5);
    match (engaged(ap1), engaged(ap2)) {
        (true, false) => Some(Pilot::Captain),
        (false, true) => Some(Pilot::FirstOfficer),
        _ => None,
    }
}

/// True when either stick moved by more than `tolerance` degrees over `range`.
pub fn controls_changed(range: Range<usize>, pitch: &MaskedArray, roll: &MaskedArray, tolerance: f64) -> bool {
    let movement = |array: &MaskedArray| {
        let window = array.slice(range.clone()).to_options();
        StatsHelper::total_movement(&window)
    };
    movement(pitch) > tolerance || movement(roll) > tolerance
}

/// Side-stick pair for one seat.
pub struct Controls<'a> {
    pub pitch: &'a MaskedArray,
    pub roll: &'a MaskedArray,
}

pub fn controls_in_use(
    range: Range<usize>,
    captain: &Controls<'_>,
    first_officer: &Controls<'_>,
    tolerance: f64,
) -> Option<Pilot> {
    let captain_moved = controls_changed(range.clone(), captain.pitch, captain.roll, tolerance);
    let first_officer_moved = controls_changed(range, first_officer.pitch, first_officer.roll, tolerance);
    match (captain_moved, first_officer_moved) {
        (true, false) => Some(Pilot::Captain),
        (false, true) => Some(Pilot::FirstOfficer),
        _ => None,
    }
}

/// Evidence available for deciding who flew a phase.
#[derive(Default)]
pub struct PilotEvidence<'a> {
    pub phase: Option<Range<usize>>,
    pub captain: Option<Controls<'a>>,
    pub first_officer: Option<Controls<'a>>,
    pub autopilot: Option<(Option<f64>, Option<f64>)>,
}

/// Control inputs decide when they are conclusive; the autopilot channels
/// are consulted otherwise.
pub fn determine_pilot(evidence: &PilotEvidence<'_>, tolerance: f64) -> Option<Pilot> {
    let by_controls = match (&evidence.phase, &evidence.captain, &evidence.first_officer) {
        (Some(phase), Some(captain), Some(first_officer)) => {
            controls_in_use(phase.clone(), captain, first_officer, tolerance)
        }
        _ => None,
    };
    by_controls.or_else(|| evidence.autopilot.and_then(|(ap1, ap2)| autopilot_engaged(ap1, ap2)))
}

/// Who was flying during takeoff or landing.
pub struct PilotAttribute {
    name: &'static str,
    phase: &'static str,
    instant: &'static str,
    occurrence: Occurrence,
    dependencies: &'static [DependencyGroup],
}

pub static TAKEOFF_PILOT: PilotAttribute = PilotAttribute {
    name: names::TAKEOFF_PILOT,
    phase: names::TAKEOFF,
    instant: names::LIFTOFF,
    occurrence: Occurrence::First,
    dependencies: &[DependencyGroup::Alternatives(&[
        &[
            names::PITCH_CAPTAIN,
            names::PITCH_FIRST_OFFICER,
            names::ROLL_CAPTAIN,
            names::ROLL_FIRST_OFFICER,
            names::TAKEOFF,
        ],
        &[names::AUTOPILOT_1_ENGAGED, names::AUTOPILOT_2_ENGAGED, names::LIFTOFF],
        &[
            names::PITCH_CAPTAIN,
            names::PITCH_FIRST_OFFICER,
            names::ROLL_CAPTAIN,
            names::ROLL_FIRST_OFFICER,
            names::TAKEOFF,
            names::AUTOPILOT_1_ENGAGED,
            names::AUTOPILOT_2_ENGAGED,
            names::LIFTOFF,
        ],
    ])],
};

pub static LANDING_PILOT: PilotAttribute = PilotAttribute {
    name: names::LANDING_PILOT,
    phase: names::LANDING,
    instant: names::TOUCHDOWN,
    occurrence: Occurrence::Last,
    dependencies: &[DependencyGroup::Alternatives(&[
        &[
            names::PITCH_CAPTAIN,
            names::PITCH_FIRST_OFFICER,
            names::ROLL_CAPTAIN,
            names::ROLL_FIRST_OFFICER,
            names::LANDING,
        ],
        &[names::AUTOPILOT_1_ENGAGED, names::AUTOPILOT_2_ENGAGED, names::TOUCHDOWN],
        &[
            names::PITCH_CAPTAIN,
            names::PITCH_FIRST_OFFICER,
            names::ROLL_CAPTAIN,
            names::ROLL_FIRST_OFFICER,
            names::LANDING,
            names::AUTOPILOT_1_ENGAGED,
            names::AUTOPILOT_2_ENGAGED,
            names::TOUCHDOWN,
        ],
    ])],
};

impl PilotAttribute {
    fn phase_range(&self, inputs: &NodeInputs, len: usize) -> Option<Range<usize>> {
        let phases = inputs.optional_sections(self.phase)?;
        let section = self.occurrence.pick(phases)?;
        Some(section.range(len))
    }

    fn autopilot_at_instant(&self, inputs: &NodeInputs) -> Option<(Option<f64>, Option<f64>)> {
        let ap1 = inputs.optional_parameter(names::AUTOPILOT_1_ENGAGED)?;
        let ap2 = inputs.optional_parameter(names::AUTOPILOT_2_ENGAGED)?;
        let instants = inputs.optional_key_time_instances(self.instant)?;
        let instant = self.occurrence.pick(instants)?;
        let index = instant.index.round().max(0.0) as usize;
        Some((ap1.array.get(index), ap2.array.get(index)))
    }
}

impl DerivedNode for PilotAttribute {
    fn name(&self) -> &'static str {
        self.name
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        self.dependencies
    }

    fn derive(&self, inputs: &NodeInputs, settings: &DeriveSettings) -> DeriveResult<Entity> {
        let seat = |pitch: &str, roll: &str| {
            Some(Controls {
                pitch: &inputs.optional_parameter(pitch)?.array,
                roll: &inputs.optional_parameter(roll)?.array,
            })
        };
        let captain = seat(names::PITCH_CAPTAIN, names::ROLL_CAPTAIN);
        let phase = captain
            .as_ref()
            .and_then(|controls| self.phase_range(inputs, controls.pitch.len()));
        let evidence = PilotEvidence {
            phase,
            captain,
            first_officer: seat(names::PITCH_FIRST_OFFICER, names::ROLL_FIRST_OFFICER),
            autopilot: self.autopilot_at_instant(inputs),
        };
        let pilot = determine_pilot(&evidence, settings.controls_in_use_tolerance)
            .ok_or_else(|| DeriveError::NotComputable("no conclusive pilot evidence".into()))?;
        Ok(Attribute::new(self.name, AttributeValue::Pilot(pilot)).into())
    }
}
