//! Flight phases and the cleaned airspeed they are detected from.

use std::ops::Range;

use crate::entity::{Entity, MaskedArray, Sections};
use crate::math::{hysteresis, repair_mask, slices_above};
use crate::nodes::names;
use crate::prelude::{DependencyGroup, DeriveResult, DeriveSettings, DerivedNode, NodeInputs};

pub struct AirspeedForFlightPhases;

impl DerivedNode for AirspeedForFlightPhases {
    fn name(&self) -> &'static str {
        names::AIRSPEED_FOR_FLIGHT_PHASES
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        &[DependencyGroup::Required(names::AIRSPEED)]
    }

    fn derive(&self, inputs: &NodeInputs, settings: &DeriveSettings) -> DeriveResult<Entity> {
        let airspeed = inputs.parameter(names::AIRSPEED)?;
        let repaired = repair_mask(&airspeed.array, settings.repair_samples(airspeed.frequency));
        let smoothed = hysteresis(&repaired, settings.hysteresis_airspeed / 2.0);
        Ok(airspeed.derived(self.name(), smoothed).into())
    }
}

/// Periods with airspeed at or above the fast threshold.
pub struct Fast;

impl DerivedNode for Fast {
    fn name(&self) -> &'static str {
        names::FAST
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        &[DependencyGroup::Required(names::AIRSPEED)]
    }

    fn derive(&self, inputs: &NodeInputs, settings: &DeriveSettings) -> DeriveResult<Entity> {
        let airspeed = inputs.parameter(names::AIRSPEED)?;
        let repaired = repair_mask(&airspeed.array, settings.repair_samples(airspeed.frequency));
        let mut fast = Sections::new(self.name(), airspeed.frequency, airspeed.offset);
        for run in slices_above(&repaired, settings.airspeed_threshold) {
            fast.push_range(run);
        }
        Ok(fast.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEnd {
    /// Window opens at the start of the fast section.
    Departure,
    /// Window closes at the end of the fast section.
    Arrival,
}

/// Part of a fast section below `limit` feet AAL at one end.
///
/// A departure window runs from the section start to the first sample at or
/// above the limit; an arrival window from the last such sample to the section
/// end. Sections never reaching the limit are split at their highest sample.
pub fn altitude_window(aal: &MaskedArray, fast: Range<usize>, limit: f64, end: PhaseEnd) -> Option<Range<usize>> {
    let fast = fast.start..fast.end.min(aal.len());
    if fast.is_empty() {
        return None;
    }
    let peak = fast
        .clone()
        .filter_map(|i| aal.get(i).map(|v| (i, v)))
        .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
            Some((_, top)) if top >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)?;
    let reaches = |i: &usize| aal.get(*i).map_or(false, |v| v >= limit);
    match end {
        PhaseEnd::Departure => {
            let stop = fast.clone().find(reaches).unwrap_or(peak);
            Some(fast.start..stop + 1)
        }
        PhaseEnd::Arrival => {
            let start = fast.clone().rev().find(reaches).unwrap_or(peak);
            Some(start..fast.end)
        }
    }
}

fn phase_sections(
    name: &'static str,
    inputs: &NodeInputs,
    limit: f64,
    end: PhaseEnd,
) -> DeriveResult<Entity> {
    let aal = inputs.parameter(names::ALTITUDE_AAL_FOR_FLIGHT_PHASES)?;
    let fast = inputs.sections(names::FAST)?;
    let mut phases = Sections::new(name, aal.frequency, aal.offset);
    for section in &fast.items {
        if let Some(window) = altitude_window(&aal.array, section.range(aal.len()), limit, end) {
            phases.push_range(window);
        }
    }
    Ok(phases.into())
}

const PHASE_DEPENDENCIES: &[DependencyGroup] = &[
    DependencyGroup::Required(names::ALTITUDE_AAL_FOR_FLIGHT_PHASES),
    DependencyGroup::Required(names::FAST),
];

pub struct Takeoff;

impl DerivedNode for Takeoff {
    fn name(&self) -> &'static str {
        names::TAKEOFF
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        PHASE_DEPENDENCIES
    }

    fn derive(&self, inputs: &NodeInputs, settings: &DeriveSettings) -> DeriveResult<Entity> {
        phase_sections(self.name(), inputs, settings.takeoff_end_altitude, PhaseEnd::Departure)
    }
}

pub struct Landing;

impl DerivedNode for Landing {
    fn name(&self) -> &'static str {
        names::LANDING
    }

    fn dependencies(&self) -> &'static [DependencyGroup] {
        PHASE_DEPENDENCIES
    }

    fn derive(&self, inputs: &NodeInputs, settings: &DeriveSettings) -> DeriveResult<Entity> {
        phase_sections(self.name(), inputs, settings.landing_start_altitude, PhaseEnd::Arrival)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{FlightStore, Parameter};
    use crate::nodes::{derive_from, derive_with};

    fn speed_store(values: Vec<f64>) -> FlightStore {
        [Entity::from(Parameter::at_1hz(names::AIRSPEED, MaskedArray::from_values(values)))]
            .into_iter()
            .collect()
    }

    #[test]
    fn airspeed_follower_ignores_small_reversals() {
        let result = derive_from(&AirspeedForFlightPhases, &speed_store(vec![40.0, 200.0, 190.0, 180.0, 170.0])).unwrap();
        assert_eq!(
            result.as_parameter().unwrap().array.valid_values(),
            vec![40.0, 195.0, 195.0, 185.0, 175.0]
        );
    }

    #[test]
    fn fast_spans_threshold_and_above() {
        let speed: Vec<f64> = (6..12).chain((6..=12).rev()).map(|v| f64::from(v) * 10.0).collect();
        let result = derive_from(&Fast, &speed_store(speed)).unwrap();
        let fast = result.as_sections().unwrap();
        assert_eq!(fast.len(), 1);
        assert_eq!(fast.items[0].start_edge, 2.0);
        assert_eq!(fast.items[0].stop_edge, 11.0);
    }

    fn aal() -> MaskedArray {
        MaskedArray::from_values(vec![
            0.0, 0.0, 0.0, 100.0, 200.0, 300.0, 500.0, 400.0, 300.0, 200.0, 100.0, 0.0, 0.0,
        ])
    }

    #[test]
    fn windows_open_and_close_at_the_limit() {
        assert_eq!(altitude_window(&aal(), 2..11, 250.0, PhaseEnd::Departure), Some(2..6));
        assert_eq!(altitude_window(&aal(), 2..11, 250.0, PhaseEnd::Arrival), Some(8..11));
    }

    #[test]
    fn low_sections_split_at_the_peak() {
        assert_eq!(altitude_window(&aal(), 2..11, 1500.0, PhaseEnd::Departure), Some(2..7));
        assert_eq!(altitude_window(&aal(), 2..11, 1500.0, PhaseEnd::Arrival), Some(6..11));
        assert_eq!(altitude_window(&aal(), 11..11, 1500.0, PhaseEnd::Arrival), None);
    }

    #[test]
    fn takeoff_and_landing_nodes_share_the_window() {
        let mut fast = Sections::new(names::FAST, 1.0, 0.0);
        fast.push_range(2..11);
        let store: FlightStore = [
            Entity::from(Parameter::at_1hz(names::ALTITUDE_AAL_FOR_FLIGHT_PHASES, aal())),
            Entity::from(fast),
        ]
        .into_iter()
        .collect();
        let settings = DeriveSettings {
            takeoff_end_altitude: 250.0,
            landing_start_altitude: 150.0,
            ..DeriveSettings::default()
        };
        let takeoff = derive_with(&Takeoff, &store, &settings).unwrap();
        let landing = derive_with(&Landing, &store, &settings).unwrap();
        let takeoff = &takeoff.as_sections().unwrap().items[0];
        let landing = &landing.as_sections().unwrap().items[0];
        assert_eq!((takeoff.start_edge, takeoff.stop_edge), (2.0, 6.0));
        assert_eq!((landing.start_edge, landing.stop_edge), (9.0, 11.0));
    }
}
