use std::collections::BTreeMap;

use fdrcore::entity::AttributeValue;
use fdrcore::telemetry::RunMetrics;
use fdrcore::{Entity, RunReport};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSummary {
    pub name: String,
    pub frequency: f64,
    pub offset: f64,
    pub samples: usize,
    pub valid: usize,
}

/// A section, instant or point value expressed in seconds from the start of
/// the recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedItem {
    pub name: String,
    pub start: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Failure {
    pub node: String,
    pub error: String,
}

/// JSON document written after every run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub attributes: BTreeMap<String, AttributeValue>,
    pub phases: Vec<TimedItem>,
    pub instants: Vec<TimedItem>,
    pub point_values: Vec<TimedItem>,
    pub parameters: Vec<ParameterSummary>,
    pub derived: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<Failure>,
    pub metrics: RunMetrics,
    pub cancelled: bool,
}

impl FlightReport {
    pub fn from_run(run: &RunReport, description: Option<String>) -> Self {
        let mut report = FlightReport {
            description,
            derived: run.derived.clone(),
            skipped: run.skipped.clone(),
            failed: run
                .failed
                .iter()
                .map(|(node, err)| Failure {
                    node: node.clone(),
                    error: err.to_string(),
                })
                .collect(),
            metrics: run.metrics,
            cancelled: run.cancelled,
            ..Default::default()
        };

        for (name, entity) in run.store.iter() {
            match entity {
                Entity::Parameter(p) => report.parameters.push(ParameterSummary {
                    name: name.to_string(),
                    frequency: p.frequency,
                    offset: p.offset,
                    samples: p.len(),
                    valid: p.array.valid_count(),
                }),
                Entity::Attribute(a) => {
                    report.attributes.insert(name.to_string(), a.value.clone());
                }
                Entity::Sections(sections) => {
                    report.phases.extend(sections.items.iter().map(|s| TimedItem {
                        name: name.to_string(),
                        start: sections.seconds_at(s.start_edge),
                        stop: Some(sections.seconds_at(s.stop_edge)),
                        value: None,
                    }))
                }
                Entity::KeyTimeInstances(ktis) => {
                    report.instants.extend(ktis.items.iter().map(|k| TimedItem {
                        name: name.to_string(),
                        start: ktis.seconds_at(k.index),
                        stop: None,
                        value: None,
                    }))
                }
                Entity::KeyPointValues(kpvs) => {
                    report.point_values.extend(kpvs.items.iter().map(|k| TimedItem {
                        name: name.to_string(),
                        start: kpvs.seconds_at(k.index),
                        stop: None,
                        value: Some(k.value),
                    }))
                }
            }
        }
        report
    }
}
