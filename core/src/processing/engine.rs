//! Dependency-ordered evaluation of the node library over one flight.
//!
//! Nodes are ordered once per registry. A run walks that order, resolving and
//! aligning each node's inputs from the flight store and appending its output.
//! `run_parallel` evaluates every node of a dependency level concurrently and
//! commits the level's outputs together before the next level starts.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::entity::{Entity, FlightStore};
use crate::prelude::{DeriveError, DeriveResult, DeriveSettings, DerivedNode, NodeInputs};
use crate::processing::registry::NodeRegistry;
use crate::processing::resolver::dependency_names;
use crate::telemetry::{LogManager, MetricsRecorder, RunMetrics};

/// Everything a run leaves behind.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub store: FlightStore,
    pub derived: Vec<String>,
    /// Nodes with no satisfiable combination.
    pub skipped: Vec<String>,
    pub failed: Vec<(String, DeriveError)>,
    pub metrics: RunMetrics,
    pub cancelled: bool,
}

impl RunReport {
    /// `Err(Cancelled)` if the run stopped before visiting every node.
    pub fn ensure_complete(&self) -> DeriveResult<()> {
        if self.cancelled {
            Err(DeriveError::Cancelled)
        } else {
            Ok(())
        }
    }
}

enum Outcome {
    AlreadyPresent,
    Derived(Entity),
    Skipped,
    Failed(DeriveError),
}

pub struct Engine {
    order: Vec<&'static dyn DerivedNode>,
    levels: Vec<Vec<&'static dyn DerivedNode>>,
    log: LogManager,
}

impl Engine {
    /// Orders the registry topologically. Edges run from a node to every
    /// registered node naming it as a dependency.
    pub fn new(registry: &NodeRegistry) -> DeriveResult<Self> {
        let mut dependents: BTreeMap<&'static str, Vec<&'static str>> = BTreeMap::new();
        let mut in_degree: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut parents: BTreeMap<&'static str, Vec<&'static str>> = BTreeMap::new();

        for node in registry.nodes() {
            in_degree.entry(node.name()).or_insert(0);
            let upstream: Vec<&'static str> = dependency_names(node.dependencies())
                .into_iter()
                .filter(|dep| registry.contains(dep))
                .collect();
            for dep in &upstream {
                dependents.entry(*dep).or_default().push(node.name());
                *in_degree.entry(node.name()).or_insert(0) += 1;
            }
            parents.insert(node.name(), upstream);
        }

        let mut queue: VecDeque<&'static str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(name, _)| *name)
            .collect();
        let mut order = Vec::with_capacity(registry.len());
        let mut level_of: BTreeMap<&'static str, usize> = BTreeMap::new();

        while let Some(name) = queue.pop_front() {
            let level = parents
                .get(name)
                .map(|ups| {
                    ups.iter()
                        .filter_map(|up| level_of.get(up))
                        .map(|l| l + 1)
                        .max()
                        .unwrap_or(0)
                })
                .unwrap_or(0);
            level_of.insert(name, level);
            if let Some(node) = registry.get(name) {
                order.push(node);
            }
            if let Some(children) = dependents.get(name) {
                for child in children {
                    if let Some(degree) = in_degree.get_mut(child) {
                        *degree -= 1;
                        if *degree == 0 {
                            queue.push_back(*child);
                        }
                    }
                }
            }
        }

        if order.len() != registry.len() {
            let stuck: Vec<&str> = registry
                .names()
                .filter(|name| !level_of.contains_key(name))
                .collect();
            return Err(DeriveError::CyclicDependency(stuck.join(", ")));
        }

        let depth = level_of.values().copied().max().map_or(0, |d| d + 1);
        let mut levels: Vec<Vec<&'static dyn DerivedNode>> = vec![Vec::new(); depth];
        for node in &order {
            if let Some(level) = level_of.get(node.name()) {
                levels[*level].push(*node);
            }
        }

        Ok(Self {
            order,
            levels,
            log: LogManager::with_target("fdrcore::engine"),
        })
    }

    pub fn builtin() -> DeriveResult<Self> {
        Self::new(NodeRegistry::builtin())
    }

    /// Node names in evaluation order.
    pub fn order(&self) -> Vec<&'static str> {
        self.order.iter().map(|node| node.name()).collect()
    }

    /// Node names grouped by dependency depth.
    pub fn levels(&self) -> Vec<Vec<&'static str>> {
        self.levels
            .iter()
            .map(|level| level.iter().map(|node| node.name()).collect())
            .collect()
    }

    /// Evaluates every node in order against `store`.
    pub fn run(
        &self,
        store: FlightStore,
        settings: &DeriveSettings,
        cancel: Option<&AtomicBool>,
    ) -> RunReport {
        let mut run = RunState::new(store);
        for node in &self.order {
            if is_cancelled(cancel) {
                run.cancelled = true;
                break;
            }
            let outcome = self.evaluate(*node, &run.store, settings);
            run.commit(*node, outcome, &self.log);
        }
        run.finish(&self.log)
    }

    /// Like [`Engine::run`], evaluating each dependency level concurrently.
    ///
    /// Produces the same store as the sequential run.
    pub fn run_parallel(
        &self,
        store: FlightStore,
        settings: &DeriveSettings,
        cancel: Option<&AtomicBool>,
    ) -> RunReport {
        let mut run = RunState::new(store);
        for level in &self.levels {
            if is_cancelled(cancel) {
                run.cancelled = true;
                break;
            }
            let outcomes: Vec<(&'static dyn DerivedNode, Outcome)> = level
                .par_iter()
                .map(|node| (*node, self.evaluate(*node, &run.store, settings)))
                .collect();
            for (node, outcome) in outcomes {
                run.commit(node, outcome, &self.log);
            }
        }
        run.finish(&self.log)
    }

    fn evaluate(&self, node: &dyn DerivedNode, store: &FlightStore, settings: &DeriveSettings) -> Outcome {
        if store.contains(node.name()) {
            return Outcome::AlreadyPresent;
        }
        let inputs = match NodeInputs::resolve(node, store) {
            Ok(inputs) => inputs,
            Err(DeriveError::UnsatisfiableDependency { .. }) => return Outcome::Skipped,
            Err(err) => return Outcome::Failed(err),
        };
        self.log.detail(&format!(
            "'{}' resolved from [{}]",
            node.name(),
            inputs.present().join(", ")
        ));
        match node.derive(&inputs, settings) {
            Ok(entity) if entity.name() == node.name() => Outcome::Derived(entity),
            Ok(entity) => Outcome::Failed(DeriveError::InvalidInput(format!(
                "'{}' produced an entity named '{}'",
                node.name(),
                entity.name()
            ))),
            Err(err) => Outcome::Failed(err),
        }
    }
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.map_or(false, |flag| flag.load(Ordering::Relaxed))
}

struct RunState {
    store: FlightStore,
    derived: Vec<String>,
    skipped: Vec<String>,
    failed: Vec<(String, DeriveError)>,
    metrics: MetricsRecorder,
    cancelled: bool,
}

impl RunState {
    fn new(store: FlightStore) -> Self {
        Self {
            store,
            derived: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
            metrics: MetricsRecorder::new(),
            cancelled: false,
        }
    }

    fn commit(&mut self, node: &dyn DerivedNode, outcome: Outcome, log: &LogManager) {
        let name = node.name();
        match outcome {
            Outcome::AlreadyPresent => {
                log.detail(&format!("'{name}' supplied as raw data; not derived"));
                self.metrics.record_present();
            }
            Outcome::Skipped => {
                log.detail(&format!("'{name}' skipped: no operational combination"));
                self.metrics.record_skipped();
                self.skipped.push(name.to_string());
            }
            Outcome::Derived(entity) => match self.store.insert(entity) {
                Ok(()) => {
                    self.metrics.record_derived();
                    self.derived.push(name.to_string());
                }
                Err(err) => self.fail(name, err, log),
            },
            Outcome::Failed(err) => self.fail(name, err, log),
        }
    }

    fn fail(&mut self, name: &str, err: DeriveError, log: &LogManager) {
        match &err {
            DeriveError::NotComputable(_) => log.detail(&format!("'{name}' not computable: {err}")),
            _ => log.warn(&format!("'{name}' failed: {err}")),
        }
        self.metrics.record_failed();
        self.failed.push((name.to_string(), err));
    }

    fn finish(self, log: &LogManager) -> RunReport {
        let metrics = self.metrics.snapshot();
        log.record(&format!(
            "run {}: {} derived, {} skipped, {} failed, {} supplied",
            if self.cancelled { "cancelled" } else { "complete" },
            metrics.derived,
            metrics.skipped,
            metrics.failed,
            metrics.already_present
        ));
        RunReport {
            store: self.store,
            derived: self.derived,
            skipped: self.skipped,
            failed: self.failed,
            metrics,
            cancelled: self.cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{MaskedArray, Parameter};
    use crate::prelude::DependencyGroup;

    struct Doubled(&'static str, &'static [DependencyGroup]);

    impl DerivedNode for Doubled {
        fn name(&self) -> &'static str {
            self.0
        }

        fn dependencies(&self) -> &'static [DependencyGroup] {
            self.1
        }

        fn derive(&self, inputs: &NodeInputs, _settings: &DeriveSettings) -> DeriveResult<Entity> {
            let source = inputs.parameter(dependency_names(self.1)[0])?;
            Ok(source.derived(self.0, source.array.map(|v| v * 2.0)).into())
        }
    }

    static B: Doubled = Doubled("B", &[DependencyGroup::Required("A")]);
    static C: Doubled = Doubled("C", &[DependencyGroup::Required("B")]);
    static D: Doubled = Doubled("D", &[DependencyGroup::Required("Missing")]);
    static E: Doubled = Doubled("E", &[DependencyGroup::Required("D")]);
    static LOOP_X: Doubled = Doubled("X", &[DependencyGroup::Required("Y")]);
    static LOOP_Y: Doubled = Doubled("Y", &[DependencyGroup::Required("X")]);

    fn chain() -> NodeRegistry {
        NodeRegistry::new([&C as &dyn DerivedNode, &B, &D, &E])
    }

    fn raw_store() -> FlightStore {
        let mut store = FlightStore::new();
        store
            .insert(Parameter::at_1hz("A", MaskedArray::from_values(vec![1.0, 2.0])))
            .unwrap();
        store
    }

    #[test]
    fn order_respects_dependencies() {
        let engine = Engine::new(&chain()).unwrap();
        let order = engine.order();
        let at = |n: &str| order.iter().position(|o| *o == n).unwrap();
        assert!(at("B") < at("C"));
        assert!(at("D") < at("E"));
        assert_eq!(engine.levels(), vec![vec!["B", "D"], vec!["C", "E"]]);
    }

    #[test]
    fn cycle_is_rejected() {
        let registry = NodeRegistry::new([&LOOP_X as &dyn DerivedNode, &LOOP_Y]);
        assert!(matches!(
            Engine::new(&registry),
            Err(DeriveError::CyclicDependency(names)) if names == "X, Y"
        ));
    }

    #[test]
    fn unsatisfiable_nodes_cascade_without_aborting() {
        let engine = Engine::new(&chain()).unwrap();
        let report = engine.run(raw_store(), &DeriveSettings::default(), None);
        assert_eq!(report.derived, vec!["B", "C"]);
        assert_eq!(report.skipped, vec!["D", "E"]);
        let c = report.store.get("C").and_then(Entity::as_parameter).unwrap();
        assert_eq!(c.array.valid_values(), vec![4.0, 8.0]);
        assert!(report.ensure_complete().is_ok());
    }

    #[test]
    fn supplied_entities_are_not_rederived() {
        let mut store = raw_store();
        store
            .insert(Parameter::at_1hz("B", MaskedArray::from_values(vec![7.0, 7.0])))
            .unwrap();
        let report = Engine::new(&chain())
            .unwrap()
            .run(store, &DeriveSettings::default(), None);
        assert_eq!(report.metrics.already_present, 1);
        let c = report.store.get("C").and_then(Entity::as_parameter).unwrap();
        assert_eq!(c.array.valid_values(), vec![14.0, 14.0]);
    }

    #[test]
    fn cancelled_run_keeps_completed_nodes() {
        let cancel = AtomicBool::new(true);
        let report = Engine::new(&chain())
            .unwrap()
            .run(raw_store(), &DeriveSettings::default(), Some(&cancel));
        assert!(report.cancelled);
        assert!(report.derived.is_empty());
        assert!(report.store.contains("A"));
        assert_eq!(report.ensure_complete(), Err(DeriveError::Cancelled));
    }

    #[test]
    fn parallel_matches_sequential() {
        let engine = Engine::new(&chain()).unwrap();
        let settings = DeriveSettings::default();
        let sequential = engine.run(raw_store(), &settings, None);
        let parallel = engine.run_parallel(raw_store(), &settings, None);
        assert_eq!(sequential.metrics, parallel.metrics);
        for name in sequential.store.names() {
            assert_eq!(sequential.store.get(name), parallel.store.get(name));
        }
    }
}
