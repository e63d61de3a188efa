use crate::report::model::FlightReport;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use fdrcore::{Engine, FlightStore, RunReport};
use log::info;

pub struct WorkflowResult {
    pub run: RunReport,
    pub report: FlightReport,
}

/// Runs the built-in node library over one flight per call.
pub struct Runner {
    config: WorkflowConfig,
    engine: Engine,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> anyhow::Result<Self> {
        let engine = Engine::builtin().context("ordering the built-in node library")?;
        Ok(Self { config, engine })
    }

    pub fn execute(&self, store: FlightStore) -> anyhow::Result<WorkflowResult> {
        info!(
            "deriving {} nodes over {} raw entities ({})",
            self.engine.order().len(),
            store.len(),
            if self.config.parallel { "parallel" } else { "sequential" }
        );
        let run = if self.config.parallel {
            self.engine
                .run_parallel(store, &self.config.settings, None)
        } else {
            self.engine.run(store, &self.config.settings, None)
        };
        let report = FlightReport::from_run(&run, self.config.generator.description.clone());
        Ok(WorkflowResult { run, report })
    }
}
