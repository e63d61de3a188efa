use clap::Parser;
use generator::profile::build_flight_from_config;
use report::writer::ReportWriter;
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod report;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline flight-data derivation driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Seed for the synthetic flight (ignored with --workflow)
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Recording length in seconds (ignored with --workflow)
    #[arg(long, default_value_t = 1800.0)]
    duration: f64,
    /// Evaluate each dependency level concurrently
    #[arg(long, default_value_t = false)]
    parallel: bool,
    /// Write the JSON run report here
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.duration, args.seed)
    };
    workflow_config.parallel |= args.parallel;
    if args.report.is_some() {
        workflow_config.report = args.report;
    }

    let store = build_flight_from_config(&workflow_config.generator)?;
    let runner = Runner::new(workflow_config.clone())?;
    let result = runner.execute(store)?;

    println!(
        "Run -> derived {}, skipped {}, failed {}, supplied {}",
        result.run.metrics.derived,
        result.run.metrics.skipped,
        result.run.metrics.failed,
        result.run.metrics.already_present
    );
    for (name, value) in &result.report.attributes {
        println!("  {name}: {value}");
    }
    for (node, err) in &result.run.failed {
        log::warn!("{node}: {err}");
    }

    if let Some(path) = workflow_config.report {
        ReportWriter::new(path).publish(&result.report)?;
    }
    result.run.ensure_complete()?;
    Ok(())
}
