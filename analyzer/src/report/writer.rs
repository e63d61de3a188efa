use crate::report::model::FlightReport;
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

/// Publishes run reports as pretty-printed JSON.
pub struct ReportWriter {
    path: PathBuf,
}

impl ReportWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn publish(&self, report: &FlightReport) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(report).context("serializing flight report")?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing flight report {}", self.path.display()))?;
        info!(
            "[report] {} attributes, {} phases written to {}",
            report.attributes.len(),
            report.phases.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fdrcore::entity::AttributeValue;

    #[test]
    fn writer_creates_directories_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("flight.json");
        let mut report = FlightReport::default();
        report
            .attributes
            .insert("FDR Flight Number".into(), AttributeValue::Text("1234".into()));
        ReportWriter::new(&path).publish(&report).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written["attributes"]["FDR Flight Number"]["value"],
            serde_json::json!("1234")
        );
    }
}
