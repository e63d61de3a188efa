use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use fdrcore::DeriveSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub settings: DeriveSettings,
    pub generator: GeneratorConfig,
    /// Evaluate each dependency level on the rayon pool.
    pub parallel: bool,
    pub report: Option<PathBuf>,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(duration: f64, seed: u64) -> Self {
        Self {
            generator: GeneratorConfig {
                duration,
                seed,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_sets_generator() {
        let cfg = WorkflowConfig::from_args(900.0, 3);
        assert_eq!(cfg.generator.duration, 900.0);
        assert_eq!(cfg.generator.seed, 3);
        assert_eq!(cfg.settings, DeriveSettings::default());
        assert!(!cfg.parallel);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"parallel: true\nreport: out/flight.json\nsettings:\n  airspeed_threshold: 90.0\ngenerator:\n  duration: 2400.0\n  flying_pilot: FirstOfficer\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert!(cfg.parallel);
        assert_eq!(cfg.report, Some(PathBuf::from("out/flight.json")));
        assert_eq!(cfg.settings.airspeed_threshold, 90.0);
        assert_eq!(cfg.settings.repair_duration, 10.0);
        assert_eq!(cfg.generator.duration, 2400.0);
        assert_eq!(cfg.generator.cruise_height, 10_000.0);
    }

    #[test]
    fn config_load_reports_bad_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"settings: [1, 2]\n").unwrap();
        let path = temp.into_temp_path();
        let err = WorkflowConfig::load(&path).unwrap_err();
        assert!(format!("{err}").contains("parsing workflow config"));
    }
}
