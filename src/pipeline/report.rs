use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Merge,
    Distance,
    Join,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputRecord {
    pub path: PathBuf,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub outputs: Vec<OutputRecord>,
    pub plots: Vec<PathBuf>,
}

impl StageReport {
    pub fn start(stage: Stage) -> Self {
        log::info!("Starting stage {}", stage);
        Self {
            stage,
            started_at: Utc::now(),
            completed_at: None,
            outputs: Vec::new(),
            plots: Vec::new(),
        }
    }

    pub fn add_output(&mut self, path: &Path, rows: usize) {
        log::info!("Wrote {} ({} rows)", path.display(), rows);
        self.outputs.push(OutputRecord {
            path: path.to_path_buf(),
            rows,
        });
    }

    pub fn add_plot(&mut self, path: &Path) {
        log::info!("Rendered {}", path.display());
        self.plots.push(path.to_path_buf());
    }

    pub fn finish(mut self) -> Self {
        let completed = Utc::now();
        let elapsed = (completed - self.started_at)
            .to_std()
            .unwrap_or_default();
        let elapsed = std::time::Duration::from_millis(elapsed.as_millis() as u64);
        log::info!(
            "Stage {} finished in {}",
            self.stage,
            humantime::format_duration(elapsed)
        );
        self.completed_at = Some(completed);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub stages: Vec<StageReport>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            completed_at: None,
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, stage: StageReport) {
        self.stages.push(stage);
    }

    pub fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// JSON when the file ends in `.json`, YAML otherwise.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let content = if path.extension().is_some_and(|e| e == "json") {
            serde_json::to_string_pretty(self)
                .map_err(|e| io::Error::other(format!("Failed to serialize report: {}", e)))?
        } else {
            serde_yaml::to_string(self)
                .map_err(|e| io::Error::other(format!("Failed to serialize report: {}", e)))?
        };
        fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> RunReport {
        let mut report = RunReport::new();
        let mut stage = StageReport::start(Stage::Distance);
        stage.add_output(Path::new("data/results_distance_join.csv"), 42);
        report.push(stage.finish());
        report.finish();
        report
    }

    #[test]
    fn stage_names_are_snake_case() {
        assert_eq!(Stage::Merge.to_string(), "merge");
        assert_eq!(Stage::Join.to_string(), "join");
    }

    #[test]
    fn json_report_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        sample().save(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["stages"][0]["stage"], "distance");
        assert_eq!(value["stages"][0]["outputs"][0]["rows"], 42);
    }

    #[test]
    fn yaml_report_otherwise() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.yaml");
        sample().save(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("stage: distance"));
        assert!(content.contains("completed_at"));
    }
}
