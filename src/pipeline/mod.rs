mod distance;
mod error;
mod final_join;
mod merge;
mod report;

pub use error::{PipelineError, PipelineResult};
pub use report::{RunReport, Stage, StageReport};

use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;

use crate::config::Config;
use crate::table::{text_column, with_text_column, TableError};
use crate::telemetry::{columns, individual_name};

/// Runs the analysis stages against one configuration.
pub struct Pipeline {
    config: Config,
    plots: bool,
}

impl Pipeline {
    pub fn new(config: Config, plots: bool) -> Self {
        let plots = plots && config.plots.enabled;
        Self { config, plots }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one stage once the files it reads are present.
    pub fn run_stage(&self, stage: Stage) -> PipelineResult<StageReport> {
        let absent = missing(self.stage_inputs(stage));
        if !absent.is_empty() {
            return Err(PipelineError::MissingInputs(absent));
        }
        match stage {
            Stage::Merge => merge::run(&self.config, self.plots),
            Stage::Distance => distance::run(&self.config, self.plots),
            Stage::Join => final_join::run(&self.config),
        }
    }

    /// All stages in order; the first failure stops the run.
    pub fn run_all(&self) -> PipelineResult<RunReport> {
        let mut report = RunReport::new();
        for stage in [Stage::Merge, Stage::Distance, Stage::Join] {
            report.push(self.run_stage(stage)?);
        }
        report.finish();
        Ok(report)
    }

    /// Files `stage` reads, whether sources or earlier stage outputs.
    pub fn stage_inputs(&self, stage: Stage) -> Vec<&Path> {
        let inputs = &self.config.inputs;
        let outputs = &self.config.outputs;
        match stage {
            Stage::Merge => {
                let mut files: Vec<&Path> =
                    inputs.biomes.iter().map(|b| b.path.as_path()).collect();
                files.push(inputs.demographics.as_path());
                files
            }
            Stage::Distance => vec![
                outputs.combined.as_path(),
                outputs.coordinates.as_path(),
                inputs.activity_counts.as_path(),
            ],
            Stage::Join => vec![
                outputs.coordinates_named.as_path(),
                outputs.distance.as_path(),
            ],
        }
    }

    /// Source files that do not exist yet.
    pub fn missing_inputs(&self) -> Vec<PathBuf> {
        missing(self.config.source_files())
    }

    pub fn check_inputs(&self) -> PipelineResult<()> {
        let missing = self.missing_inputs();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::MissingInputs(missing))
        }
    }
}

fn missing(paths: Vec<&Path>) -> Vec<PathBuf> {
    paths
        .into_iter()
        .filter(|p| !p.exists())
        .map(PathBuf::from)
        .collect()
}

/// Adds `individual_name` derived from the identifier column `from`.
pub(crate) fn add_individual_name(frame: &mut DataFrame, from: &str) -> Result<(), TableError> {
    let names = text_column(frame, from)?
        .into_iter()
        .map(|id| id.map(|id| individual_name(&id).to_string()))
        .collect();
    with_text_column(frame, columns::INDIVIDUAL_NAME, names)
}
