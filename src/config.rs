use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::telemetry::{columns, Biome};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("no biome sources configured")]
    NoBiomes,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub inputs: InputsConfig,
    #[serde(default)]
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub plots: PlotsConfig,
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default = "default_coordinate_columns")]
    pub coordinate_columns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BiomeSource {
    pub biome: Biome,
    pub path: PathBuf,
    /// Columns added as all-null when the file lacks them.
    #[serde(default)]
    pub fill_missing: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputsConfig {
    #[serde(default = "default_biomes")]
    pub biomes: Vec<BiomeSource>,
    #[serde(default = "default_demographics")]
    pub demographics: PathBuf,
    #[serde(default = "default_activity_counts")]
    pub activity_counts: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputsConfig {
    #[serde(default = "default_combined")]
    pub combined: PathBuf,
    #[serde(default = "default_coordinates")]
    pub coordinates: PathBuf,
    #[serde(default = "default_coordinates_named")]
    pub coordinates_named: PathBuf,
    #[serde(default = "default_biome_hourly")]
    pub biome_hourly_counts: PathBuf,
    #[serde(default = "default_sex_hourly")]
    pub sex_hourly_counts: PathBuf,
    #[serde(default = "default_ind_hourly")]
    pub ind_hourly_counts: PathBuf,
    #[serde(default = "default_distance")]
    pub distance: PathBuf,
    #[serde(default = "default_final")]
    pub final_table: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlotsConfig {
    #[serde(default = "default_plots_enabled")]
    pub enabled: bool,
    #[serde(default = "default_plot_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_grid_columns")]
    pub grid_columns: usize,
}

fn default_timestamp_format() -> String {
    "%m/%d/%Y %H:%M".to_string()
}

fn default_coordinate_columns() -> Vec<String> {
    [
        columns::ID,
        columns::TIMESTAMP,
        columns::LONGITUDE,
        columns::LATITUDE,
        columns::INDIVIDUAL,
        columns::BIOME,
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

fn default_biomes() -> Vec<BiomeSource> {
    vec![
        BiomeSource {
            biome: Biome::AtlanticForest,
            path: PathBuf::from("data/atlantica.csv"),
            fill_missing: vec![columns::ALTITUDE.to_string(), columns::SPEED.to_string()],
        },
        BiomeSource {
            biome: Biome::Cerrado,
            path: PathBuf::from("data/cerrado.csv"),
            fill_missing: Vec::new(),
        },
        BiomeSource {
            biome: Biome::Pantanal,
            path: PathBuf::from("data/pantanal.csv"),
            fill_missing: Vec::new(),
        },
    ]
}

fn default_demographics() -> PathBuf {
    PathBuf::from("data/sex.csv")
}

// Same schema as the per-individual hourly counts written by the merge stage.
fn default_activity_counts() -> PathBuf {
    PathBuf::from("data/ind_hourly_counts.csv")
}

fn default_combined() -> PathBuf {
    PathBuf::from("data/df_combined.csv")
}

fn default_coordinates() -> PathBuf {
    PathBuf::from("data/df_merged_na_coord.csv")
}

fn default_coordinates_named() -> PathBuf {
    PathBuf::from("data/df_merged_na_coord2.csv")
}

fn default_biome_hourly() -> PathBuf {
    PathBuf::from("data/biome_hourly_counts.csv")
}

fn default_sex_hourly() -> PathBuf {
    PathBuf::from("data/sex_hourly_counts.csv")
}

fn default_ind_hourly() -> PathBuf {
    PathBuf::from("data/ind_hourly_counts.csv")
}

fn default_distance() -> PathBuf {
    PathBuf::from("data/results_distance_join.csv")
}

fn default_final() -> PathBuf {
    PathBuf::from("data/df_merged_na_coord3.csv")
}

fn default_plots_enabled() -> bool {
    true
}

fn default_plot_dir() -> PathBuf {
    PathBuf::from("plots")
}

fn default_grid_columns() -> usize {
    5
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            biomes: default_biomes(),
            demographics: default_demographics(),
            activity_counts: default_activity_counts(),
        }
    }
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            combined: default_combined(),
            coordinates: default_coordinates(),
            coordinates_named: default_coordinates_named(),
            biome_hourly_counts: default_biome_hourly(),
            sex_hourly_counts: default_sex_hourly(),
            ind_hourly_counts: default_ind_hourly(),
            distance: default_distance(),
            final_table: default_final(),
        }
    }
}

impl Default for PlotsConfig {
    fn default() -> Self {
        Self {
            enabled: default_plots_enabled(),
            dir: default_plot_dir(),
            grid_columns: default_grid_columns(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: InputsConfig::default(),
            outputs: OutputsConfig::default(),
            plots: PlotsConfig::default(),
            timestamp_format: default_timestamp_format(),
            coordinate_columns: default_coordinate_columns(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        if config.inputs.biomes.is_empty() {
            return Err(ConfigError::NoBiomes);
        }
        Ok(config)
    }

    /// Loads the given file, or falls back to the built-in paths under `data/`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn plot_path(&self, name: &str) -> PathBuf {
        self.plots.dir.join(name)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Every file the pipeline reads without producing it itself.
    pub fn source_files(&self) -> Vec<&Path> {
        let mut files: Vec<&Path> = self.inputs.biomes.iter().map(|b| b.path.as_path()).collect();
        files.push(self.inputs.demographics.as_path());
        if self.inputs.activity_counts != self.outputs.ind_hourly_counts {
            files.push(self.inputs.activity_counts.as_path());
        }
        files
    }
}
