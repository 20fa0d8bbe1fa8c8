mod config;
mod distance;
mod hourly;
mod pipeline;
mod plot;
mod table;
mod telemetry;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Config;
use crate::pipeline::{Pipeline, Stage};

#[derive(Parser)]
#[command(name = "tapir-tracks")]
#[command(about = "Tapir telemetry merge, hourly distance and plotting")]
struct Cli {
    /// YAML configuration; defaults to the paths under data/
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check configuration and input files without writing anything
    Validate,
    /// Tag biomes, merge with demographics, count fixes per hour
    Merge {
        #[arg(long)]
        no_plot: bool,
    },
    /// Per-individual hourly geodesic distance
    Distance {
        #[arg(long)]
        no_plot: bool,
    },
    /// Join coordinates with demographics by individual name
    Join,
    /// Run every stage in order
    Run {
        #[arg(long)]
        no_plot: bool,
        /// Write a run report (.json or YAML)
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Validate => validate(config),
        Commands::Merge { no_plot } => stage(&Pipeline::new(config, !no_plot), Stage::Merge),
        Commands::Distance { no_plot } => stage(&Pipeline::new(config, !no_plot), Stage::Distance),
        Commands::Join => stage(&Pipeline::new(config, false), Stage::Join),
        Commands::Run { no_plot, report } => run(Pipeline::new(config, !no_plot), report),
    }
}

fn validate(config: Config) -> ExitCode {
    println!("Biome sources ({}):", config.inputs.biomes.len());
    for source in &config.inputs.biomes {
        let filled = if source.fill_missing.is_empty() {
            String::new()
        } else {
            format!(" (fills {})", source.fill_missing.join(", "))
        };
        println!("  {}: {}{}", source.biome, source.path.display(), filled);
    }
    println!("Demographics: {}", config.inputs.demographics.display());
    println!("Activity counts: {}", config.inputs.activity_counts.display());
    println!("Final table: {}", config.outputs.final_table.display());
    if config.plots.enabled {
        println!("Plots: {}", config.plots.dir.display());
    } else {
        println!("Plots: disabled");
    }

    match config.to_yaml() {
        Ok(yaml) => println!("\nEffective config:\n{}", yaml),
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let pipeline = Pipeline::new(config, false);
    let missing = pipeline.missing_inputs();
    if missing.is_empty() {
        println!("All input files present");
        ExitCode::SUCCESS
    } else {
        for path in &missing {
            eprintln!("Missing input: {}", path.display());
        }
        ExitCode::FAILURE
    }
}

fn stage(pipeline: &Pipeline, stage: Stage) -> ExitCode {
    match pipeline.run_stage(stage) {
        Ok(report) => {
            println!(
                "Stage {} wrote {} files, {} plots",
                report.stage,
                report.outputs.len(),
                report.plots.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Stage {} failed: {}", stage, e);
            ExitCode::FAILURE
        }
    }
}

fn run(pipeline: Pipeline, report_path: Option<PathBuf>) -> ExitCode {
    if let Err(e) = pipeline.check_inputs() {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let start_time = chrono::Utc::now();
    println!("Starting run at {}", start_time);

    let report = match pipeline.run_all() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Run failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) = report_path {
        if let Err(e) = report.save(&path) {
            eprintln!("Error writing report: {}", e);
            return ExitCode::FAILURE;
        }
        println!("Report written to {}", path.display());
    }

    println!(
        "Run completed: {} outputs, final table at {}",
        report.stages.iter().map(|s| s.outputs.len()).sum::<usize>(),
        pipeline.config().outputs.final_table.display()
    );
    ExitCode::SUCCESS
}
