//! turbid - synthetic turbulence profiles and noise textures
//!
//! Generates a figure (or CSV) per invocation and writes it to a
//! timestamp-named file in the output directory.

mod cli;

use chrono::Local;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use turbid_core::{
    Exporter, GeneratorKind, NoiseGrid, RadialProfile, TurbidConfig, TurbidResult,
};
use turbid_stats::SummaryStats;

use cli::{Cli, Command};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(&cli)?;
    Ok(())
}

fn run(cli: &Cli) -> TurbidResult<()> {
    // One timestamp names every file this run writes.
    let timestamp = Local::now();

    let mut config = match &cli.config {
        Some(path) => TurbidConfig::load(path)?,
        None => TurbidConfig::default(),
    };
    cli.apply_output(&mut config.output);

    let kind = match &cli.command {
        Command::List { json } => return list_generators(&config, *json),
        Command::Eddy(args) => {
            args.apply(&mut config.eddy);
            GeneratorKind::Eddy
        }
        Command::Uniform(args) => {
            args.apply(&mut config.uniform);
            GeneratorKind::Uniform
        }
        Command::Perlin(args) => {
            args.apply(&mut config.perlin);
            GeneratorKind::Perlin
        }
    };

    let exporter = Exporter::new(config.output.clone(), timestamp)?;
    debug!(
        dir = %config.output.output_dir.display(),
        format = %config.output.format,
        "export configured"
    );

    let written = match kind {
        GeneratorKind::Eddy => {
            let profile = config.eddy.generate()?;
            log_profile(kind, &profile);
            exporter.export_profile(kind.name(), kind.name(), &profile)?
        }
        GeneratorKind::Uniform => {
            let profile = config.uniform.generate()?;
            log_profile(kind, &profile);
            exporter.export_profile(kind.name(), kind.name(), &profile)?
        }
        GeneratorKind::Perlin => {
            let grid = config.perlin.generate()?;
            log_texture(&grid);
            exporter.export_texture(kind.name(), kind.name(), &grid)?
        }
    };

    println!("{}", written.path.display());
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn log_profile(kind: GeneratorKind, profile: &RadialProfile) {
    let stats = SummaryStats::from_data(&profile.velocity.to_vec());
    info!(
        generator = %kind,
        samples = profile.len(),
        segments = profile.segments.len(),
        mean = stats.mean,
        std_dev = stats.std_dev,
        min = stats.min,
        max = stats.max,
        "generated velocity profile"
    );
}

fn log_texture(grid: &NoiseGrid) {
    let values: Vec<f64> = grid.values.iter().copied().collect();
    let stats = SummaryStats::from_data(&values);
    info!(
        rows = grid.rows(),
        cols = grid.cols(),
        tiled = grid.is_tiled(),
        mean = stats.mean,
        std_dev = stats.std_dev,
        min = stats.min,
        max = stats.max,
        "generated perlin texture"
    );
}

/// Each generator with the settings this configuration would run it with
fn list_generators(config: &TurbidConfig, json: bool) -> TurbidResult<()> {
    let summaries = config.summaries()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for summary in summaries {
        println!("{}  [{:?}]", summary.name, summary.output);
        println!("    {}", summary.description);
        if let serde_json::Value::Object(settings) = &summary.settings {
            for (key, value) in settings {
                println!("    {key:<14} {value}");
            }
        }
    }
    Ok(())
}
