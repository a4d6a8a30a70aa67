//! Command-line arguments and how they override the run configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::warn;
use turbid_core::{
    AmplitudeModel, EddyConfig, ExportConfig, ExportFormat, PerlinTexture, SizeLimit,
    UniformCellsConfig,
};

#[derive(Debug, Parser)]
#[command(name = "turbid", author, version, about, long_about = None)]
pub struct Cli {
    /// TOML run configuration; flags override its values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory output files are written to
    #[arg(long, global = true)]
    pub out_dir: Option<PathBuf>,

    /// Output format: svg (default), png or csv
    #[arg(long, global = true)]
    pub format: Option<ExportFormat>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Velocity profile of randomly sized eddies
    Eddy(EddyArgs),

    /// Velocity profile of equal-sized cells
    Uniform(UniformArgs),

    /// Fractal Perlin noise texture
    Perlin(PerlinArgs),

    /// List registered generators
    List {
        /// Print generator metadata as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn apply_output(&self, output: &mut ExportConfig) {
        if let Some(dir) = &self.out_dir {
            output.output_dir = dir.clone();
        }
        if let Some(format) = self.format {
            output.format = format;
        }
    }
}

#[derive(Debug, Args)]
pub struct EddyArgs {
    /// Size limit: constant or height
    #[arg(long)]
    pub variant: Option<SizeLimit>,

    /// Amplitude model: sound or kolmogorov
    #[arg(long)]
    pub model: Option<AmplitudeModel>,

    #[arg(long, allow_negative_numbers = true)]
    pub r_min: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub r_max: Option<f64>,

    /// Number of radial samples
    #[arg(long)]
    pub res: Option<usize>,

    /// Characteristic length for the constant variant
    #[arg(long)]
    pub eddy_length: Option<f64>,

    /// Standard deviation of eddy sizes
    #[arg(long)]
    pub size_sd: Option<f64>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Rejection-sampling draws allowed per eddy
    #[arg(long)]
    pub max_attempts: Option<usize>,
}

impl EddyArgs {
    pub fn apply(&self, config: &mut EddyConfig) {
        if let Some(variant) = self.variant {
            // Keep the configured limit when the variant is unchanged.
            if variant.name() != config.size_limit.name() {
                config.size_limit = variant;
            }
        }
        if let Some(length) = self.eddy_length {
            if matches!(self.variant, Some(SizeLimit::Height { .. })) {
                warn!("--eddy-length only applies to the constant variant; ignoring it");
            } else {
                config.size_limit = SizeLimit::constant(length);
            }
        }
        if let Some(model) = self.model {
            if model.name() != config.model.name() {
                config.model = model;
            }
        }
        set(&mut config.r_min, self.r_min);
        set(&mut config.r_max, self.r_max);
        set(&mut config.res, self.res);
        set(&mut config.size_sd, self.size_sd);
        set(&mut config.max_attempts, self.max_attempts);
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

#[derive(Debug, Args)]
pub struct UniformArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub r_min: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub r_max: Option<f64>,

    /// Cell wavelength
    #[arg(long)]
    pub eddy_length: Option<f64>,

    #[arg(long)]
    pub res: Option<usize>,

    #[arg(long)]
    pub seed: Option<u64>,
}

impl UniformArgs {
    pub fn apply(&self, config: &mut UniformCellsConfig) {
        set(&mut config.r_min, self.r_min);
        set(&mut config.r_max, self.r_max);
        set(&mut config.eddy_length, self.eddy_length);
        set(&mut config.res, self.res);
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

#[derive(Debug, Args)]
pub struct PerlinArgs {
    /// Columns
    #[arg(long)]
    pub alpha: Option<usize>,

    /// Rows
    #[arg(long)]
    pub beta: Option<usize>,

    #[arg(long)]
    pub octaves: Option<usize>,

    /// Amplitude ratio between successive octaves
    #[arg(long)]
    pub persistence: Option<f64>,

    /// Base lattice cells along the mean side of an untiled texture
    #[arg(long)]
    pub frequency: Option<f64>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Repeat factor for a seamless texture; 0 disables tiling
    #[arg(long)]
    pub tile: Option<u32>,
}

impl PerlinArgs {
    pub fn apply(&self, texture: &mut PerlinTexture) {
        set(&mut texture.alpha, self.alpha);
        set(&mut texture.beta, self.beta);
        set(&mut texture.octaves, self.octaves);
        set(&mut texture.persistence, self.persistence);
        set(&mut texture.frequency, self.frequency);
        set(&mut texture.seed, self.seed);
        match self.tile {
            Some(0) => texture.tile = None,
            Some(n) => texture.tile = Some(n),
            None => {}
        }
    }
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("turbid").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["perlin", "--format", "png", "--out-dir", "/tmp", "-v"]);
        assert_eq!(cli.format, Some(ExportFormat::Png));
        assert!(cli.verbose);

        let mut output = ExportConfig::default();
        cli.apply_output(&mut output);
        assert_eq!(output.output_dir, PathBuf::from("/tmp"));
        assert_eq!(output.format, ExportFormat::Png);
    }

    #[test]
    fn test_unknown_format_and_model_fail_to_parse() {
        let base = || std::iter::once("turbid");
        assert!(Cli::try_parse_from(base().chain(["eddy", "--format", "gif"])).is_err());
        assert!(Cli::try_parse_from(base().chain(["eddy", "--model", "laminar"])).is_err());
        assert!(Cli::try_parse_from(base().chain(["eddy", "--variant", "wide"])).is_err());
    }

    #[test]
    fn test_eddy_flags_override_config() {
        let cli = parse(&[
            "eddy", "--variant", "constant", "--eddy-length", "2.5", "--model", "sound", "--r-min",
            "-10", "--seed", "3",
        ]);
        let Command::Eddy(args) = cli.command else {
            panic!("expected eddy subcommand");
        };

        let mut config = EddyConfig::default();
        args.apply(&mut config);
        assert_eq!(config.size_limit, SizeLimit::constant(2.5));
        assert_eq!(config.model, AmplitudeModel::sound());
        assert_eq!(config.r_min, -10.0);
        assert_eq!(config.r_max, 100.0);
        assert_eq!(config.seed, Some(3));
    }

    #[test]
    fn test_eddy_without_flags_keeps_config() {
        let Command::Eddy(args) = parse(&["eddy"]).command else {
            panic!("expected eddy subcommand");
        };
        let mut config = EddyConfig::constant_cells(0.0, 50.0, 4.0)
            .with_model(AmplitudeModel::Sound { spread: 1.0 });
        let before = config.clone();
        args.apply(&mut config);
        assert_eq!(config, before);

        // Naming the configured model again keeps its spread.
        let Command::Eddy(args) = parse(&["eddy", "--model", "sound"]).command else {
            panic!("expected eddy subcommand");
        };
        args.apply(&mut config);
        assert_eq!(config.model, AmplitudeModel::Sound { spread: 1.0 });
    }

    #[test]
    fn test_perlin_tile_zero_disables_tiling() {
        let Command::Perlin(args) = parse(&["perlin", "--tile", "0", "--alpha", "64"]).command
        else {
            panic!("expected perlin subcommand");
        };
        let mut texture = PerlinTexture::tiled(240, 140, 2);
        args.apply(&mut texture);
        assert_eq!(texture.tile, None);
        assert_eq!((texture.alpha, texture.beta), (64, 140));
        assert_eq!(texture.frequency, 3.0);

        let flags = ["perlin", "--frequency", "5.5", "--persistence", "0.25"];
        let Command::Perlin(args) = parse(&flags).command else {
            panic!("expected perlin subcommand");
        };
        args.apply(&mut texture);
        assert_eq!(texture.frequency, 5.5);
        assert_eq!(texture.persistence, 0.25);
    }

    #[test]
    fn test_list_json_flag() {
        assert!(matches!(
            parse(&["list", "--json"]).command,
            Command::List { json: true }
        ));
    }
}
