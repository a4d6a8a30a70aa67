//! Figure export functionality
//!
//! Writes generated profiles and textures to disk:
//! - SVG (default): Vector figure with axis labels, tick labels and title
//! - PNG: Raster figure drawn with the `image` crate, without text
//! - CSV: The raw columns behind the figure
//!
//! Files are named `<prefix>_<timestamp>.<ext>`, using one timestamp per run
//! with microsecond resolution. Existing files are never overwritten.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Local};
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{validation, ExportError, ExportResult};
use crate::plot::{Figure, ImagePlot, LinePlot};
use crate::profile::RadialProfile;
use crate::texture::NoiseGrid;

/// `chrono` format used for file name timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S%.6f";

/// Export format for figures
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// PNG raster image
    Png,
    /// SVG scalable vector graphics
    #[default]
    Svg,
    /// Comma-separated data columns
    Csv,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Png, ExportFormat::Svg, ExportFormat::Csv];

    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.extension() == wanted)
            .ok_or_else(|| ExportError::UnknownFormat(s.to_string()))
    }
}

/// Export configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output format
    pub format: ExportFormat,

    /// Directory the files are written to
    pub output_dir: PathBuf,

    /// Figure width in pixels
    pub width: u32,

    /// Figure height in pixels
    pub height: u32,

    /// Pixels per grid cell for raster textures
    pub cell_size: u32,

    /// Custom title drawn above SVG figures
    pub title: Option<String>,

    /// Also write a `<file>.json` metadata sidecar
    pub write_metadata: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            output_dir: PathBuf::from("."),
            width: 800,
            height: 600,
            cell_size: 4,
            title: None,
            write_metadata: false,
        }
    }
}

impl ExportConfig {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    /// Set output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_metadata(mut self) -> Self {
        self.write_metadata = true;
        self
    }

    pub fn validate(&self) -> ExportResult<()> {
        validation::validate_dimensions(self.width, self.height)?;
        if self.cell_size == 0 {
            return Err(ExportError::InvalidDimensions {
                width: self.cell_size,
                height: self.cell_size,
            });
        }
        if !self.output_dir.is_dir() {
            return Err(ExportError::InvalidPath {
                path: self.output_dir.clone(),
            });
        }
        Ok(())
    }

    /// Full output path for `prefix` at `timestamp`
    pub fn output_path(&self, prefix: &str, timestamp: &DateTime<Local>) -> PathBuf {
        self.output_dir
            .join(timestamped_filename(prefix, timestamp, self.format))
    }
}

/// `<prefix>_<YYYY-mm-dd_HH-MM-SS.ffffff>.<ext>`
pub fn timestamped_filename(prefix: &str, timestamp: &DateTime<Local>, format: ExportFormat) -> String {
    format!(
        "{}_{}.{}",
        prefix,
        timestamp.format(TIMESTAMP_FORMAT),
        format.extension()
    )
}

/// A file written by [`Exporter`]
#[derive(Clone, Debug)]
pub struct ExportedFigure {
    pub path: PathBuf,

    /// Format exported
    pub format: ExportFormat,

    /// Pixel dimensions, `None` for CSV
    pub dimensions: Option<(u32, u32)>,

    /// Export metadata
    pub metadata: ExportMetadata,
}

/// Metadata about the export
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Creation timestamp (RFC 3339)
    pub created_at: String,

    /// Name of the producing generator
    pub generator: String,

    /// Number of data points in the figure
    pub point_count: usize,

    /// Software version
    pub software_version: String,
}

impl ExportMetadata {
    pub fn new(generator: impl Into<String>, point_count: usize, timestamp: &DateTime<Local>) -> Self {
        Self {
            created_at: timestamp.to_rfc3339(),
            generator: generator.into(),
            point_count,
            software_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Export data to CSV format
#[derive(Clone, Debug)]
pub struct CsvExporter {
    /// Whether to include header row
    pub include_header: bool,

    /// Column delimiter
    pub delimiter: char,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self {
            include_header: true,
            delimiter: ',',
        }
    }

    /// Generate CSV content
    pub fn export(&self, data: &DataForExport) -> String {
        let delimiter = self.delimiter.to_string();
        let mut output = String::new();

        if self.include_header {
            output.push_str(&data.field_names.join(&delimiter));
            output.push('\n');
        }

        for row in &data.rows {
            let values: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            output.push_str(&values.join(&delimiter));
            output.push('\n');
        }

        output
    }
}

/// Data prepared for export
#[derive(Clone, Debug, Default)]
pub struct DataForExport {
    /// Field names
    pub field_names: Vec<String>,

    /// Data rows
    pub rows: Vec<Vec<f64>>,
}

impl DataForExport {
    /// Columns `r, velocity, segment`
    pub fn from_profile(profile: &RadialProfile) -> Self {
        let segments = profile.segment_ids();
        let rows = profile
            .radius
            .iter()
            .zip(profile.velocity.iter())
            .zip(segments)
            .map(|((&r, &v), s)| vec![r, v, s])
            .collect();
        Self {
            field_names: vec!["r".into(), "velocity".into(), "segment".into()],
            rows,
        }
    }

    /// Columns `row, col, value`, row-major
    pub fn from_noise(grid: &NoiseGrid) -> Self {
        let rows = grid
            .values
            .indexed_iter()
            .map(|((row, col), &value)| vec![row as f64, col as f64, value])
            .collect();
        Self {
            field_names: vec!["row".into(), "col".into(), "value".into()],
            rows,
        }
    }
}

/// Writes figures and data files for one run
#[derive(Clone, Debug)]
pub struct Exporter {
    config: ExportConfig,
    timestamp: DateTime<Local>,
}

impl Exporter {
    /// Fails if the configuration is unusable, before anything is generated
    pub fn new(config: ExportConfig, timestamp: DateTime<Local>) -> ExportResult<Self> {
        config.validate()?;
        Ok(Self { config, timestamp })
    }

    /// Velocity against radius
    pub fn export_profile(
        &self,
        prefix: &str,
        generator: &str,
        profile: &RadialProfile,
    ) -> ExportResult<ExportedFigure> {
        let size = (self.config.width, self.config.height);
        let build = || -> ExportResult<LinePlot> {
            let plot = LinePlot::from_profile(profile)?;
            Ok(match &self.config.title {
                Some(title) => plot.with_title(title),
                None => plot,
            })
        };
        self.write(prefix, generator, profile.len(), size, build, || {
            DataForExport::from_profile(profile)
        })
    }

    /// Grayscale image of the grid
    pub fn export_texture(
        &self,
        prefix: &str,
        generator: &str,
        grid: &NoiseGrid,
    ) -> ExportResult<ExportedFigure> {
        let build = || -> ExportResult<ImagePlot> {
            let plot = ImagePlot::from_noise(grid)?.with_cell_size(self.config.cell_size);
            Ok(match &self.config.title {
                Some(title) => plot.with_title(title),
                None => plot,
            })
        };
        let size = match self.config.format {
            ExportFormat::Png => build()?.default_size(),
            _ => (self.config.width, self.config.height),
        };
        validation::validate_dimensions(size.0, size.1)?;
        self.write(prefix, generator, grid.values.len(), size, build, || {
            DataForExport::from_noise(grid)
        })
    }

    fn write<F: Figure>(
        &self,
        prefix: &str,
        generator: &str,
        point_count: usize,
        (width, height): (u32, u32),
        figure: impl FnOnce() -> ExportResult<F>,
        data: impl FnOnce() -> DataForExport,
    ) -> ExportResult<ExportedFigure> {
        let path = self.config.output_path(prefix, &self.timestamp);
        let format = self.config.format;

        let dimensions = match format {
            ExportFormat::Png => {
                let img = figure()?.render_raster(width, height)?;
                let mut out = BufWriter::new(create_new(&path)?);
                img.write_to(&mut out, ImageFormat::Png)?;
                out.flush().map_err(|source| write_error(&path, source))?;
                Some((width, height))
            }
            ExportFormat::Svg => {
                let svg = figure()?.render_svg(width, height)?;
                write_file(&path, svg.as_bytes())?;
                Some((width, height))
            }
            ExportFormat::Csv => {
                let csv = CsvExporter::new().export(&data());
                write_file(&path, csv.as_bytes())?;
                None
            }
        };
        info!(path = %path.display(), %format, "wrote {generator} output");

        let metadata = ExportMetadata::new(generator, point_count, &self.timestamp);
        if self.config.write_metadata {
            let sidecar = sidecar_path(&path);
            let json = serde_json::to_vec_pretty(&metadata).map_err(|e| ExportError::Write {
                path: sidecar.clone(),
                source: e.into(),
            })?;
            write_file(&sidecar, &json)?;
            debug!(path = %sidecar.display(), "wrote metadata sidecar");
        }

        Ok(ExportedFigure {
            path,
            format,
            dimensions,
            metadata,
        })
    }
}

fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".json");
    PathBuf::from(name)
}

/// Open a file that must not exist yet
fn create_new(path: &Path) -> ExportResult<File> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|source| match source.kind() {
            io::ErrorKind::AlreadyExists => ExportError::AlreadyExists {
                path: path.to_path_buf(),
            },
            _ => write_error(path, source),
        })
}

fn write_file(path: &Path, bytes: &[u8]) -> ExportResult<()> {
    create_new(path)?
        .write_all(bytes)
        .map_err(|source| write_error(path, source))
}

fn write_error(path: &Path, source: io::Error) -> ExportError {
    ExportError::Write {
        path: path.to_path_buf(),
        source,
    }
}
