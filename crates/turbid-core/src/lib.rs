//! turbid-core - Synthetic turbulence profiles and noise textures
//!
//! This crate generates the two kinds of synthetic data turbid produces and
//! turns them into figures.
//!
//! # Key Components
//!
//! - **Profile**: Radial velocity profiles built from eddies of alternating sign,
//!   with `sound` or `kolmogorov` amplitudes and constant or height-based sizes
//! - **Texture**: Fractal Perlin noise grids, optionally seamlessly tileable
//! - **Plot / Export**: SVG, PNG and CSV output with timestamped file names
//! - **Config**: TOML run configuration, one section per generator
//! - **Catalog**: The generators and the settings they would run with
//!
//! # Example
//!
//! ```ignore
//! let profile = EddyConfig::height_cells(0.0, 100.0)
//!     .with_model(AmplitudeModel::sound())
//!     .generate()?;
//!
//! let texture = PerlinTexture::tiled(240, 140, 2).generate()?;
//! ```

pub mod axis;
pub mod catalog;
pub mod colormap;
pub mod config;
pub mod error;
pub mod export;
pub mod plot;
pub mod profile;
pub mod texture;

pub use catalog::{GeneratorKind, GeneratorSummary, OutputKind};
pub use colormap::{Color, Colormap, ValueScale};
pub use config::TurbidConfig;
pub use error::*;
pub use export::{ExportConfig, ExportFormat, ExportedFigure, Exporter};
pub use plot::{Figure, ImagePlot, LinePlot};
pub use profile::{
    AmplitudeModel, EddyConfig, EddySegment, RadialProfile, SizeLimit, UniformCellsConfig,
};
pub use texture::{NoiseGrid, PerlinField, PerlinTexture, Period};
