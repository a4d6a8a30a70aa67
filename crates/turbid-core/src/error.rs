//! Error types for turbid-core
//!
//! Provides error handling for:
//! - Velocity profile generation
//! - Noise texture generation
//! - Plot construction
//! - Export and configuration loading

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for turbid operations
#[derive(Error, Debug)]
pub enum TurbidError {
    /// Profile generation errors
    #[error("Profile generation failed: {0}")]
    Profile(#[from] ProfileError),

    /// Texture generation errors
    #[error("Texture generation failed: {0}")]
    Texture(#[from] TextureError),

    /// Rendering errors
    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    /// Export errors
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generator settings could not be described
    #[error("Cannot describe settings: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building a radial velocity profile
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// Domain bounds or resolution cannot describe a radial array
    #[error("Invalid radial domain [{r_min}, {r_max}] with {res} samples")]
    InvalidDomain { r_min: f64, r_max: f64, res: usize },

    /// The size limit evaluated to zero or below
    #[error("Size limit {limit} at r = {r} is not positive")]
    NonPositiveSizeLimit { r: f64, limit: f64 },

    /// Standard deviation cannot parameterise a normal distribution
    #[error("Invalid spread for {what}: {value}")]
    InvalidSpread { what: &'static str, value: f64 },

    /// Rejection sampling ran out of attempts
    #[error("No eddy size within limit {limit} (sd {sd}) after {attempts} draws at r = {r}")]
    SamplingExhausted {
        r: f64,
        limit: f64,
        sd: f64,
        attempts: usize,
    },

    /// Amplitude model selector did not name a known model
    #[error("Unknown amplitude model '{0}' (expected 'sound' or 'kolmogorov')")]
    UnknownAmplitudeModel(String),

    /// Size-limit selector did not name a known variant
    #[error("Unknown size limit '{0}' (expected 'constant' or 'height')")]
    UnknownSizeLimit(String),
}

/// Errors raised while sampling a noise texture
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextureError {
    /// Grid dimensions must be positive
    #[error("Invalid texture dimensions: {alpha}x{beta}")]
    InvalidDimensions { alpha: usize, beta: usize },

    /// A sampling parameter is out of range
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Errors related to plot construction
#[derive(Error, Debug)]
pub enum RenderError {
    /// Series lengths disagree
    #[error("Series length mismatch: x has {x_len} values, y has {y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },

    /// Nothing to draw
    #[error("Cannot render an empty {what}")]
    Empty { what: &'static str },
}

/// Errors related to export
#[derive(Error, Debug)]
pub enum ExportError {
    /// Output directory does not exist or is not a directory
    #[error("Invalid output directory: {path}")]
    InvalidPath { path: PathBuf },

    /// Invalid dimensions
    #[error("Invalid dimensions: {width}x{height} (must be positive and within limits)")]
    InvalidDimensions { width: u32, height: u32 },

    /// Unrecognised format name
    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    /// Figure could not be built
    #[error("Cannot draw figure: {0}")]
    Render(#[from] RenderError),

    /// PNG encoding error
    #[error("PNG encoding failed: {0}")]
    PngEncoding(#[from] image::ImageError),

    /// Output file is already there
    #[error("Refusing to overwrite existing {path}")]
    AlreadyExists { path: PathBuf },

    /// Underlying write failure
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to loading run configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected schema
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Result type alias for turbid operations
pub type TurbidResult<T> = Result<T, TurbidError>;

/// Result type alias for profile operations
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Result type alias for texture operations
pub type TextureResult<T> = Result<T, TextureError>;

/// Result type alias for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Validation utilities
pub mod validation {
    use super::*;

    /// Validate export dimensions
    pub fn validate_dimensions(width: u32, height: u32) -> ExportResult<()> {
        const MAX_DIMENSION: u32 = 16384;
        const MIN_DIMENSION: u32 = 1;

        if width < MIN_DIMENSION
            || height < MIN_DIMENSION
            || width > MAX_DIMENSION
            || height > MAX_DIMENSION
        {
            return Err(ExportError::InvalidDimensions { width, height });
        }
        Ok(())
    }

    /// Validate a radial domain
    pub fn validate_domain(r_min: f64, r_max: f64, res: usize) -> ProfileResult<()> {
        if !r_min.is_finite() || !r_max.is_finite() || r_min >= r_max || res < 2 {
            return Err(ProfileError::InvalidDomain { r_min, r_max, res });
        }
        Ok(())
    }

    /// Validate a normal-distribution spread
    pub fn validate_spread(what: &'static str, value: f64) -> ProfileResult<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(ProfileError::InvalidSpread { what, value });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turbid_error_from_profile() {
        let err: TurbidError = ProfileError::UnknownAmplitudeModel("laminar".to_string()).into();
        assert!(err.to_string().contains("laminar"));
    }

    #[test]
    fn test_turbid_error_from_config_and_export() {
        let err: TurbidError = ExportError::AlreadyExists {
            path: PathBuf::from("eddy.svg"),
        }
        .into();
        assert!(matches!(err, TurbidError::Export(_)));
        assert!(err.to_string().contains("eddy.svg"));

        let source = toml::from_str::<toml::Table>("= 1").unwrap_err();
        let err: TurbidError = ConfigError::Parse {
            path: PathBuf::from("turbid.toml"),
            source,
        }
        .into();
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_sampling_exhausted_display() {
        let err = ProfileError::SamplingExhausted {
            r: 1.0,
            limit: 0.5,
            sd: 10.0,
            attempts: 100,
        };
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("0.5"));
    }

    #[test]
    fn test_export_error_display() {
        let err = ExportError::InvalidDimensions {
            width: 0,
            height: 100,
        };
        assert!(err.to_string().contains("0x100"));
    }

    #[test]
    fn test_validate_dimensions() {
        assert!(validation::validate_dimensions(1920, 1080).is_ok());
        assert!(validation::validate_dimensions(0, 100).is_err());
        assert!(validation::validate_dimensions(20000, 1000).is_err());
    }

    #[test]
    fn test_validate_domain() {
        assert!(validation::validate_domain(0.0, 100.0, 1000).is_ok());
        assert!(validation::validate_domain(5.0, 5.0, 10).is_err());
        assert!(validation::validate_domain(10.0, 0.0, 10).is_err());
        assert!(validation::validate_domain(0.0, 1.0, 1).is_err());
        assert!(validation::validate_domain(f64::NAN, 1.0, 10).is_err());
    }

    #[test]
    fn test_validate_spread() {
        assert!(validation::validate_spread("size", 0.0).is_ok());
        assert!(validation::validate_spread("size", -0.1).is_err());
        assert!(validation::validate_spread("size", f64::INFINITY).is_err());
    }
}
