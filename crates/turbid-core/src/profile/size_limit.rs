use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;

/// Upper bound (and mean) of the eddy size distribution
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SizeLimit {
    /// Same characteristic length everywhere
    Constant { length: f64 },

    /// Local height `base + slope * r`
    Height { base: f64, slope: f64 },
}

impl SizeLimit {
    pub const DEFAULT_LENGTH: f64 = 1.0;
    pub const DEFAULT_HEIGHT_BASE: f64 = 2.0;
    pub const DEFAULT_HEIGHT_SLOPE: f64 = 0.1;

    pub fn constant(length: f64) -> Self {
        SizeLimit::Constant { length }
    }

    pub fn height(base: f64, slope: f64) -> Self {
        SizeLimit::Height { base, slope }
    }

    /// `2 + 0.1 r`
    pub fn default_height() -> Self {
        Self::height(Self::DEFAULT_HEIGHT_BASE, Self::DEFAULT_HEIGHT_SLOPE)
    }

    /// Size limit at position `r`
    pub fn at(&self, r: f64) -> f64 {
        match *self {
            SizeLimit::Constant { length } => length,
            SizeLimit::Height { base, slope } => base + slope * r,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SizeLimit::Constant { .. } => "constant",
            SizeLimit::Height { .. } => "height",
        }
    }

    /// Smallest limit over `[r_min, r_max]`
    pub fn min_over(&self, r_min: f64, r_max: f64) -> f64 {
        self.at(r_min).min(self.at(r_max))
    }
}

impl Default for SizeLimit {
    fn default() -> Self {
        Self::default_height()
    }
}

impl fmt::Display for SizeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SizeLimit::Constant { length } => write!(f, "constant({length})"),
            SizeLimit::Height { base, slope } => write!(f, "height({base} + {slope} r)"),
        }
    }
}

impl FromStr for SizeLimit {
    type Err = ProfileError;

    /// Parses a variant name into its default parameters
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "constant" => Ok(Self::constant(Self::DEFAULT_LENGTH)),
            "height" => Ok(Self::default_height()),
            _ => Err(ProfileError::UnknownSizeLimit(s.to_string())),
        }
    }
}
