//! Perlin noise textures sampled on a regular grid.
//!
//! A [`PerlinTexture`] describes a `beta` x `alpha` (rows x columns) grid of
//! fractal Perlin samples. Lattice cells are square in pixels either way:
//!
//! - untiled, the grid spans `frequency` cells along the geometric mean of its
//!   sides, so the default 3.0 covers nine base-octave cells in total;
//! - tiled, it spans the reduced ratio `alpha : beta` times a repeat factor,
//!   and the gradient lattice wraps at exactly that extent, so the texture
//!   repeats seamlessly at its edges.
//!
//! # Parallel Processing
//!
//! When the `parallel` feature is enabled, rows are sampled with rayon.

mod perlin;

pub use perlin::{PerlinField, Period, MAX_PERIOD};

use ndarray::Array2;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TextureError, TextureResult};

/// Horizontal axis label used by texture plots
pub const TEXTURE_X_LABEL: &str = "beta";

/// Vertical axis label used by texture plots
pub const TEXTURE_Y_LABEL: &str = "alpha";

/// Configuration for a Perlin texture
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerlinTexture {
    /// Columns
    pub alpha: usize,

    /// Rows
    pub beta: usize,

    pub octaves: usize,

    /// Amplitude falloff per octave
    pub persistence: f64,

    pub seed: u64,

    /// Base-octave lattice cells along the geometric mean side of an untiled texture
    pub frequency: f64,

    /// Repeat factor; `Some` enables seamless tiling
    pub tile: Option<u32>,
}

impl Default for PerlinTexture {
    fn default() -> Self {
        Self {
            alpha: 120,
            beta: 70,
            octaves: 3,
            persistence: 0.5,
            seed: 1,
            frequency: 3.0,
            tile: None,
        }
    }
}

impl PerlinTexture {
    pub fn new(alpha: usize, beta: usize) -> Self {
        Self {
            alpha,
            beta,
            ..Default::default()
        }
    }

    /// Seamlessly tileable texture repeating `inverse_size` times per reduced ratio unit
    pub fn tiled(alpha: usize, beta: usize, inverse_size: u32) -> Self {
        Self {
            alpha,
            beta,
            tile: Some(inverse_size),
            ..Default::default()
        }
    }

    pub fn with_octaves(mut self, octaves: usize) -> Self {
        self.octaves = octaves;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn validate(&self) -> TextureResult<()> {
        if self.alpha == 0 || self.beta == 0 {
            return Err(TextureError::InvalidDimensions {
                alpha: self.alpha,
                beta: self.beta,
            });
        }
        if self.octaves == 0 || self.octaves > 16 {
            return Err(TextureError::InvalidParameter {
                name: "octaves",
                reason: format!("{} is outside 1..=16", self.octaves),
            });
        }
        if !(0.0..=1.0).contains(&self.persistence) {
            return Err(TextureError::InvalidParameter {
                name: "persistence",
                reason: format!("{} is outside [0, 1]", self.persistence),
            });
        }
        if !(self.frequency > 0.0) || !self.frequency.is_finite() {
            return Err(TextureError::InvalidParameter {
                name: "frequency",
                reason: format!("{} is not positive", self.frequency),
            });
        }
        if self.tile == Some(0) {
            return Err(TextureError::InvalidParameter {
                name: "tile",
                reason: "repeat factor must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Lattice extent of the texture when tiling: reduced `alpha : beta` times the repeat factor.
    ///
    /// Fails when the finest octave's period, `2^(octaves - 1)` times this,
    /// exceeds [`MAX_PERIOD`].
    pub fn tile_period(&self) -> TextureResult<Option<Period>> {
        let Some(inverse_size) = self.tile else {
            return Ok(None);
        };
        let (p, q) = reduced_ratio(self.alpha, self.beta);
        let scale = |n: usize| {
            u32::try_from(n)
                .ok()
                .and_then(|n| n.checked_mul(inverse_size))
                .ok_or_else(|| TextureError::InvalidParameter {
                    name: "tile",
                    reason: format!("period {n} x {inverse_size} overflows"),
                })
        };
        let period = Period::new(scale(p)?, scale(q)?);

        let finest = 1u64 << self.octaves.saturating_sub(1).min(32);
        let longest = u64::from(period.x.max(period.y)) * finest;
        if longest > u64::from(MAX_PERIOD) {
            return Err(TextureError::InvalidParameter {
                name: "tile",
                reason: format!(
                    "period {}x{} over {} octaves needs {longest} lattice cells, more than {MAX_PERIOD}",
                    period.x, period.y, self.octaves
                ),
            });
        }
        Ok(Some(period))
    }

    /// Base-octave lattice cells spanned by the whole grid along (x, y)
    pub fn lattice_extent(&self) -> TextureResult<(f64, f64)> {
        if let Some(period) = self.tile_period()? {
            return Ok((f64::from(period.x), f64::from(period.y)));
        }
        let (alpha, beta) = (self.alpha as f64, self.beta as f64);
        let side = (alpha * beta).sqrt();
        Ok((self.frequency * alpha / side, self.frequency * beta / side))
    }

    /// The noise field this texture samples
    pub fn field(&self) -> PerlinField {
        PerlinField::new(self.seed, self.octaves, self.persistence)
    }

    /// Sample the grid
    pub fn generate(&self) -> TextureResult<NoiseGrid> {
        self.validate()?;

        let field = self.field();
        let period = self.tile_period()?;
        let (scale_x, scale_y) = self.lattice_extent()?;
        let (alpha, beta) = (self.alpha, self.beta);

        let sample = &|row: usize, col: usize| {
            let x = scale_x * col as f64 / alpha as f64;
            let y = scale_y * row as f64 / beta as f64;
            match period {
                Some(p) => field.noise_tiled(x, y, p),
                None => field.noise(x, y),
            }
        };

        #[cfg(feature = "parallel")]
        let data: Vec<f64> = (0..beta)
            .into_par_iter()
            .flat_map_iter(|row| (0..alpha).map(move |col| sample(row, col)))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let data: Vec<f64> = (0..beta)
            .flat_map(|row| (0..alpha).map(move |col| sample(row, col)))
            .collect();

        let values = Array2::from_shape_vec((beta, alpha), data)
            .map_err(|_| TextureError::InvalidDimensions { alpha, beta })?;

        debug!(alpha, beta, octaves = self.octaves, tiled = period.is_some(), "sampled perlin texture");

        Ok(NoiseGrid { values, period })
    }
}

/// Sampled noise, `beta` rows by `alpha` columns
#[derive(Clone, Debug)]
pub struct NoiseGrid {
    pub values: Array2<f64>,

    /// Lattice period when the grid was sampled tileably
    pub period: Option<Period>,
}

impl NoiseGrid {
    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn cols(&self) -> usize {
        self.values.ncols()
    }

    pub fn is_tiled(&self) -> bool {
        self.period.is_some()
    }
}

/// `a : b` in lowest terms
pub fn reduced_ratio(a: usize, b: usize) -> (usize, usize) {
    let g = gcd(a, b);
    if g == 0 {
        (a, b)
    } else {
        (a / g, b / g)
    }
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
