use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{profile_rng, radial_samples, sound_speed, RadialProfile};
use crate::error::{validation, ProfileError, ProfileResult};

/// Equal-sized turbulent cells: `sound_speed(r) * sin(2 pi r / lc)`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniformCellsConfig {
    pub r_min: f64,
    pub r_max: f64,

    /// Cell wavelength
    pub eddy_length: f64,

    pub res: usize,

    /// Spread of the per-sample sound-speed draw
    pub amplitude_sd: f64,

    pub seed: Option<u64>,
}

impl Default for UniformCellsConfig {
    fn default() -> Self {
        Self {
            r_min: 0.0,
            r_max: 100.0,
            eddy_length: 1.0,
            res: 1000,
            amplitude_sd: 3.0,
            seed: None,
        }
    }
}

impl UniformCellsConfig {
    pub fn new(r_min: f64, r_max: f64, eddy_length: f64) -> Self {
        Self {
            r_min,
            r_max,
            eddy_length,
            ..Default::default()
        }
    }

    pub fn with_resolution(mut self, res: usize) -> Self {
        self.res = res;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> ProfileResult<()> {
        validation::validate_domain(self.r_min, self.r_max, self.res)?;
        validation::validate_spread("amplitude", self.amplitude_sd)?;
        if !(self.eddy_length > 0.0) || !self.eddy_length.is_finite() {
            return Err(ProfileError::NonPositiveSizeLimit {
                r: self.r_min,
                limit: self.eddy_length,
            });
        }
        Ok(())
    }

    pub fn generate(&self) -> ProfileResult<RadialProfile> {
        let mut rng = profile_rng(self.seed);
        self.generate_with_rng(&mut rng)
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> ProfileResult<RadialProfile> {
        self.validate()?;

        let radius = radial_samples(self.r_min, self.r_max, self.res);
        let mut velocity = radius.clone();
        for v in velocity.iter_mut() {
            let r = *v;
            *v = sound_speed(r, self.amplitude_sd, rng)? * (r * 2.0 * PI / self.eddy_length).sin();
        }

        debug!(cells = (self.r_max - self.r_min) / self.eddy_length, "built uniform cell profile");

        Ok(RadialProfile {
            radius,
            velocity,
            segments: Vec::new(),
        })
    }
}
