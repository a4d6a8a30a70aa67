use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{validation, ProfileError, ProfileResult};

/// How eddy amplitude scales with distance from the centre
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum AmplitudeModel {
    /// Gaussian around `100 - 0.5 r`
    Sound { spread: f64 },

    /// Deterministic `100 + 0.5 r`
    Kolmogorov,
}

impl AmplitudeModel {
    /// Spread used by the sound model when none is given
    pub const DEFAULT_SOUND_SPREAD: f64 = 3.0;

    pub fn sound() -> Self {
        AmplitudeModel::Sound {
            spread: Self::DEFAULT_SOUND_SPREAD,
        }
    }

    /// Selector name accepted by [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            AmplitudeModel::Sound { .. } => "sound",
            AmplitudeModel::Kolmogorov => "kolmogorov",
        }
    }

    /// Expected amplitude at `r`
    pub fn centre(&self, r: f64) -> f64 {
        match self {
            AmplitudeModel::Sound { .. } => 100.0 - 0.5 * r,
            AmplitudeModel::Kolmogorov => kolmogorov_speed(r),
        }
    }

    /// Draw an amplitude at `r`
    pub fn sample<R: Rng + ?Sized>(&self, r: f64, rng: &mut R) -> ProfileResult<f64> {
        match *self {
            AmplitudeModel::Sound { spread } => sound_speed(r, spread, rng),
            AmplitudeModel::Kolmogorov => Ok(kolmogorov_speed(r)),
        }
    }

    pub fn validate(&self) -> ProfileResult<()> {
        match *self {
            AmplitudeModel::Sound { spread } => validation::validate_spread("amplitude", spread),
            AmplitudeModel::Kolmogorov => Ok(()),
        }
    }
}

impl Default for AmplitudeModel {
    fn default() -> Self {
        AmplitudeModel::Kolmogorov
    }
}

impl fmt::Display for AmplitudeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AmplitudeModel {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sound" => Ok(AmplitudeModel::sound()),
            "kolmogorov" => Ok(AmplitudeModel::Kolmogorov),
            _ => Err(ProfileError::UnknownAmplitudeModel(s.to_string())),
        }
    }
}

/// Sound-speed amplitude: one normal draw centred at `100 - 0.5 r`
pub fn sound_speed<R: Rng + ?Sized>(r: f64, spread: f64, rng: &mut R) -> ProfileResult<f64> {
    validation::validate_spread("amplitude", spread)?;
    let normal = Normal::new(100.0 - 0.5 * r, spread).map_err(|_| ProfileError::InvalidSpread {
        what: "amplitude",
        value: spread,
    })?;
    Ok(normal.sample(rng))
}

/// Kolmogorov-scaled amplitude
pub fn kolmogorov_speed(r: f64) -> f64 {
    100.0 + 0.5 * r
}
