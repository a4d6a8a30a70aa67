//! Radial velocity profiles built from procedural turbulent cells.
//!
//! Two builders share the [`RadialProfile`] output:
//!
//! - [`EddyConfig`]: stitches half-sine eddy segments of randomly sampled width
//!   and alternating sign across the domain. The size limit of each segment is
//!   either constant or follows a height function of the current position.
//! - [`UniformCellsConfig`]: a single sinusoid of fixed cell length modulated
//!   by the sound-speed amplitude model.
//!
//! Amplitudes come from an [`AmplitudeModel`].

mod amplitude;
mod eddy;
mod size_limit;
mod uniform;

pub use amplitude::{kolmogorov_speed, sound_speed, AmplitudeModel};
pub use eddy::{EddyConfig, DEFAULT_MAX_ATTEMPTS};
pub use size_limit::SizeLimit;
pub use uniform::UniformCellsConfig;

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Axis label used for the radial coordinate in profile plots
pub const RADIUS_LABEL: &str = "Distance from centre of black hole";

/// Axis label used for the velocity in profile plots
pub const VELOCITY_LABEL: &str = "Speed";

/// One half-sine eddy written into the velocity array.
///
/// `start` and `end` are inclusive sample indices. Adjacent segments share
/// their boundary sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EddySegment {
    pub start: usize,
    pub end: usize,
    /// +1 or -1
    pub sign: i8,
    /// Amplitude evaluated at the segment midpoint (before the sign)
    pub amplitude: f64,
}

impl EddySegment {
    /// Number of samples covered, including both endpoints
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    /// Midpoint index used to evaluate the amplitude
    pub fn midpoint(&self) -> usize {
        (self.start + self.end) / 2
    }
}

/// A velocity profile sampled over a radial domain
#[derive(Clone, Debug)]
pub struct RadialProfile {
    /// Evenly spaced sample positions, `radius[0] == r_min`, last == `r_max`
    pub radius: Array1<f64>,

    /// Velocity at each sample position
    pub velocity: Array1<f64>,

    /// Eddy segments in placement order (empty for uniform-cell profiles)
    pub segments: Vec<EddySegment>,
}

impl RadialProfile {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.radius.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radius.is_empty()
    }

    pub fn r_min(&self) -> Option<f64> {
        self.radius.first().copied()
    }

    pub fn r_max(&self) -> Option<f64> {
        self.radius.last().copied()
    }

    /// The segment that was clipped to end at `r_max`
    pub fn last_segment(&self) -> Option<&EddySegment> {
        self.segments.last()
    }

    /// Whether segment signs strictly alternate
    pub fn signs_alternate(&self) -> bool {
        self.segments
            .windows(2)
            .all(|pair| pair[0].sign == -pair[1].sign)
    }

    /// Segment index for each sample, `-1` where no segment applies.
    /// Boundary samples belong to the later segment.
    pub fn segment_ids(&self) -> Vec<f64> {
        let mut ids = vec![-1.0; self.len()];
        for (k, segment) in self.segments.iter().enumerate() {
            for id in &mut ids[segment.start..=segment.end] {
                *id = k as f64;
            }
        }
        ids
    }
}

/// Evenly spaced samples over `[r_min, r_max]`; the last sample is exactly `r_max`.
pub(crate) fn radial_samples(r_min: f64, r_max: f64, res: usize) -> Array1<f64> {
    let step = (r_max - r_min) / (res - 1) as f64;
    Array1::from_shape_fn(res, |i| {
        if i + 1 == res {
            r_max
        } else {
            r_min + step * i as f64
        }
    })
}

/// Seeded RNG, or one seeded from the OS when no seed is given
pub(crate) fn profile_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radial_samples_endpoints() {
        let r = radial_samples(0.0, 100.0, 1000);
        assert_eq!(r.len(), 1000);
        assert_eq!(r[0], 0.0);
        assert_eq!(r[999], 100.0);
        assert!((r[1] - 100.0 / 999.0).abs() < 1e-12);
    }

    #[test]
    fn test_segment_helpers() {
        let seg = EddySegment {
            start: 10,
            end: 15,
            sign: -1,
            amplitude: 100.0,
        };
        assert_eq!(seg.len(), 6);
        assert_eq!(seg.midpoint(), 12);
        assert!(!seg.is_empty());
    }

    #[test]
    fn test_signs_alternate() {
        let seg = |start, end, sign| EddySegment {
            start,
            end,
            sign,
            amplitude: 1.0,
        };
        let mut profile = RadialProfile {
            radius: radial_samples(0.0, 1.0, 7),
            velocity: Array1::ones(7),
            segments: vec![seg(0, 2, -1), seg(2, 4, 1), seg(4, 6, -1)],
        };
        assert!(profile.signs_alternate());
        assert_eq!(profile.segment_ids(), vec![0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 2.0]);

        profile.segments[2].sign = 1;
        assert!(!profile.signs_alternate());
    }
}
