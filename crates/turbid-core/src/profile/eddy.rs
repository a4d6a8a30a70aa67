use std::f64::consts::PI;

use ndarray::{s, Array1};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use super::{profile_rng, radial_samples, AmplitudeModel, EddySegment, RadialProfile, SizeLimit};
use crate::error::{validation, ProfileError, ProfileResult};

/// Rejection-sampling retries allowed per segment before giving up
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Configuration for a randomly sized eddy profile
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EddyConfig {
    pub r_min: f64,
    pub r_max: f64,

    /// Number of radial samples
    pub res: usize,

    /// Mean and upper bound of segment sizes
    pub size_limit: SizeLimit,

    /// Standard deviation of segment sizes
    pub size_sd: f64,

    pub model: AmplitudeModel,

    pub max_attempts: usize,

    /// RNG seed; drawn from the OS when absent
    pub seed: Option<u64>,
}

impl Default for EddyConfig {
    fn default() -> Self {
        Self {
            r_min: 0.0,
            r_max: 100.0,
            res: 1000,
            size_limit: SizeLimit::default_height(),
            size_sd: 0.1,
            model: AmplitudeModel::Kolmogorov,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            seed: None,
        }
    }
}

impl EddyConfig {
    /// Eddies bounded by a constant characteristic length
    pub fn constant_cells(r_min: f64, r_max: f64, length: f64) -> Self {
        Self {
            r_min,
            r_max,
            size_limit: SizeLimit::constant(length),
            ..Default::default()
        }
    }

    /// Eddies bounded by the local height `2 + 0.1 r`
    pub fn height_cells(r_min: f64, r_max: f64) -> Self {
        Self {
            r_min,
            r_max,
            size_limit: SizeLimit::default_height(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: AmplitudeModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_size_sd(mut self, sd: f64) -> Self {
        self.size_sd = sd;
        self
    }

    pub fn with_resolution(mut self, res: usize) -> Self {
        self.res = res;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Check everything that can be checked before sampling
    pub fn validate(&self) -> ProfileResult<()> {
        validation::validate_domain(self.r_min, self.r_max, self.res)?;
        validation::validate_spread("eddy size", self.size_sd)?;
        self.model.validate()?;

        // The limit is linear in r, so its extremes are at the bounds.
        for r in [self.r_min, self.r_max] {
            let limit = self.size_limit.at(r);
            if !(limit > 0.0) {
                return Err(ProfileError::NonPositiveSizeLimit { r, limit });
            }
        }
        Ok(())
    }

    /// Build the profile with an RNG seeded from `self.seed`
    pub fn generate(&self) -> ProfileResult<RadialProfile> {
        let mut rng = profile_rng(self.seed);
        self.generate_with_rng(&mut rng)
    }

    /// Build the profile drawing from `rng`
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> ProfileResult<RadialProfile> {
        self.validate()?;

        let radius = radial_samples(self.r_min, self.r_max, self.res);
        let mut velocity = Array1::<f64>::ones(self.res);
        let mut segments = Vec::new();
        let last = self.res - 1;
        let step = (self.r_max - self.r_min) / last as f64;

        let mut sign: i8 = -1;
        let mut start = 0;
        let mut end = self.next_end(&radius, start, step, rng)?;

        while end < last {
            segments.push(self.place(&radius, &mut velocity, start, end, sign, rng)?);
            sign = -sign;
            start = end;
            end = self.next_end(&radius, start, step, rng)?;
        }

        // Final segment is clipped to r_max.
        segments.push(self.place(&radius, &mut velocity, start, last, sign, rng)?);

        debug!(
            segments = segments.len(),
            model = self.model.name(),
            limit = %self.size_limit,
            "built eddy profile"
        );

        Ok(RadialProfile {
            radius,
            velocity,
            segments,
        })
    }

    /// Sample a segment size and map it onto the nearest later sample index
    fn next_end<R: Rng + ?Sized>(
        &self,
        radius: &Array1<f64>,
        start: usize,
        step: f64,
        rng: &mut R,
    ) -> ProfileResult<usize> {
        let r = radius[start];
        let size = self.sample_size(r, rng)?;
        let target = r + size;
        let nearest = ((target - self.r_min) / step).round();
        let nearest = nearest.clamp(0.0, (self.res - 1) as f64) as usize;
        Ok(nearest.max(start + 1))
    }

    /// Draw from `Normal(limit, sd)` until the draw lies in `(0, limit]`
    fn sample_size<R: Rng + ?Sized>(&self, r: f64, rng: &mut R) -> ProfileResult<f64> {
        let limit = self.size_limit.at(r);
        if !(limit > 0.0) {
            return Err(ProfileError::NonPositiveSizeLimit { r, limit });
        }
        let normal = Normal::new(limit, self.size_sd).map_err(|_| ProfileError::InvalidSpread {
            what: "eddy size",
            value: self.size_sd,
        })?;

        for attempt in 1..=self.max_attempts {
            let size = normal.sample(rng);
            if size > 0.0 && size <= limit {
                if attempt > self.max_attempts / 2 {
                    warn!(attempt, r, limit, "eddy size accepted close to the retry bound");
                }
                return Ok(size);
            }
        }

        Err(ProfileError::SamplingExhausted {
            r,
            limit,
            sd: self.size_sd,
            attempts: self.max_attempts,
        })
    }

    /// Write one signed half-sine over `start..=end`
    fn place<R: Rng + ?Sized>(
        &self,
        radius: &Array1<f64>,
        velocity: &mut Array1<f64>,
        start: usize,
        end: usize,
        sign: i8,
        rng: &mut R,
    ) -> ProfileResult<EddySegment> {
        let mut segment = EddySegment {
            start,
            end,
            sign,
            amplitude: 0.0,
        };
        segment.amplitude = self.model.sample(radius[segment.midpoint()], rng)?;

        let scale = f64::from(sign) * segment.amplitude;
        let n = segment.len();
        for (k, v) in velocity.slice_mut(s![start..=end]).iter_mut().enumerate() {
            *v = scale * (PI * k as f64 / (n - 1) as f64).sin();
        }

        trace!(start, end, sign, amplitude = segment.amplitude, "placed eddy");
        Ok(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_covering(profile: &RadialProfile, res: usize) {
        assert_eq!(profile.len(), res);
        assert_eq!(profile.velocity.len(), res);
        let first = profile.segments.first().expect("at least one segment");
        assert_eq!(first.start, 0);
        assert_eq!(first.sign, -1);
        assert_eq!(profile.last_segment().map(|s| s.end), Some(res - 1));
        for pair in profile.segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert!(pair[0].end > pair[0].start);
        }
        assert!(profile.signs_alternate());
    }

    #[test]
    fn test_height_cells_cover_domain() {
        let config = EddyConfig::height_cells(0.0, 100.0).with_seed(1);
        let profile = config.generate().unwrap();

        assert_covering(&profile, 1000);
        assert_eq!(profile.r_min(), Some(0.0));
        assert_eq!(profile.r_max(), Some(100.0));
        assert!(profile.segments.len() > 5);
    }

    #[test]
    fn test_constant_cells_cover_domain() {
        let config = EddyConfig::constant_cells(0.0, 100.0, 1.0).with_seed(3);
        let profile = config.generate().unwrap();

        assert_covering(&profile, 1000);
        // Sizes are at most 1.0, so at least 100 segments are needed.
        assert!(profile.segments.len() >= 100);
    }

    #[test]
    fn test_kolmogorov_segments_follow_midpoint() {
        let config = EddyConfig::constant_cells(10.0, 50.0, 2.0).with_seed(9);
        let profile = config.generate().unwrap();

        for seg in &profile.segments {
            let r_mid = profile.radius[seg.midpoint()];
            assert!((seg.amplitude - (100.0 + 0.5 * r_mid)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_segment_shape_is_half_sine() {
        let config = EddyConfig::constant_cells(0.0, 20.0, 2.0)
            .with_resolution(200)
            .with_seed(5);
        let profile = config.generate().unwrap();

        for seg in &profile.segments {
            let ends = [profile.velocity[seg.start], profile.velocity[seg.end]];
            for v in ends {
                assert!(v.abs() < 1e-9, "segment boundary should be zero, got {v}");
            }
            let peak = seg.start + (seg.len() - 1) / 2;
            let expected_sign = f64::from(seg.sign);
            if seg.len() > 2 {
                assert_eq!(profile.velocity[peak].signum(), expected_sign);
            }
        }
    }

    #[test]
    fn test_sound_model_profile() {
        let config = EddyConfig::height_cells(0.0, 100.0)
            .with_model(AmplitudeModel::sound())
            .with_seed(11);
        let profile = config.generate().unwrap();

        assert_covering(&profile, 1000);
        for seg in &profile.segments {
            let centre = 100.0 - 0.5 * profile.radius[seg.midpoint()];
            assert!((seg.amplitude - centre).abs() < 30.0);
        }
    }

    #[test]
    fn test_same_seed_same_profile() {
        let config = EddyConfig::default()
            .with_model(AmplitudeModel::sound())
            .with_seed(42);
        let a = config.generate().unwrap();
        let b = config.generate().unwrap();
        assert_eq!(a.velocity, b.velocity);
        assert_eq!(a.segments, b.segments);
    }

    #[test]
    fn test_invalid_domain() {
        let config = EddyConfig::constant_cells(10.0, 10.0, 1.0);
        assert!(matches!(
            config.generate(),
            Err(ProfileError::InvalidDomain { .. })
        ));
    }

    #[test]
    fn test_non_positive_limit_is_rejected() {
        let config = EddyConfig::constant_cells(0.0, 10.0, 0.0);
        assert!(matches!(
            config.generate(),
            Err(ProfileError::NonPositiveSizeLimit { .. })
        ));

        let mut config = EddyConfig::height_cells(0.0, 100.0);
        config.size_limit = SizeLimit::height(2.0, -0.1);
        assert!(matches!(
            config.generate(),
            Err(ProfileError::NonPositiveSizeLimit { .. })
        ));
    }

    #[test]
    fn test_pathological_spread_fails_instead_of_hanging() {
        // With sd = 1e6 nearly every draw falls outside (0, 1e-6].
        let config = EddyConfig::constant_cells(0.0, 10.0, 1e-6)
            .with_size_sd(1e6)
            .with_max_attempts(50)
            .with_seed(0);
        assert!(matches!(
            config.generate(),
            Err(ProfileError::SamplingExhausted { attempts: 50, .. })
        ));
    }

    #[test]
    fn test_negative_spread_is_rejected() {
        let config = EddyConfig::default().with_size_sd(-0.5);
        assert!(matches!(
            config.generate(),
            Err(ProfileError::InvalidSpread { .. })
        ));
    }

    #[test]
    fn test_zero_spread_uses_limit() {
        let config = EddyConfig::constant_cells(0.0, 10.0, 1.0)
            .with_size_sd(0.0)
            .with_resolution(101)
            .with_seed(0);
        let profile = config.generate().unwrap();

        // Step is 0.1, so every full segment spans exactly 10 steps.
        let (last, full) = profile.segments.split_last().unwrap();
        for seg in full {
            assert_eq!(seg.end - seg.start, 10);
        }
        assert_eq!(last.end, 100);
    }

    #[test]
    fn test_tiny_sizes_still_advance() {
        let config = EddyConfig::constant_cells(0.0, 1.0, 1e-4)
            .with_size_sd(0.0)
            .with_resolution(50)
            .with_seed(0);
        let profile = config.generate().unwrap();
        assert_eq!(profile.segments.len(), 49);
        assert_covering(&profile, 50);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_profile_covers_any_domain(
            r_min in -50.0f64..50.0,
            width in 1.0f64..200.0,
            res in 2usize..600,
            seed in any::<u64>(),
        ) {
            let mut config = EddyConfig::height_cells(r_min, r_min + width)
                .with_resolution(res);
            config.size_limit = SizeLimit::height(2.0, 0.0);
            let mut rng = StdRng::seed_from_u64(seed);
            let profile = config.generate_with_rng(&mut rng).unwrap();

            prop_assert_eq!(profile.len(), res);
            prop_assert_eq!(profile.radius[0], r_min);
            prop_assert_eq!(profile.radius[res - 1], r_min + width);
            prop_assert_eq!(profile.last_segment().map(|s| s.end), Some(res - 1));
            prop_assert!(profile.signs_alternate());
        }
    }
}
