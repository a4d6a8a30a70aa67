//! Seeded 2D gradient noise with optional lattice wrapping.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Largest lattice period the gradient hash supports without repeating inside it
pub const MAX_PERIOD: u32 = 1 << 16;

/// Lattice period along each axis, in lattice cells of the first octave
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Period {
    pub x: u32,
    pub y: u32,
}

impl Period {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    fn scaled(&self, factor: u32) -> (i64, i64) {
        (
            i64::from(self.x) * i64::from(factor),
            i64::from(self.y) * i64::from(factor),
        )
    }
}

/// Fractal Perlin noise field.
///
/// Octave `k` runs at frequency `2^k` with amplitude `persistence^k`; the sum
/// is normalised by the total amplitude.
#[derive(Clone, Debug)]
pub struct PerlinField {
    perm: [usize; 512],
    octaves: usize,
    persistence: f64,
}

impl PerlinField {
    pub fn new(seed: u64, octaves: usize, persistence: f64) -> Self {
        Self {
            perm: generate_permutation(seed),
            octaves,
            persistence,
        }
    }

    pub fn octaves(&self) -> usize {
        self.octaves
    }

    /// Noise at `(x, y)` in lattice coordinates
    pub fn noise(&self, x: f64, y: f64) -> f64 {
        self.fbm(x, y, None)
    }

    /// Noise whose lattice wraps every `period` cells
    pub fn noise_tiled(&self, x: f64, y: f64, period: Period) -> f64 {
        self.fbm(x, y, Some(period))
    }

    fn fbm(&self, x: f64, y: f64, period: Option<Period>) -> f64 {
        let mut amplitude = 1.0;
        let mut frequency: u32 = 1;
        let mut value = 0.0;
        let mut max_amplitude = 0.0;

        for _ in 0..self.octaves {
            let f = f64::from(frequency);
            let wrap = period.map(|p| p.scaled(frequency));
            value += amplitude * perlin_2d(x * f, y * f, &self.perm, wrap);
            max_amplitude += amplitude;
            amplitude *= self.persistence;
            frequency = frequency.saturating_mul(2);
        }

        if max_amplitude > 0.0 {
            value / max_amplitude
        } else {
            0.0
        }
    }
}

/// Shuffled 0..256, duplicated for wrapping
fn generate_permutation(seed: u64) -> [usize; 512] {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut base: Vec<usize> = (0..256).collect();
    base.shuffle(&mut rng);

    let mut perm = [0usize; 512];
    for (i, &p) in base.iter().enumerate() {
        perm[i] = p;
        perm[256 + i] = p;
    }
    perm
}

/// Single-octave Perlin noise at a point
fn perlin_2d(x: f64, y: f64, perm: &[usize; 512], wrap: Option<(i64, i64)>) -> f64 {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    let sx = x - x0 as f64;
    let sy = y - y0 as f64;

    let u = fade(sx);
    let v = fade(sy);

    let n00 = grad(hash(perm, x0, y0, wrap), sx, sy);
    let n10 = grad(hash(perm, x1, y0, wrap), sx - 1.0, sy);
    let n01 = grad(hash(perm, x0, y1, wrap), sx, sy - 1.0);
    let n11 = grad(hash(perm, x1, y1, wrap), sx - 1.0, sy - 1.0);

    let nx0 = lerp(n00, n10, u);
    let nx1 = lerp(n01, n11, u);

    lerp(nx0, nx1, v)
}

fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Gradient index of a lattice point. Both bytes of each coordinate feed the
/// hash, so it repeats every [`MAX_PERIOD`] cells rather than every 256.
fn hash(perm: &[usize; 512], x: i64, y: i64, wrap: Option<(i64, i64)>) -> usize {
    let (x, y) = match wrap {
        Some((px, py)) => (x.rem_euclid(px), y.rem_euclid(py)),
        None => (x, y),
    };
    let low = |v: i64| (v & 0xff) as usize;
    let high = |v: i64| ((v >> 8) & 0xff) as usize;
    let h = perm[perm[low(x)] + high(x)];
    let h = perm[h + low(y)];
    perm[h + high(y)]
}

fn grad(hash: usize, x: f64, y: f64) -> f64 {
    let h = hash & 7;
    let u = if h < 4 { x } else { y };
    let v = if h < 4 { y } else { x };
    (if (h & 1) != 0 { -u } else { u }) + (if (h & 2) != 0 { -2.0 * v } else { 2.0 * v })
}
