//! Colours and colour ramps for figures
//!
//! Noise grids are drawn through [`gray`], low values dark. [`ValueScale`]
//! maps a data range onto ramp positions.

/// An opaque RGB color, channels in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    /// Plot line color (matplotlib's first cycle color)
    pub const LINE_BLUE: Color = Color::rgb(0.122, 0.467, 0.706);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgb8(&self) -> [u8; 3] {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b)]
    }

    /// `#RRGGBB`
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02X}{g:02X}{b:02X}")
    }

    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Color::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(0.5, 0.5, 0.5)
    }
}

/// Piecewise-linear ramp through evenly spaced colors
#[derive(Clone, Debug, PartialEq)]
pub struct Colormap {
    name: &'static str,
    stops: Vec<Color>,
}

impl Colormap {
    pub fn new(name: &'static str, stops: Vec<Color>) -> Self {
        Self { name, stops }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Color at position `t`, clamped to [0, 1]
    pub fn sample(&self, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        match self.stops.as_slice() {
            [] => Color::default(),
            [only] => *only,
            stops => {
                let pos = t * (stops.len() - 1) as f32;
                let i = (pos.floor() as usize).min(stops.len() - 2);
                stops[i].lerp(stops[i + 1], pos - i as f32)
            }
        }
    }
}

/// Black to white
pub fn gray() -> Colormap {
    Colormap::new("gray", vec![Color::BLACK, Color::WHITE])
}

/// Linear map from `[min, max]` onto ramp positions
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
}

impl ValueScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Position of `value` in [0, 1]; a degenerate or non-finite range maps to 0.5
    pub fn normalize(&self, value: f64) -> f32 {
        if self.max > self.min {
            (((value - self.min) / (self.max - self.min)) as f32).clamp(0.0, 1.0)
        } else {
            0.5
        }
    }
}
