//! Plot axes
//!
//! An [`Axis`] is a data range with an optional label; [`Axis::ticks`] places
//! major ticks at 1/2/5 x 10^n spacing. A [`PlotLayout`] positions two axes in
//! a figure and maps data coordinates to pixels.

/// Fraction of the data range added on each side by [`Axis::fit`]
pub const AUTO_MARGIN: f64 = 0.05;

/// Tick mark length in pixels
pub const TICK_LENGTH: f32 = 5.0;

/// Margins around the plot area in pixels: left, bottom, right, top
const MARGIN: [f32; 4] = [70.0, 55.0, 20.0, 20.0];

#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub label: Option<String>,
}

impl Axis {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            label: None,
        }
    }

    /// Range covering `[data_min, data_max]` with [`AUTO_MARGIN`] on both sides.
    ///
    /// A degenerate range is widened to one unit around its value.
    pub fn fit(data_min: f64, data_max: f64) -> Self {
        if data_max > data_min {
            let pad = (data_max - data_min) * AUTO_MARGIN;
            Self::new(data_min - pad, data_max + pad)
        } else {
            Self::new(data_min - 0.5, data_min + 0.5)
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Major ticks inside the range; none for an empty or non-finite range
    pub fn ticks(&self) -> Vec<Tick> {
        let span = self.span();
        if !(span > 0.0) || !span.is_finite() {
            return vec![];
        }

        let step = nice_step(span / 5.0);
        let first = (self.min / step).ceil() as i64;
        let last = (self.max / step + 1e-3).floor() as i64;

        (first..=last)
            .map(|k| {
                // k == 0 keeps the zero tick free of round-off residue
                let value = if k == 0 { 0.0 } else { k as f64 * step };
                Tick {
                    value,
                    fraction: ((value - self.min) / span).clamp(0.0, 1.0),
                    label: format_number(value),
                }
            })
            .collect()
    }
}

/// A major tick
#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub value: f64,

    /// Position along the axis, 0 at `min` and 1 at `max`
    pub fraction: f64,

    pub label: String,
}

fn nice_step(rough: f64) -> f64 {
    let magnitude = 10.0_f64.powf(rough.abs().log10().floor());
    let residual = rough / magnitude;
    let factor = match residual {
        r if r <= 1.5 => 1.0,
        r if r <= 3.0 => 2.0,
        r if r <= 7.0 => 5.0,
        _ => 10.0,
    };
    factor * magnitude
}

/// Tick label text: integers plainly, very large or small values in exponent form
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else if value.abs() >= 10000.0 || value.abs() < 0.01 {
        format!("{value:.2e}")
    } else if (value - value.round()).abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// Pixel geometry of a figure with a left and a bottom axis
#[derive(Clone, Debug)]
pub struct PlotLayout {
    /// Full figure size
    pub width: f32,
    pub height: f32,

    /// Top-left corner of the plot area
    pub left: f32,
    pub top: f32,

    /// Size of the plot area
    pub plot_width: f32,
    pub plot_height: f32,

    pub x: Axis,
    pub y: Axis,
}

impl PlotLayout {
    pub fn new(width: f32, height: f32, x: Axis, y: Axis) -> Self {
        let [left, bottom, right, top] = MARGIN;
        Self {
            width,
            height,
            left,
            top,
            plot_width: (width - left - right).max(1.0),
            plot_height: (height - bottom - top).max(1.0),
            x,
            y,
        }
    }

    /// Pixel position of a data point; y grows downwards
    pub fn to_pixel(&self, x: f64, y: f64) -> (f32, f32) {
        let fx = ((x - self.x.min) / self.x.span()) as f32;
        let fy = ((y - self.y.min) / self.y.span()) as f32;
        (
            self.left + fx * self.plot_width,
            self.top + (1.0 - fy) * self.plot_height,
        )
    }

    pub fn right(&self) -> f32 {
        self.left + self.plot_width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.plot_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_at_nice_steps() {
        let ticks = Axis::new(0.0, 10.0).ticks();
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["0", "2", "4", "6", "8", "10"]);
        assert_eq!(ticks[0].fraction, 0.0);
        assert_eq!(ticks[5].fraction, 1.0);
    }

    #[test]
    fn test_ticks_for_fitted_profile_range() {
        let ticks = Axis::fit(0.0, 100.0).ticks();
        assert!(ticks.iter().any(|t| t.value == 0.0));
        assert!(ticks.iter().any(|t| (t.value - 100.0).abs() < 1e-9));
        assert!(ticks.iter().all(|t| (0.0..=1.0).contains(&t.fraction)));
    }

    #[test]
    fn test_negative_range_ticks() {
        let ticks = Axis::new(-110.0, 110.0).ticks();
        assert_eq!(ticks.first().map(|t| t.value), Some(-100.0));
        assert_eq!(ticks.last().map(|t| t.value), Some(100.0));
        assert!(ticks.iter().any(|t| t.label == "0"));
    }

    #[test]
    fn test_degenerate_range_has_no_ticks() {
        assert!(Axis::new(1.0, 1.0).ticks().is_empty());
        assert!(Axis::new(f64::NAN, 1.0).ticks().is_empty());
    }

    #[test]
    fn test_fit() {
        let axis = Axis::fit(-100.0, 100.0);
        assert!((axis.min + 110.0).abs() < 1e-9);
        assert!((axis.max - 110.0).abs() < 1e-9);

        let flat = Axis::fit(3.0, 3.0);
        assert_eq!((flat.min, flat.max), (2.5, 3.5));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(123.0), "123");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(-40.0), "-40");
        assert!(format_number(12345678.0).contains('e'));
    }

    #[test]
    fn test_layout_maps_corners() {
        let layout = PlotLayout::new(400.0, 300.0, Axis::new(0.0, 100.0), Axis::new(0.0, 50.0));

        let (left, top) = layout.to_pixel(0.0, 50.0);
        assert_eq!((left, top), (layout.left, layout.top));
        let (right, bottom) = layout.to_pixel(100.0, 0.0);
        assert!((right - layout.right()).abs() < 1e-3);
        assert!((bottom - layout.bottom()).abs() < 1e-3);
    }
}
