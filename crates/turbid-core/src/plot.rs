//! Figure rendering for profiles and noise grids
//!
//! Two figure kinds cover everything turbid draws:
//!
//! - [`LinePlot`]: a single series against its abscissa, with axes and ticks
//! - [`ImagePlot`]: a 2D grid drawn cell by cell through a colormap
//!
//! Both render to an RGB raster (for PNG) and to an SVG document. Text (tick
//! labels, axis labels, titles) is only emitted in SVG output, which is why
//! SVG is the default export format.

use std::fmt::Write as _;

use image::{Rgb, RgbImage};
use ndarray::Array2;

use crate::axis::{format_number, Axis, PlotLayout, TICK_LENGTH};
use crate::colormap::{gray, Color, Colormap, ValueScale};
use crate::error::{RenderError, RenderResult};
use crate::profile::{RadialProfile, RADIUS_LABEL, VELOCITY_LABEL};
use crate::texture::{NoiseGrid, TEXTURE_X_LABEL, TEXTURE_Y_LABEL};

/// Something that can be drawn to a raster or an SVG document
pub trait Figure {
    /// Preferred output size in pixels
    fn default_size(&self) -> (u32, u32);

    fn render_raster(&self, width: u32, height: u32) -> RenderResult<RgbImage>;

    fn render_svg(&self, width: u32, height: u32) -> RenderResult<String>;
}

/// A line plot of `y` against `x`
#[derive(Clone, Debug)]
pub struct LinePlot {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub x_label: String,
    pub y_label: String,
    pub title: Option<String>,
    pub color: Color,
}

impl LinePlot {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> RenderResult<Self> {
        if x.len() != y.len() {
            return Err(RenderError::LengthMismatch {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        if x.is_empty() {
            return Err(RenderError::Empty { what: "line plot" });
        }
        Ok(Self {
            x,
            y,
            x_label: String::new(),
            y_label: String::new(),
            title: None,
            color: Color::LINE_BLUE,
        })
    }

    /// Velocity against radius with the standard profile axis labels
    pub fn from_profile(profile: &RadialProfile) -> RenderResult<Self> {
        Ok(Self::new(profile.radius.to_vec(), profile.velocity.to_vec())?
            .with_labels(RADIUS_LABEL, VELOCITY_LABEL))
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn layout(&self, width: u32, height: u32) -> PlotLayout {
        let (x_min, x_max) = finite_range(self.x.iter().copied());
        let (y_min, y_max) = finite_range(self.y.iter().copied());
        PlotLayout::new(
            width as f32,
            height as f32,
            Axis::fit(x_min, x_max).with_label(&self.x_label),
            Axis::fit(y_min, y_max).with_label(&self.y_label),
        )
    }

    fn pixel_points(&self, layout: &PlotLayout) -> Vec<(f32, f32)> {
        self.x
            .iter()
            .zip(&self.y)
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .map(|(&x, &y)| layout.to_pixel(x, y))
            .collect()
    }
}

impl Figure for LinePlot {
    fn default_size(&self) -> (u32, u32) {
        (800, 600)
    }

    fn render_raster(&self, width: u32, height: u32) -> RenderResult<RgbImage> {
        let layout = self.layout(width, height);
        let mut img = RgbImage::from_pixel(width, height, rgb(Color::WHITE));

        let points = self.pixel_points(&layout);
        let line = rgb(self.color);
        for pair in points.windows(2) {
            draw_line(&mut img, pair[0], pair[1], line);
        }
        if let [only] = points.as_slice() {
            draw_line(&mut img, *only, *only, line);
        }

        draw_axes_raster(&mut img, &layout);
        Ok(img)
    }

    fn render_svg(&self, width: u32, height: u32) -> RenderResult<String> {
        let layout = self.layout(width, height);
        let mut svg = svg_open(width, height);

        let points = self
            .pixel_points(&layout)
            .iter()
            .map(|(x, y)| format!("{x:.2},{y:.2}"))
            .collect::<Vec<_>>()
            .join(" ");
        let (x, y, w, h) = (layout.left, layout.top, layout.plot_width, layout.plot_height);
        let _ = writeln!(
            svg,
            r#"<clipPath id="plot-area"><rect x="{x}" y="{y}" width="{w}" height="{h}"/></clipPath>"#
        );
        let _ = writeln!(
            svg,
            r#"<polyline clip-path="url(#plot-area)" fill="none" stroke="{}" stroke-width="1.5" points="{points}"/>"#,
            self.color.to_hex()
        );

        draw_axes_svg(&mut svg, &layout, self.title.as_deref(), false);
        svg.push_str("</svg>\n");
        Ok(svg)
    }
}

/// A grid drawn as an image, row 0 at the top
#[derive(Clone, Debug)]
pub struct ImagePlot {
    pub values: Array2<f64>,
    pub colormap: Colormap,
    pub x_label: String,
    pub y_label: String,
    pub title: Option<String>,

    /// Output pixels per grid cell in [`Figure::default_size`]
    pub cell_size: u32,
}

impl ImagePlot {
    pub fn new(values: Array2<f64>, colormap: Colormap) -> RenderResult<Self> {
        if values.is_empty() {
            return Err(RenderError::Empty { what: "image" });
        }
        Ok(Self {
            values,
            colormap,
            x_label: String::new(),
            y_label: String::new(),
            title: None,
            cell_size: 4,
        })
    }

    /// Grayscale rendering of a noise grid, axes labelled `beta` and `alpha`
    pub fn from_noise(grid: &NoiseGrid) -> RenderResult<Self> {
        let mut plot = Self::new(grid.values.clone(), gray())?;
        plot.x_label = TEXTURE_X_LABEL.to_string();
        plot.y_label = TEXTURE_Y_LABEL.to_string();
        Ok(plot)
    }

    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size.max(1);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Value range mapped onto the colormap (data min to max)
    fn color_scale(&self) -> ValueScale {
        let (lo, hi) = finite_range(self.values.iter().copied());
        ValueScale::new(lo, hi)
    }

    fn cell_color(&self, scale: &ValueScale, row: usize, col: usize) -> Color {
        let v = self.values[[row, col]];
        if v.is_finite() {
            self.colormap.sample(scale.normalize(v))
        } else {
            Color::default()
        }
    }
}

impl Figure for ImagePlot {
    fn default_size(&self) -> (u32, u32) {
        let (rows, cols) = self.values.dim();
        (
            (cols as u32).saturating_mul(self.cell_size),
            (rows as u32).saturating_mul(self.cell_size),
        )
    }

    /// Nearest-neighbour rendering of the grid filling the whole raster
    fn render_raster(&self, width: u32, height: u32) -> RenderResult<RgbImage> {
        let (rows, cols) = self.values.dim();
        let scale = self.color_scale();
        let lut: Vec<Vec<Rgb<u8>>> = (0..rows)
            .map(|r| (0..cols).map(|c| rgb(self.cell_color(&scale, r, c))).collect())
            .collect();

        Ok(RgbImage::from_fn(width, height, |px, py| {
            let col = ((px as usize * cols) / width.max(1) as usize).min(cols - 1);
            let row = ((py as usize * rows) / height.max(1) as usize).min(rows - 1);
            lut[row][col]
        }))
    }

    fn render_svg(&self, width: u32, height: u32) -> RenderResult<String> {
        let (rows, cols) = self.values.dim();
        // Image rows count downwards: row r sits at y = -r, labelled r.
        let x_axis = Axis::new(-0.5, cols as f64 - 0.5).with_label(&self.x_label);
        let y_axis = Axis::new(-(rows as f64 - 0.5), 0.5).with_label(&self.y_label);
        let layout = PlotLayout::new(width as f32, height as f32, x_axis, y_axis);
        let scale = self.color_scale();

        let mut svg = svg_open(width, height);
        let (x0, y0) = (layout.left, layout.top);
        let cell_w = layout.plot_width / cols as f32;
        let cell_h = layout.plot_height / rows as f32;
        svg.push_str("<g shape-rendering=\"crispEdges\">\n");
        for row in 0..rows {
            for col in 0..cols {
                let _ = writeln!(
                    svg,
                    r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
                    x0 + col as f32 * cell_w,
                    y0 + row as f32 * cell_h,
                    cell_w + 0.05,
                    cell_h + 0.05,
                    self.cell_color(&scale, row, col).to_hex()
                );
            }
        }
        svg.push_str("</g>\n");

        draw_axes_svg(&mut svg, &layout, self.title.as_deref(), true);
        svg.push_str("</svg>\n");
        Ok(svg)
    }
}

fn rgb(color: Color) -> Rgb<u8> {
    Rgb(color.to_rgb8())
}

/// Min and max over finite values; `(NAN, NAN)` if there are none
fn finite_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        (f64::NAN, f64::NAN)
    } else {
        (lo, hi)
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham line between two pixel positions, clipped to the image
fn draw_line(img: &mut RgbImage, from: (f32, f32), to: (f32, f32), color: Rgb<u8>) {
    let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
    let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put(img, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

fn draw_axes_raster(img: &mut RgbImage, layout: &PlotLayout) {
    let black = rgb(Color::BLACK);
    let (x, y) = (layout.left, layout.top);
    let (right, bottom) = (layout.right(), layout.bottom());

    draw_line(img, (x, y), (right, y), black);
    draw_line(img, (right, y), (right, bottom), black);
    draw_line(img, (right, bottom), (x, bottom), black);
    draw_line(img, (x, bottom), (x, y), black);

    for tick in layout.x.ticks() {
        let (px, _) = layout.to_pixel(tick.value, layout.y.min);
        draw_line(img, (px, bottom), (px, bottom + TICK_LENGTH), black);
    }
    for tick in layout.y.ticks() {
        let (_, py) = layout.to_pixel(layout.x.min, tick.value);
        draw_line(img, (x - TICK_LENGTH, py), (x, py), black);
    }
}

fn svg_open(width: u32, height: u32) -> String {
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    svg
}

/// Frame, ticks and labels. `negate_y` labels the vertical axis with negated
/// values, for image axes flipped so that row 0 sits at the top.
fn draw_axes_svg(svg: &mut String, layout: &PlotLayout, title: Option<&str>, negate_y: bool) {
    let (x, y, w, h) = (layout.left, layout.top, layout.plot_width, layout.plot_height);
    let (right, bottom) = (layout.right(), layout.bottom());
    let len = TICK_LENGTH;
    let _ = writeln!(
        svg,
        r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="none" stroke="black" stroke-width="1"/>"#
    );

    svg.push_str("<g font-family=\"sans-serif\" font-size=\"11\" fill=\"black\">\n");
    for tick in layout.x.ticks() {
        let (px, _) = layout.to_pixel(tick.value, layout.y.min);
        let _ = writeln!(
            svg,
            r#"<line x1="{px:.2}" y1="{bottom}" x2="{px:.2}" y2="{}" stroke="black"/>"#,
            bottom + len
        );
        let _ = writeln!(
            svg,
            r#"<text x="{px:.2}" y="{}" text-anchor="middle">{}</text>"#,
            bottom + len + 12.0,
            escape(&tick.label)
        );
    }
    for tick in layout.y.ticks() {
        let (_, py) = layout.to_pixel(layout.x.min, tick.value);
        let label = if negate_y {
            format_number(-tick.value + 0.0)
        } else {
            tick.label.clone()
        };
        let _ = writeln!(
            svg,
            r#"<line x1="{}" y1="{py:.2}" x2="{x}" y2="{py:.2}" stroke="black"/>"#,
            x - len
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{:.2}" text-anchor="end">{}</text>"#,
            x - len - 3.0,
            py + 4.0,
            escape(&label)
        );
    }

    if let Some(label) = &layout.x.label {
        let _ = writeln!(
            svg,
            r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="13">{}</text>"#,
            x + w / 2.0,
            layout.height - 10.0,
            escape(label)
        );
    }
    if let Some(label) = &layout.y.label {
        let cy = y + h / 2.0;
        let _ = writeln!(
            svg,
            r#"<text x="16" y="{cy:.2}" text-anchor="middle" font-size="13" transform="rotate(-90 16 {cy:.2})">{}</text>"#,
            escape(label)
        );
    }
    if let Some(title) = title {
        let _ = writeln!(
            svg,
            r#"<text x="{:.2}" y="14" text-anchor="middle" font-size="14">{}</text>"#,
            (x + right) / 2.0,
            escape(title)
        );
    }
    svg.push_str("</g>\n");
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
