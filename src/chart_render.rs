//! Paints a built `Figure` into an egui area and resolves clicks back to
//! compound ids.
//!
//! The 3-D scatter uses the figure's fixed camera for an orthographic
//! projection; Plotly-side niceties like rotation are out of scope for the
//! desktop shell.

use crate::figure::{ColorChannel, Figure, Sizing, Trace, TraceKind, Vec3};
use eframe::egui::{self, Align2, Color32, FontFamily, FontId, PointerState, Pos2, Rect, Stroke};

const HISTOGRAM_BINS: usize = 20;
const CLICK_RADIUS: f32 = 8.0;
const MIN_POINT_RADIUS: f32 = 2.0;
const MAX_POINT_RADIUS: f32 = 14.0;

/// Anchor colours of the Viridis colorscale, lerped in between.
const VIRIDIS: [[f32; 3]; 9] = [
    [0.267, 0.005, 0.329],
    [0.281, 0.155, 0.469],
    [0.244, 0.290, 0.537],
    [0.191, 0.407, 0.556],
    [0.147, 0.511, 0.557],
    [0.120, 0.613, 0.536],
    [0.208, 0.718, 0.473],
    [0.430, 0.808, 0.346],
    [0.993, 0.906, 0.144],
];

fn viridis(t: f64) -> Color32 {
    let t = t.clamp(0.0, 1.0) as f32;
    let scaled = t * (VIRIDIS.len() - 1) as f32;
    let low = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - low as f32;
    let lerp = |a: f32, b: f32| a + (b - a) * frac;
    Color32::from_rgb(
        (lerp(VIRIDIS[low][0], VIRIDIS[low + 1][0]) * 255.0) as u8,
        (lerp(VIRIDIS[low][1], VIRIDIS[low + 1][1]) * 255.0) as u8,
        (lerp(VIRIDIS[low][2], VIRIDIS[low + 1][2]) * 255.0) as u8,
    )
}

#[derive(Clone, Copy, Debug, Default)]
struct Range {
    min: f64,
    max: f64,
}

impl Range {
    fn observe(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            0.5
        } else {
            (value - self.min) / span
        }
    }
}

#[derive(Clone, Debug)]
struct PointPosition {
    pos: Pos2,
    cmpd_id: String,
}

/// Retained between frames so clicks can be resolved against the positions
/// of the most recently painted chart.
#[derive(Debug)]
pub struct ChartRender {
    area: Rect,
    points: Vec<PointPosition>,
    clicked_compound: Option<String>,
}

impl Default for ChartRender {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartRender {
    pub fn new() -> Self {
        Self {
            area: Rect::NOTHING,
            points: vec![],
            clicked_compound: None,
        }
    }

    /// Nearest painted point within the click radius, if any. A click that
    /// hits no point resolves to `None` and the caller keeps its state.
    pub fn on_click(&mut self, pointer_state: PointerState) {
        let Some(pos) = pointer_state.latest_pos() else {
            return;
        };
        self.clicked_compound = self
            .points
            .iter()
            .map(|point| (point, point.pos.distance(pos)))
            .filter(|(_, distance)| *distance <= CLICK_RADIUS)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(point, _)| point.cmpd_id.clone());
    }

    pub fn take_clicked_compound(&mut self) -> Option<String> {
        self.clicked_compound.take()
    }

    pub fn render(&mut self, ui: &mut egui::Ui, figure: &Figure) {
        self.points.clear();
        self.area = ui.available_rect_before_wrap();
        let painter = ui.painter().to_owned();

        if let Some(color) = figure.layout.paper_bgcolor.as_deref() {
            painter.rect_filled(self.area, 0.0, parse_color(color));
        }

        let plot = self.area.shrink(40.0);
        let (x_range, y_range, z_range) = figure_ranges(figure);

        // Histogram grids go below everything else.
        for trace in &figure.data {
            if trace.kind == TraceKind::Histogram2d {
                self.draw_histogram(&painter, plot, trace, x_range, y_range);
            }
        }
        self.draw_axes(&painter, plot, figure);
        for trace in &figure.data {
            match trace.kind {
                TraceKind::Histogram2d => {}
                TraceKind::Scatter | TraceKind::Scatter3d => {
                    self.draw_scatter(&painter, plot, trace, x_range, y_range, z_range);
                }
            }
        }
    }

    fn draw_axes(&self, painter: &egui::Painter, plot: Rect, figure: &Figure) {
        let layout = &figure.layout;
        let (x_title, y_title, axis_color) = match (&layout.xaxis, &layout.yaxis) {
            (Some(x), Some(y)) => {
                let color = x
                    .color
                    .as_deref()
                    .map(parse_color)
                    .unwrap_or(Color32::DARK_GRAY);
                (x.title.clone(), y.title.clone(), color)
            }
            _ => match &layout.scene {
                // The 3-D scene: x/y titles drawn flat, z legible via colour.
                Some(scene) => (
                    scene.xaxis.title.clone(),
                    format!("{} (colour: {})", scene.yaxis.title, scene.zaxis.title),
                    Color32::DARK_GRAY,
                ),
                None => return,
            },
        };
        let stroke = Stroke::new(1.0, axis_color);
        painter.line_segment([plot.left_bottom(), plot.right_bottom()], stroke);
        painter.line_segment([plot.left_top(), plot.left_bottom()], stroke);
        let font = FontId::new(12.0, FontFamily::Proportional);
        painter.text(
            plot.center_bottom() + egui::vec2(0.0, 18.0),
            Align2::CENTER_CENTER,
            x_title,
            font.clone(),
            axis_color,
        );
        painter.text(
            plot.left_center() + egui::vec2(-24.0, 0.0),
            Align2::CENTER_CENTER,
            y_title,
            font,
            axis_color,
        );
    }

    fn draw_scatter(
        &mut self,
        painter: &egui::Painter,
        plot: Rect,
        trace: &Trace,
        x_range: Range,
        y_range: Range,
        z_range: Range,
    ) {
        let marker = trace.marker.as_ref();
        let symbol = marker.and_then(|m| m.symbol.as_deref());
        let opacity = marker.and_then(|m| m.opacity).unwrap_or(1.0);

        for point in 0..trace.len() {
            let pos = match &trace.z {
                Some(z) => project_3d(
                    plot,
                    x_range.normalize(trace.x[point]),
                    y_range.normalize(trace.y[point]),
                    z_range.normalize(z[point]),
                ),
                None => Pos2 {
                    x: plot.left() + (x_range.normalize(trace.x[point]) as f32) * plot.width(),
                    y: plot.bottom() - (y_range.normalize(trace.y[point]) as f32) * plot.height(),
                },
            };
            let color = point_color(trace, point, z_range, opacity);
            let radius = point_radius(trace, point);
            if symbol == Some("cross") {
                let stroke = Stroke::new(3.0, color);
                painter.line_segment(
                    [pos - egui::vec2(radius, 0.0), pos + egui::vec2(radius, 0.0)],
                    stroke,
                );
                painter.line_segment(
                    [pos - egui::vec2(0.0, radius), pos + egui::vec2(0.0, radius)],
                    stroke,
                );
            } else {
                painter.circle_filled(pos, radius, color);
            }
            if let Some(cmpd_id) = trace.text.get(point) {
                self.points.push(PointPosition {
                    pos,
                    cmpd_id: cmpd_id.clone(),
                });
            }
        }
    }

    fn draw_histogram(
        &self,
        painter: &egui::Painter,
        plot: Rect,
        trace: &Trace,
        x_range: Range,
        y_range: Range,
    ) {
        let mut bins = [[0usize; HISTOGRAM_BINS]; HISTOGRAM_BINS];
        let mut max_count = 0;
        for point in 0..trace.len() {
            let bx = bin_index(x_range.normalize(trace.x[point]));
            let by = bin_index(y_range.normalize(trace.y[point]));
            bins[bx][by] += 1;
            max_count = max_count.max(bins[bx][by]);
        }
        if max_count == 0 {
            return;
        }
        let cell = egui::vec2(
            plot.width() / HISTOGRAM_BINS as f32,
            plot.height() / HISTOGRAM_BINS as f32,
        );
        for (bx, column) in bins.iter().enumerate() {
            for (by, count) in column.iter().enumerate() {
                let corner = Pos2 {
                    x: plot.left() + bx as f32 * cell.x,
                    y: plot.bottom() - (by + 1) as f32 * cell.y,
                };
                let color = viridis(*count as f64 / max_count as f64);
                painter.rect_filled(Rect::from_min_size(corner, cell), 0.0, color);
            }
        }
    }
}

fn bin_index(normalized: f64) -> usize {
    ((normalized * HISTOGRAM_BINS as f64) as usize).min(HISTOGRAM_BINS - 1)
}

fn point_color(trace: &Trace, point: usize, z_range: Range, opacity: f64) -> Color32 {
    let base = match trace.marker.as_ref().and_then(|m| m.color.as_ref()) {
        Some(ColorChannel::Name(name)) => parse_color(name),
        Some(ColorChannel::PerPoint(values)) => match values.get(point) {
            Some(value) => viridis(z_range.normalize(*value)),
            None => Color32::GRAY,
        },
        None => Color32::GRAY,
    };
    base.gamma_multiply(opacity as f32)
}

fn point_radius(trace: &Trace, point: usize) -> f32 {
    let size = match trace.marker.as_ref().and_then(|m| m.size.as_ref()) {
        Some(Sizing::Scalar(size)) => *size,
        Some(Sizing::PerPoint(sizes)) => sizes.get(point).copied().unwrap_or(0.0),
        None => 0.0,
    };
    let sizeref = trace
        .marker
        .as_ref()
        .and_then(|m| m.sizeref)
        .unwrap_or(1.0)
        .max(1.0);
    ((size / sizeref) as f32).clamp(MIN_POINT_RADIUS, MAX_POINT_RADIUS)
}

/// Orthographic projection of a normalized (0..1)^3 point along the fixed
/// camera direction.
fn project_3d(plot: Rect, x: f64, y: f64, z: f64) -> Pos2 {
    let camera = crate::figure::Camera::default_view();
    let p = Vec3::new(x - 0.5, y - 0.5, z - 0.5);
    let forward = normalize(sub(camera.center, camera.eye));
    let right = normalize(cross(forward, camera.up));
    let up = cross(right, forward);
    // Keep the projection within the plot; sqrt(2) covers the worst-case
    // diagonal extent of the unit cube seen edge-on.
    let u = dot(p, right) / std::f64::consts::SQRT_2 + 0.5;
    let v = dot(p, up) / std::f64::consts::SQRT_2 + 0.5;
    Pos2 {
        x: plot.left() + u as f32 * plot.width(),
        y: plot.bottom() - v as f32 * plot.height(),
    }
}

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(a.x - b.x, a.y - b.y, a.z - b.z)
}

fn dot(a: Vec3, b: Vec3) -> f64 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

fn normalize(v: Vec3) -> Vec3 {
    let len = dot(v, v).sqrt();
    if len == 0.0 {
        v
    } else {
        Vec3::new(v.x / len, v.y / len, v.z / len)
    }
}

fn figure_ranges(figure: &Figure) -> (Range, Range, Range) {
    let mut x_range = Range {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };
    let mut y_range = x_range;
    let mut z_range = x_range;
    for trace in &figure.data {
        for value in &trace.x {
            x_range.observe(*value);
        }
        for value in &trace.y {
            y_range.observe(*value);
        }
        for value in trace.z.iter().flatten() {
            z_range.observe(*value);
        }
    }
    (x_range, y_range, z_range)
}

fn parse_color(name: &str) -> Color32 {
    match name {
        "red" => Color32::RED,
        "black" => Color32::BLACK,
        "white" => Color32::WHITE,
        "#444" => Color32::from_rgb(0x44, 0x44, 0x44),
        "#888" => Color32::from_rgb(0x88, 0x88, 0x88),
        _ => parse_rgb(name).unwrap_or(Color32::GRAY),
    }
}

/// Parses the `rgb(r, g, b)` notation the figure constants use.
fn parse_rgb(name: &str) -> Option<Color32> {
    let inner = name.strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(|p| p.trim().parse::<u8>());
    let r = parts.next()?.ok()?;
    let g = parts.next()?.ok()?;
    let b = parts.next()?.ok()?;
    Some(Color32::from_rgb(r, g, b))
}
