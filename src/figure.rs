//! Value types for a built chart: traces plus layout. The UI consumes a
//! `Figure` opaquely; serialization follows the Plotly figure shape so a
//! chart can also be exported as JSON.

use serde::Serialize;

pub const BACKGROUND: &str = "rgb(230, 230, 230)";
pub const GRID_COLOR: &str = "rgb(255, 255, 255)";
pub const COLORSCALE: &str = "Viridis";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    #[default]
    Scatter,
    Scatter3d,
    Histogram2d,
}

/// Per-point marker size: one value for a single highlight marker, or a
/// parallel vector for a whole trace.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Sizing {
    Scalar(f64),
    PerPoint(Vec<f64>),
}

/// Marker colour channel: a named colour, or one value per point mapped
/// through the colorscale.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColorChannel {
    Name(String),
    PerPoint(Vec<f64>),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct LineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showscale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizeref: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizemode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Sizing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorChannel>,
}

/// One renderable series. Invariant: x, y, z (if present), text (if present)
/// and the per-point marker vectors all have the same length.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Trace {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colorscale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showscale: Option<bool>,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// True if all parallel per-point sequences agree in length.
    pub fn is_consistent(&self) -> bool {
        let n = self.x.len();
        if self.y.len() != n {
            return false;
        }
        if self.z.as_ref().is_some_and(|z| z.len() != n) {
            return false;
        }
        if !self.text.is_empty() && self.text.len() != n {
            return false;
        }
        if let Some(marker) = &self.marker {
            if let Some(Sizing::PerPoint(sizes)) = &marker.size {
                if sizes.len() != n {
                    return false;
                }
            }
            if let Some(ColorChannel::PerPoint(colors)) = &marker.color {
                if colors.len() != n {
                    return false;
                }
            }
        }
        true
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Camera {
    pub up: Vec3,
    pub center: Vec3,
    pub eye: Vec3,
}

impl Camera {
    /// The fixed viewing angle of the 3-D scene.
    pub fn default_view() -> Self {
        Self {
            up: Vec3::new(0.0, 0.0, 1.0),
            center: Vec3::new(0.0, 0.0, 0.0),
            eye: Vec3::new(0.08, 2.2, 0.08),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AxisTemplate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showbackground: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backgroundcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gridcolor: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub axis_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zerolinecolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xgap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ygap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zeroline: Option<bool>,
}

impl AxisTemplate {
    pub fn for_3d(title: &str) -> Self {
        Self {
            title: title.to_string(),
            showbackground: Some(true),
            backgroundcolor: Some(BACKGROUND.to_string()),
            gridcolor: Some(GRID_COLOR.to_string()),
            axis_type: Some("linear".to_string()),
            zerolinecolor: Some(GRID_COLOR.to_string()),
            ..Default::default()
        }
    }

    pub fn for_2d(title: &str) -> Self {
        Self {
            title: title.to_string(),
            xgap: Some(10.0),
            ygap: Some(10.0),
            backgroundcolor: Some(BACKGROUND.to_string()),
            gridcolor: Some(GRID_COLOR.to_string()),
            zerolinecolor: Some(GRID_COLOR.to_string()),
            color: Some("#444".to_string()),
            ..Default::default()
        }
    }

    /// Variant for the dark histogram theme: no grid, white labels.
    pub fn blackout(mut self) -> Self {
        self.showgrid = Some(false);
        self.zeroline = Some(false);
        self.color = Some("white".to_string());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Scene {
    pub xaxis: AxisTemplate,
    pub yaxis: AxisTemplate,
    pub zaxis: AxisTemplate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<Camera>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Font {
    pub family: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Margin {
    pub r: f64,
    pub t: f64,
    pub l: f64,
    pub b: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Layout {
    pub font: Font,
    pub hovermode: String,
    pub margin: Margin,
    pub showlegend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene: Option<Scene>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<AxisTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<AxisTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_bgcolor: Option<String>,
}

impl Layout {
    /// The shared base of every chart layout.
    pub fn base() -> Self {
        Self {
            font: Font {
                family: "Raleway".to_string(),
                color: None,
            },
            hovermode: "closest".to_string(),
            margin: Margin {
                r: 20.0,
                t: 0.0,
                l: 0.0,
                b: 0.0,
            },
            showlegend: false,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    /// JSON in the Plotly figure shape, for export to other tooling.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
