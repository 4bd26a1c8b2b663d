//! The core of the explorer: a pure map from the current UI selection to a
//! renderable figure.

use crate::axes::{AxisChoice, NumericField};
use crate::dataset::Dataset;
use crate::derived;
use crate::figure::{
    AxisTemplate, Camera, ColorChannel, Figure, Layout, LineStyle, Marker, Scene, Sizing, Trace,
    TraceKind, BACKGROUND, COLORSCALE,
};
use crate::markers;
use serde::{Deserialize, Serialize};

/// Marker diameter is `(field value + 1) * SIZE_SCALE`. Visual tuning only;
/// the hosted variant of the original dashboard used 300.
pub const SIZE_SCALE: f64 = 200.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    Scatter3d,
    Scatter,
    Histogram2d,
}

impl PlotKind {
    pub const ALL: [PlotKind; 3] = [PlotKind::Scatter3d, PlotKind::Scatter, PlotKind::Histogram2d];

    pub fn label(&self) -> &'static str {
        match self {
            PlotKind::Scatter3d => "3D Scatter",
            PlotKind::Scatter => "2D Scatter",
            PlotKind::Histogram2d => "2D Histogram",
        }
    }

    pub fn is_3d(&self) -> bool {
        matches!(self, PlotKind::Scatter3d)
    }
}

/// Everything a chart build depends on. Rebuilt from the UI controls on
/// every change; never shared or mutated across requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Target names; rows matching any of them form the Target Group.
    pub targets: Vec<String>,
    pub x: NumericField,
    pub y: NumericField,
    pub z: AxisChoice,
    pub size: NumericField,
    pub plot_kind: PlotKind,
    /// Compound ids to mark with the highlight cross.
    pub highlight_ids: Vec<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            targets: vec!["Dihydrofolate reductase".to_string()],
            x: NumericField::Lle,
            y: NumericField::Le,
            z: AxisChoice::Rank,
            size: NumericField::MaxPhase,
            plot_kind: PlotKind::Scatter3d,
            highlight_ids: vec![],
        }
    }
}

/// Builds the figure for one selection. An empty Target Group yields a
/// figure with empty coordinate vectors, never an error.
pub fn build_chart(dataset: &Dataset, config: &ChartConfig) -> Figure {
    let rows = dataset.rows_for_targets(&config.targets);

    // z doubles as the colour channel, so the z-axis meaning stays visible
    // in the 2-D projections too.
    let z: Vec<f64> = match config.z {
        AxisChoice::Rank => derived::compute_rank(&rows, config.x, config.y)
            .map(|ranks| ranks.into_iter().map(|r| r as f64).collect())
            .unwrap_or_default(),
        AxisChoice::Field(field) => rows.iter().map(|row| row.numeric(field)).collect(),
    };
    let x: Vec<f64> = rows.iter().map(|row| row.numeric(config.x)).collect();
    let y: Vec<f64> = rows.iter().map(|row| row.numeric(config.y)).collect();
    let size: Vec<f64> = rows
        .iter()
        .map(|row| (row.numeric(config.size) + 1.0) * SIZE_SCALE)
        .collect();
    let text: Vec<String> = rows.iter().map(|row| row.cmpd_chemblid.clone()).collect();

    let xlabel = config.x.column();
    let ylabel = config.y.column();
    let zlabel = config.z.title();

    let mut trace = Trace {
        x,
        y,
        z: Some(z.clone()),
        mode: Some("markers".to_string()),
        marker: Some(Marker {
            colorscale: Some(COLORSCALE.to_string()),
            showscale: Some(false),
            line: Some(LineStyle {
                color: Some("#444".to_string()),
            }),
            sizeref: Some(45.0),
            sizemode: Some("diameter".to_string()),
            opacity: Some(0.7),
            size: Some(Sizing::PerPoint(size)),
            color: Some(ColorChannel::PerPoint(z)),
            ..Default::default()
        }),
        text,
        kind: TraceKind::Scatter3d,
        ..Default::default()
    };

    let mut layout = Layout {
        scene: Some(Scene {
            xaxis: AxisTemplate::for_3d(xlabel),
            yaxis: AxisTemplate::for_3d(ylabel),
            zaxis: AxisTemplate::for_3d(zlabel),
            camera: Some(Camera::default_view()),
        }),
        ..Layout::base()
    };

    if !config.plot_kind.is_3d() {
        // 2-D projection: the scene goes away entirely and the trace sheds
        // its z and size payloads. The config keeps them; switching back to
        // 3-D restores the full trace.
        layout.xaxis = Some(AxisTemplate::for_2d(xlabel));
        layout.yaxis = Some(AxisTemplate::for_2d(ylabel));
        layout.plot_bgcolor = Some(BACKGROUND.to_string());
        layout.paper_bgcolor = Some(BACKGROUND.to_string());
        layout.scene = None;
        trace.kind = TraceKind::Scatter;
        trace.z = None;
        if let Some(marker) = trace.marker.as_mut() {
            marker.size = None;
        }
    }

    let mut data = vec![trace];

    if config.plot_kind == PlotKind::Histogram2d {
        // Scatter overlay on the 2-D histogram, on the fixed dark theme.
        data.push(Trace {
            x: data[0].x.clone(),
            y: data[0].y.clone(),
            kind: TraceKind::Histogram2d,
            colorscale: Some(COLORSCALE.to_string()),
            showscale: Some(false),
            ..Default::default()
        });
        layout.plot_bgcolor = Some("black".to_string());
        layout.paper_bgcolor = Some("black".to_string());
        layout.xaxis = layout.xaxis.map(AxisTemplate::blackout);
        layout.yaxis = layout.yaxis.map(AxisTemplate::blackout);
        layout.font.color = Some("white".to_string());
    }

    if !config.highlight_ids.is_empty() {
        let overlays = markers::add_markers(&data[0], &config.highlight_ids, config.plot_kind);
        data.extend(overlays);
    }

    Figure { data, layout }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::CompoundRow;

    fn dataset() -> Dataset {
        let csv = "\
target_chemblid,molregno,cmpd_chemblid,target,molecular_species,full_molformula,alogp,psa,mw_freebase,max_phase,le,lle
CHEMBL202,1,C1,T,BASE,C10H10N2O2,1.0,80.0,300.0,4,1.0,2.0
CHEMBL202,2,C2,T,ACID,C11H12N2O3,2.0,90.0,310.0,0,3.0,1.0
CHEMBL202,3,C3,T,NEUTRAL,C12H14N4O2,3.0,100.0,320.0,0,2.0,2.0
CHEMBL203,4,C4,U,NEUTRAL,C12H14N4O2,4.0,110.0,330.0,1,4.0,4.0
";
        Dataset::from_csv_text(csv).unwrap()
    }

    fn config() -> ChartConfig {
        ChartConfig {
            targets: vec!["T".to_string()],
            x: NumericField::Le,
            y: NumericField::Lle,
            z: AxisChoice::Rank,
            size: NumericField::MaxPhase,
            plot_kind: PlotKind::Scatter3d,
            highlight_ids: vec![],
        }
    }

    #[test]
    fn test_scatter3d_with_rank() {
        let figure = build_chart(&dataset(), &config());
        assert_eq!(figure.data.len(), 1);
        let trace = &figure.data[0];
        assert_eq!(trace.kind, TraceKind::Scatter3d);
        // Products (le * lle): 2, 3, 4 -> ranks 0, 1, 2 on the input rows.
        assert_eq!(trace.x, vec![1.0, 3.0, 2.0]);
        assert_eq!(trace.y, vec![2.0, 1.0, 2.0]);
        assert_eq!(trace.z, Some(vec![0.0, 1.0, 2.0]));
        assert_eq!(
            trace.marker.as_ref().unwrap().color,
            Some(ColorChannel::PerPoint(vec![0.0, 1.0, 2.0]))
        );
        assert_eq!(trace.text, vec!["C1", "C2", "C3"]);
        assert!(trace.is_consistent());
        let scene = figure.layout.scene.as_ref().unwrap();
        assert_eq!(scene.xaxis.title, "le");
        assert_eq!(scene.zaxis.title, "rank");
        assert_eq!(scene.camera, Some(Camera::default_view()));
    }

    #[test]
    fn test_size_transform() {
        let figure = build_chart(&dataset(), &config());
        let marker = figure.data[0].marker.as_ref().unwrap();
        // max_phase 4, 0, 0 -> (v + 1) * 200.
        assert_eq!(
            marker.size,
            Some(Sizing::PerPoint(vec![1000.0, 200.0, 200.0]))
        );
    }

    #[test]
    fn test_z_from_plain_field() {
        let mut config = config();
        config.z = AxisChoice::Field(NumericField::AlogP);
        let figure = build_chart(&dataset(), &config);
        assert_eq!(figure.data[0].z, Some(vec![1.0, 2.0, 3.0]));
        assert_eq!(figure.layout.scene.as_ref().unwrap().zaxis.title, "alogp");
    }

    #[test]
    fn test_2d_scatter_drops_z_size_and_scene() {
        let mut config = config();
        config.plot_kind = PlotKind::Scatter;
        let figure = build_chart(&dataset(), &config);
        assert_eq!(figure.data.len(), 1);
        let trace = &figure.data[0];
        assert_eq!(trace.kind, TraceKind::Scatter);
        assert_eq!(trace.z, None);
        assert_eq!(trace.marker.as_ref().unwrap().size, None);
        assert!(figure.layout.scene.is_none());
        assert_eq!(figure.layout.xaxis.as_ref().unwrap().title, "le");
        assert_eq!(figure.layout.plot_bgcolor.as_deref(), Some(BACKGROUND));
        assert!(trace.is_consistent());
    }

    #[test]
    fn test_histogram2d_always_two_traces_and_dark_theme() {
        let mut config = config();
        config.plot_kind = PlotKind::Histogram2d;
        for targets in [vec!["T".to_string()], vec!["No such target".to_string()]] {
            config.targets = targets;
            let figure = build_chart(&dataset(), &config);
            assert_eq!(figure.data.len(), 2);
            assert_eq!(figure.data[0].kind, TraceKind::Scatter);
            assert_eq!(figure.data[1].kind, TraceKind::Histogram2d);
            assert_eq!(figure.data[1].x, figure.data[0].x);
            assert_eq!(figure.layout.plot_bgcolor.as_deref(), Some("black"));
            assert_eq!(figure.layout.paper_bgcolor.as_deref(), Some("black"));
            assert_eq!(figure.layout.font.color.as_deref(), Some("white"));
            let xaxis = figure.layout.xaxis.as_ref().unwrap();
            assert_eq!(xaxis.showgrid, Some(false));
            assert_eq!(xaxis.color.as_deref(), Some("white"));
        }
    }

    #[test]
    fn test_empty_target_group_yields_empty_chart() {
        let mut config = config();
        config.targets = vec!["No such target".to_string()];
        let figure = build_chart(&dataset(), &config);
        let trace = &figure.data[0];
        assert!(trace.is_empty());
        assert_eq!(trace.z, Some(vec![]));
        assert!(trace.text.is_empty());
        assert!(trace.is_consistent());
    }

    #[test]
    fn test_multi_target_filter() {
        let mut config = config();
        config.targets = vec!["T".to_string(), "U".to_string()];
        let figure = build_chart(&dataset(), &config);
        assert_eq!(figure.data[0].len(), 4);
        assert_eq!(figure.data[0].text[3], "C4");
    }

    #[test]
    fn test_highlights_append_overlays() {
        let mut config = config();
        config.highlight_ids = vec!["C2".to_string(), "C9".to_string()];
        let figure = build_chart(&dataset(), &config);
        // Base trace plus one overlay; C9 is outside the filter.
        assert_eq!(figure.data.len(), 2);
        assert_eq!(figure.data[1].x, vec![3.0]);
        assert_eq!(figure.data[1].kind, TraceKind::Scatter3d);
    }

    #[test]
    fn test_every_config_keeps_traces_consistent() {
        let dataset = dataset();
        for plot_kind in PlotKind::ALL {
            for z in [AxisChoice::Rank, AxisChoice::Field(NumericField::Psa)] {
                let config = ChartConfig {
                    plot_kind,
                    z,
                    highlight_ids: vec!["C1".to_string()],
                    ..config()
                };
                let figure = build_chart(&dataset, &config);
                for trace in &figure.data {
                    assert!(trace.is_consistent(), "{plot_kind:?}/{z:?}");
                }
            }
        }
    }

    #[test]
    fn test_dataset_rows_untouched_by_build() {
        let dataset = dataset();
        let before: Vec<CompoundRow> = dataset.rows().to_vec();
        let _ = build_chart(&dataset, &config());
        assert_eq!(dataset.rows(), &before[..]);
    }
}
