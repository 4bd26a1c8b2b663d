//! Per-target comparison of approved drugs against discovery compounds:
//! one point per target, discovery mean on x, drug mean on y, plus a 1:1
//! reference diagonal.

use crate::axes::NumericField;
use crate::chart_builder::PlotKind;
use crate::dataset::Dataset;
use crate::derived;
use crate::figure::{
    AxisTemplate, ColorChannel, Figure, Layout, LineStyle, Marker, Sizing, Trace, TraceKind,
    BACKGROUND, COLORSCALE,
};
use crate::markers;

/// Number of points on the reference diagonal, spanning 0 to the larger of
/// the two mean maxima.
const DIAGONAL_STEPS: usize = 5;

/// Builds the drug-vs-discovery summary figure for one numeric field.
///
/// Only targets present in both partitions are plotted; a target with no
/// approved drug is dropped. That intersection join mirrors the original
/// dashboard and is kept deliberately (see DESIGN.md).
pub fn build_summary_chart(
    dataset: &Dataset,
    x_field: NumericField,
    highlight_target: Option<&str>,
) -> Figure {
    let (drugs, discovery) = derived::partition_by_phase(dataset.rows());
    let drug_means = derived::mean_by_target(&drugs, x_field);
    let discovery_means = derived::mean_by_target(&discovery, x_field);

    let mut x = vec![];
    let mut y = vec![];
    let mut text = vec![];
    for (target, discovery_mean) in &discovery_means {
        if let Some(drug_mean) = drug_means.get(target) {
            x.push(*discovery_mean);
            y.push(*drug_mean);
            text.push(target.clone());
        }
    }

    let limit = x.iter().chain(y.iter()).fold(0.0_f64, |m, v| m.max(*v));
    let diagonal: Vec<f64> = (0..DIAGONAL_STEPS)
        .map(|i| limit * i as f64 / (DIAGONAL_STEPS - 1) as f64)
        .collect();

    let color: Vec<f64> = (0..x.len()).map(|i| i as f64).collect();
    let main = Trace {
        x,
        y,
        mode: Some("markers".to_string()),
        marker: Some(Marker {
            colorscale: Some(COLORSCALE.to_string()),
            showscale: Some(false),
            line: Some(LineStyle {
                color: Some("#444".to_string()),
            }),
            opacity: Some(0.7),
            size: Some(Sizing::Scalar(12.0)),
            color: Some(ColorChannel::PerPoint(color)),
            ..Default::default()
        }),
        text,
        kind: TraceKind::Scatter,
        ..Default::default()
    };
    let reference = Trace {
        x: diagonal.clone(),
        y: diagonal,
        mode: Some("lines".to_string()),
        line: Some(LineStyle {
            color: Some("#888".to_string()),
        }),
        kind: TraceKind::Scatter,
        ..Default::default()
    };

    let field = x_field.column();
    let layout = Layout {
        xaxis: Some(AxisTemplate::for_2d(&format!("mean {field} (discovery)"))),
        yaxis: Some(AxisTemplate::for_2d(&format!("mean {field} (drugs)"))),
        plot_bgcolor: Some(BACKGROUND.to_string()),
        paper_bgcolor: Some(BACKGROUND.to_string()),
        ..Layout::base()
    };

    let mut data = vec![main, reference];
    if let Some(target) = highlight_target {
        let overlays = markers::add_markers(&data[0], &[target.to_string()], PlotKind::Scatter);
        data.extend(overlays);
    }

    Figure { data, layout }
}
