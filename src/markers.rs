//! Highlight overlays: one extra single-point trace per compound id found in
//! a base trace, styled as a red cross.

use crate::chart_builder::PlotKind;
use crate::figure::{ColorChannel, Marker, Sizing, Trace, TraceKind};

/// Resolves `ids` against the base trace's text sequence. Ids without a
/// match are skipped: compounds outside the current target filter are
/// expected to be absent. Output order follows `ids`, and the base trace is
/// never modified.
pub fn add_markers(base: &Trace, ids: &[String], plot_kind: PlotKind) -> Vec<Trace> {
    // On the 2-D histogram the highlight renders as a plain scatter point.
    let kind = if plot_kind.is_3d() {
        TraceKind::Scatter3d
    } else {
        TraceKind::Scatter
    };

    let mut traces = vec![];
    for id in ids {
        let Some(point) = base.text.iter().position(|text| text == id) else {
            continue;
        };
        let mut trace = Trace {
            x: vec![base.x[point]],
            y: vec![base.y[point]],
            marker: Some(Marker {
                color: Some(ColorChannel::Name("red".to_string())),
                size: Some(Sizing::Scalar(16.0)),
                opacity: Some(0.6),
                symbol: Some("cross".to_string()),
                ..Default::default()
            }),
            kind,
            ..Default::default()
        };
        if kind == TraceKind::Scatter3d {
            trace.z = base.z.as_ref().map(|z| vec![z[point]]);
        }
        traces.push(trace);
    }
    traces
}
