use crate::{
    axes::{AxisChoice, NumericField},
    chart_builder::{self, ChartConfig, PlotKind},
    chart_render::ChartRender,
    dataset::Dataset,
    figure::Figure,
    summary, viewer, DATASET,
};
use anyhow::{anyhow, Context, Result};
use eframe::egui::{self, ComboBox, Sense, Ui};

/// What the central area shows: one of the compound charts, or the
/// per-target drug/discovery summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartView {
    Plot(PlotKind),
    Summary,
}

/// The complete state of the UI controls. One immutable value, recomputed
/// from the widgets each frame; every chart rebuild reads this and nothing
/// else, so there is no hidden ordering between control callbacks.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub targets: Vec<String>,
    pub x: NumericField,
    pub y: NumericField,
    pub z: AxisChoice,
    pub view: ChartView,
}

impl Default for Selection {
    fn default() -> Self {
        let config = ChartConfig::default();
        Self {
            targets: config.targets,
            x: config.x,
            y: config.y,
            z: config.z,
            view: ChartView::Plot(config.plot_kind),
        }
    }
}

pub struct ExplorerApp {
    dataset: Dataset,
    selection: Selection,
    /// Selection the current figure was built from; rebuild on mismatch.
    rendered_selection: Option<Selection>,
    figure: Figure,
    chart: ChartRender,
    viewer_url: String,
}

impl ExplorerApp {
    pub fn new() -> Self {
        Self::with_dataset(DATASET.clone())
    }

    /// Entry used by the binary: an optional CSV path from the command line
    /// replaces the bundled demo table.
    pub fn new_with_dataset(path: Option<&str>) -> Self {
        match path {
            Some(path) => match Self::load_dataset_from_file(path) {
                Ok(dataset) => Self::with_dataset(dataset),
                Err(e) => {
                    eprintln!("{e:#}");
                    eprintln!("Falling back to the bundled dataset");
                    Self::new()
                }
            },
            None => Self::new(),
        }
    }

    fn load_dataset_from_file(path: &str) -> Result<Dataset> {
        let dataset =
            Dataset::from_file(path).with_context(|| format!("Could not load dataset {path}"))?;
        if dataset.is_empty() {
            return Err(anyhow!("Dataset {path} contains no compound rows"));
        }
        Ok(dataset)
    }

    fn with_dataset(dataset: Dataset) -> Self {
        let mut selection = Selection::default();
        let targets = dataset.targets();
        // A custom CSV may not contain the default target.
        selection.targets.retain(|t| targets.contains(t));
        if selection.targets.is_empty() {
            selection.targets = targets.into_iter().take(1).collect();
        }
        Self {
            dataset,
            selection,
            rendered_selection: None,
            figure: Figure::default(),
            chart: ChartRender::new(),
            viewer_url: viewer::compound_report_url(viewer::DEFAULT_COMPOUND),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn viewer_url(&self) -> &str {
        &self.viewer_url
    }

    /// Phase-4 compounds of the current Target Group get the red cross.
    fn default_highlights(&self) -> Vec<String> {
        self.dataset
            .rows_for_targets(&self.selection.targets)
            .iter()
            .filter(|row| row.is_approved_drug())
            .map(|row| row.cmpd_chemblid.clone())
            .collect()
    }

    fn rebuild_figure(&mut self) {
        self.figure = match self.selection.view {
            ChartView::Plot(plot_kind) => {
                let config = ChartConfig {
                    targets: self.selection.targets.clone(),
                    x: self.selection.x,
                    y: self.selection.y,
                    z: self.selection.z,
                    size: NumericField::MaxPhase,
                    plot_kind,
                    highlight_ids: self.default_highlights(),
                };
                chart_builder::build_chart(&self.dataset, &config)
            }
            ChartView::Summary => {
                let highlight = self
                    .selection
                    .targets
                    .first()
                    .and_then(|name| self.dataset.target_chemblid(name))
                    .map(|id| id.to_string());
                summary::build_summary_chart(&self.dataset, self.selection.x, highlight.as_deref())
            }
        };
    }

    fn render_controls(&mut self, ui: &mut Ui) {
        ui.heading("ChEMBL Explorer");
        ui.add_space(4.0);
        ui.label("SELECT a target to display its compounds in the graph.");
        ui.label("CLICK on a compound in the graph to open its report card.");
        ui.label("SELECT new axes from the dropdowns below. In all plots, the z axis determines the colour.");
        ui.label("Phase 4 compounds are marked with a red cross.");
        ui.separator();

        ui.label("Targets");
        for target in self.dataset.targets() {
            let mut checked = self.selection.targets.contains(&target);
            if ui.checkbox(&mut checked, &target).changed() {
                if checked {
                    self.selection.targets.push(target);
                } else {
                    self.selection.targets.retain(|t| *t != target);
                }
            }
        }
        ui.separator();

        ComboBox::from_label("X axis")
            .selected_text(self.selection.x.column())
            .show_ui(ui, |ui| {
                for field in NumericField::ALL {
                    ui.selectable_value(&mut self.selection.x, field, field.column());
                }
            });
        ComboBox::from_label("Y axis")
            .selected_text(self.selection.y.column())
            .show_ui(ui, |ui| {
                for field in NumericField::ALL {
                    ui.selectable_value(&mut self.selection.y, field, field.column());
                }
            });
        ComboBox::from_label("Z axis")
            .selected_text(match self.selection.z {
                AxisChoice::Rank => AxisChoice::RANK_LABEL,
                AxisChoice::Field(field) => field.column(),
            })
            .show_ui(ui, |ui| {
                for field in NumericField::ALL {
                    ui.selectable_value(
                        &mut self.selection.z,
                        AxisChoice::Field(field),
                        field.column(),
                    );
                }
                ui.selectable_value(
                    &mut self.selection.z,
                    AxisChoice::Rank,
                    AxisChoice::RANK_LABEL,
                );
            });
        ui.separator();

        for plot_kind in PlotKind::ALL {
            ui.radio_value(
                &mut self.selection.view,
                ChartView::Plot(plot_kind),
                plot_kind.label(),
            );
        }
        ui.radio_value(&mut self.selection.view, ChartView::Summary, "Target summary");
        ui.separator();

        if ui.button("Copy figure JSON").clicked() {
            match self.figure.to_json() {
                Ok(json) => ui.ctx().copy_text(json),
                Err(e) => eprintln!("Could not serialize figure: {e}"),
            }
        }
        ui.separator();

        ui.label("Compound report:");
        let url = self.viewer_url.clone();
        ui.hyperlink_to(
            url.rsplit('/').next().unwrap_or(&url).to_string(),
            url.clone(),
        );
    }

    fn render_chart(&mut self, ui: &mut Ui) {
        let size = ui.available_size();
        self.chart.render(ui, &self.figure);
        let response = ui.allocate_response(size, Sense::click());
        if response.clicked() {
            self.chart.on_click(ui.input(|i| i.pointer.clone()));
            if let Some(url) = viewer::url_from_click(self.chart.take_clicked_compound().as_deref())
            {
                self.viewer_url = url.clone();
                ui.ctx().open_url(egui::OpenUrl::new_tab(url));
            }
        }
    }
}

impl Default for ExplorerApp {
    fn default() -> Self {
        Self::new()
    }
}

impl eframe::App for ExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.rendered_selection.as_ref() != Some(&self.selection) {
            self.rebuild_figure();
            self.rendered_selection = Some(self.selection.clone());
        }

        egui::SidePanel::left("controls")
            .min_width(280.0)
            .show(ctx, |ui| self.render_controls(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.render_chart(ui));
    }
}
