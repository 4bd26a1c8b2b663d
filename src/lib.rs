use dataset::Dataset;
use lazy_static::lazy_static;

pub mod app;
pub mod axes;
pub mod chart_builder;
pub mod chart_render;
pub mod dataset;
pub mod derived;
pub mod error;
pub mod figure;
pub mod markers;
pub mod summary;
pub mod viewer;

lazy_static! {
    // The compound table, loaded once at startup and read-only afterwards.
    pub static ref DATASET: Dataset = Dataset::default();
}
