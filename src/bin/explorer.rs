use chembl_explorer::app::ExplorerApp;
use eframe::{egui, NativeOptions};
use std::env;

fn main() -> eframe::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("chembl-explorer {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    // An optional CSV path replaces the bundled demo dataset.
    let dataset_path = args.iter().find(|a| !a.starts_with('-')).cloned();

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "ChEMBL Explorer",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(ExplorerApp::new_with_dataset(
                dataset_path.as_deref(),
            )))
        }),
    )
}
