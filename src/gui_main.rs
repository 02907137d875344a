use eframe::{run_native, NativeOptions};
use egui::ViewportBuilder;

use termscan::gui::TermScanApp;

fn main() -> Result<(), eframe::Error> {
    // Initialize logging
    env_logger::init();

    // Set up native options
    let options = NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("TermScan"),
        ..Default::default()
    };

    // Run the app
    run_native(
        "TermScan",
        options,
        Box::new(|cc| Box::new(TermScanApp::new(cc))),
    )
}
