//! Interactive viewer for resolved cutting patterns.
//!
//! Opens an optimizer report (given as the first argument, or through the
//! File menu) and draws one stock bar at a time with its cuts and waste.

mod app;
mod canvas;
mod layers;
mod theme;
mod transform;

use std::path::PathBuf;

use app::ViewerApp;
use tracing_subscriber::EnvFilter;

const WINDOW_TITLE: &str = "Nesting Viewer";

/// First positional argument; flags passed by launchers are ignored.
fn report_argument(args: impl IntoIterator<Item = String>) -> Option<PathBuf> {
    args.into_iter()
        .skip(1)
        .find(|arg| !arg.starts_with('-'))
        .map(PathBuf::from)
}

fn main() -> eframe::Result<()> {
    // RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let report = report_argument(std::env::args());
    if let Some(path) = &report {
        tracing::info!(path = %path.display(), "opening report from command line");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 480.0])
            .with_title(WINDOW_TITLE),
        vsync: false,
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, report)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_report_argument_skips_flags() {
        assert_eq!(
            report_argument(args(&["nesting-viewer", "--verbose", "bars.json"])),
            Some(PathBuf::from("bars.json"))
        );
    }

    #[test]
    fn test_report_argument_missing() {
        assert_eq!(report_argument(args(&["nesting-viewer"])), None);
        assert_eq!(report_argument(args(&["nesting-viewer", "-v"])), None);
    }
}
