use clap::Parser;
use colorbook::catalog::{GlobCatalog, ImageCatalog};
use colorbook::state::ToolSettings;
use colorbook::ui::ColoringApp;

/// Flood-fill coloring book for line-art pages.
#[derive(Parser, Debug)]
#[command(name = "colorbook", version, about)]
struct Args {
    /// Picture to open: a file path, http(s) URL or data URI
    image: Option<String>,

    /// Files, glob patterns or URLs offered in the gallery
    #[arg(short, long, num_args = 1..)]
    catalog: Vec<String>,

    /// Fill color-match tolerance (0-255)
    #[arg(short, long)]
    tolerance: Option<u32>,

    /// Eraser radius in image pixels
    #[arg(short, long)]
    eraser_radius: Option<f32>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut settings = ToolSettings::default();
    if let Some(tolerance) = args.tolerance {
        settings.fill_tolerance = tolerance;
    }
    if let Some(radius) = args.eraser_radius {
        settings.eraser_radius = radius.max(1.0);
    }

    let catalog: Box<dyn ImageCatalog> = Box::new(GlobCatalog::new(args.catalog));
    log::info!("Starting with settings {:?}", settings);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Colorbook"),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "Colorbook",
        options,
        Box::new(move |cc| Ok(Box::new(ColoringApp::new(cc, catalog, settings, args.image)))),
    ) {
        log::error!("Failed to start application: {}", e);
    }
}
