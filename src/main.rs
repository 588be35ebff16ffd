mod app;

use std::path::PathBuf;

use clap::Parser;
use steer_graph::source::GraphSource;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON graph document; the built-in demo graph is shown without one.
    #[arg(long)]
    graph: Option<PathBuf>,

    /// Start with the flat layout.
    #[arg(long)]
    planar: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    let source = GraphSource::from_arg(args.graph);
    let planar = args.planar;
    eframe::run_native(
        "steer-graph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::SteerGraphApp::new(
                cc,
                source.clone(),
                planar,
            )))
        }),
    )
}
