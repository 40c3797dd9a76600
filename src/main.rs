mod app;
mod cluster;
mod treemap;
mod util;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::app::AppConfig;
use crate::cluster::{MetricKind, MetricSelector};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MetricArg {
    Global,
    Country,
    StateUs,
}

impl From<MetricArg> for MetricKind {
    fn from(value: MetricArg) -> Self {
        match value {
            MetricArg::Global => Self::Global,
            MetricArg::Country => Self::Country,
            MetricArg::StateUs => Self::StateUs,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Cluster hierarchy as JSON. The bundled sample is shown when omitted.
    #[arg(long)]
    data: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = MetricArg::Global)]
    metric: MetricArg,
    /// Country or US state code for the geographic metrics.
    #[arg(long)]
    geo: Option<String>,
    #[arg(long, default_value_t = 1280.0)]
    width: f32,
    #[arg(long, default_value_t = 820.0)]
    height: f32,
    /// Length of the drill animation.
    #[arg(long, default_value_t = 750)]
    duration_ms: u64,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = AppConfig {
        data_path: args.data,
        selector: MetricSelector::new(args.metric.into(), args.geo.as_deref()),
        zoom_seconds: args.duration_ms as f64 / 1000.0,
    };
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width.max(320.0), args.height.max(240.0)]),
        ..Default::default()
    };

    eframe::run_native(
        "cluster-treemap",
        options,
        Box::new(move |cc| Ok(Box::new(app::TreemapApp::new(cc, config)))),
    )
}
