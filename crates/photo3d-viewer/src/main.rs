mod app;
mod cli;
mod controls;

use anyhow::Result;
use clap::Parser;

use photo3d_engine::device::GpuInit;
use photo3d_engine::logging::{init_logging, LoggingConfig};
use photo3d_engine::window::{Runtime, RuntimeConfig};

use crate::app::ViewerApp;
use crate::cli::Args;
use crate::controls::Controls;

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    let controls = Controls::new(args.mode, args.step);
    let settings = controls.settings();
    log::info!(
        "starting: mode={} step={} image={}",
        settings.mode,
        settings.step.get(),
        args.image
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<none>".into())
    );

    Runtime::run(
        RuntimeConfig {
            title: "photo3d".to_string(),
            ..RuntimeConfig::default()
        },
        GpuInit::for_photos(),
        ViewerApp::new(args.image, controls),
    )
}
