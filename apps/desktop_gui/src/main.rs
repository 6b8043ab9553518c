use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::anyhow;
use clap::Parser;
use client_core::{config::normalize_backend_url, load_settings, Settings};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::{commands::BackendCommand, runtime};
use crate::controller::events::UiEvent;
use crate::ui::{app::APP_TITLE, CaseStudyApp, StartupConfig};

#[derive(Debug, Parser)]
#[command(name = "desktop_gui", about = "ISO/IEC 29100 case study desktop client")]
struct Args {
    /// Base URL of the case-study backend.
    #[arg(long)]
    backend_url: Option<String>,
    /// Directory the exported PDFs are written to.
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

fn apply_args(mut settings: Settings, args: Args) -> Settings {
    if let Some(backend_url) = args.backend_url {
        settings.backend_url = normalize_backend_url(&backend_url);
    }
    if let Some(export_dir) = args.export_dir {
        settings.export_dir = export_dir;
    }
    settings
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = apply_args(load_settings(), Args::parse());
    tracing::info!(
        backend_url = %settings.backend_url,
        export_dir = %settings.export_dir.display(),
        "starting desktop client"
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    runtime::launch(&settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([720.0, 520.0]),
        ..Default::default()
    };
    let startup = StartupConfig::from_settings(&settings);
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(CaseStudyApp::new(cmd_tx, ui_rx, startup)))),
    )
    .map_err(|err| anyhow!("desktop window failed: {err}"))
}
