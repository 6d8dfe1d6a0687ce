use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use clap::Parser;
use client_core::config::load_settings;
use controller::events::UiEvent;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;
use ui::{CategoriesAdminApp, PersistedListPreferences, PREFERENCES_STORAGE_KEY};

#[derive(Parser, Debug)]
#[command(about = "Desktop admin for the category service")]
struct Args {
    /// Overrides the configured API base URL.
    #[arg(long)]
    api_base_url: Option<String>,
    /// Settings file; defaults to ./category_admin.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    page_size: Option<u32>,
    /// Milliseconds the delete confirmation stays open after a successful delete.
    #[arg(long)]
    delete_close_delay_ms: Option<u64>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref());
    if let Some(api_base_url) = args.api_base_url {
        settings.api_base_url = api_base_url;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size.max(1);
    }
    if let Some(delay_ms) = args.delete_close_delay_ms {
        settings.delete_close_delay_ms = delay_ms;
    }
    tracing::info!(api_base_url = %settings.api_base_url, "starting category admin");

    let page_size = settings.page_size;
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Category Admin")
            .with_inner_size([1080.0, 720.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Category Admin",
        options,
        Box::new(move |cc| {
            let persisted = cc.storage.and_then(|storage| {
                storage
                    .get_string(PREFERENCES_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedListPreferences>(&text).ok())
            });
            Ok(Box::new(CategoriesAdminApp::new(
                cmd_tx, ui_rx, page_size, persisted,
            )))
        }),
    )
}
