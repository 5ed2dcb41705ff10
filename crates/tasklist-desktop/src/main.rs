//! Tasklist Desktop Application
//!
//! A single-window todo board backed by Supabase.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod components;
mod services;
mod state;

use dioxus::desktop::{Config, LogicalSize, WindowBuilder};
use tracing_subscriber::EnvFilter;

fn main() {
    // Load SUPABASE_* settings from a .env file when present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tasklist=debug")),
        )
        .init();

    tracing::info!("Starting Tasklist...");

    let config = Config::new().with_window(
        WindowBuilder::new()
            .with_title("Tasklist")
            .with_inner_size(LogicalSize::new(560.0, 760.0)),
    );

    dioxus::LaunchBuilder::new()
        .with_cfg(config)
        .launch(app::App);
}
