//! Markstash Desktop Application
//!
//! A desktop app for saving and revisiting bookmarks.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod bootstrap_config;
mod components;
mod filters;
mod services;
mod state;
mod theme;
mod views;

use dioxus::desktop::{Config, LogicalSize, WindowBuilder};

fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("markstash=debug".parse().unwrap()),
        )
        .init();

    tracing::info!("Starting Markstash...");

    let window = WindowBuilder::new()
        .with_title("Markstash")
        .with_inner_size(LogicalSize::new(1200.0, 800.0));
    let config = Config::new().with_window(window);

    // Launch the app
    dioxus::LaunchBuilder::new()
        .with_cfg(config)
        .launch(app::App);
}
