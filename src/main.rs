#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use eframe::egui;

mod app;
mod editor;
mod error;
mod export;
mod geometry;
mod ratio;
mod source;
mod state;

use app::CropperApp;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "QuickCrop",
        options,
        Box::new(|cc| Ok(Box::new(CropperApp::new(cc)))),
    )
}
