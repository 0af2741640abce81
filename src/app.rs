//! The single interactive view: input surfaces, ratio picker, crop editor
//! overlay, and the export action.

use std::sync::mpsc::{self, Receiver, SyncSender};

use eframe::egui;

use crate::editor::{self, ResizeHandle};
use crate::export;
use crate::geometry::{CropRect, DisplaySize};
use crate::ratio::RatioChoice;
use crate::source::{self, LoadOutcome, LoadRequest};
use crate::state::{CropperState, SourceImage};

const PADDING: f32 = 20.0;
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

pub struct CropperApp {
    state: CropperState,
    texture: Option<egui::TextureHandle>,
    url_input: String,
    selected_handle: Option<ResizeHandle>,
    /// Anchor of a selection being drawn where none existed.
    create_anchor: Option<egui::Pos2>,
    tx: SyncSender<LoadOutcome>,
    rx: Receiver<LoadOutcome>,
}

impl CropperApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let (tx, rx) = mpsc::sync_channel(4);
        Self {
            state: CropperState::default(),
            texture: None,
            url_input: String::new(),
            selected_handle: None,
            create_anchor: None,
            tx,
            rx,
        }
    }

    fn request_load(&self, request: LoadRequest, ctx: &egui::Context) {
        source::spawn_load(request, self.tx.clone(), ctx.clone());
    }

    /// Apply finished background loads. Failures were already logged by the
    /// worker and leave prior state untouched. Overlapping loads are not
    /// sequenced: the last to resolve wins.
    fn drain_loads(&mut self, ctx: &egui::Context) {
        while let Ok(outcome) = self.rx.try_recv() {
            if let Ok(image) = outcome {
                self.texture = Some(Self::upload_texture(ctx, &image));
                self.state.set_image(image);
                self.selected_handle = None;
                self.create_anchor = None;
            }
        }
    }

    fn upload_texture(ctx: &egui::Context, image: &SourceImage) -> egui::TextureHandle {
        let size = [image.natural.0 as usize, image.natural.1 as usize];
        let buffer = image.image.to_rgba8();
        let pixels = buffer.as_flat_samples();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
        ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR)
    }

    fn export_selection(&self) {
        let (Some(source_img), Some(crop), Some(display)) = (
            self.state.image(),
            self.state.crop(),
            self.state.display(),
        ) else {
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(export::OUTPUT_FILENAME)
            .save_file()
        else {
            return;
        };

        match export::export(&source_img.image, display, crop) {
            Ok(artifact) => match export::write_artifact(&artifact, &path) {
                Ok(()) => log::info!("saved {} ({} bytes)", path.display(), artifact.png.len()),
                Err(err) => log::error!("{err}"),
            },
            Err(err) => log::warn!("export aborted: {err}"),
        }
    }

    fn show_controls(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            if ui.button("Open Image…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Image", IMAGE_EXTENSIONS)
                    .pick_file()
                {
                    self.request_load(LoadRequest::File(path), ctx);
                }
            }

            ui.separator();
            ui.label("URL:");
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.url_input)
                    .desired_width(260.0)
                    .hint_text("https://…"),
            );
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if (ui.button("Load URL").clicked() || submitted)
                && !self.url_input.trim().is_empty()
            {
                self.request_load(LoadRequest::Url(self.url_input.trim().to_string()), ctx);
            }
        });

        if self.texture.is_some() {
            ui.horizontal(|ui| {
                ui.label("Aspect Ratio:");
                let mut selected = self.state.ratio();
                egui::ComboBox::from_id_salt("aspect_ratio")
                    .selected_text(selected.to_string())
                    .show_ui(ui, |ui| {
                        for choice in RatioChoice::ALL {
                            ui.selectable_value(&mut selected, choice, choice.to_string());
                        }
                    });
                if selected != self.state.ratio() {
                    // Lazy: the new constraint applies on the next drag.
                    self.state.select_ratio(selected);
                }

                if self.state.can_export() {
                    ui.separator();
                    if ui.button("Save Cropped PNG…").clicked() {
                        self.export_selection();
                    }
                }
            });
            ui.separator();
        }
    }

    fn show_image(&mut self, ui: &mut egui::Ui) {
        let Some(texture) = self.texture.clone() else {
            ui.centered_and_justified(|ui| {
                ui.label("Drop an image here, open a file, or load a URL");
            });
            return;
        };

        let available = ui.available_size();
        let max_size = available - egui::vec2(PADDING * 2.0, PADDING * 2.0);
        let image_size = texture.size_vec2();

        // Fit within the available space, preserving the image's aspect.
        let scale = (max_size.x / image_size.x).min(max_size.y / image_size.y);
        let display_size = image_size * scale;
        let display = DisplaySize::new(display_size.x, display_size.y);
        self.state.sync_display(display);

        let total_size = display_size + egui::vec2(PADDING * 2.0, PADDING * 2.0);
        let x_offset = (available.x - total_size.x) / 2.0;
        let y_offset = (available.y - total_size.y) / 2.0;
        let start = ui.cursor().min + egui::vec2(x_offset.max(0.0), y_offset.max(0.0));
        let target_rect = egui::Rect::from_min_size(start, total_size);

        let response = ui.allocate_rect(target_rect, egui::Sense::drag());
        let painter = ui.painter_at(target_rect);

        let image_rect = egui::Rect::from_min_size(
            target_rect.min + egui::vec2(PADDING, PADDING),
            display_size,
        );

        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        let to_screen = |crop: CropRect| {
            egui::Rect::from_min_size(
                image_rect.min + egui::vec2(crop.x, crop.y),
                egui::vec2(crop.w, crop.h),
            )
        };
        let ratio = self.state.active_ratio();

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.selected_handle = self
                    .state
                    .crop()
                    .and_then(|crop| editor::hit_test(pos, to_screen(crop)));
                if self.selected_handle.is_none() && image_rect.contains(pos) {
                    self.create_anchor = Some(pos);
                }
            }
        }

        if response.dragged() {
            if let Some(anchor) = self.create_anchor {
                if let Some(pos) = response.interact_pointer_pos() {
                    let crop = editor::create(
                        (anchor - image_rect.min).to_pos2(),
                        (pos - image_rect.min).to_pos2(),
                        ratio,
                        display,
                    );
                    self.state.set_crop(crop, display);
                }
            } else if let (Some(handle), Some(crop)) = (self.selected_handle, self.state.crop())
            {
                let next = editor::drag(crop, handle, response.drag_delta(), ratio, display);
                self.state.set_crop(next, display);
            }
        }

        if response.drag_stopped() {
            self.selected_handle = None;
            self.create_anchor = None;
            // Discard selections too small to export.
            if self.state.crop().is_some_and(|c| c.is_empty()) {
                self.state.clear_crop();
            }
        }

        if let Some(crop) = self.state.crop() {
            let screen_crop = to_screen(crop);
            paint_overlay(&painter, image_rect, screen_crop);
        }
    }
}

/// Dim everything outside the selection, then draw its border and handles.
fn paint_overlay(painter: &egui::Painter, image_rect: egui::Rect, screen_crop: egui::Rect) {
    let overlay_color = egui::Color32::from_black_alpha(150);

    // Top
    painter.rect_filled(
        egui::Rect::from_min_max(
            image_rect.min,
            egui::pos2(image_rect.max.x, screen_crop.min.y),
        ),
        0.0,
        overlay_color,
    );
    // Bottom
    painter.rect_filled(
        egui::Rect::from_min_max(
            egui::pos2(image_rect.min.x, screen_crop.max.y),
            image_rect.max,
        ),
        0.0,
        overlay_color,
    );
    // Left
    painter.rect_filled(
        egui::Rect::from_min_max(
            egui::pos2(image_rect.min.x, screen_crop.min.y),
            egui::pos2(screen_crop.min.x, screen_crop.max.y),
        ),
        0.0,
        overlay_color,
    );
    // Right
    painter.rect_filled(
        egui::Rect::from_min_max(
            egui::pos2(screen_crop.max.x, screen_crop.min.y),
            egui::pos2(image_rect.max.x, screen_crop.max.y),
        ),
        0.0,
        overlay_color,
    );

    painter.rect_stroke(
        screen_crop,
        0.0,
        egui::Stroke::new(1.0, egui::Color32::WHITE),
    );

    let handle_radius = 6.0;
    let handle_stroke = egui::Stroke::new(1.0, egui::Color32::BLACK);
    let handle_fill = egui::Color32::WHITE;

    let handles = [
        screen_crop.min,
        screen_crop.max,
        egui::pos2(screen_crop.min.x, screen_crop.max.y),
        egui::pos2(screen_crop.max.x, screen_crop.min.y),
        screen_crop.center_top(),
        screen_crop.center_bottom(),
        screen_crop.left_center(),
        screen_crop.right_center(),
    ];

    for pos in handles {
        painter.circle(pos, handle_radius, handle_fill, handle_stroke);
    }
}

impl eframe::App for CropperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_loads(ctx);

        // A file dropped anywhere on the window loads it.
        if !ctx.input(|i| i.raw.dropped_files.is_empty()) {
            let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
            if let Some(path) = dropped_files.first().and_then(|f| f.path.clone()) {
                self.request_load(LoadRequest::File(path), ctx);
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_controls(ui, ctx);
            self.show_image(ui);
        });
    }
}
