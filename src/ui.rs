// ui.rs — menu bar, status bar and the on-canvas controls

use crate::host::WindowHost;
use crate::i18n::{tr, tr_with, LANGUAGES};
use crate::paint::{paint_frame, sync_texture, PanoramaTexture};
use crate::view::ProjectionMode;
use crate::viewer::{Control, ImageSlot, PanoramaViewer};
use egui::{Align2, Color32, RichText};
use glam::Vec2;
use std::path::PathBuf;
use winit::window::Window;

pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

/// Requests the UI cannot carry out itself during an egui pass.
#[derive(Debug, Default)]
pub struct UiState {
    pub url_input: String,
    pub current_lang: String,
    pub lang_changed: bool,
    pub exit_requested: bool,
    pub texture: Option<PanoramaTexture>,
}

impl UiState {
    pub fn new(lang: String) -> Self {
        Self {
            current_lang: lang,
            ..Self::default()
        }
    }
}

pub fn pick_image_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter(tr("file.filter.images"), &IMAGE_EXTENSIONS)
        .pick_file()
}

pub fn draw_ui(
    ctx: &egui::Context,
    viewer: &mut PanoramaViewer<WindowHost>,
    state: &mut UiState,
    window: &Window,
) {
    let fullscreen = viewer.view().is_fullscreen();
    if !fullscreen {
        menu_bar(ctx, viewer, state, window);
        status_bar(ctx, viewer);
    }

    let available = ctx.available_rect();
    let height = if fullscreen {
        available.height()
    } else {
        viewer.host().element_height().min(available.height())
    };
    let canvas = egui::Rect::from_min_size(available.min, egui::vec2(available.width(), height));

    // The frame follows the element's on-screen size.
    let size = Vec2::new(canvas.width(), canvas.height());
    if viewer.host().element_size_changed(size) {
        viewer.host_mut().set_element_size(size);
        viewer.update_view();
    }

    sync_texture(ctx, viewer.image_slot(), &mut state.texture);
    let painter = ctx.layer_painter(egui::LayerId::background());
    paint_frame(&painter, canvas, viewer.frame(), state.texture.as_ref());

    canvas_overlay(ctx, viewer, canvas);
}

fn canvas_overlay(
    ctx: &egui::Context,
    viewer: &mut PanoramaViewer<WindowHost>,
    canvas: egui::Rect,
) {
    let caption = egui::Frame::none()
        .fill(Color32::from_black_alpha(128))
        .rounding(5.0)
        .inner_margin(10.0);

    egui::Area::new(egui::Id::new("tour360_help"))
        .fixed_pos(canvas.min + egui::vec2(10.0, 10.0))
        .show(ctx, |ui| {
            caption.show(ui, |ui| {
                ui.label(
                    RichText::new(&viewer.controls().help)
                        .size(12.0)
                        .color(Color32::WHITE),
                );
            });
        });

    let mut clicked = None;
    egui::Area::new(egui::Id::new("tour360_controls"))
        .fixed_pos(canvas.center_bottom() - egui::vec2(0.0, 20.0))
        .pivot(Align2::CENTER_BOTTOM)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                for button in &viewer.controls().buttons {
                    let text = RichText::new(&button.label).strong().color(Color32::BLACK);
                    let widget = egui::Button::new(text)
                        .fill(Color32::from_white_alpha(204))
                        .rounding(5.0);
                    if ui.add(widget).on_hover_text(&button.tooltip).clicked() {
                        clicked = Some(button.control);
                    }
                }
            });
        });

    if let Some(control) = clicked {
        viewer.click(control);
    }
}

fn menu_bar(
    ctx: &egui::Context,
    viewer: &mut PanoramaViewer<WindowHost>,
    state: &mut UiState,
    window: &Window,
) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button(tr("menu.file"), |ui| {
                if ui.button(tr("menu.open_image")).clicked() {
                    ui.close_menu();
                    if let Some(path) = pick_image_file() {
                        viewer.load_tour_image(path.display().to_string());
                    }
                }
                ui.horizontal(|ui| {
                    let edit = ui.add(
                        egui::TextEdit::singleline(&mut state.url_input)
                            .hint_text("https://…/pano.jpg")
                            .desired_width(240.0),
                    );
                    let submitted =
                        edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if (ui.button(tr("menu.load_url")).clicked() || submitted)
                        && !state.url_input.trim().is_empty()
                    {
                        viewer.load_tour_image(state.url_input.trim().to_string());
                        ui.close_menu();
                    }
                });
                ui.separator();
                if ui.button(tr("menu.exit")).clicked() {
                    state.exit_requested = true;
                    ui.close_menu();
                }
            });

            ui.menu_button(tr("menu.view"), |ui| {
                if ui.button(tr("view.reset")).clicked() {
                    viewer.reset_view();
                    ui.close_menu();
                }
                if ui.button(tr("view.zoom_in")).clicked() {
                    viewer.click(Control::ZoomIn);
                }
                if ui.button(tr("view.zoom_out")).clicked() {
                    viewer.click(Control::ZoomOut);
                }
                let fullscreen_label = if viewer.view().is_fullscreen() {
                    tr("view.fullscreen.exit")
                } else {
                    tr("view.fullscreen.enter")
                };
                if ui.button(fullscreen_label).clicked() {
                    viewer.toggle_fullscreen();
                    ui.close_menu();
                }

                ui.separator();
                ui.menu_button(tr("view.projection_mode"), |ui| {
                    let mut mode = viewer.projection();
                    for candidate in ProjectionMode::all() {
                        ui.radio_value(&mut mode, *candidate, tr(candidate.label_key()));
                    }
                    if mode != viewer.projection() {
                        viewer.set_projection(mode);
                        ui.close_menu();
                    }
                });
            });

            ui.menu_button(tr("menu.language"), |ui| {
                for (code, name) in LANGUAGES {
                    if ui
                        .radio_value(&mut state.current_lang, code.to_string(), name)
                        .clicked()
                    {
                        crate::i18n::init(state.current_lang.clone());
                        window.set_title(&tr("app.title"));
                        state.lang_changed = true;
                        ui.close_menu();
                    }
                }
            });
        });
    });
}

fn status_bar(ctx: &egui::Context, viewer: &PanoramaViewer<WindowHost>) {
    let view = viewer.view();
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            match viewer.image_slot() {
                ImageSlot::Pending { .. } => {
                    ui.label(RichText::new(tr("status.loading_image")).color(Color32::YELLOW));
                }
                ImageSlot::Failed { .. } => {
                    ui.label(RichText::new(tr("status.load_failed")).color(Color32::RED));
                }
                ImageSlot::Empty => {
                    ui.label(tr("status.no_image"));
                }
                ImageSlot::Ready(image) => {
                    ui.label(format!(
                        "{} ({}×{})",
                        image.url,
                        image.pixels.width(),
                        image.pixels.height()
                    ));
                }
            }
            ui.label("|");
            ui.label(format!(
                "{} {}",
                tr("status.mode_prefix"),
                tr(viewer.projection().label_key())
            ));
            ui.label("|");
            ui.label(format!("{} {:.0}%", tr("status.zoom_prefix"), view.zoom() * 100.0));
            ui.label("|");
            ui.label(angle_label("status.yaw", view.yaw()));
            ui.label("|");
            ui.label(angle_label("status.pitch", view.pitch()));
        });
    });
}

fn angle_label(key: &str, degrees: f32) -> String {
    tr_with(key, &[("deg", format!("{degrees:.1}"))])
}
