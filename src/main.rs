// main.rs — native host: window, event loop, menus and the panorama viewer

// hide the console in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context as _;
use clap::Parser;
use std::sync::Arc;
use tour360::config::Cli;
use tour360::display::Display;
use tour360::host::{ends_drag, EventTranslator, WindowHost};
use tour360::i18n::tr;
use tour360::ui::{draw_ui, pick_image_file, UiState};
use tour360::{fonts, i18n, PanoramaViewer};
use winit::{
    dpi::LogicalSize,
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let lang = cli.resolve_lang();
    i18n::init(lang.clone());
    let config = cli.viewer_config().context("loading viewer config")?;

    let event_loop = EventLoop::new();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(tr("app.title"))
            .with_inner_size(LogicalSize::new(1280, 720))
            .build(&event_loop)
            .context("creating window")?,
    );

    let mut display = pollster::block_on(Display::new(window.clone()))?;
    fonts::install_ui_font(&display.egui_ctx, &lang);

    let mut viewer = PanoramaViewer::mount(Some(WindowHost::new(window.clone())), config)?;
    if let Some(url) = cli.image {
        viewer.load_tour_image(url);
    }

    let mut translator = EventTranslator::new();
    let mut ui_state = UiState::new(lang);

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        viewer.poll_image_loads();

        match &event {
            Event::WindowEvent { event, .. } => {
                let response = display.egui_state.on_event(&display.egui_ctx, event);

                match event {
                    WindowEvent::CloseRequested => {
                        *control_flow = ControlFlow::Exit;
                    }

                    WindowEvent::Resized(new_size) => {
                        display.resize(*new_size);
                        // fullscreen may have been left by the window manager
                        viewer.sync_fullscreen();
                    }

                    WindowEvent::ScaleFactorChanged {
                        scale_factor,
                        new_inner_size,
                    } => {
                        display.resize(**new_inner_size);
                        display.set_pixels_per_point(*scale_factor);
                    }

                    WindowEvent::DroppedFile(path) => {
                        viewer.load_tour_image(path.display().to_string());
                    }

                    WindowEvent::KeyboardInput { input, .. }
                        if !response.consumed && input.state == ElementState::Pressed =>
                    {
                        match input.virtual_keycode {
                            Some(VirtualKeyCode::O) => {
                                if let Some(path) = pick_image_file() {
                                    viewer.load_tour_image(path.display().to_string());
                                }
                            }
                            Some(VirtualKeyCode::F11) => viewer.toggle_fullscreen(),
                            Some(VirtualKeyCode::Escape) if viewer.view().is_fullscreen() => {
                                viewer.toggle_fullscreen();
                            }
                            _ => {}
                        }
                    }

                    _ => {}
                }

                if let Some(input) = translator.translate(event, window.scale_factor()) {
                    if !response.consumed || ends_drag(&input) {
                        viewer.handle_event(&input);
                    }
                }
            }

            Event::RedrawRequested(_) => {
                let result = display.render_with_ui(&window, |ctx| {
                    draw_ui(ctx, &mut viewer, &mut ui_state, &window);
                });

                if ui_state.lang_changed {
                    ui_state.lang_changed = false;
                    fonts::install_ui_font(&display.egui_ctx, &ui_state.current_lang);
                    viewer.relabel();
                }
                if ui_state.exit_requested {
                    *control_flow = ControlFlow::Exit;
                }

                match result {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => display.resize(display.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => *control_flow = ControlFlow::Exit,
                    Err(e) => log::error!("render error: {e:?}"),
                }
            }

            Event::MainEventsCleared => {
                window.request_redraw();
            }

            _ => {}
        }
    });
}
