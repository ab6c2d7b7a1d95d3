// lib.rs — Paradise Eden Villa 360° virtual tour viewer
//
// The viewer core (view state, input tracking, frame rendering, image
// loading and the lifecycle controller) is host-agnostic; the winit/egui/wgpu
// host lives in `host`, `display`, `paint` and `ui`.

pub mod config;
pub mod display;
pub mod fonts;
pub mod host;
pub mod i18n;
pub mod input;
pub mod loader;
pub mod paint;
pub mod render;
pub mod ui;
pub mod view;
pub mod viewer;

pub use config::ViewerConfig;
pub use input::{InputEvent, Key, PointerSample};
pub use view::{ProjectionMode, ViewState};
pub use viewer::{Control, Host, HostError, PanoramaViewer, ViewerError};
