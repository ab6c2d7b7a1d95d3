// viewer.rs — lifecycle controller: mount, controls, dispatch, image swaps

use crate::config::{ConfigError, ViewerConfig};
use crate::input::{Command, Cursor, InputEvent, InputTracker};
use crate::loader::{DefaultFetcher, Fetch, ImageLoader, LoadOutcome};
use crate::render::{Frame, ImageView, Renderer};
use crate::view::{ProjectionMode, ViewState};
use glam::Vec2;
use image::RgbaImage;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("panorama mount point not found")]
    MountMissing,

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("no monitor available for fullscreen")]
    NoMonitor,

    #[error("{0} is not supported by this host")]
    Unsupported(&'static str),
}

/// Capabilities the viewer needs from the element it is mounted on.
pub trait Host {
    /// Current on-screen size of the element, logical pixels.
    fn element_size(&self) -> Vec2;
    fn set_element_height(&mut self, height: f32);
    /// Whether the host currently presents something fullscreen.
    fn fullscreen_element(&self) -> bool;
    fn request_fullscreen(&mut self) -> Result<(), HostError>;
    fn exit_fullscreen(&mut self) -> Result<(), HostError>;
    fn set_cursor(&mut self, cursor: Cursor);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    ZoomIn,
    ZoomOut,
    Reset,
    Fullscreen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControlButton {
    pub control: Control,
    pub label: String,
    pub tooltip: String,
}

/// The on-canvas controls, built once per viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    pub buttons: Vec<ControlButton>,
    pub help: String,
}

impl Control {
    pub const ALL: [Control; 4] = [
        Control::ZoomIn,
        Control::ZoomOut,
        Control::Reset,
        Control::Fullscreen,
    ];

    fn text_keys(&self) -> (&'static str, &'static str) {
        match self {
            Control::ZoomIn => ("tour.zoom_in", "tour.zoom_in.tooltip"),
            Control::ZoomOut => ("tour.zoom_out", "tour.zoom_out.tooltip"),
            Control::Reset => ("tour.reset", "tour.reset.tooltip"),
            Control::Fullscreen => ("tour.fullscreen", "tour.fullscreen.tooltip"),
        }
    }
}

impl Controls {
    fn build() -> Self {
        let mut controls = Self {
            buttons: Control::ALL
                .iter()
                .map(|&control| ControlButton {
                    control,
                    label: String::new(),
                    tooltip: String::new(),
                })
                .collect(),
            help: String::new(),
        };
        controls.relabel();
        controls
    }

    /// Refreshes the text in place from the current language.
    fn relabel(&mut self) {
        for button in &mut self.buttons {
            let (label, tooltip) = button.control.text_keys();
            button.label = crate::i18n::tr(label);
            button.tooltip = crate::i18n::tr(tooltip);
        }
        self.help = crate::i18n::tr("tour.help");
    }
}

#[derive(Debug, Clone)]
pub struct SourceImage {
    pub url: String,
    pub generation: u64,
    pub pixels: Arc<RgbaImage>,
}

#[derive(Debug, Clone)]
pub enum ImageSlot {
    Empty,
    Pending { url: String, generation: u64 },
    Ready(SourceImage),
    Failed { url: String, generation: u64 },
}

impl ImageSlot {
    fn generation(&self) -> Option<u64> {
        match self {
            ImageSlot::Empty => None,
            ImageSlot::Pending { generation, .. } | ImageSlot::Failed { generation, .. } => {
                Some(*generation)
            }
            ImageSlot::Ready(img) => Some(img.generation),
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            ImageSlot::Empty => None,
            ImageSlot::Pending { url, .. } | ImageSlot::Failed { url, .. } => Some(url),
            ImageSlot::Ready(img) => Some(&img.url),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ImageSlot::Pending { .. })
    }

    fn view(&self) -> ImageView {
        match self {
            ImageSlot::Empty => ImageView::None,
            ImageSlot::Pending { .. } => ImageView::Pending,
            ImageSlot::Failed { .. } => ImageView::Failed,
            ImageSlot::Ready(img) => ImageView::Ready {
                generation: img.generation,
                width: img.pixels.width(),
                height: img.pixels.height(),
            },
        }
    }
}

/// An interactive 360° panorama mounted on a host element.
pub struct PanoramaViewer<H: Host> {
    host: H,
    config: ViewerConfig,
    view: ViewState,
    tracker: InputTracker,
    renderer: Renderer,
    controls: Controls,
    loader: ImageLoader,
    image: ImageSlot,
    next_generation: u64,
}

impl<H: Host> PanoramaViewer<H> {
    pub fn mount(host: Option<H>, config: ViewerConfig) -> Result<Self, ViewerError> {
        Self::mount_with_fetcher(host, config, Arc::new(DefaultFetcher))
    }

    pub fn mount_with_fetcher(
        host: Option<H>,
        config: ViewerConfig,
        fetcher: Arc<dyn Fetch>,
    ) -> Result<Self, ViewerError> {
        let Some(host) = host else {
            log::error!("{}", ViewerError::MountMissing);
            return Err(ViewerError::MountMissing);
        };
        if let Err(err) = config.validate() {
            log::error!("refusing to mount: {err}");
            return Err(err.into());
        }

        let loader = ImageLoader::new(fetcher, config.max_image_side);
        let renderer = Renderer::new(config.projection, crate::i18n::tr("tour.placeholder"));
        let mut viewer = Self {
            host,
            view: ViewState::new(),
            tracker: InputTracker::new(),
            renderer,
            controls: Controls::build(),
            loader,
            image: ImageSlot::Empty,
            next_generation: 1,
            config,
        };
        viewer.apply_height();
        viewer.host.set_cursor(Cursor::Grab);
        viewer.update_view();
        Ok(viewer)
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn frame(&self) -> &Frame {
        self.renderer.frame()
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn image_slot(&self) -> &ImageSlot {
        &self.image
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn is_dragging(&self) -> bool {
        self.tracker.is_dragging()
    }

    /// Number of frames produced so far, including the one drawn at mount.
    pub fn render_count(&self) -> u64 {
        self.renderer.frames_drawn()
    }

    pub fn projection(&self) -> ProjectionMode {
        self.renderer.projection()
    }

    /// Presentation height in logical pixels for the current zoom.
    pub fn presentation_height(&self) -> f32 {
        self.config.base_height * self.view.zoom()
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        let reaction = self.tracker.handle(event, &mut self.view, &self.config);
        if let Some(cursor) = reaction.cursor {
            self.host.set_cursor(cursor);
        }
        if reaction.redraw {
            self.update_view();
        }
        match reaction.command {
            Some(Command::Zoom(factor)) => self.zoom(factor),
            Some(Command::Reset) => self.reset_view(),
            Some(Command::ToggleFullscreen) => self.toggle_fullscreen(),
            None => {}
        }
    }

    pub fn click(&mut self, control: Control) {
        match control {
            Control::ZoomIn => self.zoom(self.config.zoom_in_factor),
            Control::ZoomOut => self.zoom(self.config.zoom_out_factor),
            Control::Reset => self.reset_view(),
            Control::Fullscreen => self.toggle_fullscreen(),
        }
    }

    pub fn reset_view(&mut self) {
        self.view.reset();
        self.update_view();
    }

    pub fn zoom(&mut self, factor: f32) {
        self.view.zoom_by(factor, self.config.zoom_bounds());
        self.apply_height();
        self.update_view();
    }

    pub fn toggle_fullscreen(&mut self) {
        if !self.host.fullscreen_element() {
            match self.host.request_fullscreen() {
                Ok(()) => {
                    self.view.set_fullscreen(true);
                    self.update_view();
                }
                Err(err) => log::error!("fullscreen request failed: {err}"),
            }
        } else {
            match self.host.exit_fullscreen() {
                Ok(()) => {
                    self.view.set_fullscreen(false);
                    self.update_view();
                }
                Err(err) => log::error!("leaving fullscreen failed: {err}"),
            }
        }
    }

    /// Picks up fullscreen changes made by the host itself (escape key,
    /// window manager). Rotation and zoom are kept.
    pub fn sync_fullscreen(&mut self) {
        let actual = self.host.fullscreen_element();
        if actual != self.view.is_fullscreen() {
            self.view.set_fullscreen(actual);
            self.update_view();
        }
    }

    pub fn set_projection(&mut self, projection: ProjectionMode) {
        if projection != self.renderer.projection() {
            self.renderer.set_projection(projection);
            self.update_view();
        }
    }

    /// Re-reads control and placeholder text after a language switch.
    pub fn relabel(&mut self) {
        self.controls.relabel();
        self.renderer.set_placeholder(crate::i18n::tr("tour.placeholder"));
        self.update_view();
    }

    /// Swaps the panorama. The load runs in the background; until it
    /// completes the current frame stays on screen.
    pub fn load_tour_image(&mut self, url: impl Into<String>) {
        let url = url.into();
        let generation = self.next_generation;
        self.next_generation += 1;
        self.image = ImageSlot::Pending {
            url: url.clone(),
            generation,
        };
        self.loader.spawn(generation, url);
        self.update_view();
    }

    /// Applies every finished load without blocking. Returns whether the
    /// current image changed.
    pub fn poll_image_loads(&mut self) -> bool {
        let mut changed = false;
        while let Some(outcome) = self.loader.try_next() {
            changed |= self.accept(outcome);
        }
        changed
    }

    /// Blocks for at most `timeout` waiting for one load to finish.
    pub fn wait_for_image_load(&mut self, timeout: Duration) -> bool {
        match self.loader.next_timeout(timeout) {
            Some(outcome) => self.accept(outcome),
            None => false,
        }
    }

    fn accept(&mut self, outcome: LoadOutcome) -> bool {
        if self.image.generation() != Some(outcome.generation) {
            log::debug!(
                "discarding stale load of {} (generation {})",
                outcome.url,
                outcome.generation
            );
            return false;
        }
        self.image = match outcome.result {
            Ok(pixels) => ImageSlot::Ready(SourceImage {
                url: outcome.url,
                generation: outcome.generation,
                pixels: Arc::new(pixels),
            }),
            Err(err) => {
                log::error!("failed to load panorama {}: {err}", outcome.url);
                ImageSlot::Failed {
                    url: outcome.url,
                    generation: outcome.generation,
                }
            }
        };
        self.update_view();
        true
    }

    fn apply_height(&mut self) {
        let height = self.presentation_height();
        self.host.set_element_height(height);
    }

    /// Redraws at the element's current on-screen size.
    pub fn update_view(&mut self) {
        let size = self.host.element_size();
        self.renderer.render(&self.view, self.image.view(), size);
    }
}
