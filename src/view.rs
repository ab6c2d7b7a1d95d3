// view.rs — view angles, zoom scale and projection mode

use serde::{Deserialize, Serialize};

pub const PITCH_LIMIT: f32 = 90.0;
const FULL_TURN: f32 = 360.0;

/// How the renderer turns yaw into a 2D frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectionMode {
    /// Whole-frame rotation by yaw on top of the horizontal wrap offset.
    Composed,
    /// Horizontal wrap offset only.
    #[default]
    OffsetOnly,
}

impl ProjectionMode {
    pub fn all() -> &'static [ProjectionMode] {
        &[ProjectionMode::OffsetOnly, ProjectionMode::Composed]
    }

    /// i18n key of the display name.
    pub fn label_key(&self) -> &'static str {
        match self {
            ProjectionMode::Composed => "projection.composed",
            ProjectionMode::OffsetOnly => "projection.offset_only",
        }
    }
}

/// Allowed range of the zoom scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    pub min: f32,
    pub max: f32,
}

impl ZoomBounds {
    /// Derives scale bounds from presentation heights in logical pixels.
    pub fn from_heights(base: f32, min_height: f32, max_height: f32) -> Self {
        Self {
            min: min_height / base,
            max: max_height / base,
        }
    }

    pub fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.min, self.max)
    }
}

/// Wraps an angle into `[0, 360)`.
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(FULL_TURN);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= FULL_TURN {
        0.0
    } else {
        wrapped
    }
}

pub fn clamp_pitch(pitch: f32) -> f32 {
    pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT)
}

/// Rotation, zoom and fullscreen state of one viewer.
///
/// Yaw always lies in `[0, 360)`, pitch in `[-90, 90]`. The zoom scale is
/// kept inside the bounds it was last changed with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    yaw: f32,
    pitch: f32,
    zoom: f32,
    is_fullscreen: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            zoom: 1.0,
            is_fullscreen: false,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    /// Adds deltas in degrees, wrapping yaw and clamping pitch.
    pub fn rotate_by(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw = wrap_degrees(self.yaw + yaw_delta);
        self.pitch = clamp_pitch(self.pitch + pitch_delta);
    }

    /// Multiplies the zoom scale by `factor`. Returns whether it changed.
    pub fn zoom_by(&mut self, factor: f32, bounds: ZoomBounds) -> bool {
        let next = bounds.clamp(self.zoom * factor);
        let changed = next != self.zoom;
        self.zoom = next;
        changed
    }

    /// Back to the origin. Zoom and fullscreen are left alone.
    pub fn reset(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
    }

    pub fn set_fullscreen(&mut self, on: bool) {
        self.is_fullscreen = on;
    }
}
