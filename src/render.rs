// render.rs — builds 2D frames from the view state (seamless horizontal wrap)

use crate::view::{ProjectionMode, ViewState};
use egui::Color32;
use glam::{Affine2, Vec2};

pub const BACKDROP: Color32 = Color32::from_rgb(0x1a, 0x1a, 0x1a);
pub const GRADIENT_FROM: Color32 = Color32::from_rgb(0x1a, 0x5f, 0x7a);
pub const GRADIENT_TO: Color32 = Color32::from_rgb(0x0d, 0x3a, 0x4a);
pub const LABEL_FONT_SIZE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Color32),
    /// Linear gradient from `start` (color `from`) to `end` (color `to`).
    LinearGradient {
        start: Vec2,
        end: Vec2,
        from: Color32,
        to: Color32,
    },
}

impl Paint {
    /// Color at `point`, in frame coordinates.
    pub fn color_at(&self, point: Vec2) -> Color32 {
        match *self {
            Paint::Solid(color) => color,
            Paint::LinearGradient {
                start,
                end,
                from,
                to,
            } => {
                let axis = end - start;
                let len_sq = axis.length_squared();
                let t = if len_sq > 0.0 {
                    ((point - start).dot(axis) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                lerp_color(from, to, t)
            }
        }
    }
}

fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t).round() as u8;
    Color32::from_rgba_unmultiplied(
        mix(a.r(), b.r()),
        mix(a.g(), b.g()),
        mix(a.b(), b.b()),
        mix(a.a(), b.a()),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill {
        origin: Vec2,
        size: Vec2,
        paint: Paint,
    },
    Label {
        text: String,
        center: Vec2,
        font_size: f32,
        color: Color32,
    },
    /// Draws the source image with the given generation at natural size.
    Image {
        generation: u64,
        origin: Vec2,
        size: Vec2,
    },
}

/// A display list in frame coordinates, `(0,0)` top-left, plus a rotation
/// about the frame centre applied to every op.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub size: Vec2,
    /// Radians, clockwise on screen (y grows downwards).
    pub rotation: f32,
    pub ops: Vec<DrawOp>,
}

impl Frame {
    pub fn empty() -> Self {
        Self {
            size: Vec2::ZERO,
            rotation: 0.0,
            ops: Vec::new(),
        }
    }

    pub fn transform(&self) -> Affine2 {
        let center = self.size * 0.5;
        Affine2::from_translation(center)
            * Affine2::from_angle(self.rotation)
            * Affine2::from_translation(-center)
    }

    /// Origins of the image draws, in draw order.
    pub fn image_origins(&self) -> Vec<Vec2> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Image { origin, .. } => Some(*origin),
                _ => None,
            })
            .collect()
    }
}

/// What the renderer knows about the source image.
#[derive(Debug, Clone, Copy)]
pub enum ImageView {
    None,
    Pending,
    Failed,
    Ready {
        generation: u64,
        width: u32,
        height: u32,
    },
}

pub struct Renderer {
    projection: ProjectionMode,
    placeholder: String,
    frame: Frame,
    frames_drawn: u64,
}

impl Renderer {
    pub fn new(projection: ProjectionMode, placeholder: impl Into<String>) -> Self {
        Self {
            projection,
            placeholder: placeholder.into(),
            frame: Frame::empty(),
            frames_drawn: 0,
        }
    }

    pub fn projection(&self) -> ProjectionMode {
        self.projection
    }

    pub fn set_projection(&mut self, projection: ProjectionMode) {
        self.projection = projection;
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Produces a new frame at `size`, unless the image is still loading in
    /// which case the previous frame stays. Returns whether a frame was drawn.
    ///
    /// Pitch is not consumed: the flat wrap technique has no vertical axis.
    pub fn render(&mut self, view: &ViewState, image: ImageView, size: Vec2) -> bool {
        let mut ops = vec![DrawOp::Fill {
            origin: Vec2::ZERO,
            size,
            paint: Paint::Solid(BACKDROP),
        }];

        match image {
            ImageView::Pending => return false,
            ImageView::None | ImageView::Failed => {
                ops.push(DrawOp::Fill {
                    origin: Vec2::ZERO,
                    size,
                    paint: Paint::LinearGradient {
                        start: Vec2::ZERO,
                        end: size,
                        from: GRADIENT_FROM,
                        to: GRADIENT_TO,
                    },
                });
                ops.push(DrawOp::Label {
                    text: self.placeholder.clone(),
                    center: size * 0.5,
                    font_size: LABEL_FONT_SIZE,
                    color: Color32::WHITE,
                });
            }
            ImageView::Ready {
                generation,
                width,
                height,
            } => {
                let image_size = Vec2::new(width as f32, height as f32);
                let offset = wrap_offset(view.yaw(), width);
                for x in [-offset, image_size.x - offset] {
                    ops.push(DrawOp::Image {
                        generation,
                        origin: Vec2::new(x, 0.0),
                        size: image_size,
                    });
                }
            }
        }

        let rotation = match self.projection {
            ProjectionMode::Composed => view.yaw().to_radians(),
            ProjectionMode::OffsetOnly => 0.0,
        };

        self.frame = Frame {
            size,
            rotation,
            ops,
        };
        self.frames_drawn += 1;
        true
    }
}

/// Horizontal offset of the first image copy for `yaw` degrees.
pub fn wrap_offset(yaw: f32, image_width: u32) -> f32 {
    (yaw / 360.0) * image_width as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SIZE: Vec2 = Vec2::new(800.0, 500.0);

    fn ready(width: u32) -> ImageView {
        ImageView::Ready {
            generation: 1,
            width,
            height: width / 2,
        }
    }

    #[test]
    fn placeholder_without_image() {
        let mut r = Renderer::new(ProjectionMode::OffsetOnly, "label");
        assert!(r.render(&ViewState::new(), ImageView::None, SIZE));
        let frame = r.frame();
        assert_eq!(frame.size, SIZE);
        assert!(matches!(
            frame.ops[1],
            DrawOp::Fill {
                paint: Paint::LinearGradient { .. },
                ..
            }
        ));
        match &frame.ops[2] {
            DrawOp::Label { text, center, .. } => {
                assert_eq!(text, "label");
                assert_eq!(*center, Vec2::new(400.0, 250.0));
            }
            other => panic!("expected label, got {other:?}"),
        }
        assert!(frame.image_origins().is_empty());
    }

    #[test]
    fn image_at_origin_draws_zero_and_width() {
        let mut r = Renderer::new(ProjectionMode::OffsetOnly, "");
        r.render(&ViewState::new(), ready(2000), SIZE);
        assert_eq!(
            r.frame().image_origins(),
            vec![Vec2::new(0.0, 0.0), Vec2::new(2000.0, 0.0)]
        );
    }

    #[test]
    fn image_offsets_follow_yaw() {
        let mut view = ViewState::new();
        view.rotate_by(90.0, 30.0);
        let mut r = Renderer::new(ProjectionMode::OffsetOnly, "");
        r.render(&view, ready(2000), SIZE);
        let origins = r.frame().image_origins();
        assert_relative_eq!(origins[0].x, -500.0);
        assert_relative_eq!(origins[1].x, 1500.0);
        assert_eq!(r.frame().rotation, 0.0);
    }

    #[test]
    fn pending_keeps_previous_frame() {
        let mut r = Renderer::new(ProjectionMode::OffsetOnly, "");
        r.render(&ViewState::new(), ImageView::None, SIZE);
        let before = r.frame().clone();
        let mut view = ViewState::new();
        view.rotate_by(40.0, 0.0);
        assert!(!r.render(&view, ImageView::Pending, Vec2::new(10.0, 10.0)));
        assert_eq!(r.frame(), &before);
        assert_eq!(r.frames_drawn(), 1);
    }

    #[test]
    fn composed_projection_rotates_whole_frame() {
        let mut view = ViewState::new();
        view.rotate_by(90.0, 0.0);
        let mut r = Renderer::new(ProjectionMode::Composed, "");
        r.render(&view, ready(1000), SIZE);
        let frame = r.frame();
        assert_relative_eq!(frame.rotation, std::f32::consts::FRAC_PI_2);
        let t = frame.transform();
        let centre = t.transform_point2(SIZE * 0.5);
        assert_relative_eq!(centre.x, 400.0, epsilon = 1e-3);
        assert_relative_eq!(centre.y, 250.0, epsilon = 1e-3);
        // Offsets still apply on top of the rotation.
        assert_relative_eq!(frame.image_origins()[0].x, -250.0);
    }

    #[test]
    fn failed_load_falls_back_to_placeholder() {
        let mut r = Renderer::new(ProjectionMode::OffsetOnly, "x");
        assert!(r.render(&ViewState::new(), ImageView::Failed, SIZE));
        assert!(matches!(r.frame().ops[2], DrawOp::Label { .. }));
    }

    #[test]
    fn gradient_runs_along_diagonal() {
        let paint = Paint::LinearGradient {
            start: Vec2::ZERO,
            end: Vec2::new(100.0, 100.0),
            from: Color32::BLACK,
            to: Color32::WHITE,
        };
        assert_eq!(paint.color_at(Vec2::ZERO), Color32::BLACK);
        assert_eq!(paint.color_at(Vec2::new(100.0, 100.0)), Color32::WHITE);
        assert_eq!(
            paint.color_at(Vec2::new(100.0, 0.0)),
            paint.color_at(Vec2::new(0.0, 100.0))
        );
        assert_eq!(paint.color_at(Vec2::new(-50.0, -50.0)), Color32::BLACK);
    }
}
