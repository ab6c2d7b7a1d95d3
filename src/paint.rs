// paint.rs — replays a Frame onto an egui painter

use crate::render::{DrawOp, Frame};
use crate::viewer::{ImageSlot, SourceImage};
use egui::epaint::{TextShape, Vertex, WHITE_UV};
use egui::{Color32, ColorImage, Mesh, Painter, Pos2, Rect, Shape, TextureHandle, TextureOptions};
use glam::{Affine2, Vec2};

/// Wrapper background, visible where a rotated frame leaves corners bare.
const WRAPPER: Color32 = Color32::BLACK;

/// GPU copy of the current panorama, tagged with its load generation.
pub struct PanoramaTexture {
    generation: u64,
    handle: TextureHandle,
}

impl std::fmt::Debug for PanoramaTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanoramaTexture")
            .field("generation", &self.generation)
            .field("texture", &self.handle.id())
            .finish_non_exhaustive()
    }
}

impl PanoramaTexture {
    fn upload(ctx: &egui::Context, image: &SourceImage) -> Self {
        let size = [image.pixels.width() as usize, image.pixels.height() as usize];
        let color = ColorImage::from_rgba_unmultiplied(size, image.pixels.as_raw());
        Self {
            generation: image.generation,
            handle: ctx.load_texture("tour360-panorama", color, TextureOptions::LINEAR),
        }
    }
}

/// Uploads the slot's image when its generation differs from the cached
/// texture. Older textures stay until replaced so a retained frame can
/// still be painted.
pub fn sync_texture(ctx: &egui::Context, slot: &ImageSlot, cache: &mut Option<PanoramaTexture>) {
    let ImageSlot::Ready(image) = slot else {
        return;
    };
    if cache.as_ref().map(|t| t.generation) != Some(image.generation) {
        *cache = Some(PanoramaTexture::upload(ctx, image));
    }
}

/// Maps frame coordinates to screen points for a canvas at `canvas_min`.
pub fn frame_to_screen(transform: &Affine2, canvas_min: Pos2, point: Vec2) -> Pos2 {
    let p = transform.transform_point2(point);
    Pos2::new(canvas_min.x + p.x, canvas_min.y + p.y)
}

fn quad_corners(origin: Vec2, size: Vec2) -> [Vec2; 4] {
    [
        origin,
        origin + Vec2::new(size.x, 0.0),
        origin + size,
        origin + Vec2::new(0.0, size.y),
    ]
}

fn push_quad(mesh: &mut Mesh, corners: [Pos2; 4], uvs: [Pos2; 4], colors: [Color32; 4]) {
    let base = mesh.vertices.len() as u32;
    for i in 0..4 {
        mesh.vertices.push(Vertex {
            pos: corners[i],
            uv: uvs[i],
            color: colors[i],
        });
    }
    mesh.add_triangle(base, base + 1, base + 2);
    mesh.add_triangle(base, base + 2, base + 3);
}

pub fn paint_frame(
    painter: &Painter,
    canvas: Rect,
    frame: &Frame,
    texture: Option<&PanoramaTexture>,
) {
    let painter = painter.with_clip_rect(canvas);
    painter.rect_filled(canvas, 0.0, WRAPPER);

    let transform = frame.transform();
    let to_screen = |p: Vec2| frame_to_screen(&transform, canvas.min, p);

    for op in &frame.ops {
        match op {
            DrawOp::Fill {
                origin,
                size,
                paint,
            } => {
                let corners = quad_corners(*origin, *size);
                let mut mesh = Mesh::default();
                push_quad(
                    &mut mesh,
                    corners.map(to_screen),
                    [WHITE_UV; 4],
                    corners.map(|c| paint.color_at(c)),
                );
                painter.add(Shape::mesh(mesh));
            }
            DrawOp::Image {
                generation,
                origin,
                size,
            } => {
                let Some(texture) = texture.filter(|t| t.generation == *generation) else {
                    continue;
                };
                let mut mesh = Mesh::with_texture(texture.handle.id());
                push_quad(
                    &mut mesh,
                    quad_corners(*origin, *size).map(to_screen),
                    [
                        Pos2::new(0.0, 0.0),
                        Pos2::new(1.0, 0.0),
                        Pos2::new(1.0, 1.0),
                        Pos2::new(0.0, 1.0),
                    ],
                    [Color32::WHITE; 4],
                );
                painter.add(Shape::mesh(mesh));
            }
            DrawOp::Label {
                text,
                center,
                font_size,
                color,
            } => {
                let font = egui::FontId::proportional(*font_size);
                let galley = painter.layout_no_wrap(text.clone(), font, *color);
                let half = Vec2::new(galley.size().x, galley.size().y) * 0.5;
                let mut shape = TextShape::new(to_screen(*center - half), galley);
                shape.angle = frame.rotation;
                painter.add(Shape::Text(shape));
            }
        }
    }
}
