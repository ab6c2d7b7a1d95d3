// host.rs — winit window as the viewer's host element

use crate::input::{Cursor, InputEvent, Key, PointerSample};
use crate::viewer::{Host, HostError};
use glam::Vec2;
use std::collections::BTreeMap;
use std::sync::Arc;
use winit::dpi::PhysicalPosition;
use winit::event::{
    ElementState, MouseButton, MouseScrollDelta, Touch, TouchPhase, VirtualKeyCode, WindowEvent,
};
use winit::window::{CursorIcon, Fullscreen, Window};

/// Pixel wheel deltas per notch, to match line-based deltas.
const PIXELS_PER_LINE: f32 = 20.0;

/// The canvas region of the window. Its size is refreshed from the egui
/// layout every frame.
pub struct WindowHost {
    window: Arc<Window>,
    element_size: Vec2,
    element_height: f32,
}

impl WindowHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            element_size: Vec2::ZERO,
            element_height: 0.0,
        }
    }

    /// Height the canvas asks for when not fullscreen.
    pub fn element_height(&self) -> f32 {
        self.element_height
    }

    pub fn element_size_changed(&self, size: Vec2) -> bool {
        self.element_size != size
    }

    pub fn set_element_size(&mut self, size: Vec2) {
        self.element_size = size;
    }
}

impl Host for WindowHost {
    fn element_size(&self) -> Vec2 {
        self.element_size
    }

    fn set_element_height(&mut self, height: f32) {
        self.element_height = height;
    }

    fn fullscreen_element(&self) -> bool {
        self.window.fullscreen().is_some()
    }

    fn request_fullscreen(&mut self) -> Result<(), HostError> {
        if self.window.current_monitor().is_none() {
            return Err(HostError::NoMonitor);
        }
        self.window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        Ok(())
    }

    fn exit_fullscreen(&mut self) -> Result<(), HostError> {
        self.window.set_fullscreen(None);
        Ok(())
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.window.set_cursor_icon(match cursor {
            Cursor::Grab => CursorIcon::Grab,
            Cursor::Grabbing => CursorIcon::Grabbing,
        });
    }
}

/// Turns winit window events into viewer input in logical pixels.
#[derive(Debug, Default)]
pub struct EventTranslator {
    cursor: Option<PointerSample>,
    touches: BTreeMap<u64, PointerSample>,
}

impl EventTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, event: &WindowEvent<'_>, scale_factor: f64) -> Option<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let at = logical(*position, scale_factor);
                self.cursor = Some(at);
                Some(InputEvent::PointerMove(at))
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                None
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.cursor.map(InputEvent::PointerDown),
                ElementState::Released => Some(InputEvent::PointerUp),
            },
            WindowEvent::MouseWheel { delta, .. } => {
                // winit reports positive y for scrolling up
                let up = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                Some(InputEvent::Wheel { delta_y: -up })
            }
            WindowEvent::Touch(touch) => Some(self.touch(touch, scale_factor)),
            WindowEvent::KeyboardInput { input, .. } if input.state == ElementState::Pressed => {
                input.virtual_keycode.and_then(map_key).map(InputEvent::KeyDown)
            }
            _ => None,
        }
    }

    fn touch(&mut self, touch: &Touch, scale_factor: f64) -> InputEvent {
        let at = logical(touch.location, scale_factor);
        match touch.phase {
            TouchPhase::Started => {
                self.touches.insert(touch.id, at);
                InputEvent::TouchStart(self.touches.values().copied().collect())
            }
            TouchPhase::Moved => {
                self.touches.insert(touch.id, at);
                InputEvent::TouchMove(self.touches.values().copied().collect())
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.remove(&touch.id);
                InputEvent::TouchEnd
            }
        }
    }
}

/// Events that end a drag must reach the viewer even when egui claims them,
/// or a release over a panel would leave the drag stuck.
pub fn ends_drag(event: &InputEvent) -> bool {
    matches!(event, InputEvent::PointerUp | InputEvent::TouchEnd)
}

fn logical(position: PhysicalPosition<f64>, scale_factor: f64) -> PointerSample {
    let p = position.to_logical::<f64>(scale_factor);
    PointerSample::new(p.x as f32, p.y as f32)
}

pub fn map_key(code: VirtualKeyCode) -> Option<Key> {
    Some(match code {
        VirtualKeyCode::R => Key::Character('r'),
        VirtualKeyCode::Left => Key::ArrowLeft,
        VirtualKeyCode::Right => Key::ArrowRight,
        VirtualKeyCode::Up => Key::ArrowUp,
        VirtualKeyCode::Down => Key::ArrowDown,
        VirtualKeyCode::Space => Key::Space,
        _ => return None,
    })
}
