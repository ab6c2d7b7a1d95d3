// input.rs — pointer / touch / wheel / key tracking

use crate::config::ViewerConfig;
use crate::view::ViewState;

/// Last known pointer or single-touch position, logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Character(char),
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
}

/// Input already normalised by the host. Touch events carry every point
/// currently on the surface, first-down first.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown(PointerSample),
    PointerMove(PointerSample),
    PointerUp,
    TouchStart(Vec<PointerSample>),
    TouchMove(Vec<PointerSample>),
    TouchEnd,
    /// Vertical wheel delta; positive scrolls down.
    Wheel { delta_y: f32 },
    KeyDown(Key),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Grab,
    Grabbing,
}

/// Discrete actions the tracker hands back to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Zoom(f32),
    Reset,
    ToggleFullscreen,
}

/// What the controller should do after an event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Reaction {
    /// The view state was changed in place.
    pub redraw: bool,
    pub cursor: Option<Cursor>,
    pub command: Option<Command>,
}

impl Reaction {
    fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }

    fn cursor(cursor: Cursor) -> Self {
        Self {
            cursor: Some(cursor),
            ..Self::default()
        }
    }

    fn command(command: Command) -> Self {
        Self {
            command: Some(command),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    last: PointerSample,
}

/// Turns raw input into rotation deltas and commands.
#[derive(Debug, Default)]
pub struct InputTracker {
    drag: Option<DragSession>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn handle(
        &mut self,
        event: &InputEvent,
        view: &mut ViewState,
        config: &ViewerConfig,
    ) -> Reaction {
        match event {
            InputEvent::PointerDown(at) => self.begin(*at),
            InputEvent::PointerMove(at) => self.drag_to(*at, view, config),
            InputEvent::PointerUp | InputEvent::TouchEnd => self.end(),
            InputEvent::TouchStart(touches) => match touches.as_slice() {
                [only] => self.begin(*only),
                _ => self.abandon(),
            },
            InputEvent::TouchMove(touches) => match touches.as_slice() {
                [only] => self.drag_to(*only, view, config),
                _ => self.abandon(),
            },
            InputEvent::Wheel { delta_y } => wheel(*delta_y, config),
            InputEvent::KeyDown(key) => key_down(*key, view, config),
        }
    }

    fn begin(&mut self, at: PointerSample) -> Reaction {
        log::debug!("drag start at ({}, {})", at.x, at.y);
        self.drag = Some(DragSession { last: at });
        Reaction::cursor(Cursor::Grabbing)
    }

    fn drag_to(
        &mut self,
        at: PointerSample,
        view: &mut ViewState,
        config: &ViewerConfig,
    ) -> Reaction {
        let Some(session) = self.drag.as_mut() else {
            return Reaction::default();
        };
        let dx = at.x - session.last.x;
        let dy = at.y - session.last.y;
        view.rotate_by(dx * config.sensitivity, dy * config.sensitivity);
        session.last = at;
        Reaction::redraw()
    }

    fn end(&mut self) -> Reaction {
        if self.drag.take().is_some() {
            log::debug!("drag end");
        }
        Reaction::cursor(Cursor::Grab)
    }

    // More than one touch point: drag is single-touch only.
    fn abandon(&mut self) -> Reaction {
        match self.drag.take() {
            Some(_) => {
                log::debug!("drag abandoned on multi-touch");
                Reaction::cursor(Cursor::Grab)
            }
            None => Reaction::default(),
        }
    }
}

fn wheel(delta_y: f32, config: &ViewerConfig) -> Reaction {
    if delta_y > 0.0 {
        Reaction::command(Command::Zoom(config.zoom_out_factor))
    } else if delta_y < 0.0 {
        Reaction::command(Command::Zoom(config.zoom_in_factor))
    } else {
        Reaction::default()
    }
}

fn key_down(key: Key, view: &mut ViewState, config: &ViewerConfig) -> Reaction {
    let step = config.key_step;
    let (yaw, pitch) = match key {
        Key::Character('r' | 'R') => return Reaction::command(Command::Reset),
        Key::Space => return Reaction::command(Command::ToggleFullscreen),
        Key::Character(_) => return Reaction::default(),
        Key::ArrowLeft => (-step, 0.0),
        Key::ArrowRight => (step, 0.0),
        Key::ArrowUp => (0.0, -step),
        Key::ArrowDown => (0.0, step),
    };
    let before = *view;
    view.rotate_by(yaw, pitch);
    Reaction {
        redraw: *view != before,
        ..Reaction::default()
    }
}
