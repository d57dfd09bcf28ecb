pub mod editor;

pub use editor::{EditorSession, Tool};

use crate::geometry::Point;

/// Backend-independent input events, as produced by the viewer window
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    MouseMove {
        x: i32,
        y: i32,
    },
    MouseDown {
        x: i32,
        y: i32,
        button: MouseButtonKind,
    },
    MouseUp {
        x: i32,
        y: i32,
        button: MouseButtonKind,
    },
    /// Positive is away from the user
    Wheel {
        delta: i32,
    },
}

impl InputEvent {
    /// Pointer position carried by mouse events
    pub fn position(&self) -> Option<Point> {
        match *self {
            InputEvent::MouseMove { x, y }
            | InputEvent::MouseDown { x, y, .. }
            | InputEvent::MouseUp { x, y, .. } => Some(Point::new(x, y)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButtonKind {
    Left,
    Right,
    Middle,
}

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Delete,
    /// Move the current layer earlier in draw order
    PageUp,
    /// Move the current layer later in draw order
    PageDown,
    Char(char),
}
