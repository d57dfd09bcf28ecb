use super::{InputEvent, Key, MouseButtonKind};
use crate::canvas::Canvas;
use crate::geometry::Point;
use crate::shapes::{Shape, ShapeKind, Style};

/// What a left click does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Line,
    Rectangle,
    Polygon,
    Circle,
    BezierCurve,
    /// Drag the current layer
    Move,
    /// Wheel scales the current layer
    Scale,
}

impl Tool {
    /// Single-key shortcut used by the viewer
    pub fn from_shortcut(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'l' => Some(Tool::Line),
            'r' => Some(Tool::Rectangle),
            'p' => Some(Tool::Polygon),
            'c' => Some(Tool::Circle),
            'b' => Some(Tool::BezierCurve),
            'm' => Some(Tool::Move),
            's' => Some(Tool::Scale),
            _ => None,
        }
    }
}

/// Editor session state machine
#[derive(Debug, Clone, PartialEq)]
enum State {
    Idle,
    /// First click of a two-click tool has been placed
    PlacingLine { anchor: Point },
    PlacingRectangle { anchor: Point },
    PlacingCircle { center: Point },
    /// Left clicks append points, right click finishes
    BuildingPolygon { points: Vec<Point> },
    BuildingCurve { points: Vec<Point> },
    /// Left button held in move mode
    Dragging { last: Point },
}

/// Turns pointer and key input into canvas edits
pub struct EditorSession {
    tool: Tool,
    state: State,
    style: Style,
}

impl EditorSession {
    pub fn new(style: Style) -> Self {
        Self {
            tool: Tool::Line,
            state: State::Idle,
            style,
        }
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    /// True while a shape is partially placed
    pub fn is_busy(&self) -> bool {
        !matches!(self.state, State::Idle)
    }

    /// Switch tools, dropping any shape in progress
    pub fn set_tool(&mut self, canvas: &mut Canvas, tool: Tool) {
        self.cancel(canvas);
        self.tool = tool;
        tracing::debug!("Tool: {:?}", tool);
    }

    pub fn handle_event(&mut self, canvas: &mut Canvas, event: &InputEvent) {
        match *event {
            InputEvent::MouseDown { x, y, button } => match button {
                MouseButtonKind::Left => self.on_left_click(canvas, Point::new(x, y)),
                MouseButtonKind::Right => self.on_right_click(canvas),
                MouseButtonKind::Middle => {},
            },
            InputEvent::MouseMove { x, y } => {
                if let State::Dragging { last } = self.state {
                    let p = Point::new(x, y);
                    let delta = p - last;
                    if delta != Point::default() {
                        canvas.translate(delta.x, delta.y);
                    }
                    self.state = State::Dragging { last: p };
                }
            },
            InputEvent::MouseUp {
                button: MouseButtonKind::Left,
                ..
            } => {
                if let State::Dragging { .. } = self.state {
                    self.state = State::Idle;
                }
            },
            InputEvent::Wheel { delta } => {
                if self.tool == Tool::Scale && delta != 0 {
                    let factor = if delta > 0 { 1.25 } else { 0.75 };
                    canvas.scale(factor, factor);
                }
            },
            InputEvent::KeyDown(key) => self.on_key(canvas, key),
            _ => {},
        }
    }

    fn on_key(&mut self, canvas: &mut Canvas, key: Key) {
        match key {
            Key::Escape => self.cancel(canvas),
            Key::Delete => {
                if let Some(index) = canvas.current_layer() {
                    canvas.delete_at(index);
                }
            },
            Key::PageUp => {
                canvas.move_current_up();
            },
            Key::PageDown => {
                canvas.move_current_down();
            },
            Key::Char('f') => {
                self.style.filled = !self.style.filled;
                tracing::debug!("Fill for new shapes: {}", self.style.filled);
            },
            Key::Char(c) => {
                if let Some(tool) = Tool::from_shortcut(c) {
                    self.set_tool(canvas, tool);
                }
            },
        }
    }

    fn on_left_click(&mut self, canvas: &mut Canvas, click: Point) {
        let state = std::mem::replace(&mut self.state, State::Idle);
        self.state = match (state, self.tool) {
            (State::Idle, Tool::Move) => State::Dragging { last: click },
            (State::Idle, Tool::Scale) => State::Idle,
            (State::Idle, tool) => {
                canvas.mark(click, self.style.border);
                match tool {
                    Tool::Line => State::PlacingLine { anchor: click },
                    Tool::Rectangle => State::PlacingRectangle { anchor: click },
                    Tool::Circle => State::PlacingCircle { center: click },
                    Tool::Polygon => State::BuildingPolygon {
                        points: vec![click],
                    },
                    _ => State::BuildingCurve {
                        points: vec![click],
                    },
                }
            },
            (State::PlacingLine { anchor }, _) => {
                canvas.add_shape(Shape::line(anchor, click, self.style));
                State::Idle
            },
            (State::PlacingRectangle { anchor }, _) => {
                canvas.add_shape(Shape::rectangle(anchor, click, self.style));
                State::Idle
            },
            (State::PlacingCircle { center }, _) => {
                canvas.add_shape(Shape::circle(center, click, self.style));
                State::Idle
            },
            (State::BuildingPolygon { mut points }, _) => {
                canvas.mark(click, self.style.border);
                points.push(click);
                State::BuildingPolygon { points }
            },
            (State::BuildingCurve { mut points }, _) => {
                canvas.mark(click, self.style.border);
                points.push(click);
                State::BuildingCurve { points }
            },
            (dragging @ State::Dragging { .. }, _) => dragging,
        };
    }

    fn on_right_click(&mut self, canvas: &mut Canvas) {
        let state = std::mem::replace(&mut self.state, State::Idle);
        let built = match state {
            State::BuildingPolygon { points } => Shape::polygon(points, self.style),
            State::BuildingCurve { points } => Shape::bezier(points, self.style),
            State::Idle => return,
            _ => {
                // Drop half-placed markers
                canvas.redraw();
                return;
            },
        };

        match built {
            Ok(shape) => {
                canvas.add_shape(shape);
            },
            Err(e) => {
                tracing::warn!("Discarding unfinished shape: {}", e);
                canvas.redraw();
            },
        }
    }

    /// Abandon any shape in progress
    pub fn cancel(&mut self, canvas: &mut Canvas) {
        if self.is_busy() {
            self.state = State::Idle;
            canvas.redraw();
        }
    }

    /// Kind of shape currently being placed, if any
    pub fn pending_kind(&self) -> Option<ShapeKind> {
        match self.state {
            State::PlacingLine { .. } => Some(ShapeKind::Line),
            State::PlacingRectangle { .. } => Some(ShapeKind::Rectangle),
            State::PlacingCircle { .. } => Some(ShapeKind::Circle),
            State::BuildingPolygon { .. } => Some(ShapeKind::Polygon),
            State::BuildingCurve { .. } => Some(ShapeKind::BezierCurve),
            State::Idle | State::Dragging { .. } => None,
        }
    }
}
