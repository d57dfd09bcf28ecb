//! Text command language
//!
//! One command per line, `#` starts a comment:
//!
//! ```text
//! border #ff0000
//! fill on
//! rect 10 10 90 60
//! rotate 45
//! export out.png
//! ```
//!
//! Commands come from script files (`vecscene run`) or, on Unix, from a live
//! control socket (`vecscene serve`).

use crate::canvas::Canvas;
use crate::error::{CommandError, Error, Result};
use crate::geometry::Point;
use crate::shapes::{Color, Shape, Style};
use std::path::PathBuf;

/// Parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Line { from: Point, to: Point },
    Rect { from: Point, to: Point },
    Circle { center: Point, edge: Point },
    Polygon(Vec<Point>),
    Bezier(Vec<Point>),
    /// Fill flag for shapes created afterwards
    Fill(bool),
    Border(Color),
    FillColor(Color),
    Select(usize),
    Move { dx: i32, dy: i32 },
    Rotate(f64),
    Scale { sx: f64, sy: f64 },
    Up,
    Down,
    Delete,
    /// Apply the current colors to the current layer
    Recolor,
    Clear,
    Resize { width: u32, height: u32 },
    Save(PathBuf),
    Load(PathBuf),
    Export(PathBuf),
    Quit,
}

/// Whether the caller should keep feeding commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Strip a trailing `#` comment. A whole `#rrggbb` word is a color, not a
/// comment.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'#' || (i > 0 && !bytes[i - 1].is_ascii_whitespace()) {
            continue;
        }
        let word_end = bytes[i..]
            .iter()
            .position(u8::is_ascii_whitespace)
            .map_or(bytes.len(), |n| i + n);
        let word = &bytes[i + 1..word_end];
        let is_color = word.len() == 6 && word.iter().all(u8::is_ascii_hexdigit);
        if !is_color {
            return &line[..i];
        }
    }
    line
}

/// Parse one command line
pub fn parse_command(line: &str) -> std::result::Result<Command, CommandError> {
    let line = strip_comment(line).trim();
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(CommandError::Empty);
    };
    let args: Vec<&str> = words.collect();

    let command = match head.to_ascii_lowercase().as_str() {
        "line" => {
            let [a, b] = points::<2>("line", &args)?;
            Command::Line { from: a, to: b }
        },
        "rect" | "rectangle" => {
            let [a, b] = points::<2>("rect", &args)?;
            Command::Rect { from: a, to: b }
        },
        "circle" => {
            let [center, edge] = points::<2>("circle", &args)?;
            Command::Circle { center, edge }
        },
        "polygon" => Command::Polygon(point_list("polygon", &args)?),
        "bezier" | "curve" => Command::Bezier(point_list("bezier", &args)?),
        "fill" => match arg("fill", "on|off", &args, 0)? {
            "on" | "true" => Command::Fill(true),
            "off" | "false" => Command::Fill(false),
            other => return Err(invalid("fill", other)),
        },
        "border" => Command::Border(color("border", &args)?),
        "fillcolor" => Command::FillColor(color("fillcolor", &args)?),
        "select" => Command::Select(number("select", "index", &args, 0)?),
        "move" => Command::Move {
            dx: number("move", "dx", &args, 0)?,
            dy: number("move", "dy", &args, 1)?,
        },
        "rotate" => Command::Rotate(number("rotate", "degrees", &args, 0)?),
        "scale" => {
            let sx: f64 = number("scale", "factor", &args, 0)?;
            let sy = match args.get(1) {
                Some(_) => number("scale", "factor", &args, 1)?,
                None => sx,
            };
            Command::Scale { sx, sy }
        },
        "up" => Command::Up,
        "down" => Command::Down,
        "delete" => Command::Delete,
        "recolor" => Command::Recolor,
        "clear" => Command::Clear,
        "resize" => {
            let width: u32 = number("resize", "width", &args, 0)?;
            let height: u32 = number("resize", "height", &args, 1)?;
            if width == 0 || height == 0 {
                return Err(invalid("resize", &format!("{}x{}", width, height)));
            }
            Command::Resize { width, height }
        },
        "save" => Command::Save(arg("save", "path", &args, 0)?.into()),
        "load" => Command::Load(arg("load", "path", &args, 0)?.into()),
        "export" => Command::Export(arg("export", "path", &args, 0)?.into()),
        "quit" | "exit" => Command::Quit,
        _ => return Err(CommandError::Unknown(head.to_string())),
    };
    Ok(command)
}

fn invalid(command: &'static str, value: &str) -> CommandError {
    CommandError::InvalidArgument {
        command,
        value: value.to_string(),
    }
}

fn arg<'a>(
    command: &'static str,
    argument: &'static str,
    args: &[&'a str],
    index: usize,
) -> std::result::Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or(CommandError::MissingArgument { command, argument })
}

fn number<T: std::str::FromStr>(
    command: &'static str,
    argument: &'static str,
    args: &[&str],
    index: usize,
) -> std::result::Result<T, CommandError> {
    let raw = arg(command, argument, args, index)?;
    raw.parse().map_err(|_| invalid(command, raw))
}

fn color(command: &'static str, args: &[&str]) -> std::result::Result<Color, CommandError> {
    let raw = arg(command, "color", args, 0)?;
    Color::from_hex(raw).ok_or_else(|| invalid(command, raw))
}

fn point_list(command: &'static str, args: &[&str]) -> std::result::Result<Vec<Point>, CommandError> {
    if args.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            argument: "points",
        });
    }
    if args.len() % 2 != 0 {
        return Err(invalid(command, &args.join(" ")));
    }
    args.chunks_exact(2)
        .map(|pair| -> std::result::Result<Point, CommandError> {
            let x = pair[0].parse().map_err(|_| invalid(command, pair[0]))?;
            let y = pair[1].parse().map_err(|_| invalid(command, pair[1]))?;
            Ok(Point::new(x, y))
        })
        .collect()
}

fn points<const N: usize>(
    command: &'static str,
    args: &[&str],
) -> std::result::Result<[Point; N], CommandError> {
    let list = point_list(command, args)?;
    <[Point; N]>::try_from(list.as_slice()).map_err(|_| CommandError::MissingArgument {
        command,
        argument: "points",
    })
}

// ============================================================================
// Execution
// ============================================================================

/// Applies commands to a canvas, tracking the style used for new shapes
pub struct CommandRunner {
    style: Style,
}

impl CommandRunner {
    pub fn new(style: Style) -> Self {
        Self { style }
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn run(&mut self, canvas: &mut Canvas, command: Command) -> Result<Flow> {
        match command {
            Command::Line { from, to } => {
                canvas.add_shape(Shape::line(from, to, self.style));
            },
            Command::Rect { from, to } => {
                canvas.add_shape(Shape::rectangle(from, to, self.style));
            },
            Command::Circle { center, edge } => {
                canvas.add_shape(Shape::circle(center, edge, self.style));
            },
            Command::Polygon(points) => {
                canvas.add_shape(Shape::polygon(points, self.style)?);
            },
            Command::Bezier(points) => {
                canvas.add_shape(Shape::bezier(points, self.style)?);
            },
            Command::Fill(filled) => self.style.filled = filled,
            Command::Border(color) => self.style.border = color,
            Command::FillColor(color) => self.style.fill = color,
            Command::Select(index) => {
                if !canvas.select_layer(index) {
                    return Err(invalid("select", &index.to_string()).into());
                }
            },
            Command::Move { dx, dy } => self.on_current(canvas.translate(dx, dy), "move"),
            Command::Rotate(degrees) => self.on_current(canvas.rotate(degrees), "rotate"),
            Command::Scale { sx, sy } => self.on_current(canvas.scale(sx, sy), "scale"),
            Command::Up => self.on_current(canvas.move_current_up(), "up"),
            Command::Down => self.on_current(canvas.move_current_down(), "down"),
            Command::Delete => {
                let removed = canvas
                    .current_layer()
                    .and_then(|index| canvas.delete_at(index));
                self.on_current(removed.is_some(), "delete");
            },
            Command::Recolor => {
                let recolored = canvas.current_layer().is_some_and(|index| {
                    canvas.set_layer_colors(index, self.style.border, self.style.fill)
                        && canvas.set_layer_filled(index, self.style.filled)
                });
                self.on_current(recolored, "recolor");
            },
            Command::Clear => canvas.clear_scene(),
            Command::Resize { width, height } => canvas.resize(width, height),
            Command::Save(path) => canvas.save(path)?,
            Command::Load(path) => {
                for (line, source) in canvas.load(&path)? {
                    tracing::warn!("{}: {}", path.display(), Error::Record { line, source });
                }
            },
            Command::Export(path) => canvas.export_png(path)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn on_current(&self, applied: bool, command: &str) {
        if !applied {
            tracing::debug!("'{}' had no effect (no current layer or at the boundary)", command);
        }
    }

    /// Run a whole script. Failing lines are logged and skipped; the returned
    /// list holds their line numbers and errors.
    pub fn run_script(&mut self, canvas: &mut Canvas, script: &str) -> Vec<(usize, Error)> {
        let mut failures = Vec::new();
        for (index, line) in script.lines().enumerate() {
            let number = index + 1;
            let result = match parse_command(line) {
                Ok(command) => self.run(canvas, command),
                Err(CommandError::Empty) => continue,
                Err(e) => Err(e.into()),
            };
            match result {
                Ok(Flow::Continue) => {},
                Ok(Flow::Quit) => break,
                Err(e) => {
                    tracing::warn!("line {}: {}", number, e);
                    failures.push((number, e));
                },
            }
        }
        failures
    }
}

// ============================================================================
// Unix socket controller
// ============================================================================

#[cfg(unix)]
pub use socket::{Controller, DEFAULT_SOCKET_PATH};

#[cfg(unix)]
mod socket {
    use super::{parse_command, Command};
    use crate::error::Result;
    use std::io::{BufRead, BufReader};
    use std::os::unix::net::{UnixListener, UnixStream};
    use std::path::{Path, PathBuf};
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::thread;

    pub const DEFAULT_SOCKET_PATH: &str = "/tmp/vecscene.sock";

    /// Listens for command lines on a Unix socket and queues them for the
    /// thread that owns the canvas
    pub struct Controller {
        receiver: Receiver<Command>,
        path: PathBuf,
        _listener_thread: thread::JoinHandle<()>,
    }

    impl Controller {
        pub fn new(path: impl AsRef<Path>) -> Result<Self> {
            let path = path.as_ref().to_path_buf();
            // Remove a stale socket if present
            let _ = std::fs::remove_file(&path);

            let listener = UnixListener::bind(&path)?;
            // Non-blocking so the accept loop can notice a closed socket
            listener.set_nonblocking(true)?;

            let (sender, receiver) = mpsc::channel();
            let handle = thread::spawn(move || {
                Self::listener_loop(listener, sender);
            });

            tracing::info!("Listening for commands on {}", path.display());
            Ok(Self {
                receiver,
                path,
                _listener_thread: handle,
            })
        }

        fn listener_loop(listener: UnixListener, sender: Sender<Command>) {
            loop {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let sender = sender.clone();
                        thread::spawn(move || {
                            Self::handle_client(stream, sender);
                        });
                    },
                    Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(50));
                    },
                    Err(e) => {
                        tracing::debug!("Control socket closed: {}", e);
                        break;
                    },
                }
            }
        }

        fn handle_client(stream: UnixStream, sender: Sender<Command>) {
            // The listener is non-blocking; client reads should block
            if let Err(e) = stream.set_nonblocking(false) {
                tracing::warn!("Control client setup failed: {}", e);
                return;
            }
            let reader = BufReader::new(stream);
            for line in reader.lines().map_while(std::result::Result::ok) {
                match parse_command(&line) {
                    Ok(cmd) => {
                        if sender.send(cmd).is_err() {
                            break;
                        }
                    },
                    Err(crate::error::CommandError::Empty) => {},
                    Err(e) => tracing::warn!("Ignoring control command '{}': {}", line, e),
                }
            }
        }

        /// Get any pending commands (non-blocking)
        pub fn poll(&self) -> Vec<Command> {
            let mut commands = Vec::new();
            while let Ok(cmd) = self.receiver.try_recv() {
                commands.push(cmd);
            }
            commands
        }

        /// Block until the next command arrives. None once every sender is gone.
        pub fn recv(&self) -> Option<Command> {
            self.receiver.recv().ok()
        }
    }

    impl Drop for Controller {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shapes() {
        assert_eq!(
            parse_command("line 0 0 10 0"),
            Ok(Command::Line {
                from: Point::new(0, 0),
                to: Point::new(10, 0)
            })
        );
        assert_eq!(
            parse_command("  POLYGON 0 0 5 0 5 5  # triangle"),
            Ok(Command::Polygon(vec![
                Point::new(0, 0),
                Point::new(5, 0),
                Point::new(5, 5)
            ]))
        );
        assert_eq!(
            parse_command("scale 2"),
            Ok(Command::Scale { sx: 2.0, sy: 2.0 })
        );
    }

    #[test]
    fn test_color_is_not_a_comment() {
        assert_eq!(
            parse_command("border #00ff00 # green"),
            Ok(Command::Border(Color::rgb(0, 255, 0)))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_command("   "), Err(CommandError::Empty));
        assert_eq!(parse_command("# only a comment"), Err(CommandError::Empty));
        assert_eq!(parse_command("#comment"), Err(CommandError::Empty));
        assert_eq!(
            parse_command("spin 3"),
            Err(CommandError::Unknown("spin".to_string()))
        );
        assert!(matches!(
            parse_command("line 0 0 10"),
            Err(CommandError::InvalidArgument { command: "line", .. })
        ));
        assert!(matches!(
            parse_command("move 3"),
            Err(CommandError::MissingArgument {
                command: "move",
                argument: "dy"
            })
        ));
        assert!(matches!(
            parse_command("border blue"),
            Err(CommandError::InvalidArgument { .. })
        ));
        assert!(matches!(
            parse_command("resize 0 10"),
            Err(CommandError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_runner_applies_style_and_transforms() {
        let mut canvas = Canvas::new(100, 100);
        let mut runner = CommandRunner::new(Style::default());
        let script = "
            border #ff0000
            fill on
            fillcolor #0000ff
            rect 10 10 30 30
            move 5 5
        ";
        assert!(runner.run_script(&mut canvas, script).is_empty());

        let shape = canvas.current_shape().unwrap();
        assert!(shape.is_filled());
        assert_eq!(shape.points()[0], Point::new(15, 15));
        assert_eq!(canvas.surface().get_pixel(25, 25), Some(Color::rgb(0, 0, 255)));
        assert_eq!(canvas.surface().get_pixel(15, 25), Some(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn test_script_continues_after_errors_and_stops_at_quit() {
        let mut canvas = Canvas::new(50, 50);
        let mut runner = CommandRunner::new(Style::default());
        let script = "line 1 1 10 10\nbogus\npolygon 0 0 1 1\nselect 9\nquit\nline 2 2 3 3\n";
        let failures = runner.run_script(&mut canvas, script);

        let lines: Vec<usize> = failures.iter().map(|(n, _)| *n).collect();
        assert_eq!(lines, vec![2, 3, 4]);
        assert!(matches!(failures[1].1, Error::Shape(_)));
        assert_eq!(canvas.scene().len(), 1);
    }

    #[test]
    fn test_recolor_and_reorder() {
        let mut canvas = Canvas::new(50, 50);
        let mut runner = CommandRunner::new(Style::default());
        let script = "line 0 5 40 5\nline 5 0 5 40\nup\nborder #00ff00\nrecolor\n";
        assert!(runner.run_script(&mut canvas, script).is_empty());

        // The vertical line moved under the horizontal one and was recolored
        assert_eq!(canvas.current_layer(), Some(0));
        assert_eq!(
            canvas.current_shape().unwrap().border_color(),
            Color::rgb(0, 255, 0)
        );
        assert_eq!(canvas.surface().get_pixel(5, 5), Some(Color::BLACK));
    }

    #[test]
    fn test_save_load_export_commands() {
        let dir = tempfile::tempdir().unwrap();
        let scene = dir.path().join("scene.csv");
        let png = dir.path().join("out.png");
        let script = format!(
            "circle 20 20 25 20\nsave {}\nclear\nload {}\nexport {}\n",
            scene.display(),
            scene.display(),
            png.display()
        );

        let mut canvas = Canvas::new(40, 40);
        let mut runner = CommandRunner::new(Style::default());
        assert!(runner.run_script(&mut canvas, &script).is_empty());
        assert_eq!(canvas.scene().len(), 1);
        assert!(png.exists());
    }

    #[test]
    fn test_runner_style_can_be_replaced() {
        let mut canvas = Canvas::new(50, 50);
        let mut runner = CommandRunner::new(Style::default());
        let blue = Color::rgb(0, 0, 255);
        runner.set_style(Style::outline(blue));
        assert_eq!(runner.style().border, blue);

        runner.run(&mut canvas, parse_command("line 0 10 20 10").unwrap()).unwrap();
        assert_eq!(canvas.surface().get_pixel(10, 10), Some(blue));
    }
}
