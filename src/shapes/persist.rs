//! Scene persistence: the CSV record format and JSON scene documents
//!
//! ```text
//! ShapeType,ZBufferPosition,IsFilled,BorderColor,FillingColor,Points
//! Line,0,false,#0000ff,#0000ff,(10,10) (50,50)
//! ```
//!
//! Both formats go through [`ShapeRecord`], so arity validation is shared.
//! A bad record is reported with its line (CSV) or index (JSON) and the rest
//! of the file still loads.

use super::{Color, Geometry, Scene, Shape, ShapeKind, Style};
use crate::error::{RecordError, Result};
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CSV_HEADER: &str = "ShapeType,ZBufferPosition,IsFilled,BorderColor,FillingColor,Points";

/// A shape as plain structured data, before arity validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub kind: ShapeKind,
    pub depth: i32,
    pub filled: bool,
    pub border: Color,
    pub fill: Color,
    pub points: Vec<Point>,
}

impl ShapeRecord {
    pub fn from_shape(shape: &Shape, depth: i32) -> Self {
        Self {
            kind: shape.kind(),
            depth,
            filled: shape.is_filled(),
            border: shape.border_color(),
            fill: shape.fill_color(),
            points: shape.points().to_vec(),
        }
    }

    /// Validate the point list and build the shape
    pub fn into_shape(self) -> std::result::Result<Shape, RecordError> {
        self.kind.check_record_arity(self.points.len())?;
        let geometry = Geometry::from_points(self.kind, self.points)?;
        Ok(Shape::new(
            geometry,
            Style::new(self.filled, self.border, self.fill),
        ))
    }

    /// Parse one CSV record line
    pub fn parse_csv(line: &str) -> std::result::Result<Self, RecordError> {
        // The points column contains commas itself, so it takes the remainder
        let fields: Vec<&str> = line.splitn(6, ',').map(str::trim).collect();
        if fields.len() < 6 {
            return Err(RecordError::MissingFields(fields.len()));
        }

        let kind = fields[0]
            .parse::<ShapeKind>()
            .map_err(RecordError::UnknownShapeType)?;
        let depth = fields[1]
            .parse::<i32>()
            .map_err(|_| RecordError::InvalidDepth(fields[1].to_string()))?;
        let filled = parse_flag(fields[2])?;
        let border =
            Color::from_hex(fields[3]).ok_or_else(|| RecordError::InvalidColor(fields[3].into()))?;
        let fill =
            Color::from_hex(fields[4]).ok_or_else(|| RecordError::InvalidColor(fields[4].into()))?;
        let points = fields[5]
            .split_whitespace()
            .map(parse_point)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            kind,
            depth,
            filled,
            border,
            fill,
            points,
        })
    }

    pub fn to_csv(&self) -> String {
        let points: Vec<String> = self
            .points
            .iter()
            .map(|p| format!("({},{})", p.x, p.y))
            .collect();
        format!(
            "{},{},{},{},{},{}",
            self.kind,
            self.depth,
            self.filled,
            self.border,
            self.fill,
            points.join(" ")
        )
    }
}

fn parse_flag(s: &str) -> std::result::Result<bool, RecordError> {
    if s.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if s.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(RecordError::InvalidFlag(s.to_string()))
    }
}

fn parse_point(token: &str) -> std::result::Result<Point, RecordError> {
    let invalid = || RecordError::InvalidPoint(token.to_string());
    let inner = token
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .ok_or_else(invalid)?;
    let (x, y) = inner.split_once(',').ok_or_else(invalid)?;
    let x = x.trim().parse::<i32>().map_err(|_| invalid())?;
    let y = y.trim().parse::<i32>().map_err(|_| invalid())?;
    Ok(Point::new(x, y))
}

/// JSON scene file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default = "default_name")]
    pub name: String,
    pub shapes: Vec<ShapeRecord>,
}

fn default_name() -> String {
    "untitled".to_string()
}

/// Outcome of loading a scene file: every valid record plus the rejected ones
#[derive(Debug, Default)]
pub struct LoadReport {
    pub scene: Scene,
    /// (line or record number, reason)
    pub failures: Vec<(usize, RecordError)>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn accept(&mut self, number: usize, record: std::result::Result<ShapeRecord, RecordError>) {
        match record.and_then(|r| {
            let depth = r.depth;
            r.into_shape().map(|shape| (shape, depth))
        }) {
            Ok((shape, depth)) => {
                self.scene.insert(shape, depth);
            },
            Err(err) => {
                tracing::warn!("Skipping scene record {}: {}", number, err);
                self.failures.push((number, err));
            },
        }
    }
}

impl Scene {
    /// Records in draw order, each carrying its list depth
    pub fn records(&self) -> Vec<ShapeRecord> {
        self.entries()
            .iter()
            .filter_map(|e| self.get(e.id).map(|s| ShapeRecord::from_shape(s, e.depth)))
            .collect()
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::from(CSV_HEADER);
        out.push('\n');
        for record in self.records() {
            out.push_str(&record.to_csv());
            out.push('\n');
        }
        out
    }

    /// Parse CSV text. The header line is optional; blank lines are ignored.
    pub fn from_csv(text: &str) -> LoadReport {
        let mut report = LoadReport::default();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || (index == 0 && line.starts_with("ShapeType")) {
                continue;
            }
            report.accept(index + 1, ShapeRecord::parse_csv(line));
        }
        report
    }

    pub fn to_document(&self, name: impl Into<String>) -> SceneDocument {
        SceneDocument {
            name: name.into(),
            shapes: self.records(),
        }
    }

    pub fn from_document(document: SceneDocument) -> LoadReport {
        let mut report = LoadReport::default();
        for (index, record) in document.shapes.into_iter().enumerate() {
            report.accept(index + 1, Ok(record));
        }
        report
    }

    /// Save as CSV, or as a JSON document when the path ends in `.json`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = if is_json(path) {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("untitled");
            serde_json::to_string_pretty(&self.to_document(name))?
        } else {
            self.to_csv()
        };
        fs::write(path, text)?;
        tracing::info!("Saved {} shapes to {}", self.len(), path.display());
        Ok(())
    }

    /// Load a CSV or JSON scene file. Unreadable files and malformed JSON are
    /// errors; individual bad records are reported in the [`LoadReport`].
    pub fn load(path: impl AsRef<Path>) -> Result<LoadReport> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let report = if is_json(path) {
            Scene::from_document(serde_json::from_str(&text)?)
        } else {
            Scene::from_csv(&text)
        };
        tracing::info!(
            "Loaded {} shapes from {} ({} rejected)",
            report.scene.len(),
            path.display(),
            report.failures.len()
        );
        Ok(report)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
