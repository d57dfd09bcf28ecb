//! The drawing engine: a pixel surface, the scene it shows and the current
//! layer selection. Every mutation re-rasterizes the whole scene before it
//! returns, so the surface never shows a half-applied edit.

use crate::config::EngineConfig;
use crate::display::PixelBuffer;
use crate::error::{RecordError, Result};
use crate::geometry::Point;
use crate::raster::{self, RenderOptions};
use crate::shapes::{Color, LoadReport, Scene, Shape, ShapeId};
use crate::transform::Transform;
use std::path::Path;

pub struct Canvas {
    surface: PixelBuffer,
    scene: Scene,
    background: Color,
    options: RenderOptions,
    /// List position of the shape transforms apply to
    current: Option<usize>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_config(&EngineConfig {
            width,
            height,
            ..EngineConfig::default()
        })
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let mut canvas = Self {
            surface: PixelBuffer::with_size(config.width, config.height),
            scene: Scene::new(),
            background: config.background,
            options: config.render_options(),
            current: None,
        };
        canvas.redraw();
        canvas
    }

    pub fn surface(&self) -> &PixelBuffer {
        &self.surface
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn current_layer(&self) -> Option<usize> {
        self.current
    }

    pub fn current_shape(&self) -> Option<&Shape> {
        self.current.and_then(|i| self.scene.shape_at(i))
    }

    /// Clear to the background and draw every shape in depth order
    pub fn redraw(&mut self) {
        raster::draw_scene(&mut self.surface, &self.scene, self.background, &self.options);
    }

    /// Plot a marker pixel outside the scene. The next redraw removes it.
    pub fn mark(&mut self, p: Point, color: Color) {
        self.surface.set_pixel(p.x, p.y, color);
    }

    // ========================================================================
    // Scene edits
    // ========================================================================

    /// Add a shape on top of everything else and make it the current layer
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let depth = self.scene.next_depth();
        let id = self.scene.insert(shape, depth);
        self.current = self.scene.position_of(id);
        tracing::debug!("Added shape at depth {}", depth);
        self.redraw();
        id
    }

    /// Add a shape at an explicit depth
    pub fn insert(&mut self, shape: Shape, depth: i32) -> ShapeId {
        let current_id = self.current_id();
        let id = self.scene.insert(shape, depth);
        self.current = current_id.and_then(|id| self.scene.position_of(id));
        self.redraw();
        id
    }

    /// Select the layer at list position `index`
    pub fn select_layer(&mut self, index: usize) -> bool {
        if index < self.scene.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    /// Swap the first shape with `depth` and its predecessor in draw order
    pub fn move_up(&mut self, depth: i32) -> bool {
        self.reorder(|scene| scene.move_up(depth))
    }

    /// Swap the first shape with `depth` and its successor in draw order
    pub fn move_down(&mut self, depth: i32) -> bool {
        self.reorder(|scene| scene.move_down(depth))
    }

    /// Move the current layer one step earlier in draw order
    pub fn move_current_up(&mut self) -> bool {
        match self.current.and_then(|i| self.scene.entry(i)) {
            Some(entry) => self.move_up(entry.depth),
            None => false,
        }
    }

    /// Move the current layer one step later in draw order
    pub fn move_current_down(&mut self) -> bool {
        match self.current.and_then(|i| self.scene.entry(i)) {
            Some(entry) => self.move_down(entry.depth),
            None => false,
        }
    }

    fn reorder(&mut self, op: impl FnOnce(&mut Scene) -> bool) -> bool {
        let current_id = self.current_id();
        let moved = op(&mut self.scene);
        if moved {
            // Selection follows the shape, not the slot
            self.current = current_id.and_then(|id| self.scene.position_of(id));
            self.redraw();
        }
        moved
    }

    /// Remove the shape at list position `index`
    pub fn delete_at(&mut self, index: usize) -> Option<Shape> {
        let removed = self.scene.delete_at(index)?;
        self.current = match self.current {
            Some(c) if c == index => None,
            Some(c) if c > index => Some(c - 1),
            other => other,
        };
        self.redraw();
        Some(removed)
    }

    pub fn clear_scene(&mut self) {
        self.scene.clear();
        self.current = None;
        self.redraw();
    }

    /// Replace the colors of the shape at list position `index`
    pub fn set_layer_colors(&mut self, index: usize, border: Color, fill: Color) -> bool {
        let Some(shape) = self.scene.shape_at_mut(index) else {
            return false;
        };
        shape.set_colors(border, fill);
        self.redraw();
        true
    }

    /// Replace the fill flag of the shape at list position `index`
    pub fn set_layer_filled(&mut self, index: usize, filled: bool) -> bool {
        let Some(shape) = self.scene.shape_at_mut(index) else {
            return false;
        };
        shape.style.filled = filled;
        self.redraw();
        true
    }

    // ========================================================================
    // Transforms on the current layer
    // ========================================================================

    /// Apply a transform to the current layer. False when nothing is selected.
    pub fn transform_current(&mut self, transform: Transform) -> bool {
        let Some(shape) = self.current.and_then(|i| self.scene.shape_at_mut(i)) else {
            tracing::debug!("No current layer for {:?}", transform);
            return false;
        };
        transform.apply(shape);
        self.redraw();
        true
    }

    pub fn translate(&mut self, dx: i32, dy: i32) -> bool {
        self.transform_current(Transform::Translate { dx, dy })
    }

    pub fn rotate(&mut self, degrees: f64) -> bool {
        self.transform_current(Transform::Rotate { degrees })
    }

    pub fn scale(&mut self, sx: f64, sy: f64) -> bool {
        self.transform_current(Transform::Scale { sx, sy })
    }

    // ========================================================================
    // Surface and files
    // ========================================================================

    /// Reallocate the surface and re-rasterize the scene onto it
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
        self.redraw();
        tracing::info!("Resized surface to {}x{}", width, height);
    }

    /// Replace the scene with a loaded one, returning the rejected records
    pub fn replace_scene(&mut self, report: LoadReport) -> Vec<(usize, RecordError)> {
        self.scene = report.scene;
        self.current = None;
        self.redraw();
        report.failures
    }

    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Vec<(usize, RecordError)>> {
        let report = Scene::load(path)?;
        Ok(self.replace_scene(report))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.scene.save(path)
    }

    pub fn export_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.surface.save_png(path)
    }

    fn current_id(&self) -> Option<ShapeId> {
        self.current
            .and_then(|i| self.scene.entry(i))
            .map(|entry| entry.id)
    }
}
