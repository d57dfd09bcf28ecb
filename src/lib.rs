//! Depth-ordered 2D vector scene engine.
//!
//! Shapes (lines, rectangles, polygons, circles, Bezier curves) live in a
//! [`Scene`] sorted by depth and are rasterized in software onto a
//! [`PixelBuffer`] with Bresenham lines, midpoint circles, scanline polygon
//! fill and Bezier flattening. Geometry is clipped to the surface first.
//! A [`Canvas`] ties scene and surface together and redraws after every edit.

pub mod canvas;
pub mod clip;
pub mod config;
pub mod control;
pub mod display;
pub mod error;
pub mod geometry;
pub mod input;
pub mod raster;
pub mod shapes;
pub mod transform;

pub use canvas::Canvas;
pub use config::EngineConfig;
pub use display::PixelBuffer;
pub use error::{Error, Result};
pub use geometry::{Point, Rect};
pub use shapes::{Color, Geometry, Scene, Shape, ShapeKind, Style};
pub use transform::Transform;
