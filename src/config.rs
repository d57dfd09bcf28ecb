//! Engine configuration loaded from JSON

use crate::display::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::{Error, Result};
use crate::raster::{bezier, RenderOptions};
use crate::shapes::{Color, Style};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Surface size, default colors and rasterization settings.
///
/// Every field is optional in the file; missing ones take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    /// Style applied to newly created shapes
    pub border_color: Color,
    pub fill_color: Color,
    pub filled: bool,
    /// Parameter increment for Bezier flattening, in (0, 1]
    pub bezier_step: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: Color::WHITE,
            border_color: Color::BLACK,
            fill_color: Color::BLACK,
            filled: false,
            bezier_step: bezier::DEFAULT_STEP,
        }
    }
}

impl EngineConfig {
    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!(
                "surface size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.bezier_step > 0.0 && self.bezier_step <= 1.0) {
            return Err(Error::Config(format!(
                "bezier_step must be in (0, 1], got {}",
                self.bezier_step
            )));
        }
        Ok(())
    }

    /// Style for shapes created with the current defaults
    pub fn style(&self) -> Style {
        Style::new(self.filled, self.border_color, self.fill_color)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            bezier_step: self.bezier_step,
        }
    }
}
