//! Engine configuration: label placement and text style.

use crate::defaults;
use crate::errors::ConfigError;
use crate::types::{non_negative, positive};

/// How label text is drawn by the host
///
/// Labels carry only placement and text. The host reads the style once from
/// [`AnnotationEngine::config`](crate::AnnotationEngine::config) and applies it
/// to every label it draws.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub font_family: String,
    /// Font size in points
    pub font_size: f64,
    /// Text color as RGBA
    pub color: [u8; 4],
    /// Halo (outline) color as RGBA, drawn so labels read over imagery
    pub halo_color: [u8; 4],
    /// Halo width in points; zero disables the halo
    pub halo_size: f64,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_family: defaults::FONT_FAMILY.to_string(),
            font_size: defaults::FONT_SIZE,
            color: defaults::TEXT_COLOR,
            halo_color: defaults::HALO_COLOR,
            halo_size: defaults::HALO_SIZE,
        }
    }
}

/// Settings for an [`AnnotationEngine`](crate::AnnotationEngine)
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Per-axis magnitude of the label offset
    pub offset: f64,
    pub style: LabelStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            offset: defaults::LABEL_OFFSET,
            style: LabelStyle::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the label offset magnitude.
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_style(mut self, style: LabelStyle) -> Self {
        self.style = style;
        self
    }

    /// Check every numeric setting; called once when an engine is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive(self.offset).map_err(|reason| ConfigError::InvalidSetting {
            setting: "label offset",
            reason,
        })?;
        positive(self.style.font_size).map_err(|reason| ConfigError::InvalidSetting {
            setting: "font size",
            reason,
        })?;
        non_negative(self.style.halo_size).map_err(|reason| ConfigError::InvalidSetting {
            setting: "halo size",
            reason,
        })?;
        Ok(())
    }
}
