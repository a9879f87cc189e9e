//! Chart configuration: margins, padding, axis tick counts, tooltip
//! placement and value formatters.
//!
//! Everything has a documented default, so an empty file is a valid config.
//! egui types are mirrored as plain arrays for serde, as the persistence
//! layer does for colours.

use std::path::Path;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::format::ValueFormatter;
use crate::layout::{Margin, Viewport};

/// Tick settings for one axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    /// Approximate number of ticks; the exact count depends on round step sizes.
    pub num_ticks: usize,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self { num_ticks: 10 }
    }
}

/// Per-axis settings. The left axis is repeated once per row.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisProps {
    pub top: AxisConfig,
    pub bottom: AxisConfig,
    /// Default: 4 ticks.
    pub left: AxisConfig,
}

impl Default for AxisProps {
    fn default() -> Self {
        Self {
            top: AxisConfig::default(),
            bottom: AxisConfig::default(),
            left: AxisConfig { num_ticks: 4 },
        }
    }
}

/// Pixel offsets of the tooltip labels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipOffsets {
    /// Horizontal gap between the crosshair and the labels. Default: `12.0`.
    pub left: f32,
    /// Top of the upper x label, relative to the chart. Default: `-18.0`.
    pub top: f32,
    /// Gap between the chart bottom and the lower x label. Default: `6.0`.
    pub bottom: f32,
}

impl Default for TooltipOffsets {
    fn default() -> Self {
        Self {
            left: 12.0,
            top: -18.0,
            bottom: 6.0,
        }
    }
}

/// Formatting hooks for tooltips and tick labels. All identity by default.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Formatters {
    pub tooltip_x: ValueFormatter,
    pub tooltip_y: ValueFormatter,
    pub tick_x: ValueFormatter,
    pub tick_y: ValueFormatter,
}

/// Configuration of a stacked series chart.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Default: `{top: 30, left: 50, right: 30, bottom: 30}`.
    pub margin: Margin,
    /// Pixels removed from the top and bottom of every row band. Default: `0.0`.
    pub signal_padding: f32,
    pub axes: AxisProps,
    /// Width (px) of the grab zone centred on each epoch edge. Default: `6.0`.
    pub handle_width: f32,
    /// RGBA fill of the frame around the plot area. Default: white.
    pub border_fill: [u8; 4],
    pub tooltip: TooltipOffsets,
    pub format: Formatters,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            margin: Margin::default(),
            signal_padding: 0.0,
            axes: AxisProps::default(),
            handle_width: 6.0,
            border_fill: [255, 255, 255, 255],
            tooltip: TooltipOffsets::default(),
            format: Formatters::default(),
        }
    }
}

impl StackConfig {
    pub fn border_fill_color(&self) -> Color32 {
        let [r, g, b, a] = self.border_fill;
        Color32::from_rgba_unmultiplied(r, g, b, a)
    }

    pub fn set_border_fill_color(&mut self, color: Color32) {
        self.border_fill = color.to_srgba_unmultiplied();
    }

    /// Viewport of the given size using the configured margins.
    pub fn viewport(&self, width: f32, height: f32) -> Viewport {
        Viewport {
            width,
            height,
            margin: self.margin,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, ConfigError> = match ext.as_deref() {
            Some("json") => Self::from_json,
            Some("yaml") | Some("yml") => Self::from_yaml,
            _ => return Err(ConfigError::UnsupportedFormat(ext)),
        };
        let txt = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = parse(&txt)?;
        log::debug!("loaded stack config from {}", path.display());
        Ok(config)
    }
}
