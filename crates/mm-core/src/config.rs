//! Canvas configuration.

use crate::model::{PALETTE_COLORS, Shape};

/// Tunables for the canvas, history and export.
///
/// All fields default to the values the canvas has always used; hosts only
/// override what they need.
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Lower zoom bound (inclusive). Default: **0.2**.
    pub min_scale: f64,
    /// Upper zoom bound (inclusive). Default: **3.0**.
    pub max_scale: f64,
    /// Multiplier applied per wheel notch. Default: **1.1**.
    pub zoom_factor: f64,
    /// Padding around the node bounding box in SVG export. Default: **50**.
    pub export_padding: f64,
    /// Maximum number of undo steps kept. `None` keeps everything.
    pub history_depth: Option<usize>,
    /// Fill color for freshly dropped nodes.
    pub default_color: String,
    /// Outline for freshly dropped nodes.
    pub default_shape: Shape,
    /// Vertical distance between nodes placed by a bulk import.
    pub import_spacing: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.2,
            max_scale: 3.0,
            zoom_factor: 1.1,
            export_padding: 50.0,
            history_depth: None,
            default_color: PALETTE_COLORS[0].to_string(),
            default_shape: Shape::Rectangle,
            import_spacing: 24.0,
        }
    }
}

impl CanvasConfig {
    pub fn scale_in_range(&self, scale: f64) -> bool {
        scale >= self.min_scale && scale <= self.max_scale
    }
}
