//! Default engine settings (screen units are points, as the host's text symbols use)

use crate::types::Unit;

/// Display unit before the host reports one.
pub const UNIT: Unit = Unit::Miles;

/// Per-axis distance between a label and its segment midpoint.
pub const LABEL_OFFSET: f64 = 10.0;
pub const FONT_FAMILY: &str = "Arial";
pub const FONT_SIZE: f64 = 12.0;
/// RGBA
pub const TEXT_COLOR: [u8; 4] = [255, 255, 255, 255];
pub const HALO_COLOR: [u8; 4] = [0, 0, 0, 255];
pub const HALO_SIZE: f64 = 1.0;
/// Relative tolerance for reciprocal checks on conversion factors.
pub const RECIPROCAL_TOLERANCE: f64 = 1e-6;
