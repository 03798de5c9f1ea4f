//! Per-segment length labels for interactive map distance measurement.
//!
//! While a user draws a polyline with a map's distance tool, the host reports
//! each completed segment's endpoint together with the line's running total.
//! [`AnnotationEngine`] turns those events into one [`Label`] per segment:
//! the segment's own length, anchored at its midpoint, rotated along it and
//! offset clear of it. Switching the display unit rewrites every label through
//! the [`ConversionTable`].
//!
//! ```
//! use seglabel::{AnnotationEngine, MapPoint, Recorder, Tool, Unit};
//!
//! let mut engine = AnnotationEngine::new()?;
//! let mut host = Recorder::new();
//!
//! engine.session_start(Unit::Feet, &mut host);
//! engine.cursor_moved(MapPoint::new(0.0, 0.0), &mut host);
//! engine.segment_completed(MapPoint::new(10.0, 0.0), 10.0, Tool::Distance, &mut host);
//!
//! assert_eq!(engine.labels()[0].text(), "10.0");
//!
//! engine.unit_changed(Unit::Meters, &mut host);
//! assert_eq!(engine.labels()[0].text(), "3.0");
//! # Ok::<(), seglabel::ConfigError>(())
//! ```

pub mod config;
pub mod conversion;
pub mod defaults;
pub mod engine;
pub mod errors;
pub mod geometry;
pub mod host;
mod log;
pub mod script;
pub mod store;
pub mod types;
pub mod window;

pub use config::{EngineConfig, LabelStyle};
pub use conversion::ConversionTable;
pub use engine::{AnnotationEngine, EngineState, Event};
pub use errors::{ConfigError, EngineError, ScriptError};
pub use host::{CursorSubscription, Host, HostCall, Recorder};
pub use store::{Label, LabelDelta, LabelStore};
pub use types::{Angle, LabelOffset, MapPoint, Segment, SpatialRef, Tool, Unit};
pub use window::SegmentWindow;
