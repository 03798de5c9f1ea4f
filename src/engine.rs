//! The annotation engine: turns host measurement events into segment labels.
//!
//! All mutable state lives here. Each handler runs to completion inside the
//! host's callback, and `&mut self` rules out reentrancy.

use crate::config::EngineConfig;
use crate::conversion::ConversionTable;
use crate::defaults;
use crate::errors::{ConfigError, EngineError};
use crate::geometry;
use crate::host::{CursorSubscription, Host};
use crate::log;
use crate::store::{Label, LabelDelta, LabelStore};
use crate::types::{MapPoint, Tool, Unit};
use crate::window::SegmentWindow;

/// Whether a measurement session is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No session has started yet
    Idle,
    /// A session is open; the window holds 0–2 vertices
    Tracking,
}

/// Inbound host events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A drawing tool was activated; `unit` is the current display unit.
    SessionStart { unit: Unit },
    /// A segment was finished at `point`; `total` is the whole line's length
    /// so far, in the current display unit.
    SegmentCompleted { point: MapPoint, total: f64, tool: Tool },
    /// The user switched tools (or closed the active one).
    ToolChanged,
    /// The user picked a different display unit.
    UnitChanged { unit: Unit },
    /// The cursor moved; only delivered while a cursor capture is armed.
    CursorMoved { point: MapPoint },
}

/// Per-session state: the vertex window, the length baseline and the unit
#[derive(Debug, Clone)]
struct SessionState {
    window: SegmentWindow,
    current_unit: Unit,
}

impl SessionState {
    fn new(unit: Unit) -> Self {
        Self { window: SegmentWindow::new(), current_unit: unit }
    }
}

/// Orchestrates the window, geometry, conversion table and label store
///
/// A clone shares no host resources: it copies the labels and the window but
/// not an armed cursor capture, which stays with the original.
#[derive(Debug)]
pub struct AnnotationEngine {
    config: EngineConfig,
    table: ConversionTable,
    state: EngineState,
    session: SessionState,
    labels: LabelStore,
    /// Armed cursor capture; taken exactly once
    capture: Option<CursorSubscription>,
}

impl AnnotationEngine {
    /// Engine with the default configuration and the standard conversion table.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::with_table(config, ConversionTable::new()?)
    }

    /// Engine with a custom, already validated conversion table.
    pub fn with_table(config: EngineConfig, table: ConversionTable) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            table,
            state: EngineState::Idle,
            session: SessionState::new(defaults::UNIT),
            labels: LabelStore::new(),
            capture: None,
        })
    }

    /// Route an event to its handler.
    pub fn dispatch(&mut self, event: Event, host: &mut dyn Host) {
        match event {
            Event::SessionStart { unit } => self.session_start(unit, host),
            Event::SegmentCompleted { point, total, tool } => {
                self.segment_completed(point, total, tool, host)
            }
            Event::ToolChanged => self.tool_changed(host),
            Event::UnitChanged { unit } => self.unit_changed(unit, host),
            Event::CursorMoved { point } => self.cursor_moved(point, host),
        }
    }

    /// Start a new line: forget the old one and arm the cursor capture that
    /// records its first vertex.
    pub fn session_start(&mut self, unit: Unit, host: &mut dyn Host) {
        log::debug!(%unit, "session start");
        self.reset(host);
        self.session.current_unit = unit;
        self.capture = Some(host.subscribe_cursor());
    }

    /// Record the line's first vertex, once per session.
    pub fn cursor_moved(&mut self, point: MapPoint, host: &mut dyn Host) {
        if !point.is_finite() {
            log::debug!(%point, "ignoring non-finite cursor position");
            return;
        }
        let Some(subscription) = self.capture.take() else {
            log::trace!(%point, "cursor move without an armed capture");
            return;
        };
        host.unsubscribe_cursor(subscription);
        self.session.window.push(point);
        log::debug!(%point, "captured first vertex");
    }

    /// A segment ended at `point`; label it if both its ends are known.
    pub fn segment_completed(&mut self, point: MapPoint, total: f64, tool: Tool, host: &mut dyn Host) {
        if self.state == EngineState::Idle {
            log::debug!("segment completed outside a session, ignoring");
            return;
        }
        if tool != Tool::Distance {
            log::debug!(%tool, "segment completed with a non-distance tool, ignoring");
            return;
        }
        if !point.is_finite() || !total.is_finite() || total < 0.0 {
            log::debug!(%point, total, "segment completed with invalid values, ignoring");
            return;
        }

        // Vertices arrive from here on; a capture that never fired is stale.
        if let Some(subscription) = self.capture.take() {
            host.unsubscribe_cursor(subscription);
        }

        let window = &mut self.session.window;
        window.push(point);
        let Some(segment) = window.segment() else {
            log::debug!(total, "first vertex missing, no label for this segment");
            window.advance_baseline(total);
            return;
        };

        let length = window.segment_length(total);
        window.advance_baseline(total);

        let angle = geometry::slope_angle_degrees(segment.a, segment.b);
        let label = Label::new(
            geometry::midpoint(segment.a, segment.b),
            length,
            self.session.current_unit,
            angle,
            geometry::label_offset(angle, self.config.offset),
        );
        log::debug!(%label, "placed label");
        let label = self.labels.append(label);
        host.labels_changed(LabelDelta::Appended(label));
    }

    /// Drop the line and its labels. A new session start follows if the user
    /// re-selects the distance tool.
    pub fn tool_changed(&mut self, host: &mut dyn Host) {
        log::debug!("tool changed");
        self.reset(host);
    }

    /// Re-express every label in `unit`, converting from each label's own unit.
    pub fn unit_changed(&mut self, unit: Unit, host: &mut dyn Host) {
        let previous = self.session.current_unit;
        if unit == previous {
            return;
        }
        log::debug!(from = %previous, to = %unit, labels = self.labels.len(), "unit changed");

        let table = &self.table;
        self.labels.rewrite_each(|label| {
            let length = table.convert(label.length(), label.unit(), unit);
            label.relabeled(length, unit)
        });
        self.session.window.rescale_baseline(table.factor(previous, unit));
        self.session.current_unit = unit;

        if !self.labels.is_empty() {
            host.labels_changed(LabelDelta::Rewritten(self.labels.as_slice()));
        }
    }

    /// Like [`unit_changed`](Self::unit_changed), for a unit named by the host.
    ///
    /// Unknown names are rejected before anything changes.
    pub fn unit_changed_named(&mut self, name: &str, host: &mut dyn Host) -> Result<(), EngineError> {
        let unit: Unit = name
            .parse()
            .map_err(|_| EngineError::UnknownUnit { name: name.to_string() })?;
        self.unit_changed(unit, host);
        Ok(())
    }

    fn reset(&mut self, host: &mut dyn Host) {
        if let Some(subscription) = self.capture.take() {
            host.unsubscribe_cursor(subscription);
        }
        self.session.window.reset();
        self.labels.clear();
        self.state = EngineState::Tracking;
        host.labels_changed(LabelDelta::Cleared);
    }

    /// Placed labels, in segment completion order.
    pub fn labels(&self) -> &[Label] {
        self.labels.as_slice()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn current_unit(&self) -> Unit {
        self.session.current_unit
    }

    /// Line length as of the last completed segment, in the current unit.
    pub fn cumulative_length(&self) -> f64 {
        self.session.window.cumulative()
    }

    /// Vertices in the window, oldest first.
    pub fn window(&self) -> Vec<MapPoint> {
        self.session.window.points().copied().collect()
    }

    /// Whether the first-vertex cursor capture is still waiting.
    pub fn is_capturing(&self) -> bool {
        self.capture.is_some()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn table(&self) -> &ConversionTable {
        &self.table
    }
}

impl Clone for AnnotationEngine {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            table: self.table.clone(),
            state: self.state,
            session: self.session.clone(),
            labels: self.labels.clone(),
            capture: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostCall, Recorder};
    use crate::types::{Angle, LabelOffset};

    fn p(x: f64, y: f64) -> MapPoint {
        MapPoint::new(x, y)
    }

    fn started(unit: Unit) -> (AnnotationEngine, Recorder) {
        let mut engine = AnnotationEngine::new().unwrap();
        let mut host = Recorder::new();
        engine.session_start(unit, &mut host);
        (engine, host)
    }

    fn texts(engine: &AnnotationEngine) -> Vec<&str> {
        engine.labels().iter().map(Label::text).collect()
    }

    #[test]
    fn starts_idle() {
        let engine = AnnotationEngine::new().unwrap();
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.current_unit(), Unit::Miles);
        assert!(!engine.is_capturing());
    }

    #[test]
    fn rejects_invalid_config() {
        let err = AnnotationEngine::with_config(EngineConfig::new().with_offset(-1.0)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSetting { setting: "label offset", .. }));
    }

    #[test]
    fn first_segment_uses_captured_vertex() {
        let (mut engine, mut host) = started(Unit::Feet);
        engine.cursor_moved(p(0.0, 0.0), &mut host);
        engine.segment_completed(p(10.0, 0.0), 10.0, Tool::Distance, &mut host);

        let labels = engine.labels();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].text(), "10.0");
        assert_eq!(labels[0].angle, Angle(0.0));
        assert_eq!(labels[0].offset, LabelOffset::new(10.0, 10.0));
        assert_eq!(labels[0].position, p(5.0, 0.0));
        assert_eq!(labels[0].unit(), Unit::Feet);
    }

    #[test]
    fn cursor_capture_fires_once() {
        let (mut engine, mut host) = started(Unit::Feet);
        assert!(engine.is_capturing());
        engine.cursor_moved(p(0.0, 0.0), &mut host);
        engine.cursor_moved(p(3.0, 3.0), &mut host);
        engine.cursor_moved(p(4.0, 4.0), &mut host);
        assert!(!engine.is_capturing());
        assert_eq!(engine.window(), vec![p(0.0, 0.0)]);
        assert!(host.live_subscriptions().is_empty());
        let unsubscribes = host.calls().iter().filter(|c| matches!(c, HostCall::Unsubscribe(_))).count();
        assert_eq!(unsubscribes, 1);
    }

    #[test]
    fn non_finite_cursor_keeps_capture_armed() {
        let (mut engine, mut host) = started(Unit::Feet);
        engine.cursor_moved(p(f64::NAN, 0.0), &mut host);
        assert!(engine.is_capturing());
        assert!(engine.window().is_empty());
    }

    #[test]
    fn segment_lengths_are_per_segment() {
        let (mut engine, mut host) = started(Unit::Meters);
        engine.cursor_moved(p(0.0, 0.0), &mut host);
        engine.segment_completed(p(3.0, 4.0), 5.0, Tool::Distance, &mut host);
        engine.segment_completed(p(3.0, 10.0), 11.0, Tool::Distance, &mut host);
        engine.segment_completed(p(0.0, 10.0), 14.0, Tool::Distance, &mut host);
        assert_eq!(texts(&engine), ["5.0", "6.0", "3.0"]);
        assert_eq!(engine.cumulative_length(), 14.0);
        assert_eq!(engine.window(), vec![p(3.0, 10.0), p(0.0, 10.0)]);
    }

    #[test]
    fn vertical_segment_gets_fallback_angle() {
        let (mut engine, mut host) = started(Unit::Feet);
        engine.cursor_moved(p(-5.0, 0.0), &mut host);
        engine.segment_completed(p(0.0, 0.0), 5.0, Tool::Distance, &mut host);
        engine.segment_completed(p(0.0, 7.0), 12.0, Tool::Distance, &mut host);
        engine.segment_completed(p(0.0, 7.0), 12.0, Tool::Distance, &mut host);

        let labels = engine.labels();
        assert_eq!(texts(&engine), ["5.0", "7.0", "0.0"]);
        assert_eq!(labels[1].angle, Angle(-90.0));
        assert_eq!(labels[1].offset, LabelOffset::new(-10.0, 10.0));
        assert_eq!(labels[2].angle, Angle::ZERO);
    }

    #[test]
    fn other_tools_are_ignored() {
        let (mut engine, mut host) = started(Unit::Feet);
        engine.cursor_moved(p(0.0, 0.0), &mut host);
        engine.segment_completed(p(10.0, 0.0), 10.0, Tool::Area, &mut host);
        assert!(engine.labels().is_empty());
        assert_eq!(engine.window(), vec![p(0.0, 0.0)]);
        assert_eq!(engine.cumulative_length(), 0.0);
    }

    #[test]
    fn segments_before_a_session_are_ignored() {
        let mut engine = AnnotationEngine::new().unwrap();
        let mut host = Recorder::new();
        engine.segment_completed(p(10.0, 0.0), 10.0, Tool::Distance, &mut host);
        assert!(engine.labels().is_empty());
        assert!(engine.window().is_empty());
        assert!(host.calls().is_empty());
    }

    #[test]
    fn invalid_totals_are_ignored() {
        let (mut engine, mut host) = started(Unit::Feet);
        engine.cursor_moved(p(0.0, 0.0), &mut host);
        engine.segment_completed(p(10.0, 0.0), f64::NAN, Tool::Distance, &mut host);
        engine.segment_completed(p(10.0, 0.0), -1.0, Tool::Distance, &mut host);
        assert!(engine.labels().is_empty());
        assert_eq!(engine.window().len(), 1);
    }

    #[test]
    fn missing_first_vertex_still_advances_baseline() {
        let (mut engine, mut host) = started(Unit::Feet);
        engine.segment_completed(p(10.0, 0.0), 10.0, Tool::Distance, &mut host);
        assert!(engine.labels().is_empty());
        assert!(!engine.is_capturing());
        assert_eq!(engine.cumulative_length(), 10.0);

        engine.segment_completed(p(10.0, 4.0), 14.0, Tool::Distance, &mut host);
        assert_eq!(texts(&engine), ["4.0"]);
    }

    #[test]
    fn clone_leaves_the_capture_with_the_original() {
        let (mut engine, mut host) = started(Unit::Feet);
        let mut copy = engine.clone();
        assert!(engine.is_capturing());
        assert!(!copy.is_capturing());

        copy.tool_changed(&mut host);
        engine.tool_changed(&mut host);
        let unsubscribes = host
            .calls()
            .iter()
            .filter(|call| matches!(call, HostCall::Unsubscribe(_)))
            .count();
        assert_eq!(unsubscribes, 1);
        assert!(host.live_subscriptions().is_empty());
    }

    #[test]
    fn clone_keeps_labels_and_window() {
        let (mut engine, mut host) = started(Unit::Feet);
        engine.cursor_moved(p(0.0, 0.0), &mut host);
        engine.segment_completed(p(10.0, 0.0), 10.0, Tool::Distance, &mut host);
        let copy = engine.clone();
        assert_eq!(copy.labels(), engine.labels());
        assert_eq!(copy.window(), engine.window());
        assert_eq!(copy.cumulative_length(), 10.0);
        assert_eq!(copy.state(), EngineState::Tracking);
    }

    #[test]
    fn tool_change_resets_everything() {
        let (mut engine, mut host) = started(Unit::Feet);
        engine.cursor_moved(p(0.0, 0.0), &mut host);
        engine.segment_completed(p(10.0, 0.0), 10.0, Tool::Distance, &mut host);
        engine.tool_changed(&mut host);
        assert!(engine.labels().is_empty());
        assert!(engine.window().is_empty());
        assert_eq!(engine.cumulative_length(), 0.0);
        assert_eq!(engine.state(), EngineState::Tracking);
        assert!(host.overlay().is_empty());
    }

    #[test]
    fn tool_change_disarms_pending_capture() {
        let (mut engine, mut host) = started(Unit::Feet);
        engine.tool_changed(&mut host);
        assert!(!engine.is_capturing());
        assert!(host.live_subscriptions().is_empty());
        engine.cursor_moved(p(1.0, 1.0), &mut host);
        assert!(engine.window().is_empty());
    }

    #[test]
    fn restarting_a_session_replaces_the_capture() {
        let (mut engine, mut host) = started(Unit::Feet);
        engine.session_start(Unit::Meters, &mut host);
        assert_eq!(host.live_subscriptions().len(), 1);
        assert_eq!(engine.current_unit(), Unit::Meters);
    }

    #[test]
    fn unit_change_rewrites_labels() {
        let (mut engine, mut host) = started(Unit::Feet);
        engine.cursor_moved(p(0.0, 0.0), &mut host);
        engine.segment_completed(p(10.0, 0.0), 10.0, Tool::Distance, &mut host);
        engine.segment_completed(p(30.0, 0.0), 30.0, Tool::Distance, &mut host);
        assert_eq!(texts(&engine), ["10.0", "20.0"]);

        engine.unit_changed(Unit::Meters, &mut host);
        assert_eq!(engine.current_unit(), Unit::Meters);
        assert_eq!(texts(&engine), ["3.0", "6.1"]);
        assert!(engine.labels().iter().all(|l| l.unit() == Unit::Meters));
        assert_eq!(host.overlay(), engine.labels());

        engine.unit_changed(Unit::Feet, &mut host);
        assert_eq!(texts(&engine), ["9.8", "20.0"]);
        // Half a last place in meters, seen in feet, plus half a last place in feet.
        let tolerance = 0.05 * engine.table().factor(Unit::Meters, Unit::Feet) + 0.05 + 1e-9;
        for (label, original) in engine.labels().iter().zip([10.0, 20.0]) {
            assert!((label.length() - original).abs() <= tolerance, "{label}");
        }
    }

    #[test]
    fn unit_change_rescales_baseline() {
        let (mut engine, mut host) = started(Unit::Feet);
        engine.cursor_moved(p(0.0, 0.0), &mut host);
        engine.segment_completed(p(10.0, 0.0), 10.0, Tool::Distance, &mut host);
        engine.unit_changed(Unit::Meters, &mut host);
        assert!((engine.cumulative_length() - 3.048).abs() < 1e-9);

        // The host now reports totals in meters.
        engine.segment_completed(p(20.0, 0.0), 6.096, Tool::Distance, &mut host);
        assert_eq!(texts(&engine), ["3.0", "3.0"]);
    }

    #[test]
    fn same_unit_is_a_no_op() {
        let (mut engine, mut host) = started(Unit::Feet);
        host.take_calls();
        engine.unit_changed(Unit::Feet, &mut host);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn unknown_unit_name_leaves_labels_alone() {
        let (mut engine, mut host) = started(Unit::Feet);
        engine.cursor_moved(p(0.0, 0.0), &mut host);
        engine.segment_completed(p(10.0, 0.0), 10.0, Tool::Distance, &mut host);

        let err = engine.unit_changed_named("furlongs", &mut host).unwrap_err();
        assert_eq!(err, EngineError::UnknownUnit { name: "furlongs".to_string() });
        assert_eq!(texts(&engine), ["10.0"]);
        assert_eq!(engine.current_unit(), Unit::Feet);

        engine.unit_changed_named("Yards", &mut host).unwrap();
        assert_eq!(texts(&engine), ["3.3"]);
    }

    #[test]
    fn dispatch_routes_events() {
        let mut engine = AnnotationEngine::new().unwrap();
        let mut host = Recorder::new();
        for event in [
            Event::SessionStart { unit: Unit::Yards },
            Event::CursorMoved { point: p(0.0, 0.0) },
            Event::SegmentCompleted { point: p(0.0, -2.0), total: 2.0, tool: Tool::Distance },
            Event::UnitChanged { unit: Unit::Feet },
        ] {
            engine.dispatch(event, &mut host);
        }
        assert_eq!(texts(&engine), ["6.0"]);
        assert_eq!(engine.labels()[0].angle, Angle(90.0));
        engine.dispatch(Event::ToolChanged, &mut host);
        assert!(engine.labels().is_empty());
    }

    #[test]
    fn host_sees_incremental_deltas() {
        let (mut engine, mut host) = started(Unit::Feet);
        engine.cursor_moved(p(0.0, 0.0), &mut host);
        engine.segment_completed(p(10.0, 0.0), 10.0, Tool::Distance, &mut host);
        let calls = host.take_calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[0], HostCall::Cleared);
        assert!(matches!(calls[1], HostCall::Subscribe(_)));
        assert!(matches!(calls[2], HostCall::Unsubscribe(_)));
        assert_eq!(calls[3], HostCall::Appended(engine.labels()[0].clone()));
    }
}
