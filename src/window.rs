//! Sliding window over the two most recent vertices of the measured line.

use std::collections::VecDeque;

use crate::log;
use crate::types::{MapPoint, Segment};

const CAPACITY: usize = 2;

/// The last two placed vertices plus the cumulative length baseline
#[derive(Debug, Clone, Default)]
pub struct SegmentWindow {
    points: VecDeque<MapPoint>,
    /// Total line length as of the previous segment
    cumulative: f64,
}

impl SegmentWindow {
    pub fn new() -> Self {
        Self { points: VecDeque::with_capacity(CAPACITY + 1), cumulative: 0.0 }
    }

    /// Append a vertex, returning the oldest one if the window was already full.
    pub fn push(&mut self, point: MapPoint) -> Option<MapPoint> {
        self.points.push_back(point);
        if self.points.len() > CAPACITY { self.points.pop_front() } else { None }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.points.len() == CAPACITY
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points currently held, oldest first.
    pub fn points(&self) -> impl Iterator<Item = &MapPoint> {
        self.points.iter()
    }

    /// The newest segment, once two vertices are present.
    pub fn segment(&self) -> Option<Segment> {
        match (self.points.front(), self.points.back()) {
            (Some(&a), Some(&b)) if self.is_full() => Some(Segment { a, b }),
            _ => None,
        }
    }

    #[inline]
    pub fn cumulative(&self) -> f64 {
        self.cumulative
    }

    /// Length of the newest segment given the line's total length so far.
    ///
    /// Never negative: a total below the baseline yields 0.
    pub fn segment_length(&self, total_so_far: f64) -> f64 {
        let length = total_so_far - self.cumulative;
        if length < 0.0 {
            log::warn!(total_so_far, baseline = self.cumulative, "line total shrank, clamping segment length to 0");
            0.0
        } else {
            length
        }
    }

    /// Record `total_so_far` as the new baseline. The baseline never decreases.
    pub fn advance_baseline(&mut self, total_so_far: f64) {
        if total_so_far > self.cumulative {
            self.cumulative = total_so_far;
        }
    }

    /// Rescale the baseline by `factor` (after the host switched units).
    pub fn rescale_baseline(&mut self, factor: f64) {
        self.cumulative *= factor;
    }

    /// Forget all vertices and zero the baseline.
    pub fn reset(&mut self) {
        self.points.clear();
        self.cumulative = 0.0;
    }
}
