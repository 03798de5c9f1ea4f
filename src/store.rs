//! Placed labels, in the order their segments were completed.

use std::fmt;

use crate::types::{Angle, LabelOffset, MapPoint, Unit};

/// The text annotation for one completed segment
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Anchor point (segment midpoint)
    pub position: MapPoint,
    text: String,
    /// Displayed length, already rounded to `unit`'s precision
    length: f64,
    pub angle: Angle,
    pub offset: LabelOffset,
    unit: Unit,
}

impl Label {
    /// Create a label showing `length` in `unit`, rounded to the unit's precision.
    pub fn new(position: MapPoint, length: f64, unit: Unit, angle: Angle, offset: LabelOffset) -> Self {
        let length = unit.round(length);
        Label { position, text: unit.format(length), length, angle, offset, unit }
    }

    /// The displayed text, e.g. `"10.0"`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The displayed value as a number.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Same label, now showing `length` in `unit`. Text and value change together.
    pub fn relabeled(self, length: f64, unit: Unit) -> Self {
        Label::new(self.position, length, unit, self.angle, self.offset)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} at {} angle {} offset ({}, {})",
            self.text,
            self.unit.symbol(),
            self.position,
            self.angle,
            self.offset.x,
            self.offset.y
        )
    }
}

/// Incremental change to the label set, for hosts that update their overlay
/// layer instead of redrawing it
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LabelDelta<'a> {
    /// Every label was removed
    Cleared,
    /// One label was added at the end
    Appended(&'a Label),
    /// Every label was rewritten in place (same order)
    Rewritten(&'a [Label]),
}

/// Ordered collection of placed labels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelStore {
    labels: Vec<Label>,
}

impl LabelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label after all existing ones and return it.
    pub fn append(&mut self, label: Label) -> &Label {
        self.labels.push(label);
        &self.labels[self.labels.len() - 1]
    }

    /// Replace every label with `rewrite`'s result, keeping order.
    pub fn rewrite_each(&mut self, rewrite: impl FnMut(Label) -> Label) {
        self.labels = std::mem::take(&mut self.labels).into_iter().map(rewrite).collect();
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Label> {
        self.labels.iter()
    }

    pub fn as_slice(&self) -> &[Label] {
        &self.labels
    }
}

impl<'a> IntoIterator for &'a LabelStore {
    type Item = &'a Label;
    type IntoIter = std::slice::Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}
