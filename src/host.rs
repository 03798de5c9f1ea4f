//! The seam between the engine and the map that hosts it.

use crate::store::{Label, LabelDelta};

/// Handle to a live cursor-move subscription
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CursorSubscription(pub u64);

/// What the engine needs from the host map.
///
/// Calls happen synchronously inside the engine's event handlers.
pub trait Host {
    /// Start delivering cursor moves to
    /// [`AnnotationEngine::cursor_moved`](crate::AnnotationEngine::cursor_moved).
    fn subscribe_cursor(&mut self) -> CursorSubscription;

    /// Stop delivering cursor moves for `subscription`.
    fn unsubscribe_cursor(&mut self, subscription: CursorSubscription);

    /// The label set changed; update the overlay layer.
    fn labels_changed(&mut self, delta: LabelDelta<'_>);
}

/// A host call, as seen by [`Recorder`]
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Subscribe(CursorSubscription),
    Unsubscribe(CursorSubscription),
    Cleared,
    Appended(Label),
    Rewritten(Vec<Label>),
}

/// A host that records every call and mirrors the overlay layer.
///
/// Used to replay event scripts and in tests.
#[derive(Debug, Default)]
pub struct Recorder {
    next_id: u64,
    live: Vec<CursorSubscription>,
    overlay: Vec<Label>,
    calls: Vec<HostCall>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels currently drawn, rebuilt from deltas only.
    pub fn overlay(&self) -> &[Label] {
        &self.overlay
    }

    /// Subscriptions not yet removed.
    pub fn live_subscriptions(&self) -> &[CursorSubscription] {
        &self.live
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Drain the recorded calls.
    pub fn take_calls(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Host for Recorder {
    fn subscribe_cursor(&mut self) -> CursorSubscription {
        self.next_id += 1;
        let subscription = CursorSubscription(self.next_id);
        self.live.push(subscription);
        self.calls.push(HostCall::Subscribe(subscription));
        subscription
    }

    fn unsubscribe_cursor(&mut self, subscription: CursorSubscription) {
        self.live.retain(|s| *s != subscription);
        self.calls.push(HostCall::Unsubscribe(subscription));
    }

    fn labels_changed(&mut self, delta: LabelDelta<'_>) {
        match delta {
            LabelDelta::Cleared => {
                self.overlay.clear();
                self.calls.push(HostCall::Cleared);
            }
            LabelDelta::Appended(label) => {
                self.overlay.push(label.clone());
                self.calls.push(HostCall::Appended(label.clone()));
            }
            LabelDelta::Rewritten(labels) => {
                self.overlay = labels.to_vec();
                self.calls.push(HostCall::Rewritten(labels.to_vec()));
            }
        }
    }
}
