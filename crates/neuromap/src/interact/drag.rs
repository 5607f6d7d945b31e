//! Drag gesture state machine
//!
//! Pointer-down arms a potential drag; crossing a fixed movement threshold
//! turns it into a real drag, which excludes the node from simulation
//! writes and drives its coordinate from the pointer. Release below the
//! threshold is a click (select); release after a drag pins the node at
//! exactly the dropped coordinate, boundary containment notwithstanding.

use tracing::{debug, warn};

use crate::core::{NeuronUpdate, Point3};
use crate::graph::GraphStore;
use crate::layout::LayoutEngine;

/// Movement (in world units) before an armed press becomes a drag.
/// One fixed policy: Euclidean distance from the pointer-down point.
pub const DRAG_THRESHOLD: f32 = 0.1;

/// Phases of the drag gesture
#[derive(Debug, Clone, PartialEq)]
pub enum DragPhase {
    /// No pointer interaction in progress
    Idle,
    /// Pointer is down but has not moved past the threshold
    Armed { id: String, origin: Point3 },
    /// Threshold crossed; the pointer drives the node
    Dragging { id: String, at: Point3 },
}

/// What a pointer-up amounted to
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// Nothing was in progress
    None,
    /// Press and release without real movement: a selection click
    Clicked { id: String },
    /// A completed drag; the node is now pinned at `at`
    Dropped { id: String, at: Point3 },
}

/// Explicit finite-state machine for pointer-driven node movement
#[derive(Debug)]
pub struct DragController {
    phase: DragPhase,
    threshold: f32,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    /// Controller with the standard movement threshold
    pub fn new() -> Self {
        Self::with_threshold(DRAG_THRESHOLD)
    }

    /// Controller with a custom movement threshold
    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            phase: DragPhase::Idle,
            threshold,
        }
    }

    /// Current phase of the gesture
    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    /// Returns true while a node is actively being dragged
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// The dragged node and its live coordinate, for renderers
    pub fn dragged(&self) -> Option<(&str, Point3)> {
        match &self.phase {
            DragPhase::Dragging { id, at } => Some((id.as_str(), *at)),
            _ => None,
        }
    }

    /// Pointer pressed on a neuron: arm a potential drag
    pub fn pointer_down(&mut self, id: impl Into<String>, at: Point3) {
        self.phase = DragPhase::Armed {
            id: id.into(),
            origin: at,
        };
    }

    /// Pointer moved; promotes an armed press past the threshold into a
    /// drag and keeps the engine's hold anchored at the pointer
    pub fn pointer_move(&mut self, at: Point3, engine: &mut LayoutEngine) {
        match &mut self.phase {
            DragPhase::Idle => {}
            DragPhase::Armed { id, origin } => {
                if at.distance(origin) > self.threshold {
                    let id = id.clone();
                    debug!(neuron = %id, "drag threshold crossed");
                    engine.hold(&id, at);
                    self.phase = DragPhase::Dragging { id, at };
                }
            }
            DragPhase::Dragging { id, at: current } => {
                *current = at;
                engine.hold(id, at);
            }
        }
    }

    /// Pointer released: resolve the gesture
    ///
    /// A completed drag commits the final coordinate to the store as a
    /// pinned position, exactly as dragged; the node stays out of
    /// auto-placement until its position is explicitly cleared.
    pub fn pointer_up(&mut self, store: &mut GraphStore, engine: &mut LayoutEngine) -> DragOutcome {
        match std::mem::replace(&mut self.phase, DragPhase::Idle) {
            DragPhase::Idle => DragOutcome::None,
            DragPhase::Armed { id, .. } => DragOutcome::Clicked { id },
            DragPhase::Dragging { id, at } => {
                engine.release(&id);
                match store.update_neuron(&id, NeuronUpdate::pin(at)) {
                    Ok(()) => {
                        debug!(neuron = %id, position = %at, "drag released, position pinned");
                        DragOutcome::Dropped { id, at }
                    }
                    Err(e) => {
                        // The node can vanish mid-drag (deleted elsewhere)
                        warn!(neuron = %id, error = %e, "drop target no longer exists");
                        DragOutcome::None
                    }
                }
            }
        }
    }

    /// Abort any gesture in progress, releasing the engine hold
    pub fn cancel(&mut self, engine: &mut LayoutEngine) {
        if let DragPhase::Dragging { id, .. } = &self.phase {
            engine.release(id);
        }
        self.phase = DragPhase::Idle;
    }
}
