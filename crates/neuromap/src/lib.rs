//! Neuromap - a force-directed knowledge graph
//!
//! An in-memory graph of "neuron" nodes and weighted connections, a
//! physics-based layout engine that positions free nodes inside a bounded
//! region while respecting manual placement, and best-effort local
//! persistence of the whole graph as a single JSON document.
//!
//! # Quick Start
//!
//! ```rust
//! use neuromap::prelude::*;
//!
//! let mut store = GraphStore::new();
//! store.add_neuron(Neuron::new("a", "Graphs")).unwrap();
//! store.add_neuron(Neuron::new("b", "Springs")).unwrap();
//! store
//!     .add_connection(Connection::new("ab", "a", "b", 0.8))
//!     .unwrap();
//!
//! let mut engine = LayoutEngine::new(SimulationConfig::default());
//! engine.settle(&mut store);
//!
//! let radius = engine.config().boundary_radius;
//! assert!(store.display_position("a").length() <= radius + 1e-4);
//! ```
//!
//! # Components
//!
//! - [`graph`] - the store: CRUD with cascade delete, change subscribers,
//!   and breadth-first highlight state for renderers
//! - [`layout`] - the force simulation and the engine that binds it to the
//!   store (pinning, boundary containment, restart on shape change)
//! - [`storage`] - load/save/export/import of the graph document over a
//!   key-value backend
//! - [`interact`] - selection/hover state and the drag gesture FSM
//! - [`render`] - terminal projection of the laid-out graph

pub mod core;
pub mod graph;
pub mod interact;
pub mod layout;
pub mod render;
pub mod sample;
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use self::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Confidence, Connection, ConnectionUpdate, Link, MapError, Neuron, NeuronUpdate, NodeKind,
        Point3, Position,
    };
    pub use crate::graph::{GraphChange, GraphData, GraphStore};
    pub use crate::interact::{DragController, DragOutcome, DragPhase, ViewState};
    pub use crate::layout::{ForceSimulation, LayoutEngine, LayoutMode, SimulationConfig};
    pub use crate::render::{GlyphSet, SceneConfig, SceneRenderer};
    pub use crate::storage::{
        FileBackend, GraphArchive, GraphDocument, MemoryBackend, StorageBackend,
    };
}

use graph::GraphStore;
use layout::{LayoutEngine, SimulationConfig};

/// Run the layout to quiescence over a store with the given configuration
///
/// Convenience for one-shot consumers (CLI, tests); interactive hosts keep
/// their own [`LayoutEngine`] and tick it per frame.
///
/// # Example
/// ```rust
/// use neuromap::prelude::*;
///
/// let mut store = GraphStore::new();
/// neuromap::sample::load_sample(&mut store);
/// let steps = neuromap::settle_layout(&mut store, SimulationConfig::default());
/// assert!(steps > 0);
/// ```
pub fn settle_layout(store: &mut GraphStore, config: SimulationConfig) -> usize {
    let mut engine = LayoutEngine::new(config);
    let steps = engine.settle(store);
    engine.stop();
    steps
}

/// Render the store's current layout as a character-grid scene
///
/// # Example
/// ```rust
/// use neuromap::prelude::*;
///
/// let mut store = GraphStore::new();
/// neuromap::sample::load_sample(&mut store);
/// neuromap::settle_layout(&mut store, SimulationConfig::default());
///
/// let scene = neuromap::render_scene(&store, None);
/// assert!(!scene.is_empty());
/// ```
pub fn render_scene(store: &GraphStore, focus: Option<&str>) -> String {
    render::SceneRenderer::new().render(store.graph(), focus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[test]
    fn test_settle_layout_places_sample_graph() {
        let mut store = GraphStore::new();
        sample::load_sample(&mut store);
        let config = SimulationConfig {
            seed: Some(1),
            ..Default::default()
        };
        let radius = config.boundary_radius;
        let steps = settle_layout(&mut store, config);
        assert!(steps > 0);

        for neuron in store.neurons() {
            if neuron.position.is_auto() {
                assert!(store.display_position(&neuron.id).length() <= radius + 1e-4);
            }
        }
    }

    #[test]
    fn test_render_scene_draws_every_neuron() {
        let mut store = GraphStore::new();
        sample::load_sample(&mut store);
        settle_layout(
            &mut store,
            SimulationConfig {
                seed: Some(1),
                ..Default::default()
            },
        );

        let scene = render_scene(&store, None);
        assert!(!scene.is_empty());
        // At least one neuron marker and one connection line made it in
        assert!(scene.chars().any(|c| matches!(c, '●' | '◆' | '○')));
        assert!(scene.contains('·'));
    }

    #[test]
    fn test_render_scene_with_focus_highlights() {
        let mut store = GraphStore::new();
        sample::load_sample(&mut store);
        settle_layout(
            &mut store,
            SimulationConfig {
                seed: Some(1),
                ..Default::default()
            },
        );

        let plain = render_scene(&store, None);
        let focused = render_scene(&store, Some("n1"));
        assert_ne!(plain, focused);
    }
}
