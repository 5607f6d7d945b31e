//! Engine binding the force simulation to the graph store
//!
//! The engine reads the node and edge sets, runs simulation steps, and
//! writes computed coordinates back for free neurons only. Whenever the
//! graph shape changes it restarts the simulation from scratch, seeded
//! with current coordinates; there is no incremental reseeding.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use tracing::debug;

use super::{ForceSimulation, SimulationConfig};
use crate::core::{Point3, Position};
use crate::graph::{GraphData, GraphStore};

/// Drives a [`ForceSimulation`] against a [`GraphStore`]
///
/// One engine owns at most one live simulation; starting again replaces the
/// previous run, so two simulations can never write positions concurrently.
/// [`LayoutEngine::stop`] is synchronous and idempotent, and ticking a
/// stopped engine is a no-op.
#[derive(Default)]
pub struct LayoutEngine {
    config: SimulationConfig,
    simulation: Option<ForceSimulation>,
    signature: u64,
    held: HashMap<String, Point3>,
}

impl LayoutEngine {
    /// Create a stopped engine with the given configuration
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            simulation: None,
            signature: 0,
            held: HashMap::new(),
        }
    }

    /// The simulation configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns true while a simulation is live (started and not stopped)
    pub fn is_running(&self) -> bool {
        self.simulation.is_some()
    }

    /// Current simulation temperature; 0 when stopped
    pub fn alpha(&self) -> f32 {
        self.simulation.as_ref().map(|s| s.alpha()).unwrap_or(0.0)
    }

    /// Start (or restart) the simulation from the store's current state
    pub fn start(&mut self, store: &GraphStore) {
        self.signature = shape_signature(store.graph());
        self.simulation = Some(self.build(store));
        debug!(
            neurons = store.graph().neuron_count(),
            connections = store.graph().connection_count(),
            "layout simulation started"
        );
    }

    /// Stop the simulation, dropping its state; safe to call repeatedly
    pub fn stop(&mut self) {
        if self.simulation.take().is_some() {
            debug!("layout simulation stopped");
        }
    }

    /// Advance the simulation one step and commit free-node coordinates
    ///
    /// Detects graph shape changes (nodes or connections added, removed, or
    /// re-pinned; connection weights changed) and restarts from current
    /// coordinates first. Returns true while the simulation is still live.
    pub fn tick(&mut self, store: &mut GraphStore) -> bool {
        if !self.is_running() {
            return false;
        }
        let signature = shape_signature(store.graph());
        if signature != self.signature {
            debug!("graph shape changed, restarting layout simulation");
            self.signature = signature;
            self.simulation = Some(self.build(store));
        }

        let Some(simulation) = self.simulation.as_mut() else {
            return false;
        };
        if simulation.step() {
            store.commit_layout(&simulation.free_positions());
        }
        !simulation.is_quiescent()
    }

    /// Tick until quiescent; starts the engine first if it is stopped.
    /// Returns the number of live steps taken.
    pub fn settle(&mut self, store: &mut GraphStore) -> usize {
        if !self.is_running() {
            self.start(store);
        }
        let mut steps = 0;
        while self.tick(store) {
            steps += 1;
        }
        steps
    }

    /// Exclude a neuron from simulation writes and anchor it at `at`
    /// (an active drag drives the coordinate exogenously)
    pub fn hold(&mut self, id: &str, at: Point3) {
        self.held.insert(id.to_string(), at);
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.hold(id, at);
        }
    }

    /// Hand a held neuron back to the simulation
    pub fn release(&mut self, id: &str) {
        self.held.remove(id);
        if let Some(simulation) = self.simulation.as_mut() {
            simulation.release(id);
        }
    }

    fn build(&self, store: &GraphStore) -> ForceSimulation {
        let mut simulation = ForceSimulation::new(self.config.clone());
        for neuron in store.neurons() {
            match neuron.position {
                Position::Fixed(at) => simulation.add_pinned(&neuron.id, at),
                Position::Auto => {
                    simulation.add_free(&neuron.id, store.graph().layout_position(&neuron.id))
                }
            }
        }
        for connection in store.connections() {
            simulation.add_spring(&connection.source_id, &connection.target_id, connection.weight);
        }
        // A drag in progress survives a rebuild
        for (id, at) in &self.held {
            simulation.hold(id, *at);
        }
        simulation
    }
}

/// Hash of the graph shape: node ids and placements, connection ids,
/// endpoints, and weights. Transient layout coordinates are excluded so
/// simulation write-backs never count as shape changes.
fn shape_signature(graph: &GraphData) -> u64 {
    let mut hasher = DefaultHasher::new();

    let mut neurons: Vec<_> = graph.neurons().collect();
    neurons.sort_by(|a, b| a.id.cmp(&b.id));
    for neuron in neurons {
        neuron.id.hash(&mut hasher);
        match neuron.position {
            Position::Auto => 0u8.hash(&mut hasher),
            Position::Fixed(p) => {
                1u8.hash(&mut hasher);
                p.x.to_bits().hash(&mut hasher);
                p.y.to_bits().hash(&mut hasher);
                p.z.to_bits().hash(&mut hasher);
            }
        }
    }

    let mut connections: Vec<_> = graph.connections().iter().collect();
    connections.sort_by(|a, b| a.id.cmp(&b.id));
    for connection in connections {
        connection.id.hash(&mut hasher);
        connection.source_id.hash(&mut hasher);
        connection.target_id.hash(&mut hasher);
        connection.weight.to_bits().hash(&mut hasher);
    }

    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Connection, Neuron, NeuronUpdate};

    fn engine() -> LayoutEngine {
        LayoutEngine::new(SimulationConfig {
            seed: Some(11),
            ..Default::default()
        })
    }

    fn small_store() -> GraphStore {
        let mut store = GraphStore::new();
        store.add_neuron(Neuron::new("a", "Alpha")).unwrap();
        store.add_neuron(Neuron::new("b", "Beta")).unwrap();
        store
            .add_neuron(Neuron::pinned("c", "Gamma", Point3::new(2.0, 0.0, 0.0)))
            .unwrap();
        store
            .add_connection(Connection::new("ab", "a", "b", 0.8))
            .unwrap();
        store
            .add_connection(Connection::new("bc", "b", "c", 0.6))
            .unwrap();
        store
    }

    #[test]
    fn test_tick_before_start_is_a_no_op() {
        let mut store = small_store();
        let mut engine = engine();
        assert!(!engine.tick(&mut store));
        assert!(store.graph().layout_position("a").is_none());
    }

    #[test]
    fn test_settle_positions_free_nodes_within_boundary() {
        let mut store = small_store();
        let mut engine = engine();
        let steps = engine.settle(&mut store);
        assert!(steps > 0);

        let radius = engine.config().boundary_radius;
        for id in ["a", "b"] {
            let position = store.graph().layout_position(id).expect("free node placed");
            assert!(position.length() <= radius + 1e-4);
        }
        // The pinned node is never written back
        assert!(store.graph().layout_position("c").is_none());
        assert_eq!(store.display_position("c"), Point3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_stop_is_idempotent_and_halts_writes() {
        let mut store = small_store();
        let mut engine = engine();
        engine.start(&store);
        engine.tick(&mut store);
        let placed = store.graph().layout_position("a");

        engine.stop();
        engine.stop();
        assert!(!engine.is_running());
        assert!(!engine.tick(&mut store));
        assert_eq!(store.graph().layout_position("a"), placed);
    }

    #[test]
    fn test_shape_change_restarts_the_simulation() {
        let mut store = small_store();
        let mut engine = engine();
        engine.settle(&mut store);
        assert!(engine.alpha() < 0.001);

        store.add_neuron(Neuron::new("d", "Delta")).unwrap();
        assert!(engine.tick(&mut store), "tick revives after a shape change");
        assert!(engine.alpha() > 0.5, "restart resets the temperature");

        engine.settle(&mut store);
        assert!(store.graph().layout_position("d").is_some());
    }

    #[test]
    fn test_pin_change_restarts_the_simulation() {
        let mut store = small_store();
        let mut engine = engine();
        engine.settle(&mut store);

        store
            .update_neuron("a", NeuronUpdate::pin(Point3::new(1.0, 1.0, 0.0)))
            .unwrap();
        assert!(engine.tick(&mut store));
        engine.settle(&mut store);
        // The newly pinned node is no longer simulation-owned
        assert!(store.graph().layout_position("a").is_none());
        assert_eq!(store.display_position("a"), Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_held_nodes_are_not_overwritten() {
        let mut store = small_store();
        let mut engine = engine();
        engine.start(&store);

        let grip = Point3::new(3.0, 3.0, 0.0);
        engine.hold("a", grip);
        for _ in 0..50 {
            engine.tick(&mut store);
        }
        // The held node was excluded from every commit
        assert!(store.graph().layout_position("a").is_none());

        engine.release("a");
        engine.tick(&mut store);
        assert!(store.graph().layout_position("a").is_some());
    }

    #[test]
    fn test_signature_ignores_layout_commits() {
        let store = small_store();
        let before = shape_signature(store.graph());
        let mut store = store;
        store.commit_layout(&[("a".to_string(), Point3::new(1.0, 2.0, 0.0))]);
        assert_eq!(before, shape_signature(store.graph()));

        store
            .update_connection("ab", crate::core::ConnectionUpdate::weight(0.9))
            .unwrap();
        assert_ne!(before, shape_signature(store.graph()));
    }
}
