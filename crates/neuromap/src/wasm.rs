//! WebAssembly bindings
//!
//! Browser-facing surface over the store, layout engine, and drag state
//! machine. Values cross the boundary as JSON strings; the front end keeps
//! its own render loop and calls [`NeuralMap::tick`] once per frame.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use crate::core::{Connection, Neuron, NeuronUpdate, Point3};
#[cfg(target_arch = "wasm32")]
use crate::graph::{highlight, GraphStore};
#[cfg(target_arch = "wasm32")]
use crate::interact::{DragController, DragOutcome};
#[cfg(target_arch = "wasm32")]
use crate::layout::{LayoutEngine, SimulationConfig};
#[cfg(target_arch = "wasm32")]
use crate::storage::GraphDocument;

/// Initialize the WASM module
///
/// Installs the panic hook and console logging for readable errors in the
/// browser.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

/// The knowledge map as seen from JavaScript
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct NeuralMap {
    store: GraphStore,
    engine: LayoutEngine,
    drag: DragController,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl NeuralMap {
    /// Create an empty map with the default layout configuration
    #[wasm_bindgen(constructor)]
    pub fn new() -> NeuralMap {
        NeuralMap {
            store: GraphStore::new(),
            engine: LayoutEngine::new(SimulationConfig::default()),
            drag: DragController::new(),
        }
    }

    /// Replace the map contents with the built-in sample graph
    pub fn load_sample(&mut self) {
        crate::sample::load_sample(&mut self.store);
    }

    /// Replace the map contents from a stored document JSON
    pub fn import_json(&mut self, json: &str) -> Result<(), JsValue> {
        let document: GraphDocument =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("{}", e)))?;
        self.store.load(document.neurons, document.connections);
        Ok(())
    }

    /// The current graph as a document JSON (what the host should persist)
    pub fn export_json(&self) -> String {
        let document = GraphDocument::snapshot(self.store.graph());
        serde_json::to_string(&document).unwrap_or_else(|_| "{}".to_string())
    }

    /// Add a neuron from its JSON representation
    pub fn add_neuron(&mut self, json: &str) -> Result<(), JsValue> {
        let neuron: Neuron =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("{}", e)))?;
        self.store
            .add_neuron(neuron)
            .map_err(|e| JsValue::from_str(&format!("{}", e)))
    }

    /// Apply a partial update (JSON) to a neuron
    pub fn update_neuron(&mut self, id: &str, json: &str) -> Result<(), JsValue> {
        let update: NeuronUpdate =
            serde_json::from_str(json).map_err(|e| JsValue::from_str(&format!("{}", e)))?;
        self.store
            .update_neuron(id, update)
            .map_err(|e| JsValue::from_str(&format!("{}", e)))
    }

    /// Remove a neuron and every incident connection
    pub fn remove_neuron(&mut self, id: &str) -> Result<(), JsValue> {
        self.store
            .remove_neuron(id)
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&format!("{}", e)))
    }

    /// Connect two neurons with a weighted edge
    pub fn connect(
        &mut self,
        id: &str,
        source_id: &str,
        target_id: &str,
        weight: f32,
    ) -> Result<(), JsValue> {
        self.store
            .add_connection(Connection::new(id, source_id, target_id, weight))
            .map_err(|e| JsValue::from_str(&format!("{}", e)))
    }

    /// Remove a connection by id
    pub fn remove_connection(&mut self, id: &str) -> Result<(), JsValue> {
        self.store
            .remove_connection(id)
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&format!("{}", e)))
    }

    /// Start (or restart) the layout simulation
    pub fn start_layout(&mut self) {
        self.engine.start(&self.store);
    }

    /// Stop the layout simulation; safe to call repeatedly
    pub fn stop_layout(&mut self) {
        self.engine.stop();
    }

    /// Advance the simulation up to `steps` steps; returns true while the
    /// simulation is still live
    pub fn tick(&mut self, steps: u32) -> bool {
        let mut live = false;
        for _ in 0..steps.max(1) {
            live = self.engine.tick(&mut self.store);
            if !live {
                break;
            }
        }
        live
    }

    /// Display coordinates of every neuron as `{id: {x, y, z}}` JSON
    pub fn positions_json(&self) -> String {
        let positions: std::collections::HashMap<&str, Point3> = self
            .store
            .neurons()
            .map(|n| (n.id.as_str(), self.store.display_position(&n.id)))
            .collect();
        serde_json::to_string(&positions).unwrap_or_else(|_| "{}".to_string())
    }

    /// Per-connection highlight strengths from a focused neuron, as JSON
    pub fn highlight_json(&self, focus: &str) -> String {
        let strengths = highlight::highlight_strengths(self.store.graph(), Some(focus));
        serde_json::to_string(&strengths).unwrap_or_else(|_| "{}".to_string())
    }

    /// Pointer pressed on a neuron
    pub fn pointer_down(&mut self, id: &str, x: f32, y: f32, z: f32) {
        self.drag.pointer_down(id, Point3::new(x, y, z));
    }

    /// Pointer moved
    pub fn pointer_move(&mut self, x: f32, y: f32, z: f32) {
        self.drag.pointer_move(Point3::new(x, y, z), &mut self.engine);
    }

    /// Pointer released; returns "none", "clicked:<id>", or "dropped:<id>"
    pub fn pointer_up(&mut self) -> String {
        match self.drag.pointer_up(&mut self.store, &mut self.engine) {
            DragOutcome::None => "none".to_string(),
            DragOutcome::Clicked { id } => format!("clicked:{}", id),
            DragOutcome::Dropped { id, .. } => format!("dropped:{}", id),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub mod wasm {
    //! Placeholder module for non-WASM builds
    //!
    //! The bindings are only compiled for WASM targets.
}
