//! Force-directed layout
//!
//! A small physics simulation positions every free neuron: pairwise charge
//! repulsion, weighted spring attraction along connections, a weak pull of
//! the free-node centroid toward the origin, and geometric alpha decay that
//! guarantees quiescence. Free nodes are kept inside a fixed boundary
//! radius; pinned nodes are never moved.

mod engine;
mod simulation;

pub use engine::*;
pub use simulation::*;

/// Dimensionality of the layout
///
/// The mode is a fixed configuration choice applied consistently to
/// initialization, force computation, and boundary containment; it is not
/// a per-node property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// z is held at 0 and the boundary is a circle
    #[default]
    TwoD,
    /// Full 3D with a spherical boundary
    ThreeD,
}

impl LayoutMode {
    /// Returns true if the z axis is held at zero
    pub fn is_planar(&self) -> bool {
        matches!(self, LayoutMode::TwoD)
    }
}

/// Simulation tuning parameters
///
/// The defaults mirror the layout this engine was built to reproduce:
/// charge -30, spring rest length 1.5, alpha decay 0.02, velocity decay
/// 0.4, boundary radius 4.5.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub mode: LayoutMode,
    /// Many-body charge; negative values repel
    pub charge_strength: f32,
    /// Spring rest length shared by all connections
    pub link_distance: f32,
    /// Pull of the free-node centroid toward the origin (alpha-scaled)
    pub center_strength: f32,
    /// Fraction of alpha lost per step
    pub alpha_decay: f32,
    /// Alpha below which the simulation is quiescent
    pub alpha_min: f32,
    /// Fraction of velocity lost per step
    pub velocity_decay: f32,
    /// Free nodes are kept within this distance of the origin
    pub boundary_radius: f32,
    /// Seed for the initial scatter of unplaced nodes; `None` draws entropy
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::TwoD,
            charge_strength: -30.0,
            link_distance: 1.5,
            center_strength: 0.05,
            alpha_decay: 0.02,
            alpha_min: 0.001,
            velocity_decay: 0.4,
            boundary_radius: 4.5,
            seed: None,
        }
    }
}
