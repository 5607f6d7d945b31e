//! The force-stepping simulation
//!
//! An explicit n-body loop over the graph: charge repulsion between free
//! nodes, spring attraction along connections, a weak alpha-scaled pull of
//! the free centroid toward the origin, velocity damping, and a hard
//! boundary that radially rescales escapees back onto the containment
//! sphere (circle in planar mode). Pinned nodes act as spring anchors and
//! never move.

use std::collections::HashMap;

use rand::{rngs::SmallRng, Rng, SeedableRng};
use tracing::trace;

use super::SimulationConfig;
use crate::core::Point3;

#[derive(Debug, Clone)]
struct Body {
    id: String,
    position: Point3,
    velocity: Point3,
    pinned: bool,
}

#[derive(Debug, Clone, Copy)]
struct Spring {
    source: usize,
    target: usize,
    weight: f32,
}

/// One run of the force simulation over a snapshot of the graph shape
///
/// The simulation owns its bodies; graph entities are never owned here.
/// Rebuild it whenever the node or edge set changes (the engine does this),
/// seeding each body from its current coordinate.
pub struct ForceSimulation {
    config: SimulationConfig,
    bodies: Vec<Body>,
    index: HashMap<String, usize>,
    springs: Vec<Spring>,
    alpha: f32,
    rng: SmallRng,
}

impl ForceSimulation {
    /// Create an empty simulation at full temperature
    pub fn new(config: SimulationConfig) -> Self {
        let seed = config.seed.unwrap_or_else(entropy_seed);
        Self {
            config,
            bodies: Vec::new(),
            index: HashMap::new(),
            springs: Vec::new(),
            alpha: 1.0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Add a free (simulation-controlled) node
    ///
    /// Without a starting coordinate the node is scattered uniformly within
    /// one world unit of the origin per active axis.
    pub fn add_free(&mut self, id: impl Into<String>, start: Option<Point3>) {
        let position = start.unwrap_or_else(|| self.scatter());
        self.push_body(id.into(), position, false);
    }

    /// Add a pinned node: a spring anchor that never moves
    pub fn add_pinned(&mut self, id: impl Into<String>, at: Point3) {
        self.push_body(id.into(), at, true);
    }

    fn push_body(&mut self, id: String, mut position: Point3, pinned: bool) {
        if self.config.mode.is_planar() && !pinned {
            position.z = 0.0;
        }
        self.index.insert(id.clone(), self.bodies.len());
        self.bodies.push(Body {
            id,
            position,
            velocity: Point3::ORIGIN,
            pinned,
        });
    }

    /// Add a spring along a connection; unknown endpoints are ignored
    pub fn add_spring(&mut self, source_id: &str, target_id: &str, weight: f32) {
        let (Some(&source), Some(&target)) =
            (self.index.get(source_id), self.index.get(target_id))
        else {
            trace!(source_id, target_id, "spring endpoint missing, skipping");
            return;
        };
        self.springs.push(Spring {
            source,
            target,
            weight: weight.clamp(0.0, 1.0),
        });
    }

    /// Current temperature
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Returns true once alpha has decayed below the configured minimum
    pub fn is_quiescent(&self) -> bool {
        self.alpha < self.config.alpha_min
    }

    /// Current coordinate of a node
    pub fn position_of(&self, id: &str) -> Option<Point3> {
        self.index.get(id).map(|&i| self.bodies[i].position)
    }

    /// Coordinates of all free bodies, for write-back to the store
    pub fn free_positions(&self) -> Vec<(String, Point3)> {
        self.bodies
            .iter()
            .filter(|b| !b.pinned)
            .map(|b| (b.id.clone(), b.position))
            .collect()
    }

    /// Pin a node at a coordinate driven from outside (an active drag);
    /// returns false if the node is unknown
    pub fn hold(&mut self, id: &str, at: Point3) -> bool {
        match self.index.get(id) {
            Some(&i) => {
                let body = &mut self.bodies[i];
                body.position = at;
                body.velocity = Point3::ORIGIN;
                body.pinned = true;
                true
            }
            None => false,
        }
    }

    /// Hand a held node back to the simulation
    pub fn release(&mut self, id: &str) -> bool {
        match self.index.get(id) {
            Some(&i) => {
                self.bodies[i].pinned = false;
                true
            }
            None => false,
        }
    }

    /// Advance the simulation by one step
    ///
    /// Returns false (and does nothing) once the simulation is quiescent;
    /// the alpha schedule bounds the total number of live steps.
    pub fn step(&mut self) -> bool {
        if self.is_quiescent() {
            return false;
        }
        self.alpha *= 1.0 - self.config.alpha_decay;
        trace!(alpha = self.alpha, bodies = self.bodies.len(), "simulation step");

        self.apply_repulsion();
        self.apply_springs();
        self.apply_centering();
        self.integrate();
        true
    }

    /// Charge repulsion between every pair of free nodes
    fn apply_repulsion(&mut self) {
        let free: Vec<usize> = (0..self.bodies.len())
            .filter(|&i| !self.bodies[i].pinned)
            .collect();
        let mut kicks = vec![Point3::ORIGIN; self.bodies.len()];

        for a in 0..free.len() {
            for b in (a + 1)..free.len() {
                let (i, j) = (free[a], free[b]);
                let mut delta = self.bodies[j].position - self.bodies[i].position;
                if length_squared(delta) == 0.0 {
                    // Coincident nodes get an epsilon push instead of a
                    // division by zero.
                    delta = self.jiggle();
                }
                let weight = self.config.charge_strength * self.alpha / length_squared(delta);
                kicks[i] += delta * weight;
                kicks[j] -= delta * weight;
            }
        }

        for (body, kick) in self.bodies.iter_mut().zip(kicks) {
            body.velocity += kick;
        }
    }

    /// Spring attraction along every connection, strength scaled by weight
    fn apply_springs(&mut self) {
        if self.springs.is_empty() {
            return;
        }
        let mut degree = vec![0usize; self.bodies.len()];
        for spring in &self.springs {
            degree[spring.source] += 1;
            degree[spring.target] += 1;
        }

        let springs = std::mem::take(&mut self.springs);
        for spring in &springs {
            let (s, t) = (spring.source, spring.target);
            let (source_pos, source_vel, source_pinned) = {
                let body = &self.bodies[s];
                (body.position, body.velocity, body.pinned)
            };
            let (target_pos, target_vel, target_pinned) = {
                let body = &self.bodies[t];
                (body.position, body.velocity, body.pinned)
            };
            if source_pinned && target_pinned {
                continue;
            }

            let mut delta = (target_pos + target_vel) - (source_pos + source_vel);
            if length_squared(delta) == 0.0 {
                delta = self.jiggle();
            }
            let length = delta.length();
            let magnitude =
                (length - self.config.link_distance) / length * self.alpha * spring.weight;
            let pull = delta * magnitude;

            // The correction is split by degree so well-connected nodes act
            // as the steadier end; a free endpoint absorbs all of it when
            // its partner is pinned.
            let (source_share, target_share) = if source_pinned {
                (0.0, 1.0)
            } else if target_pinned {
                (1.0, 0.0)
            } else {
                let ds = degree[s].max(1) as f32;
                let dt = degree[t].max(1) as f32;
                let bias = ds / (ds + dt);
                (1.0 - bias, bias)
            };

            self.bodies[t].velocity -= pull * target_share;
            self.bodies[s].velocity += pull * source_share;
        }
        self.springs = springs;
    }

    /// Weak pull of the free-node centroid toward the origin
    fn apply_centering(&mut self) {
        let mut sum = Point3::ORIGIN;
        let mut count = 0usize;
        for body in &self.bodies {
            if !body.pinned {
                sum += body.position;
                count += 1;
            }
        }
        if count == 0 {
            return;
        }
        let nudge = sum * (1.0 / count as f32) * (self.config.center_strength * self.alpha);
        for body in &mut self.bodies {
            if !body.pinned {
                body.velocity -= nudge;
            }
        }
    }

    /// Damp velocities, move free bodies, and enforce the boundary
    fn integrate(&mut self) {
        let damping = 1.0 - self.config.velocity_decay;
        let radius = self.config.boundary_radius;
        let planar = self.config.mode.is_planar();

        for body in &mut self.bodies {
            if body.pinned {
                body.velocity = Point3::ORIGIN;
                continue;
            }
            body.velocity *= damping;
            body.position += body.velocity;
            if planar {
                body.position.z = 0.0;
                body.velocity.z = 0.0;
            }
            let distance = body.position.length();
            if distance > radius {
                body.position *= radius / distance;
            }
        }
    }

    /// Uniform random coordinate within one unit of the origin per axis
    fn scatter(&mut self) -> Point3 {
        let z = if self.config.mode.is_planar() {
            0.0
        } else {
            self.rng.random_range(-1.0..=1.0)
        };
        Point3::new(
            self.rng.random_range(-1.0..=1.0),
            self.rng.random_range(-1.0..=1.0),
            z,
        )
    }

    /// Tiny random displacement used in place of a zero distance
    fn jiggle(&mut self) -> Point3 {
        let mut point = Point3::new(
            (self.rng.random::<f32>() - 0.5) * 1e-6,
            (self.rng.random::<f32>() - 0.5) * 1e-6,
            (self.rng.random::<f32>() - 0.5) * 1e-6,
        );
        if self.config.mode.is_planar() {
            point.z = 0.0;
        }
        point
    }
}

fn length_squared(point: Point3) -> f32 {
    point.x * point.x + point.y * point.y + point.z * point.z
}

fn entropy_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        rand::random::<u64>()
    }
}
