//! Core type definitions for the knowledge map
//!
//! This module contains the fundamental types used throughout Neuromap:
//! neurons, connections, positions, and the partial-update structs the
//! graph store applies.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in layout space.
///
/// The layout engine works in a small world-unit coordinate system centered
/// on the origin; the rendering collaborator is responsible for any
/// screen-space scaling.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    /// The coordinate-space origin.
    pub const ORIGIN: Point3 = Point3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new point
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance from the origin
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point3) -> f32 {
        Point3::new(self.x - other.x, self.y - other.y, self.z - other.z).length()
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

impl std::ops::Add for Point3 {
    type Output = Point3;

    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::AddAssign for Point3 {
    fn add_assign(&mut self, rhs: Point3) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::SubAssign for Point3 {
    fn sub_assign(&mut self, rhs: Point3) {
        *self = *self - rhs;
    }
}

impl std::ops::Mul<f32> for Point3 {
    type Output = Point3;

    fn mul(self, rhs: f32) -> Point3 {
        Point3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::ops::MulAssign<f32> for Point3 {
    fn mul_assign(&mut self, rhs: f32) {
        *self = *self * rhs;
    }
}

/// Where a neuron's coordinate comes from.
///
/// `Auto` neurons are free: the layout engine owns their coordinate and
/// recomputes it every simulation step. `Fixed` neurons were placed by hand
/// (or dropped at the end of a drag) and are never moved by the simulation;
/// they still participate as spring anchors.
///
/// Serializes as `null` (Auto) or `{x, y, z}` (Fixed), matching the stored
/// document format. The transient coordinates of `Auto` neurons are not
/// part of the document; they are re-derived after load.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<Point3>", into = "Option<Point3>")]
pub enum Position {
    /// Free: let the layout engine choose
    #[default]
    Auto,
    /// Pinned by manual placement; manual placement always wins
    Fixed(Point3),
}

impl Position {
    /// Returns true if the layout engine controls this position
    pub fn is_auto(&self) -> bool {
        matches!(self, Position::Auto)
    }

    /// Returns true if this position is pinned
    pub fn is_fixed(&self) -> bool {
        matches!(self, Position::Fixed(_))
    }

    /// The pinned coordinate, if any
    pub fn fixed(&self) -> Option<Point3> {
        match self {
            Position::Auto => None,
            Position::Fixed(p) => Some(*p),
        }
    }
}

impl From<Option<Point3>> for Position {
    fn from(value: Option<Point3>) -> Self {
        match value {
            None => Position::Auto,
            Some(p) => Position::Fixed(p),
        }
    }
}

impl From<Position> for Option<Point3> {
    fn from(value: Position) -> Self {
        value.fixed()
    }
}

/// Classification tag for a neuron
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Ideas
    #[default]
    Concept,
    /// Rules
    Principle,
    /// Drive learning
    Question,
}

impl NodeKind {
    /// All kinds, in display order
    pub fn variants() -> &'static [NodeKind] {
        &[NodeKind::Concept, NodeKind::Principle, NodeKind::Question]
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Concept => write!(f, "Concept"),
            NodeKind::Principle => write!(f, "Principle"),
            NodeKind::Question => write!(f, "Question"),
        }
    }
}

/// How settled the knowledge captured by a neuron is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Low => write!(f, "Low"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::High => write!(f, "High"),
        }
    }
}

/// A reference attached to a neuron
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub title: String,
}

impl Link {
    /// Create a new link
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// A knowledge item: one vertex of the graph
///
/// The `id` is immutable and unique across the node set. `modified_at`
/// advances on every mutation applied through the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Neuron {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub confidence: Confidence,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub position: Position,
    pub created_at: u64,
    pub modified_at: u64,
}

impl Neuron {
    /// Create a new free (Auto-positioned) neuron with current timestamps
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = now_millis();
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            kind: NodeKind::default(),
            confidence: Confidence::default(),
            links: Vec::new(),
            position: Position::Auto,
            created_at: now,
            modified_at: now,
        }
    }

    /// Create a neuron pinned at a concrete coordinate
    pub fn pinned(id: impl Into<String>, title: impl Into<String>, at: Point3) -> Self {
        let mut neuron = Self::new(id, title);
        neuron.position = Position::Fixed(at);
        neuron
    }

    /// Set the classification tag
    pub fn with_kind(mut self, kind: NodeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the free-text description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Partial update for a neuron; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeuronUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl NeuronUpdate {
    /// Update that pins the neuron at a coordinate
    pub fn pin(at: Point3) -> Self {
        Self {
            position: Some(Position::Fixed(at)),
            ..Default::default()
        }
    }

    /// Update that releases a pinned neuron back to layout control
    pub fn release() -> Self {
        Self {
            position: Some(Position::Auto),
            ..Default::default()
        }
    }

    /// Apply this update to a neuron (timestamps are the store's concern)
    pub(crate) fn apply(self, neuron: &mut Neuron) {
        if let Some(title) = self.title {
            neuron.title = title;
        }
        if let Some(description) = self.description {
            neuron.description = description;
        }
        if let Some(kind) = self.kind {
            neuron.kind = kind;
        }
        if let Some(confidence) = self.confidence {
            neuron.confidence = confidence;
        }
        if let Some(links) = self.links {
            neuron.links = links;
        }
        if let Some(position) = self.position {
            neuron.position = position;
        }
    }
}

/// A weighted, undirected edge between two neurons
///
/// `weight` lives in [0, 1] and doubles as visual strength and spring
/// strength in the layout simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub weight: f32,
}

impl Connection {
    /// Create a new connection; the weight is clamped to [0, 1]
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        weight: f32,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            weight: weight.clamp(0.0, 1.0),
        }
    }

    /// Returns true if the connection touches the given neuron
    pub fn touches(&self, neuron_id: &str) -> bool {
        self.source_id == neuron_id || self.target_id == neuron_id
    }

    /// The endpoint opposite to `neuron_id`, if the connection touches it
    pub fn other_end(&self, neuron_id: &str) -> Option<&str> {
        if self.source_id == neuron_id {
            Some(self.target_id.as_str())
        } else if self.target_id == neuron_id {
            Some(self.source_id.as_str())
        } else {
            None
        }
    }
}

/// Partial update for a connection; `None` fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
}

impl ConnectionUpdate {
    /// Update that sets the connection weight (clamped to [0, 1])
    pub fn weight(weight: f32) -> Self {
        Self {
            weight: Some(weight),
        }
    }

    pub(crate) fn apply(self, connection: &mut Connection) {
        if let Some(weight) = self.weight {
            connection.weight = weight.clamp(0.0, 1.0);
        }
    }
}

/// Current wall-clock time as epoch milliseconds
///
/// Callers that need strictly increasing stamps (the store's
/// `modified_at` invariant) must combine this with the previous value.
pub fn now_millis() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}
