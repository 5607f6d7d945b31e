//! In-memory graph store
//!
//! The authoritative holder of neurons and connections. Mutations validate
//! referential integrity (cascade delete, endpoint checks), advance
//! modification timestamps, and notify subscribers so that persistence can
//! write through on every change.

use std::collections::HashMap;

use tracing::{debug, trace, warn};

use crate::core::{
    now_millis, Connection, ConnectionUpdate, MapError, Neuron, NeuronUpdate, Point3, Position,
    Result,
};

/// A change applied to the graph, reported to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum GraphChange {
    NeuronAdded { id: String },
    NeuronUpdated { id: String },
    /// A neuron was removed together with its incident connections
    NeuronRemoved { id: String, cascaded: Vec<String> },
    ConnectionAdded { id: String },
    ConnectionUpdated { id: String },
    ConnectionRemoved { id: String },
    /// The whole graph was replaced (load or import)
    Loaded,
    /// The layout engine committed coordinates for `moved` free neurons
    LayoutAdvanced { moved: usize },
}

/// Handle returned by [`GraphStore::subscribe`], used to unsubscribe
pub type SubscriptionId = u64;

type Listener = Box<dyn FnMut(&GraphChange, &GraphData)>;

/// The graph proper: node set, edge set, and the layout table holding the
/// most recent simulated coordinate of every free neuron
///
/// Insertion order is preserved for display stability only; it carries no
/// semantic meaning.
#[derive(Debug, Default, Clone)]
pub struct GraphData {
    neurons: HashMap<String, Neuron>,
    order: Vec<String>,
    connections: Vec<Connection>,
    layout: HashMap<String, Point3>,
}

impl GraphData {
    /// Look up a neuron by id
    pub fn neuron(&self, id: &str) -> Option<&Neuron> {
        self.neurons.get(id)
    }

    /// Returns true if a neuron with this id exists
    pub fn contains_neuron(&self, id: &str) -> bool {
        self.neurons.contains_key(id)
    }

    /// Iterate over neurons in insertion order
    pub fn neurons(&self) -> impl Iterator<Item = &Neuron> {
        self.order.iter().filter_map(|id| self.neurons.get(id))
    }

    /// All connections, in insertion order
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Look up a connection by id
    pub fn connection(&self, id: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    /// All connections incident to a neuron
    pub fn connections_of(&self, neuron_id: &str) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|c| c.touches(neuron_id))
            .collect()
    }

    /// Number of neurons
    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    /// Number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// The coordinate to draw a neuron at: a pinned position wins, then the
    /// layout table, then the origin for a free neuron the simulation has
    /// not placed yet
    pub fn display_position(&self, id: &str) -> Point3 {
        match self.neurons.get(id).map(|n| n.position) {
            Some(Position::Fixed(p)) => p,
            Some(Position::Auto) => self.layout.get(id).copied().unwrap_or(Point3::ORIGIN),
            None => Point3::ORIGIN,
        }
    }

    /// The simulated coordinate of a free neuron, if the layout engine has
    /// committed one
    pub fn layout_position(&self, id: &str) -> Option<Point3> {
        self.layout.get(id).copied()
    }
}

/// The authoritative graph state container
///
/// Owns the graph data and an explicit list of change listeners. Every
/// mutation goes through here; the layout engine only ever writes back
/// through [`GraphStore::commit_layout`].
#[derive(Default)]
pub struct GraphStore {
    data: GraphData,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl GraphStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the live graph
    pub fn graph(&self) -> &GraphData {
        &self.data
    }

    /// Look up a neuron by id
    pub fn neuron(&self, id: &str) -> Option<&Neuron> {
        self.data.neuron(id)
    }

    /// Iterate over neurons in insertion order
    pub fn neurons(&self) -> impl Iterator<Item = &Neuron> {
        self.data.neurons()
    }

    /// All connections, in insertion order
    pub fn connections(&self) -> &[Connection] {
        self.data.connections()
    }

    /// All connections incident to a neuron
    pub fn connections_of(&self, neuron_id: &str) -> Vec<&Connection> {
        self.data.connections_of(neuron_id)
    }

    /// The coordinate to draw a neuron at (see [`GraphData::display_position`])
    pub fn display_position(&self, id: &str) -> Point3 {
        self.data.display_position(id)
    }

    /// Register a change listener; it is called after every mutation with
    /// the change and a view of the current graph
    pub fn subscribe(&mut self, listener: impl FnMut(&GraphChange, &GraphData) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns false if the subscription was unknown
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    /// Add a neuron; ids must be unique
    pub fn add_neuron(&mut self, neuron: Neuron) -> Result<()> {
        if self.data.neurons.contains_key(&neuron.id) {
            return Err(MapError::duplicate_node(&neuron.id));
        }
        let id = neuron.id.clone();
        debug!(neuron = %id, kind = %neuron.kind, "adding neuron");
        self.data.order.push(id.clone());
        self.data.neurons.insert(id.clone(), neuron);
        self.notify(GraphChange::NeuronAdded { id });
        Ok(())
    }

    /// Apply a partial update to a neuron; touches `modified_at`
    pub fn update_neuron(&mut self, id: &str, update: NeuronUpdate) -> Result<()> {
        let neuron = self
            .data
            .neurons
            .get_mut(id)
            .ok_or_else(|| MapError::node_not_found(id))?;
        update.apply(neuron);
        neuron.modified_at = next_stamp(neuron.modified_at);
        // A pin change invalidates any stale simulated coordinate
        if neuron.position.is_fixed() {
            self.data.layout.remove(id);
        }
        self.notify(GraphChange::NeuronUpdated { id: id.to_string() });
        Ok(())
    }

    /// Remove a neuron, cascading to every incident connection
    pub fn remove_neuron(&mut self, id: &str) -> Result<Neuron> {
        let neuron = self
            .data
            .neurons
            .remove(id)
            .ok_or_else(|| MapError::node_not_found(id))?;
        self.data.order.retain(|n| n != id);
        self.data.layout.remove(id);

        let mut cascaded = Vec::new();
        self.data.connections.retain(|c| {
            if c.touches(id) {
                cascaded.push(c.id.clone());
                false
            } else {
                true
            }
        });
        debug!(
            neuron = %id,
            cascaded = cascaded.len(),
            "removed neuron and incident connections"
        );
        self.notify(GraphChange::NeuronRemoved {
            id: id.to_string(),
            cascaded,
        });
        Ok(neuron)
    }

    /// Add a connection; both endpoints must exist. Parallel connections
    /// between the same pair are allowed by the data model.
    pub fn add_connection(&mut self, connection: Connection) -> Result<()> {
        for endpoint in [&connection.source_id, &connection.target_id] {
            if !self.data.neurons.contains_key(endpoint) {
                return Err(MapError::unknown_endpoint(&connection.id, endpoint));
            }
        }
        let id = connection.id.clone();
        debug!(
            connection = %id,
            source = %connection.source_id,
            target = %connection.target_id,
            weight = connection.weight,
            "adding connection"
        );
        self.data.connections.push(connection);
        self.notify(GraphChange::ConnectionAdded { id });
        Ok(())
    }

    /// Apply a partial update to a connection
    pub fn update_connection(&mut self, id: &str, update: ConnectionUpdate) -> Result<()> {
        let connection = self
            .data
            .connections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| MapError::connection_not_found(id))?;
        update.apply(connection);
        self.notify(GraphChange::ConnectionUpdated { id: id.to_string() });
        Ok(())
    }

    /// Remove a connection by id
    pub fn remove_connection(&mut self, id: &str) -> Result<Connection> {
        let index = self
            .data
            .connections
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| MapError::connection_not_found(id))?;
        let connection = self.data.connections.remove(index);
        self.notify(GraphChange::ConnectionRemoved { id: id.to_string() });
        Ok(connection)
    }

    /// Replace the whole graph, e.g. after load or import
    ///
    /// Duplicate neuron ids keep the first occurrence; connections whose
    /// endpoints are missing are dropped. Both cases are logged, never
    /// propagated as errors.
    pub fn load(&mut self, neurons: Vec<Neuron>, connections: Vec<Connection>) {
        self.data.neurons.clear();
        self.data.order.clear();
        self.data.layout.clear();

        for neuron in neurons {
            if self.data.neurons.contains_key(&neuron.id) {
                warn!(neuron = %neuron.id, "duplicate neuron id in loaded data, keeping first");
                continue;
            }
            self.data.order.push(neuron.id.clone());
            self.data.neurons.insert(neuron.id.clone(), neuron);
        }

        self.data.connections = connections
            .into_iter()
            .filter(|c| {
                let intact = self.data.neurons.contains_key(&c.source_id)
                    && self.data.neurons.contains_key(&c.target_id);
                if !intact {
                    warn!(connection = %c.id, "dropping connection with missing endpoint");
                }
                intact
            })
            .collect();

        debug!(
            neurons = self.data.neurons.len(),
            connections = self.data.connections.len(),
            "graph loaded"
        );
        self.notify(GraphChange::Loaded);
    }

    /// Layout-engine write-back: commit simulated coordinates for free
    /// neurons. Neurons that are pinned or unknown are skipped; manual
    /// placement always wins.
    pub fn commit_layout(&mut self, batch: &[(String, Point3)]) {
        let mut moved = 0;
        for (id, point) in batch {
            match self.data.neurons.get(id) {
                Some(neuron) if neuron.position.is_auto() => {
                    self.data.layout.insert(id.clone(), *point);
                    moved += 1;
                }
                _ => {}
            }
        }
        if moved > 0 {
            self.notify(GraphChange::LayoutAdvanced { moved });
        }
    }

    fn notify(&mut self, change: GraphChange) {
        trace!(?change, "notifying subscribers");
        let data = &self.data;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change, data);
        }
    }
}

/// Next strictly-increasing modification stamp
fn next_stamp(previous: u64) -> u64 {
    now_millis().max(previous + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store_with_pair() -> GraphStore {
        let mut store = GraphStore::new();
        store.add_neuron(Neuron::new("a", "Alpha")).unwrap();
        store.add_neuron(Neuron::new("b", "Beta")).unwrap();
        store
            .add_connection(Connection::new("ab", "a", "b", 0.5))
            .unwrap();
        store
    }

    #[test]
    fn test_add_and_lookup() {
        let store = store_with_pair();
        assert_eq!(store.graph().neuron_count(), 2);
        assert_eq!(store.graph().connection_count(), 1);
        assert_eq!(store.neuron("a").unwrap().title, "Alpha");
        assert!(store.neuron("missing").is_none());
    }

    #[test]
    fn test_duplicate_neuron_rejected() {
        let mut store = store_with_pair();
        let err = store.add_neuron(Neuron::new("a", "Again")).unwrap_err();
        assert!(matches!(err, MapError::DuplicateNode { .. }));
    }

    #[test]
    fn test_connection_requires_endpoints() {
        let mut store = store_with_pair();
        let err = store
            .add_connection(Connection::new("ax", "a", "ghost", 0.5))
            .unwrap_err();
        assert!(matches!(err, MapError::UnknownEndpoint { .. }));
    }

    #[test]
    fn test_parallel_connections_allowed() {
        let mut store = store_with_pair();
        store
            .add_connection(Connection::new("ab2", "a", "b", 0.9))
            .unwrap();
        assert_eq!(store.graph().connection_count(), 2);
    }

    #[test]
    fn test_cascade_delete_removes_exactly_incident_connections() {
        let mut store = store_with_pair();
        store.add_neuron(Neuron::new("c", "Gamma")).unwrap();
        store
            .add_connection(Connection::new("bc", "b", "c", 0.4))
            .unwrap();
        store
            .add_connection(Connection::new("ca", "c", "a", 0.3))
            .unwrap();

        store.remove_neuron("a").unwrap();

        let remaining: Vec<_> = store.connections().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(remaining, vec!["bc"]);
        assert!(store.neuron("a").is_none());
        assert_eq!(store.graph().neuron_count(), 2);
    }

    #[test]
    fn test_modified_at_advances_monotonically() {
        let mut store = store_with_pair();
        let t0 = store.neuron("a").unwrap().modified_at;
        store
            .update_neuron("a", NeuronUpdate {
                title: Some("Alpha 2".to_string()),
                ..Default::default()
            })
            .unwrap();
        let t1 = store.neuron("a").unwrap().modified_at;
        store
            .update_neuron("a", NeuronUpdate {
                title: Some("Alpha 3".to_string()),
                ..Default::default()
            })
            .unwrap();
        let t2 = store.neuron("a").unwrap().modified_at;
        assert!(t1 > t0);
        assert!(t2 > t1);
    }

    #[test]
    fn test_subscribers_observe_changes() {
        let seen: Rc<RefCell<Vec<GraphChange>>> = Rc::default();
        let sink = Rc::clone(&seen);

        let mut store = GraphStore::new();
        let sub = store.subscribe(move |change, _graph| {
            sink.borrow_mut().push(change.clone());
        });

        store.add_neuron(Neuron::new("a", "Alpha")).unwrap();
        store.remove_neuron("a").unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                GraphChange::NeuronAdded {
                    id: "a".to_string()
                },
                GraphChange::NeuronRemoved {
                    id: "a".to_string(),
                    cascaded: vec![]
                },
            ]
        );

        assert!(store.unsubscribe(sub));
        assert!(!store.unsubscribe(sub));
    }

    #[test]
    fn test_commit_layout_skips_pinned_neurons() {
        let mut store = GraphStore::new();
        store.add_neuron(Neuron::new("free", "Free")).unwrap();
        store
            .add_neuron(Neuron::pinned("pin", "Pin", Point3::new(2.0, 0.0, 0.0)))
            .unwrap();

        store.commit_layout(&[
            ("free".to_string(), Point3::new(1.0, 1.0, 0.0)),
            ("pin".to_string(), Point3::new(9.0, 9.0, 9.0)),
            ("ghost".to_string(), Point3::new(5.0, 5.0, 5.0)),
        ]);

        assert_eq!(
            store.display_position("free"),
            Point3::new(1.0, 1.0, 0.0)
        );
        // Manual placement wins
        assert_eq!(store.display_position("pin"), Point3::new(2.0, 0.0, 0.0));
        assert!(store.graph().layout_position("pin").is_none());
    }

    #[test]
    fn test_display_position_defaults_to_origin() {
        let mut store = GraphStore::new();
        store.add_neuron(Neuron::new("a", "Alpha")).unwrap();
        assert_eq!(store.display_position("a"), Point3::ORIGIN);
        assert_eq!(store.display_position("missing"), Point3::ORIGIN);
    }

    #[test]
    fn test_pinning_clears_stale_layout_coordinate() {
        let mut store = GraphStore::new();
        store.add_neuron(Neuron::new("a", "Alpha")).unwrap();
        store.commit_layout(&[("a".to_string(), Point3::new(1.0, 2.0, 0.0))]);

        store
            .update_neuron("a", NeuronUpdate::pin(Point3::new(3.0, 3.0, 3.0)))
            .unwrap();
        assert!(store.graph().layout_position("a").is_none());
        assert_eq!(store.display_position("a"), Point3::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn test_load_drops_dangling_connections() {
        let mut store = GraphStore::new();
        store.load(
            vec![Neuron::new("a", "Alpha"), Neuron::new("b", "Beta")],
            vec![
                Connection::new("ab", "a", "b", 0.5),
                Connection::new("ax", "a", "ghost", 0.5),
            ],
        );
        assert_eq!(store.graph().connection_count(), 1);
        assert_eq!(store.connections()[0].id, "ab");
    }

    #[test]
    fn test_insertion_order_is_stable() {
        let mut store = GraphStore::new();
        for id in ["z", "m", "a"] {
            store.add_neuron(Neuron::new(id, id)).unwrap();
        }
        let order: Vec<_> = store.neurons().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["z", "m", "a"]);
    }
}
