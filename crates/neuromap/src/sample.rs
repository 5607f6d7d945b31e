//! Built-in sample graph
//!
//! Loaded when no persisted data exists, so a first run has something to
//! show. The hub is pinned at the origin; everything else is left to the
//! layout engine.

use crate::core::{Confidence, Connection, Link, Neuron, NodeKind, Point3};
use crate::graph::GraphStore;

/// The sample neurons: a small map about how learning works
pub fn sample_neurons() -> Vec<Neuron> {
    let mut hub = Neuron::pinned("n1", "Spaced repetition", Point3::ORIGIN)
        .with_kind(NodeKind::Concept)
        .with_description("Reviewing material at growing intervals beats cramming");
    hub.confidence = Confidence::High;
    hub.links = vec![Link::new(
        "https://en.wikipedia.org/wiki/Spaced_repetition",
        "Overview",
    )];

    let mut recall = Neuron::new("n2", "Active recall")
        .with_kind(NodeKind::Concept)
        .with_description("Retrieving from memory strengthens the trace");
    recall.confidence = Confidence::High;

    let interleaving = Neuron::new("n3", "Interleave topics")
        .with_kind(NodeKind::Principle)
        .with_description("Mix related subjects within a session instead of blocking them");

    let mut sleep = Neuron::new("n4", "Why does sleep aid memory?")
        .with_kind(NodeKind::Question)
        .with_description("Consolidation during slow-wave sleep, but how much is replay?");
    sleep.confidence = Confidence::Low;

    let encoding = Neuron::new("n5", "Elaborative encoding")
        .with_kind(NodeKind::Concept)
        .with_description("Connecting new material to what is already known");

    vec![hub, recall, interleaving, sleep, encoding]
}

/// The sample connections, hub-heavy like a young map tends to be
pub fn sample_connections() -> Vec<Connection> {
    vec![
        Connection::new("c1", "n1", "n2", 0.9),
        Connection::new("c2", "n1", "n3", 0.8),
        Connection::new("c3", "n1", "n4", 0.7),
        Connection::new("c4", "n1", "n5", 0.6),
        Connection::new("c5", "n3", "n4", 0.5),
        Connection::new("c6", "n3", "n5", 0.4),
    ]
}

/// Replace the store contents with the sample graph
pub fn load_sample(store: &mut GraphStore) {
    store.load(sample_neurons(), sample_connections());
}
