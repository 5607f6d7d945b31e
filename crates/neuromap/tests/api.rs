//! Integration tests for the public API

use neuromap::prelude::*;
use neuromap::{render_scene, sample, settle_layout};

fn seeded() -> SimulationConfig {
    SimulationConfig {
        seed: Some(42),
        ..Default::default()
    }
}

#[test]
fn test_full_editing_flow() {
    let mut store = GraphStore::new();
    store
        .add_neuron(Neuron::new("rust", "Rust").with_kind(NodeKind::Concept))
        .unwrap();
    store
        .add_neuron(Neuron::new("own", "Ownership").with_kind(NodeKind::Principle))
        .unwrap();
    store
        .add_neuron(Neuron::new("gc", "Why no garbage collector?").with_kind(NodeKind::Question))
        .unwrap();
    store
        .add_connection(Connection::new("c1", "rust", "own", 0.9))
        .unwrap();
    store
        .add_connection(Connection::new("c2", "own", "gc", 0.6))
        .unwrap();

    store
        .update_neuron(
            "own",
            NeuronUpdate {
                description: Some("Every value has a single owner".to_string()),
                confidence: Some(Confidence::High),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(store.neuron("own").unwrap().confidence, Confidence::High);

    store
        .update_connection("c2", ConnectionUpdate::weight(0.8))
        .unwrap();
    assert_eq!(store.graph().connection("c2").unwrap().weight, 0.8);

    store.remove_neuron("gc").unwrap();
    assert_eq!(store.graph().neuron_count(), 2);
    assert_eq!(store.graph().connection_count(), 1);
    assert!(store.graph().connection("c2").is_none());
}

#[test]
fn test_layout_and_render_pipeline() {
    let mut store = GraphStore::new();
    sample::load_sample(&mut store);

    let steps = settle_layout(&mut store, seeded());
    assert!(steps > 0);

    let scene = render_scene(&store, None);
    assert!(!scene.is_empty());
}

#[test]
fn test_engine_lifecycle_against_live_mutations() {
    let mut store = GraphStore::new();
    store.add_neuron(Neuron::new("a", "Alpha")).unwrap();
    store.add_neuron(Neuron::new("b", "Beta")).unwrap();
    store
        .add_connection(Connection::new("ab", "a", "b", 0.7))
        .unwrap();

    let mut engine = LayoutEngine::new(seeded());
    engine.start(&store);
    for _ in 0..10 {
        engine.tick(&mut store);
    }

    // Mutating the graph mid-run restarts the simulation transparently
    store.add_neuron(Neuron::new("c", "Gamma")).unwrap();
    store
        .add_connection(Connection::new("bc", "b", "c", 0.5))
        .unwrap();
    assert!(engine.tick(&mut store));

    engine.settle(&mut store);
    for id in ["a", "b", "c"] {
        assert!(store.graph().layout_position(id).is_some());
    }

    engine.stop();
    engine.stop();
    assert!(!engine.tick(&mut store));
}

#[test]
fn test_highlight_follows_view_focus() {
    let mut store = GraphStore::new();
    sample::load_sample(&mut store);

    let mut view = ViewState::new();
    view.select(Some("n3".to_string()));
    view.hover(Some("n1".to_string()));

    let strengths =
        neuromap::graph::highlight::highlight_strengths(store.graph(), view.focused());
    // n1 is hovered, so its direct connections are at full strength
    assert_eq!(strengths["c1"], 1.0);
    assert_eq!(strengths["c2"], 1.0);

    view.hover(None);
    let strengths =
        neuromap::graph::highlight::highlight_strengths(store.graph(), view.focused());
    // Focus falls back to the selection (n3)
    assert_eq!(strengths["c2"], 1.0);
    assert_eq!(strengths["c5"], 1.0);
}

#[test]
fn test_drag_to_pin_then_clear_returns_to_auto() {
    let mut store = GraphStore::new();
    sample::load_sample(&mut store);
    let mut engine = LayoutEngine::new(seeded());
    engine.start(&store);

    let mut drag = DragController::new();
    drag.pointer_down("n2", Point3::ORIGIN);
    drag.pointer_move(Point3::new(3.0, 1.0, 0.0), &mut engine);
    let outcome = drag.pointer_up(&mut store, &mut engine);
    assert_eq!(
        outcome,
        DragOutcome::Dropped {
            id: "n2".to_string(),
            at: Point3::new(3.0, 1.0, 0.0)
        }
    );

    // Pinned: the simulation leaves it alone
    engine.settle(&mut store);
    assert_eq!(store.display_position("n2"), Point3::new(3.0, 1.0, 0.0));

    // Clearing the position hands it back to auto-placement
    store.update_neuron("n2", NeuronUpdate::release()).unwrap();
    engine.settle(&mut store);
    assert!(store.neuron("n2").unwrap().position.is_auto());
    assert!(store.graph().layout_position("n2").is_some());
}

#[test]
fn test_write_through_persistence_survives_reload() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut store = GraphStore::new();
        GraphArchive::new(FileBackend::new(dir.path())).attach(&mut store);
        sample::load_sample(&mut store);
        store
            .add_neuron(Neuron::new("extra", "Extra"))
            .unwrap();
    }

    let mut restored = GraphStore::new();
    let archive = GraphArchive::new(FileBackend::new(dir.path()));
    let document = archive.load().expect("persisted document");
    restored.load(document.neurons, document.connections);

    assert_eq!(restored.graph().neuron_count(), 6);
    assert!(restored.neuron("extra").is_some());
    assert_eq!(restored.graph().connection_count(), 6);
}

#[test]
fn test_export_import_cycle() {
    let mut store = GraphStore::new();
    sample::load_sample(&mut store);

    let mut archive = GraphArchive::new(MemoryBackend::new());
    archive.save(store.graph());
    let exported = archive.export();
    assert!(exported.contains("\"neurons\""));

    let mut other = GraphArchive::new(MemoryBackend::new());
    let document = other.import(&exported).unwrap();
    assert_eq!(document.neurons.len(), 5);
    assert_eq!(document.connections.len(), 6);
    assert_eq!(other.export(), exported);
}
