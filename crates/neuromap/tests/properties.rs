//! Property-based invariants for the store and the layout engine

use proptest::prelude::*;

use neuromap::prelude::*;

fn arb_point() -> impl Strategy<Value = Point3> {
    (-10.0f32..10.0, -10.0f32..10.0, -10.0f32..10.0)
        .prop_map(|(x, y, z)| Point3::new(x, y, z))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_connection_weight_is_always_clamped(weight in -100.0f32..100.0) {
        let connection = Connection::new("c", "a", "b", weight);
        prop_assert!((0.0..=1.0).contains(&connection.weight));
    }

    #[test]
    fn prop_position_survives_json(point in arb_point()) {
        let position = Position::Fixed(point);
        let json = serde_json::to_string(&position).unwrap();
        let back: Position = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, position);
    }

    #[test]
    fn prop_cascade_delete_leaves_no_dangling_edges(
        victim in 0usize..4,
        edges in proptest::collection::vec((0usize..4, 0usize..4, 0.0f32..1.0), 0..12),
    ) {
        let mut store = GraphStore::new();
        for i in 0..4 {
            store.add_neuron(Neuron::new(format!("n{i}"), format!("N{i}"))).unwrap();
        }
        for (k, (a, b, w)) in edges.iter().enumerate() {
            store
                .add_connection(Connection::new(
                    format!("e{k}"),
                    format!("n{a}"),
                    format!("n{b}"),
                    *w,
                ))
                .unwrap();
        }

        let victim_id = format!("n{victim}");
        let incident = store.connections_of(&victim_id).len();
        let before = store.graph().connection_count();

        store.remove_neuron(&victim_id).unwrap();

        // Exactly the incident connections disappeared, and none survive
        prop_assert_eq!(store.graph().connection_count(), before - incident);
        for connection in store.connections() {
            prop_assert!(!connection.touches(&victim_id));
        }
    }

    #[test]
    fn prop_settled_free_nodes_respect_the_boundary(
        seed in 0u64..1000,
        node_count in 1usize..7,
        edges in proptest::collection::vec((0usize..7, 0usize..7, 0.1f32..1.0), 0..8),
    ) {
        let mut store = GraphStore::new();
        for i in 0..node_count {
            store.add_neuron(Neuron::new(format!("n{i}"), format!("N{i}"))).unwrap();
        }
        for (k, (a, b, w)) in edges.iter().enumerate() {
            let (a, b) = (a % node_count, b % node_count);
            store
                .add_connection(Connection::new(
                    format!("e{k}"),
                    format!("n{a}"),
                    format!("n{b}"),
                    *w,
                ))
                .unwrap();
        }

        let config = SimulationConfig { seed: Some(seed), ..Default::default() };
        let radius = config.boundary_radius;
        neuromap::settle_layout(&mut store, config);

        for neuron in store.neurons() {
            let position = store.display_position(&neuron.id);
            prop_assert!(position.length() <= radius + 1e-4);
            prop_assert!(position.x.is_finite() && position.y.is_finite());
        }
    }

    #[test]
    fn prop_modified_at_never_regresses(updates in 1usize..8) {
        let mut store = GraphStore::new();
        store.add_neuron(Neuron::new("a", "A")).unwrap();

        let mut last = store.neuron("a").unwrap().modified_at;
        for i in 0..updates {
            store
                .update_neuron("a", NeuronUpdate {
                    title: Some(format!("A{i}")),
                    ..Default::default()
                })
                .unwrap();
            let stamp = store.neuron("a").unwrap().modified_at;
            prop_assert!(stamp > last);
            last = stamp;
        }
    }
}
