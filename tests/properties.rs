//! Property tests over random graphs.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use u_carpool::constraint::{Checks, RouteCheck};
use u_carpool::graph::{next_nodes, Network, NodeId, PathMap};
use u_carpool::state::{Anchor, FleetLimits, RouteState};
use u_carpool::tree::TripTree;

/// Random directed graph with waits everywhere.
fn path_map() -> impl Strategy<Value = PathMap> {
    (2usize..7).prop_flat_map(|n| {
        prop::collection::vec(prop::bool::weighted(0.4), n * n).prop_map(move |bits| {
            let rows = (0..n)
                .map(|i| (0..n).map(|j| i == j || bits[i * n + j]).collect())
                .collect();
            PathMap::from_rows(rows).unwrap()
        })
    })
}

/// A graph with a start, a finish and a step budget.
fn trip() -> impl Strategy<Value = (PathMap, NodeId, NodeId, usize)> {
    path_map().prop_flat_map(|map| {
        let n = map.nb_nodes();
        (Just(map), 0..n, 0..n, 1usize..5)
    })
}

/// A graph with a few passengers and a horizon.
fn ride() -> impl Strategy<Value = (PathMap, Vec<(NodeId, NodeId)>, usize)> {
    path_map().prop_flat_map(|map| {
        let n = map.nb_nodes();
        (
            Just(map),
            prop::collection::vec((0..n, 0..n), 1..4),
            2usize..5,
        )
    })
}

proptest! {
    #[test]
    fn prop_waits_are_successors(map in path_map()) {
        for (node, successors) in next_nodes(&map).iter().enumerate() {
            prop_assert!(successors.contains(&node));
            prop_assert!(successors.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn prop_build_is_deterministic((map, start, finish, budget) in trip()) {
        let successors = next_nodes(&map);
        let a = TripTree::build(start, finish, budget, &successors);
        let b = TripTree::build(start, finish, budget, &successors);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_every_route_reaches_finish((map, start, finish, budget) in trip()) {
        let tree = TripTree::build(start, finish, budget, &next_nodes(&map));
        for route in tree.all_solutions() {
            prop_assert_eq!(route.first().copied(), Some(start));
            prop_assert_eq!(route.last().copied(), Some(finish));
            prop_assert!(route.len() <= budget + 1);
            prop_assert!(route.windows(2).all(|w| map.allows(w[0], w[1])));
            // the finish only appears as the last node
            prop_assert!(!route[..route.len() - 1].contains(&finish));
        }
    }

    #[test]
    fn prop_solution_at_matches_addresses((map, start, finish, budget) in trip()) {
        let tree = TripTree::build(start, finish, budget, &next_nodes(&map));
        let addresses = tree.all_addresses();
        prop_assert_eq!(addresses.len(), tree.leaf_count());
        for (address, route) in addresses.iter().zip(tree.all_solutions()) {
            let nodes = tree.solution_at(address).unwrap();
            prop_assert_eq!(nodes.len(), address.len() + 1);
            prop_assert_eq!(nodes[0], start);
            prop_assert_eq!(tree.node_at(address, address.len()).unwrap(), finish);
            prop_assert_eq!(nodes, route);
        }
    }

    #[test]
    fn prop_neighbor_keeps_prefix_and_finish(
        (map, start, finish, budget) in trip(),
        seed in any::<u64>(),
    ) {
        let tree = TripTree::build(start, finish, budget, &next_nodes(&map));
        let mut rng = StdRng::seed_from_u64(seed);
        for address in tree.all_addresses() {
            for level in 0..address.len() {
                let next = tree.neighbor(&address, level, &mut rng).unwrap();
                prop_assert_eq!(&next[..level], &address[..level]);
                let nodes = tree.solution_at(&next).unwrap();
                prop_assert_eq!(nodes.last().copied(), Some(finish));
            }
            prop_assert!(tree.neighbor(&address, address.len(), &mut rng).is_err());
        }
    }

    #[test]
    fn prop_tree_shuffle_is_feasible_route(
        (map, trips, nb_steps) in ride(),
        seed in any::<u64>(),
    ) {
        let passengers = trips.iter().map(|&(s, f)| Anchor::passenger(s, f)).collect();
        let fleet = FleetLimits { nb_vehicles: trips.len(), capacity: 1 };
        let mut state = RouteState::ride(nb_steps, Arc::new(Network::new(map)), passengers, fleet)
            .unwrap();
        state.plan_candidates(None);
        prop_assume!(state.require_candidates().is_ok());

        let mut rng = StdRng::seed_from_u64(seed);
        state.tree_shuffle(&mut rng).unwrap();
        let checks = Checks::all().without(RouteCheck::FleetSize);
        prop_assert!(state.check_constraint(&checks));
        prop_assert_eq!(state.violation_count(), 0);

        for _ in 0..4 {
            state.get_tree_neighbor(0.5, &mut rng);
            state.get_address_neighbor(0.5, &mut rng).unwrap();
            prop_assert!(state.check_constraint(&checks));
        }
    }

    #[test]
    fn prop_shuffle_stays_on_graph(
        (map, trips, nb_steps) in ride(),
        rate in 0.0f64..=1.0,
        seed in any::<u64>(),
    ) {
        let passengers = trips.iter().map(|&(s, f)| Anchor::passenger(s, f)).collect();
        let fleet = FleetLimits { nb_vehicles: 1, capacity: 1 };
        let mut state = RouteState::ride(nb_steps, Arc::new(Network::new(map)), passengers, fleet)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        state.shuffle(rate, &mut rng);
        prop_assert!(state.check_path_validity());

        let first = state.check_constraint(&Checks::all());
        let count = state.violation_count();
        prop_assert_eq!(first, state.check_constraint(&Checks::all()));
        prop_assert_eq!(count, state.violation_count());
    }
}
