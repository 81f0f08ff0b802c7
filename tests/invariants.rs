use allen_intervals::construct::Constraint;
use allen_intervals::network::ConstraintNetwork;
use allen_intervals::relation::RelSet;

fn populated_network(capacity: usize) -> ConstraintNetwork<&'static str> {
    let mut network = ConstraintNetwork::with_capacity(capacity);
    for name in ["A", "B", "C", "D", "E"] {
        assert!(network.add_node(name));
    }
    for (source, destination, relations) in [
        ("A", "B", RelSet::MEETS),
        ("B", "C", RelSet::BEFORE),
        ("D", "C", RelSet::DURING),
        ("A", "E", RelSet::BEFORE),
    ] {
        let constraint = Constraint::new(
            network.node(&source).unwrap(),
            network.node(&destination).unwrap(),
            relations,
        );
        assert!(network.add_constraint(constraint));
    }
    network
}

#[test]
fn diagonal_and_symmetry_hold_after_every_operation() {
    let mut network = populated_network(0);
    assert!(network.path_consistency());
    let matrix = network.constraint_network();
    for i in 0..matrix.dim() {
        assert_eq!(matrix.get(i, i), RelSet::EQUALS);
        for j in 0..matrix.dim() {
            assert_eq!(matrix.get(j, i), matrix.get(i, j).inverse());
        }
    }
}

#[test]
fn fixed_point_is_path_consistent() {
    let mut network = populated_network(0);
    assert!(network.path_consistency());
    let matrix = network.constraint_network();
    for i in 0..matrix.dim() {
        for k in 0..matrix.dim() {
            for j in 0..matrix.dim() {
                let through_k = matrix.get(i, k).compose(matrix.get(k, j));
                assert!(
                    matrix.get(i, j).is_subset_of(through_k),
                    "triple ({i}, {k}, {j}) violates path consistency"
                );
            }
        }
    }
}

#[test]
fn tightened_entries_stay_within_assertions() {
    let network = populated_network(0);
    let matrix = network.constraint_network();
    for constraint in network.modeled_constraints() {
        let i = constraint.source().index();
        let j = constraint.destination().index();
        assert!(matrix.get(i, j).is_subset_of(constraint.relations()));
        assert!(matrix
            .get(j, i)
            .is_subset_of(constraint.relations().inverse()));
    }
}

#[test]
fn matrix_grows_by_one_per_node() {
    let mut network: ConstraintNetwork<usize> = ConstraintNetwork::new();
    for expected in 0..20 {
        assert_eq!(network.constraint_network().dim(), expected);
        assert_eq!(network.len(), expected);
        assert!(network.add_node(expected));
    }
    // a rejected duplicate does not grow the matrix
    assert!(!network.add_node(7));
    assert_eq!(network.constraint_network().dim(), 20);
}

#[test]
fn fresh_cells_admit_every_relation() {
    let mut network: ConstraintNetwork<usize> = ConstraintNetwork::new();
    for i in 0..5 {
        network.add_node(i);
    }
    let matrix = network.constraint_network();
    for i in 0..5 {
        for j in 0..5 {
            let expected = if i == j { RelSet::EQUALS } else { RelSet::ALL };
            assert_eq!(matrix.get(i, j), expected);
        }
    }
}

#[test]
fn preallocated_capacity_changes_nothing_observable() {
    let mut reserved = populated_network(5);
    let mut grown = populated_network(0);
    assert_eq!(reserved.path_consistency(), grown.path_consistency());
    for i in 0..reserved.constraint_network().dim() {
        for j in 0..grown.constraint_network().dim() {
            assert_eq!(
                reserved.constraint_network().get(i, j),
                grown.constraint_network().get(i, j)
            );
        }
    }
}

#[test]
fn registry_order_and_indices_are_dense() {
    let network = populated_network(0);
    let nodes = network.modeled_nodes();
    assert_eq!(nodes.len(), 5);
    for (position, node) in nodes.iter().enumerate() {
        assert_eq!(node.index(), position);
    }
    assert_eq!(*nodes[0].identifier(), "A");
    assert_eq!(*nodes[4].identifier(), "E");
    assert_eq!(network.node(&"C").unwrap().index(), 2);
    assert!(network.node(&"Z").is_none());
}
