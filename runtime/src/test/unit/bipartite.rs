use crate::BipartiteGraph;

fn graph(left: usize, right: usize, edges: &[(usize, usize)]) -> BipartiteGraph<()> {
    let mut graph = BipartiteGraph::new(left, right);
    for &(l, r) in edges {
        graph.add_edge(l, r, ());
    }
    graph
}

#[test]
fn test_maximum_matching_uses_augmenting_paths() {
    // Greedy would pair 0-0 and leave 1 unmatched.
    let g = graph(2, 2, &[(0, 0), (0, 1), (1, 0)]);
    let matching = g.maximum_matching();
    assert_eq!(matching, vec![Some(1), Some(0)]);
    assert_eq!(g.maximum_matching_size(), 2);
}

#[test]
fn test_maximum_matching_partial() {
    let g = graph(3, 2, &[(0, 0), (1, 0), (2, 0)]);
    assert_eq!(g.maximum_matching_size(), 1);
}

#[test]
fn test_complete_matchings_all_distinct() {
    let g = graph(2, 3, &[(0, 0), (0, 1), (1, 0), (1, 1), (1, 2)]);
    let matchings = g.complete_matchings(|_, _| false, |_, _| false);
    assert_eq!(matchings, vec![vec![0, 1], vec![0, 2], vec![1, 0], vec![1, 2]]);
}

#[test]
fn test_interchangeable_left_nodes_produce_increasing_assignments() {
    let g = graph(2, 2, &[(0, 0), (0, 1), (1, 0), (1, 1)]);
    let matchings = g.complete_matchings(|_, _| true, |_, _| false);
    assert_eq!(matchings, vec![vec![0, 1]]);
}

#[test]
fn test_interchangeable_right_nodes_taken_lowest_first() {
    let g = graph(1, 3, &[(0, 0), (0, 1), (0, 2)]);
    let matchings = g.complete_matchings(|_, _| false, |a, _| a == 0);
    assert_eq!(matchings, vec![vec![0], vec![2]]);
}

#[test]
fn test_more_left_than_right_has_no_matching() {
    let g = graph(2, 1, &[(0, 0), (1, 0)]);
    assert!(g.complete_matchings(|_, _| false, |_, _| false).is_empty());
}

#[test]
fn test_edges_replace_and_stay_sorted() {
    let mut g: BipartiteGraph<u32> = BipartiteGraph::new(1, 3);
    g.add_edge(0, 2, 1);
    g.add_edge(0, 0, 2);
    g.add_edge(0, 2, 3);
    assert_eq!(g.neighbors(0), &[0, 2]);
    assert_eq!(g.edge(0, 2), Some(&3));
    assert_eq!(g.edge_count(), 2);
    assert_eq!(g.neighbors(5), &[] as &[usize]);
}
