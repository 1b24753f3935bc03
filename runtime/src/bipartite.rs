//! Bipartite graphs between commutative operand patterns and subject arguments.
//!
//! Left nodes are operand pattern slots, right nodes are subject arguments, and every edge carries
//! the data of one successful operand match. Maximum matching (augmenting paths) is used as a cheap
//! feasibility test before enumerating every complete matching.

use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct BipartiteGraph<E> {
    right: usize,
    adjacency: Vec<Vec<usize>>,
    edges: BTreeMap<(usize, usize), E>,
}

impl<E> BipartiteGraph<E> {
    pub fn new(left: usize, right: usize) -> Self {
        Self { right, adjacency: vec![Vec::new(); left], edges: BTreeMap::new() }
    }

    pub fn left_len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn right_len(&self) -> usize {
        self.right
    }

    /// Insert or replace the edge between `left` and `right`.
    pub fn add_edge(&mut self, left: usize, right: usize, value: E) {
        debug_assert!(right < self.right, "right node {right} out of range");
        let neighbors = &mut self.adjacency[left];
        if let Err(position) = neighbors.binary_search(&right) {
            neighbors.insert(position, right);
        }
        self.edges.insert((left, right), value);
    }

    pub fn edge(&self, left: usize, right: usize) -> Option<&E> {
        self.edges.get(&(left, right))
    }

    /// Right neighbours of `left`, ascending.
    pub fn neighbors(&self, left: usize) -> &[usize] {
        self.adjacency.get(left).map_or(&[], Vec::as_slice)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// A maximum matching as `left -> right`, found with augmenting paths.
    pub fn maximum_matching(&self) -> Vec<Option<usize>> {
        let mut owner: Vec<Option<usize>> = vec![None; self.right];
        for left in 0..self.left_len() {
            let mut seen = vec![false; self.right];
            self.augment(left, &mut seen, &mut owner);
        }

        let mut matching = vec![None; self.left_len()];
        for (right, left) in owner.into_iter().enumerate() {
            if let Some(left) = left {
                matching[left] = Some(right);
            }
        }
        matching
    }

    fn augment(&self, left: usize, seen: &mut [bool], owner: &mut [Option<usize>]) -> bool {
        for &right in &self.adjacency[left] {
            if seen[right] {
                continue;
            }
            seen[right] = true;
            let current = owner[right];
            if current.is_none_or(|other| self.augment(other, seen, owner)) {
                owner[right] = Some(left);
                return true;
            }
        }
        false
    }

    pub fn maximum_matching_size(&self) -> usize {
        self.maximum_matching().iter().flatten().count()
    }

    /// Every matching that covers all left nodes, as `assignment[left] = right`.
    ///
    /// `same_left(a, b)` marks interchangeable left nodes and `same_right(a, b)` interchangeable
    /// right nodes; both are only asked about neighbours (`b == a + 1`), so interchangeable nodes
    /// must be adjacent. Matchings that differ only by permuting interchangeable nodes are produced
    /// once: interchangeable left nodes take increasing right nodes, and among interchangeable right
    /// nodes the lowest unused one is taken first.
    pub fn complete_matchings(
        &self,
        same_left: impl Fn(usize, usize) -> bool,
        same_right: impl Fn(usize, usize) -> bool,
    ) -> Vec<Vec<usize>> {
        let mut out = Vec::new();
        if self.left_len() > self.right {
            return out;
        }
        let mut assignment = Vec::with_capacity(self.left_len());
        let mut used = vec![false; self.right];
        self.extend_matching(&mut assignment, &mut used, &same_left, &same_right, &mut out);
        out
    }

    fn extend_matching<L, R>(
        &self,
        assignment: &mut Vec<usize>,
        used: &mut [bool],
        same_left: &L,
        same_right: &R,
        out: &mut Vec<Vec<usize>>,
    ) where
        L: Fn(usize, usize) -> bool,
        R: Fn(usize, usize) -> bool,
    {
        let left = assignment.len();
        if left == self.left_len() {
            out.push(assignment.clone());
            return;
        }
        let floor = match assignment.last() {
            Some(&previous) if same_left(left - 1, left) => previous + 1,
            _ => 0,
        };
        for &right in &self.adjacency[left] {
            if used[right] || right < floor {
                continue;
            }
            if right > 0 && !used[right - 1] && same_right(right - 1, right) {
                continue;
            }
            used[right] = true;
            assignment.push(right);
            self.extend_matching(assignment, used, same_left, same_right, out);
            assignment.pop();
            used[right] = false;
        }
    }
}
