//! Constraint network and path consistency propagation.
//!
//! A [`ConstraintNetwork`] couples a node registry with a dense matrix of
//! [`RelSet`] entries and a worklist driven propagator that tightens the
//! matrix to a fixed point. Tightening is monotone bit intersection, so the
//! fixed point does not depend on visitation order; the worklist is FIFO for
//! reproducibility.
//!
//! Path consistency is not complete over the full algebra (Nebel &
//! Bürckert, JACM 1995): a network it calls consistent may still have no
//! realisation. In practice that is rarely a problem, and every network it
//! calls inconsistent is genuinely inconsistent.
//!
//! # Example
//! ```
//! use allen_intervals::construct::Constraint;
//! use allen_intervals::network::ConstraintNetwork;
//! use allen_intervals::relation::RelSet;
//! let mut network = ConstraintNetwork::new();
//! network.add_node("dinner");
//! network.add_node("speech");
//! let dinner = network.node(&"dinner").unwrap();
//! let speech = network.node(&"speech").unwrap();
//! network.add_constraint(Constraint::new(dinner, speech, RelSet::CONTAINS));
//! assert!(network.path_consistency());
//! assert_eq!(
//!     network.relations_between(&"speech", &"dinner"),
//!     Some(RelSet::DURING)
//! );
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::construct::{Constraint, Identity, Node, NodeKeeper};
use crate::relation::RelSet;

// ------------- ConstraintMatrix -------------
/// Dense square matrix of relation sets, row major over a flat vector.
///
/// The allocated stride doubles when exhausted so that admitting a node does
/// not reallocate every time. The diagonal is pinned to `{equals}` and every
/// write keeps the symmetry invariant: the cell (j, i) always holds the
/// inverse of the cell (i, j).
#[derive(Debug)]
pub struct ConstraintMatrix {
    cells: Vec<RelSet>,
    dim: usize,
    stride: usize,
}

impl ConstraintMatrix {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }
    /// Pre-reserves room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: vec![RelSet::ALL; capacity * capacity],
            dim: 0,
            stride: capacity,
        }
    }
    /// Number of nodes covered by the matrix.
    pub fn dim(&self) -> usize {
        self.dim
    }
    pub fn get(&self, i: usize, j: usize) -> RelSet {
        self.cells[i * self.stride + j]
    }
    /// Writes `relations` at (i, j) and its inverse at (j, i).
    pub(crate) fn set(&mut self, i: usize, j: usize, relations: RelSet) {
        self.cells[i * self.stride + j] = relations;
        self.cells[j * self.stride + i] = relations.inverse();
    }
    /// Grows the matrix by one node: all new off-diagonal entries admit any
    /// relation, the new diagonal entry is `{equals}`.
    pub(crate) fn grow(&mut self) {
        if self.dim == self.stride {
            let stride = if self.stride == 0 { 4 } else { self.stride * 2 };
            let mut cells = vec![RelSet::ALL; stride * stride];
            for i in 0..self.dim {
                for j in 0..self.dim {
                    cells[i * stride + j] = self.cells[i * self.stride + j];
                }
            }
            self.cells = cells;
            self.stride = stride;
        }
        let n = self.dim;
        for existing in 0..n {
            self.cells[existing * self.stride + n] = RelSet::ALL;
            self.cells[n * self.stride + existing] = RelSet::ALL;
        }
        self.cells[n * self.stride + n] = RelSet::EQUALS;
        self.dim = n + 1;
    }
    /// Forgets every tightening: off-diagonals back to all relations,
    /// diagonal back to `{equals}`. Used when rebuilding after a removal.
    pub(crate) fn reset(&mut self) {
        for i in 0..self.dim {
            for j in 0..self.dim {
                self.cells[i * self.stride + j] = if i == j {
                    RelSet::EQUALS
                } else {
                    RelSet::ALL
                };
            }
        }
    }
}

impl Default for ConstraintMatrix {
    fn default() -> Self {
        Self::new()
    }
}

// ------------- ConstraintNetwork -------------
/// A network of interval nodes with admissible relation sets between them.
///
/// Single threaded by design: no operation suspends or performs I/O, and a
/// network is not safe for concurrent mutation. Callers wanting concurrency
/// serialise access externally or shard by network.
pub struct ConstraintNetwork<I: Identity> {
    nodes: NodeKeeper<I>,
    matrix: ConstraintMatrix,
    asserted: Vec<Constraint<I>>,
    previously_inconsistent: bool,
}

impl<I: Identity> ConstraintNetwork<I> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }
    /// Pre-reserves matrix room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: NodeKeeper::new(),
            matrix: ConstraintMatrix::with_capacity(capacity),
            asserted: Vec::new(),
            previously_inconsistent: false,
        }
    }

    /// Registers a node under `identifier`. Returns false and changes
    /// nothing if an equal identifier is already registered. By default any
    /// relation is admissible between the new node and every other node.
    pub fn add_node(&mut self, identifier: I) -> bool {
        let (node, previously_kept) = self.nodes.keep(identifier);
        if previously_kept {
            return false;
        }
        self.matrix.grow();
        debug!(identifier = ?node.identifier(), index = node.index(), "node registered");
        true
    }

    /// The registered node for `identifier`, for building constraints.
    pub fn node(&self, identifier: &I) -> Option<Arc<Node<I>>> {
        self.nodes.get(identifier)
    }

    /// Asserts a constraint and propagates its consequences.
    ///
    /// Returns false and changes nothing when either endpoint is not
    /// registered here, when the endpoints coincide, or when the unordered
    /// pair of endpoints already carries an asserted constraint (the same
    /// assertion twice included). Otherwise returns true even if the
    /// addition left the network inconsistent; the verdict is available
    /// through [`ConstraintNetwork::path_consistency`].
    pub fn add_constraint(&mut self, constraint: Constraint<I>) -> bool {
        for existing in &self.asserted {
            if existing.source() == constraint.source()
                && existing.destination() == constraint.destination()
            {
                return false;
            }
            if existing.source() == constraint.destination()
                && existing.destination() == constraint.source()
            {
                return false;
            }
        }
        let (i, j) = match (
            self.registered_index(constraint.source()),
            self.registered_index(constraint.destination()),
        ) {
            (Some(i), Some(j)) => (i, j),
            _ => return false,
        };
        // a constraint from a node to itself would unpin the diagonal
        if i == j {
            return false;
        }
        self.matrix.set(i, j, constraint.relations());
        debug!(
            source = ?constraint.source().identifier(),
            destination = ?constraint.destination().identifier(),
            relations = %constraint.relations(),
            "constraint asserted"
        );
        self.asserted.push(constraint);
        if self.previously_inconsistent {
            // no point propagating into a network already known bad
            debug!("propagation skipped, network previously inconsistent");
        } else if !self.propagate(&[(i, j), (j, i)]) {
            self.previously_inconsistent = true;
        }
        true
    }

    /// Retracts a previously asserted constraint.
    ///
    /// Tightening is lossy, so removal rebuilds the matrix from the
    /// remaining assertions and re-runs propagation from scratch; the sticky
    /// inconsistency verdict is re-derived honestly. Returns true iff the
    /// constraint had been asserted.
    pub fn remove_constraint(&mut self, constraint: &Constraint<I>) -> bool {
        let position = match self.asserted.iter().position(|c| c == constraint) {
            Some(position) => position,
            None => return false,
        };
        self.asserted.remove(position);
        self.matrix.reset();
        for c in &self.asserted {
            self.matrix
                .set(c.source().index(), c.destination().index(), c.relations());
        }
        self.previously_inconsistent = false;
        debug!(remaining = self.asserted.len(), "constraint removed, matrix rebuilt");
        self.path_consistency();
        true
    }

    /// Enforces path consistency and reports the verdict.
    ///
    /// A network that has previously been found inconsistent stays
    /// inconsistent until an assertion is removed. With no assertions the
    /// network is trivially consistent. Otherwise propagation is seeded from
    /// every asserted edge and run to the fixed point, which makes the call
    /// idempotent when nothing has changed and correct after a rebuild.
    pub fn path_consistency(&mut self) -> bool {
        if self.previously_inconsistent {
            return false;
        }
        if self.asserted.is_empty() {
            return true;
        }
        let mut seeds = Vec::with_capacity(self.asserted.len() * 2);
        for c in &self.asserted {
            let i = c.source().index();
            let j = c.destination().index();
            seeds.push((i, j));
            seeds.push((j, i));
        }
        let consistent = self.propagate(&seeds);
        if !consistent {
            self.previously_inconsistent = true;
        }
        consistent
    }

    /// The currently admissible relations from `source` to `destination`,
    /// or None when either identifier is unregistered.
    pub fn relations_between(&self, source: &I, destination: &I) -> Option<RelSet> {
        let i = self.nodes.get(source)?.index();
        let j = self.nodes.get(destination)?.index();
        Some(self.matrix.get(i, j))
    }

    /// Read only view of the tightened matrix.
    pub fn constraint_network(&self) -> &ConstraintMatrix {
        &self.matrix
    }
    pub fn modeled_constraints(&self) -> &[Constraint<I>] {
        &self.asserted
    }
    pub fn modeled_nodes(&self) -> &[Arc<Node<I>>] {
        self.nodes.nodes()
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn registered_index(&self, node: &Arc<Node<I>>) -> Option<usize> {
        match self.nodes.get(node.identifier()) {
            Some(kept) if Arc::ptr_eq(&kept, node) => Some(kept.index()),
            _ => None,
        }
    }

    /// Worklist propagation to the fixed point.
    ///
    /// Pops edges FIFO and, for the popped edge (i, j) and every node k,
    /// tightens k → j through i and i → k through j. Every strict tightening
    /// re-enqueues the changed edge and its inverse. An empty intersection
    /// means the network is inconsistent and propagation stops immediately,
    /// leaving the matrix partially tightened.
    fn propagate(&mut self, seeds: &[(usize, usize)]) -> bool {
        let n = self.nodes.len();
        let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
        // presence cache, O(1) deduplication instead of scanning the queue
        let mut on_queue = vec![false; n * n];
        for &(i, j) in seeds {
            if !on_queue[i * n + j] {
                on_queue[i * n + j] = true;
                queue.push_back((i, j));
            }
        }
        debug!(seeds = queue.len(), nodes = n, "propagating");
        let mut iterations = 0usize;
        while let Some((i, j)) = queue.pop_front() {
            iterations += 1;
            on_queue[i * n + j] = false;
            for k in 0..n {
                let cij = self.matrix.get(i, j);
                // tighten k -> j with the composition through i
                let ckj = self.matrix.get(k, j);
                let tightened = ckj.intersection(self.matrix.get(k, i).compose(cij));
                if tightened.is_empty() {
                    warn!(k, j, "tightening produced the empty relation set");
                    return false;
                }
                // intersection can only shrink, so inequality is the strict
                // subset test of the edge being tightened
                if tightened != ckj {
                    self.matrix.set(k, j, tightened);
                    if !on_queue[k * n + j] {
                        on_queue[k * n + j] = true;
                        queue.push_back((k, j));
                    }
                    if !on_queue[j * n + k] {
                        on_queue[j * n + k] = true;
                        queue.push_back((j, k));
                    }
                }
                // tighten i -> k with the composition through j
                let cik = self.matrix.get(i, k);
                let tightened = cik.intersection(cij.compose(self.matrix.get(j, k)));
                if tightened.is_empty() {
                    warn!(i, k, "tightening produced the empty relation set");
                    return false;
                }
                if tightened != cik {
                    self.matrix.set(i, k, tightened);
                    if !on_queue[i * n + k] {
                        on_queue[i * n + k] = true;
                        queue.push_back((i, k));
                    }
                    if !on_queue[k * n + i] {
                        on_queue[k * n + i] = true;
                        queue.push_back((k, i));
                    }
                }
            }
        }
        debug!(iterations, "fixed point reached");
        true
    }
}

impl<I: Identity> Default for ConstraintNetwork<I> {
    fn default() -> Self {
        Self::new()
    }
}
