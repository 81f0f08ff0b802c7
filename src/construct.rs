use std::sync::Arc;

// the registry keeps a dense index next to an identifier lookup
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::{BuildHasherDefault, Hash};

use seahash::SeaHasher;

// used to print out readable forms of a construct
use std::fmt;

use crate::relation::RelSet;

pub type IdentityHasher = BuildHasherDefault<SeaHasher>;

/// Capability required of node identifiers: equality and hashing are the
/// contracts the network consumes, cloning feeds the registry's double
/// index and debug formatting feeds the logs.
pub trait Identity: Eq + Hash + Clone + fmt::Debug {}
impl<T: Eq + Hash + Clone + fmt::Debug> Identity for T {}

// ------------- Node -------------
/// A temporal interval under an opaque caller chosen identifier.
///
/// The internal index is assigned at registration and is dense within its
/// network. Nodes are immutable after creation and shared through `Arc`.
#[derive(Debug)]
pub struct Node<I: Identity> {
    identifier: I,
    index: usize,
}

impl<I: Identity> Node<I> {
    pub(crate) fn new(identifier: I, index: usize) -> Self {
        Self { identifier, index }
    }
    // It's intentional to encapsulate the fields and only expose them
    // using "getters", because this yields true immutability for nodes
    // after creation.
    pub fn identifier(&self) -> &I {
        &self.identifier
    }
    pub fn index(&self) -> usize {
        self.index
    }
}
impl<I: Identity> PartialEq for Node<I> {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}
impl<I: Identity> Eq for Node<I> {}
impl<I: Identity> Hash for Node<I> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}
impl<I: Identity + fmt::Display> fmt::Display for Node<I> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.identifier)
    }
}

// ------------- Constraint -------------
/// An assertion that the relation from `source` to `destination` lies
/// within `relations`.
#[derive(Debug, Clone)]
pub struct Constraint<I: Identity> {
    source: Arc<Node<I>>,
    destination: Arc<Node<I>>,
    relations: RelSet,
}

impl<I: Identity> Constraint<I> {
    pub fn new(source: Arc<Node<I>>, destination: Arc<Node<I>>, relations: RelSet) -> Self {
        Self {
            source,
            destination,
            relations,
        }
    }
    pub fn source(&self) -> &Arc<Node<I>> {
        &self.source
    }
    pub fn destination(&self) -> &Arc<Node<I>> {
        &self.destination
    }
    pub fn relations(&self) -> RelSet {
        self.relations
    }
}
impl<I: Identity> PartialEq for Constraint<I> {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.destination == other.destination
            && self.relations == other.relations
    }
}
impl<I: Identity> Eq for Constraint<I> {}
impl<I: Identity + fmt::Display> fmt::Display for Constraint<I> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({} {} {})", self.source, self.relations, self.destination)
    }
}

// ------------- NodeKeeper -------------
/// Append only registry mapping identifiers to densely indexed nodes.
///
/// Double indexing: the vector owns the dense order while the map answers
/// identifier lookups, similar in spirit to a role registry where the name
/// is stored on both sides.
#[derive(Debug)]
pub struct NodeKeeper<I: Identity> {
    kept: Vec<Arc<Node<I>>>,
    lookup: HashMap<I, usize, IdentityHasher>,
}

impl<I: Identity> NodeKeeper<I> {
    pub fn new() -> Self {
        Self {
            kept: Vec::new(),
            lookup: HashMap::default(),
        }
    }
    /// Registers an identifier, handing back the kept node together with a
    /// flag telling whether it had been kept before. A previously kept
    /// identifier causes no state change.
    pub fn keep(&mut self, identifier: I) -> (Arc<Node<I>>, bool) {
        match self.lookup.entry(identifier.clone()) {
            Entry::Occupied(entry) => (Arc::clone(&self.kept[*entry.get()]), true),
            Entry::Vacant(entry) => {
                let index = self.kept.len();
                entry.insert(index);
                let node = Arc::new(Node::new(identifier, index));
                self.kept.push(Arc::clone(&node));
                (node, false)
            }
        }
    }
    pub fn get(&self, identifier: &I) -> Option<Arc<Node<I>>> {
        self.lookup
            .get(identifier)
            .map(|index| Arc::clone(&self.kept[*index]))
    }
    /// Reverse lookup from a dense index.
    pub fn lookup(&self, index: usize) -> Option<Arc<Node<I>>> {
        self.kept.get(index).map(Arc::clone)
    }
    pub fn nodes(&self) -> &[Arc<Node<I>>] {
        &self.kept
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

impl<I: Identity> Default for NodeKeeper<I> {
    fn default() -> Self {
        Self::new()
    }
}
