//! Allen intervals – qualitative temporal reasoning over interval relationships.
//!
//! The crate centers on the *constraint network* concept: a directed graph of
//! temporal intervals whose edges carry sets of admissible relations drawn
//! from Allen's thirteen basic relations, where:
//! * A [`relation::Relation`] is one of the thirteen basic relations
//!   (`before`, `meets`, `overlaps`, …, `equals`).
//! * A [`relation::RelSet`] is any subset of them, packed into thirteen bits
//!   with boolean algebra, inverse and composition operators.
//! * A [`construct::Node`] is a temporal interval under an opaque,
//!   caller-chosen identifier.
//! * A [`construct::Constraint`] asserts that the relation between two nodes
//!   lies within a given set.
//! * A [`network::ConstraintNetwork`] owns the nodes and assertions and
//!   enforces *path consistency*: for every triple (i, k, j) the admissible
//!   set between i and j is tightened against the composition of the sets
//!   through k, to a fixed point, detecting inconsistency on the way.
//!
//! ## Modules
//! * [`relation`] – Relations, relation sets and the composition table.
//! * [`construct`] – Nodes, constraints and the node registry.
//! * [`network`] – The constraint matrix and the propagation engine.
//! * [`error`] – Crate error type covering the fallible parsing surfaces.
//!
//! ## Quick Start
//! ```
//! use allen_intervals::construct::Constraint;
//! use allen_intervals::network::ConstraintNetwork;
//! use allen_intervals::relation::RelSet;
//!
//! let mut network = ConstraintNetwork::new();
//! network.add_node("A");
//! network.add_node("B");
//! network.add_node("C");
//! let a = network.node(&"A").unwrap();
//! let b = network.node(&"B").unwrap();
//! let c = network.node(&"C").unwrap();
//! network.add_constraint(Constraint::new(a.clone(), b, RelSet::BEFORE));
//! network.add_constraint(Constraint::new(c, a, RelSet::CONTAINS));
//! assert!(network.path_consistency());
//! // the inverse direction is maintained without further user action
//! assert_eq!(network.relations_between(&"B", &"A"), Some(RelSet::AFTER));
//! ```
//!
//! ## Completeness
//! Path consistency is sound but not complete over the full algebra: a
//! network reported consistent may still admit no realisation (Nebel &
//! Bürckert, JACM 1995, analyse the tractable subclass). Every network
//! reported inconsistent is genuinely inconsistent. The composition table
//! follows Allen (CACM 1983) with three corrected cells, documented at the
//! table itself.
//!
//! ## License
//! Dual licensed under Apache-2.0 and MIT.

pub mod construct;
pub mod error;
pub mod network;
pub mod relation;
