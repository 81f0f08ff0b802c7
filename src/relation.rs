//! The thirteen basic interval relations and sets thereof.
//!
//! A [`RelSet`] packs any subset of the thirteen relations into the low
//! thirteen bits of a `u16`. Set algebra is plain bit arithmetic; the
//! transitivity of the algebra lives in a 13×13 composition table that is
//! materialised once at startup. Three cells of the table as published in
//! Allen's 1983 paper are known to be incomplete and are corrected here
//! (see the notes at the table).

// used to print out readable forms of relations and relation sets
use std::fmt;
// used to parse canonical relation names
use std::str::FromStr;
use std::ops;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::AllenError;

// ------------- Relation -------------
/// One of the thirteen basic relations between two temporal intervals.
///
/// The discriminants fix the canonical bit positions 0..12; this ordering
/// matches the row and column order of the composition table and is the
/// normative encoding for anything persisted or transmitted.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Relation {
    #[serde(rename = "before")]
    Before = 0,
    #[serde(rename = "after")]
    After = 1,
    #[serde(rename = "during")]
    During = 2,
    #[serde(rename = "contains")]
    Contains = 3,
    #[serde(rename = "overlaps")]
    Overlaps = 4,
    #[serde(rename = "overlapped by")]
    OverlappedBy = 5,
    #[serde(rename = "meets")]
    Meets = 6,
    #[serde(rename = "met by")]
    MetBy = 7,
    #[serde(rename = "starts")]
    Starts = 8,
    #[serde(rename = "started by")]
    StartedBy = 9,
    #[serde(rename = "finishes")]
    Finishes = 10,
    #[serde(rename = "finished by")]
    FinishedBy = 11,
    #[serde(rename = "equals")]
    Equals = 12,
}

/// All thirteen relations in canonical bit order.
pub const ALL_RELATIONS: [Relation; 13] = [
    Relation::Before,
    Relation::After,
    Relation::During,
    Relation::Contains,
    Relation::Overlaps,
    Relation::OverlappedBy,
    Relation::Meets,
    Relation::MetBy,
    Relation::Starts,
    Relation::StartedBy,
    Relation::Finishes,
    Relation::FinishedBy,
    Relation::Equals,
];

impl Relation {
    /// Position of this relation in the canonical order, 0..12.
    pub const fn index(self) -> usize {
        self as usize
    }
    /// The single bit representing this relation in a [`RelSet`].
    pub const fn bit(self) -> u16 {
        1 << (self as u16)
    }
    /// The relation seen from the other interval, e.g. `before` becomes
    /// `after` and `equals` stays `equals`.
    pub const fn inverse(self) -> Relation {
        match self {
            Relation::Before => Relation::After,
            Relation::After => Relation::Before,
            Relation::During => Relation::Contains,
            Relation::Contains => Relation::During,
            Relation::Overlaps => Relation::OverlappedBy,
            Relation::OverlappedBy => Relation::Overlaps,
            Relation::Meets => Relation::MetBy,
            Relation::MetBy => Relation::Meets,
            Relation::Starts => Relation::StartedBy,
            Relation::StartedBy => Relation::Starts,
            Relation::Finishes => Relation::FinishedBy,
            Relation::FinishedBy => Relation::Finishes,
            Relation::Equals => Relation::Equals,
        }
    }
    /// The human readable name of this relation.
    pub const fn name(self) -> &'static str {
        match self {
            Relation::Before => "before",
            Relation::After => "after",
            Relation::During => "during",
            Relation::Contains => "contains",
            Relation::Overlaps => "overlaps",
            Relation::OverlappedBy => "overlapped by",
            Relation::Meets => "meets",
            Relation::MetBy => "met by",
            Relation::Starts => "starts",
            Relation::StartedBy => "started by",
            Relation::Finishes => "finishes",
            Relation::FinishedBy => "finished by",
            Relation::Equals => "equals",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Relation {
    type Err = AllenError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for relation in ALL_RELATIONS {
            if relation.name() == s {
                return Ok(relation);
            }
        }
        Err(AllenError::Parse { name: s.to_owned() })
    }
}

// ------------- RelSet -------------
/// A subset of the thirteen basic relations, one bit per relation.
///
/// Bits 13..15 are always zero. Serialized as the raw bit pattern, which is
/// the canonical wire encoding; deserialization rejects stray high bits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct RelSet(u16);

impl RelSet {
    pub const EMPTY: RelSet = RelSet(0);
    pub const ALL: RelSet = RelSet(0x1fff);
    pub const BEFORE: RelSet = RelSet(Relation::Before.bit());
    pub const AFTER: RelSet = RelSet(Relation::After.bit());
    pub const DURING: RelSet = RelSet(Relation::During.bit());
    pub const CONTAINS: RelSet = RelSet(Relation::Contains.bit());
    pub const OVERLAPS: RelSet = RelSet(Relation::Overlaps.bit());
    pub const OVERLAPPED_BY: RelSet = RelSet(Relation::OverlappedBy.bit());
    pub const MEETS: RelSet = RelSet(Relation::Meets.bit());
    pub const MET_BY: RelSet = RelSet(Relation::MetBy.bit());
    pub const STARTS: RelSet = RelSet(Relation::Starts.bit());
    pub const STARTED_BY: RelSet = RelSet(Relation::StartedBy.bit());
    pub const FINISHES: RelSet = RelSet(Relation::Finishes.bit());
    pub const FINISHED_BY: RelSet = RelSet(Relation::FinishedBy.bit());
    pub const EQUALS: RelSet = RelSet(Relation::Equals.bit());

    /// The raw bit pattern, bits 0..12 in canonical order.
    pub const fn bits(self) -> u16 {
        self.0
    }
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }
    pub const fn contains(self, relation: Relation) -> bool {
        self.0 & relation.bit() != 0
    }
    pub const fn is_subset_of(self, other: RelSet) -> bool {
        self.0 & other.0 == self.0
    }
    pub const fn union(self, other: RelSet) -> RelSet {
        RelSet(self.0 | other.0)
    }
    pub const fn intersection(self, other: RelSet) -> RelSet {
        RelSet(self.0 & other.0)
    }
    /// The set of inverses of every member relation.
    pub const fn inverse(self) -> RelSet {
        // Inverse pairs occupy adjacent bits, so the even bits shift up,
        // the odd bits shift down and equals keeps its place.
        RelSet(((self.0 & 0x0555) << 1) | ((self.0 & 0x0aaa) >> 1) | (self.0 & 0x1000))
    }
    /// Relational composition: every relation c such that some configuration
    /// satisfies (X a Y) ∧ (Y b Z) ∧ (X c Z) with a drawn from `self` and b
    /// from `other`. Returns early once the union saturates to [`RelSet::ALL`].
    pub fn compose(self, other: RelSet) -> RelSet {
        let mut result = RelSet::EMPTY;
        for a in self.iter() {
            for b in other.iter() {
                result = result | COMPOSITION_TABLE[a.index()][b.index()];
                if result == RelSet::ALL {
                    return result;
                }
            }
        }
        result
    }
    /// Iterates the member relations in canonical order.
    pub fn iter(self) -> Iter {
        Iter { bits: self.0 }
    }
    /// The ordered human readable names of the member relations.
    pub fn names(self) -> Vec<&'static str> {
        self.iter().map(Relation::name).collect()
    }
}

impl ops::BitOr for RelSet {
    type Output = RelSet;
    fn bitor(self, other: RelSet) -> RelSet {
        self.union(other)
    }
}
impl ops::BitAnd for RelSet {
    type Output = RelSet;
    fn bitand(self, other: RelSet) -> RelSet {
        self.intersection(other)
    }
}
impl From<Relation> for RelSet {
    fn from(relation: Relation) -> RelSet {
        RelSet(relation.bit())
    }
}
impl FromIterator<Relation> for RelSet {
    fn from_iter<T: IntoIterator<Item = Relation>>(relations: T) -> RelSet {
        let mut set = RelSet::EMPTY;
        for relation in relations {
            set.0 |= relation.bit();
        }
        set
    }
}
impl TryFrom<u16> for RelSet {
    type Error = AllenError;
    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        if bits & !RelSet::ALL.0 != 0 {
            return Err(AllenError::StrayBits { bits });
        }
        Ok(RelSet(bits))
    }
}
impl From<RelSet> for u16 {
    fn from(set: RelSet) -> u16 {
        set.0
    }
}
impl fmt::Display for RelSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = String::new();
        for name in self.names() {
            s += name;
            s += ", ";
        }
        s.pop();
        s.pop();
        write!(f, "{{{}}}", s)
    }
}

/// Iterator over the member relations of a [`RelSet`].
pub struct Iter {
    bits: u16,
}
impl Iterator for Iter {
    type Item = Relation;
    fn next(&mut self) -> Option<Relation> {
        if self.bits == 0 {
            return None;
        }
        let index = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Some(ALL_RELATIONS[index])
    }
}

// ------------- Composition table -------------
lazy_static! {
    /// Transitivity lookup: `COMPOSITION_TABLE[a][b]` holds every relation c
    /// such that (X a Y) ∧ (Y b Z) admits (X c Z). Rows and columns follow
    /// the canonical order.
    static ref COMPOSITION_TABLE: [[RelSet; 13]; 13] = composition_table();
}

#[rustfmt::skip]
fn composition_table() -> [[RelSet; 13]; 13] {
    let b = RelSet::BEFORE;
    let a = RelSet::AFTER;
    let d = RelSet::DURING;
    let di = RelSet::CONTAINS;
    let o = RelSet::OVERLAPS;
    let oi = RelSet::OVERLAPPED_BY;
    let m = RelSet::MEETS;
    let mi = RelSet::MET_BY;
    let s = RelSet::STARTS;
    let si = RelSet::STARTED_BY;
    let f = RelSet::FINISHES;
    let fi = RelSet::FINISHED_BY;
    let e = RelSet::EQUALS;
    let all = RelSet::ALL;
    // Cell shared by the three corrections to the table as printed in the
    // 1983 paper: contains∘during, overlaps∘overlapped-by and its mirror
    // must also admit starts, started by, finishes and finished by.
    let concur = o | oi | d | di | e | s | si | f | fi;
    [
        // before
        [b, all, b | o | m | d | s, b, b, b | o | m | d | s, b, b | o | m | d | s, b, b, b | o | m | d | s, b, b],
        // after
        [all, a, a | oi | mi | d | f, a, a | oi | mi | d | f, a, a | oi | mi | d | f, a, a | oi | mi | d | f, a, a, a, a],
        // during
        [b, a, d, all, b | o | m | d | s, a | oi | mi | d | f, b, a, d, a | oi | mi | d | f, d, b | o | m | d | s, d],
        // contains
        [b | o | m | di | fi, a | oi | mi | di | si, concur, di, o | di | fi, oi | di | si, o | di | fi, oi | di | si, o | di | fi, di, oi | di | si, di, di],
        // overlaps
        [b, a | oi | mi | di | si, o | d | s, b | o | m | di | fi, b | o | m, concur, b, oi | di | si, o, o | di | fi, o | d | s, b | o | m, o],
        // overlapped by
        [b | o | m | di | fi, a, oi | d | f, a | oi | mi | di | si, concur, a | oi | mi, o | di | fi, a, oi | d | f, a | oi | mi, oi, oi | di | si, oi],
        // meets
        [b, a | oi | mi | di | si, o | d | s, b, b, o | d | s, b, f | fi | e, m, m, o | d | s, b, m],
        // met by
        [b | o | m | di | fi, a, oi | d | f, a, oi | d | f, a, s | si | e, a, oi | d | f, a, mi, mi, mi],
        // starts
        [b, a, d, b | o | m | di | fi, b | o | m, oi | d | f, b, mi, s, s | si | e, d, b | o | m, s],
        // started by
        [b | o | m | di | fi, a, oi | d | f, di, o | di | fi, oi, o | di | fi, mi, s | si | e, si, oi, di, si],
        // finishes
        [b, a, d, a | oi | mi | di | si, o | d | s, a | oi | mi, m, a, d, a | oi | mi, f, f | fi | e, f],
        // finished by
        [b, a | oi | mi | di | si, o | d | s, di, o, oi | di | si, m, oi | di | si, o, di, f | fi | e, fi, fi],
        // equals
        [b, a, d, di, o, oi, m, mi, s, si, f, fi, e],
    ]
}
