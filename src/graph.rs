//! Dependency graph of a project's derived values.
//!
//! Source nodes carry a version counter, bumped by every mutation of the input they stand for.
//! A derived node is stamped with the versions of the sources it transitively depends on, and a
//! memoised value is reused while its stamp is unchanged.
use crate::*;
use std::sync::{Mutex, PoisonError};

/// A value held by a project, either an input or derived from inputs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Settings,
    Wells,
    StructuralMaps,
    Formations,
    WellLabels,
    DecorationColumns,

    ActiveWells,
    SectionPath,
    MainAreaWidth,
    MainAreaHeight,
    SectionWidth,
    SectionHeight,
    HorizontalPointsCount,
    VerticalPointsCount,
    BreakInfos,
    Validation,
}

impl Node {
    pub const SOURCES: [Node; 6] = [
        Node::Settings,
        Node::Wells,
        Node::StructuralMaps,
        Node::Formations,
        Node::WellLabels,
        Node::DecorationColumns,
    ];

    pub const DERIVED: [Node; 10] = [
        Node::ActiveWells,
        Node::SectionPath,
        Node::MainAreaWidth,
        Node::MainAreaHeight,
        Node::SectionWidth,
        Node::SectionHeight,
        Node::HorizontalPointsCount,
        Node::VerticalPointsCount,
        Node::BreakInfos,
        Node::Validation,
    ];

    pub fn is_source(self) -> bool {
        self.inputs().is_empty()
    }

    /// The nodes this node is computed from directly.
    pub fn inputs(self) -> &'static [Node] {
        use Node::*;
        match self {
            Settings | Wells | StructuralMaps | Formations | WellLabels | DecorationColumns => &[],
            ActiveWells => &[Wells],
            SectionPath => &[Settings, ActiveWells],
            MainAreaWidth => &[Settings, SectionPath],
            MainAreaHeight => &[Settings],
            SectionWidth => &[MainAreaWidth, DecorationColumns, Settings],
            SectionHeight => &[MainAreaHeight, Settings],
            HorizontalPointsCount => &[Settings, MainAreaWidth],
            VerticalPointsCount => &[Settings, MainAreaHeight],
            BreakInfos => &[SectionPath, StructuralMaps],
            Validation => &[
                Settings,
                ActiveWells,
                StructuralMaps,
                SectionPath,
                Formations,
                WellLabels,
                DecorationColumns,
            ],
        }
    }

    /// Every source this node transitively depends on, sorted. A source depends on itself.
    pub fn sources(self) -> Vec<Node> {
        let mut found = Vec::new();
        let mut stack = vec![self];
        while let Some(n) = stack.pop() {
            if n.is_source() {
                if !found.contains(&n) {
                    found.push(n);
                }
            } else {
                stack.extend_from_slice(n.inputs());
            }
        }
        found.sort();
        found
    }

    /// Every derived node that must be recomputed when this node changes, in evaluation order.
    pub fn dependents(self) -> Vec<Node> {
        Node::DERIVED
            .iter()
            .copied()
            .filter(|d| *d != self && d.reaches(self))
            .collect()
    }

    fn reaches(self, other: Node) -> bool {
        self.inputs()
            .iter()
            .any(|i| *i == other || i.reaches(other))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The versions of a node's sources at one point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stamp(Vec<(Node, u64)>);

/// Source version counters.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    versions: HashMap<Node, u64>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// All edges as `(input, output)`.
    pub fn edges() -> impl Iterator<Item = (Node, Node)> {
        Node::DERIVED
            .into_iter()
            .flat_map(|n| n.inputs().iter().map(move |i| (*i, n)))
    }

    pub fn version(&self, source: Node) -> u64 {
        self.versions.get(&source).copied().unwrap_or_default()
    }

    /// Record a change to a source node.
    pub fn touch(&mut self, source: Node) {
        debug_assert!(source.is_source(), "{} is not a source node", source);
        *self.versions.entry(source).or_default() += 1;
        log::trace!(
            "{} changed, invalidating {:?}",
            source,
            source.dependents()
        );
    }

    pub fn stamp(&self, node: Node) -> Stamp {
        Stamp(
            node.sources()
                .into_iter()
                .map(|s| (s, self.version(s)))
                .collect(),
        )
    }
}

/// A memoised derived value.
#[derive(Debug)]
pub struct Memo<T> {
    slot: Mutex<Option<(Stamp, T)>>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<T: Clone> Memo<T> {
    /// The cached value if `stamp` matches, otherwise the value of `compute`, which is cached.
    pub fn get_or_update<F>(&self, stamp: Stamp, compute: F) -> T
    where
        F: FnOnce() -> T,
    {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match &*slot {
            Some((s, v)) if *s == stamp => v.clone(),
            _ => {
                let v = compute();
                *slot = Some((stamp, v.clone()));
                v
            }
        }
    }

    /// Returns if a value is cached for `stamp`.
    pub fn is_current(&self, stamp: &Stamp) -> bool {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        matches!(&*slot, Some((s, _)) if s == stamp)
    }
}
