use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::types::{Cell, GoalSequence};

/// Index of a node inside the search arena.
pub type NodeIndex = usize;

/// Immutable search state. Derived fields are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchNode {
    pub position: Cell,
    pub g: u32,
    /// 1-based index of the goal still pending.
    pub label: usize,
    pub h: u32,
    pub f: u32,
    pub parent: Option<NodeIndex>,
    pub tiebreak: u64,
}

impl SearchNode {
    /// Builds a node, advancing `label` past every pending goal that sits on
    /// `position` before the heuristic is evaluated.
    pub fn new(
        position: Cell,
        g: u32,
        label: usize,
        parent: Option<NodeIndex>,
        goals: &GoalSequence,
        tiebreak: u64,
    ) -> Self {
        let label = advance_label(&position, label, goals);
        let h = heuristic(&position, label, goals);
        Self {
            position,
            g,
            label,
            h,
            f: g.saturating_add(h),
            parent,
            tiebreak,
        }
    }

    pub fn is_terminal(&self, goals: &GoalSequence) -> bool {
        goals.is_complete(self.label)
    }
}

/// Label after consuming every consecutive pending goal located at `position`.
pub fn advance_label(position: &Cell, label: usize, goals: &GoalSequence) -> usize {
    let mut label = label;
    while goals.pending(label) == Some(*position) {
        label += 1;
    }
    label
}

/// Manhattan distance to the goal at `label`, 0 once the sequence is done.
pub fn heuristic(position: &Cell, label: usize, goals: &GoalSequence) -> u32 {
    goals
        .pending(label)
        .map(|goal| position.manhattan(&goal))
        .unwrap_or(0)
}

/// Heap entry. The heap is a max-heap, so the comparison is reversed to pop
/// the lowest `(f, tiebreak, index)` first. Ordering agrees with the derived
/// equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrontierEntry {
    f: u32,
    tiebreak: u64,
    index: NodeIndex,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.tiebreak.cmp(&self.tiebreak))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority open list over arena nodes ordered by `(f, tiebreak)`.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, index: NodeIndex, node: &SearchNode) {
        self.heap.push(FrontierEntry {
            f: node.f,
            tiebreak: node.tiebreak,
            index,
        });
    }

    pub fn pop(&mut self) -> Option<NodeIndex> {
        self.heap.pop().map(|entry| entry.index)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

/// Growable node table. Parents are referenced by index, so the search tree
/// never holds shared ownership.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
    next_tiebreak: u64,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a node with the next tie-break value and returns its index.
    pub fn alloc(
        &mut self,
        position: Cell,
        g: u32,
        label: usize,
        parent: Option<NodeIndex>,
        goals: &GoalSequence,
    ) -> NodeIndex {
        let node = SearchNode::new(position, g, label, parent, goals, self.next_tiebreak);
        self.next_tiebreak += 1;
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn get(&self, index: NodeIndex) -> &SearchNode {
        &self.nodes[index]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walks parent links from `index` to the root and returns the positions
    /// root first.
    pub fn trace(&self, index: NodeIndex) -> Vec<Cell> {
        let mut cells = Vec::new();
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            let node = &self.nodes[i];
            cells.push(node.position);
            cursor = node.parent;
        }
        cells.reverse();
        cells
    }
}
