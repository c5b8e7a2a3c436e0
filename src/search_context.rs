//! Reusable scratch state for an A* search over a flat array of cells.
//!
//! Per-cell costs and predecessor links live in parallel arrays indexed by the grid's flat
//! storage index, so occupants carry no search state of their own.
use num_traits::{Bounded, SaturatingAdd, Zero};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
    Unseen,
    Open,
    Closed,
}

#[derive(Debug)]
struct SmallestCostHolder<K> {
    estimated_cost: K,
    sequence: usize,
    index: usize,
}

impl<K: PartialEq> Eq for SmallestCostHolder<K> {}

impl<K: PartialEq> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost) && self.sequence == other.sequence
    }
}

impl<K: Ord> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest estimate first; among equal estimates the cell that entered the open set
        // earliest wins, which is what a front-to-back linear scan of the open list picks.
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => other.sequence.cmp(&self.sequence),
            s => s,
        }
    }
}

#[derive(Debug)]
pub struct SearchContext<C> {
    pub g: Vec<C>,
    pub h: Vec<C>,
    pub f: Vec<C>,
    pub came_from: Vec<Option<usize>>,
    pub state: Vec<NodeState>,
    open_sequence: Vec<usize>,
    to_see: BinaryHeap<SmallestCostHolder<C>>,
    next_sequence: usize,
}

impl<C> Default for SearchContext<C>
where
    C: Copy + Ord + Zero + Bounded + SaturatingAdd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C> SearchContext<C>
where
    C: Copy + Ord + Zero + Bounded + SaturatingAdd,
{
    pub fn new() -> Self {
        SearchContext {
            g: Vec::new(),
            h: Vec::new(),
            f: Vec::new(),
            came_from: Vec::new(),
            state: Vec::new(),
            open_sequence: Vec::new(),
            to_see: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    /// Resets every cell to unreached: infinite g and f, no predecessor, not in any set.
    /// Stale h values are kept; they are rewritten before a cell is first opened.
    pub fn reset(&mut self, cell_count: usize) {
        let infinity = C::max_value();
        self.g.clear();
        self.g.resize(cell_count, infinity);
        self.h.resize(cell_count, C::zero());
        self.f.clear();
        self.f.extend(self.h.iter().map(|h| infinity.saturating_add(h)));
        self.came_from.clear();
        self.came_from.resize(cell_count, None);
        self.state.clear();
        self.state.resize(cell_count, NodeState::Unseen);
        self.open_sequence.clear();
        self.open_sequence.resize(cell_count, 0);
        self.to_see.clear();
        self.next_sequence = 0;
    }

    /// Records a better route to `index` and puts it in the open set. A cell already in the
    /// open set keeps its original position in the tie-break order.
    pub fn relax(&mut self, index: usize, parent: Option<usize>, g: C, h: C) {
        self.came_from[index] = parent;
        self.g[index] = g;
        self.h[index] = h;
        self.f[index] = g.saturating_add(&h);
        if self.state[index] != NodeState::Open {
            self.state[index] = NodeState::Open;
            self.open_sequence[index] = self.next_sequence;
            self.next_sequence += 1;
        }
        self.to_see.push(SmallestCostHolder {
            estimated_cost: self.f[index],
            sequence: self.open_sequence[index],
            index,
        });
    }

    /// Removes and returns the open cell with the lowest f cost. Heap entries made stale by a
    /// later improvement are skipped.
    pub fn pop_lowest(&mut self) -> Option<usize> {
        while let Some(SmallestCostHolder {
            estimated_cost,
            index,
            ..
        }) = self.to_see.pop()
        {
            if self.state[index] == NodeState::Open && self.f[index] == estimated_cost {
                return Some(index);
            }
        }
        None
    }

    pub fn close(&mut self, index: usize) {
        self.state[index] = NodeState::Closed;
    }

    pub fn is_closed(&self, index: usize) -> bool {
        self.state[index] == NodeState::Closed
    }

    /// Walks predecessor links back from `end` and returns the indices start-first.
    pub fn reconstruct(&self, end: usize) -> Vec<usize> {
        let mut path: Vec<usize> =
            std::iter::successors(Some(end), |&ix| self.came_from[ix]).collect();
        path.reverse();
        path
    }
}
