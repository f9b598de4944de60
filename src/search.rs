//! Best-first search in the style of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html),
//! with all per-run state kept in a reusable [SearchContext] instead of on the searched nodes.
//! The context is cleared at the start of every run, so nothing carries over between searches.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use num_traits::{CheckedAdd, Zero};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

/// Marks the start node, which is the only node without a parent.
const NO_PARENT: usize = usize::MAX;

#[derive(Clone, Debug)]
struct SmallestCostHolder<K> {
    estimated_cost: K,
    heuristic: K,
    order: usize,
    cost: K,
    index: usize,
}

impl<K: PartialEq> Eq for SmallestCostHolder<K> {}

impl<K: PartialEq> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost)
            && self.heuristic.eq(&other.heuristic)
            && self.order == other.order
    }
}

impl<K: Ord> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Smallest estimated cost first, then smallest heuristic (closest to the goal), then the
        // node that entered the frontier first.
        other
            .estimated_cost
            .cmp(&self.estimated_cost)
            .then_with(|| other.heuristic.cmp(&self.heuristic))
            .then_with(|| other.order.cmp(&self.order))
    }
}

#[derive(Clone, Debug)]
struct NodeState<C> {
    parent: usize,
    cost: C,
    heuristic: C,
    order: usize,
    closed: bool,
}

/// Why a search ended without a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchFailure {
    /// Every reachable node was expanded without meeting the goal.
    Exhausted,
    /// Path reconstruction hit a node (by discovery index) without a valid parent.
    BrokenChain { at: usize },
}

/// Frontier, per-node costs and parent links of a search. Reusing one context across runs keeps
/// its allocations warm.
#[derive(Clone, Debug)]
pub struct SearchContext<N, C> {
    to_see: BinaryHeap<SmallestCostHolder<C>>,
    nodes: FxIndexMap<N, NodeState<C>>,
    expanded: usize,
}

impl<N, C: Ord> Default for SearchContext<N, C> {
    fn default() -> Self {
        SearchContext {
            to_see: BinaryHeap::new(),
            nodes: FxIndexMap::default(),
            expanded: 0,
        }
    }
}

impl<N, C> SearchContext<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy + CheckedAdd,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes expanded (closed) by the last run.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Number of nodes discovered by the last run.
    pub fn discovered(&self) -> usize {
        self.nodes.len()
    }

    /// The node discovered at `index` during the last run.
    pub fn node_at(&self, index: usize) -> Option<&N> {
        self.nodes.get_index(index).map(|(node, _)| node)
    }

    fn reset(&mut self) {
        self.to_see.clear();
        self.nodes.clear();
        self.expanded = 0;
    }

    fn push(&mut self, index: usize, cost: C, estimated_cost: C, heuristic: C, order: usize) {
        self.to_see.push(SmallestCostHolder {
            estimated_cost,
            heuristic,
            order,
            cost,
            index,
        });
    }

    /// Follows parent links from `goal` back to the start and returns the nodes in start to goal
    /// order.
    fn reverse_path(&self, goal: usize) -> Result<Vec<N>, SearchFailure> {
        let mut path = Vec::new();
        let mut index = goal;
        loop {
            let (node, state) = self
                .nodes
                .get_index(index)
                .ok_or(SearchFailure::BrokenChain { at: index })?;
            path.push(node.clone());
            if index == 0 {
                break;
            }
            // A chain longer than the number of nodes can only be a cycle.
            if state.parent == NO_PARENT || path.len() > self.nodes.len() {
                return Err(SearchFailure::BrokenChain { at: index });
            }
            index = state.parent;
        }
        path.reverse();
        Ok(path)
    }

    /// Searches from `start` until `success` holds for an expanded node and returns the path to it
    /// together with its cost. `successors` yields the neighbours of a node with the cost of
    /// moving there, `heuristic` must never overestimate the remaining cost for the result to be
    /// optimal. A route whose cost or estimate does not fit in `C` is treated as impassable.
    pub fn astar<FN, IN, FH, FS>(
        &mut self,
        start: &N,
        mut successors: FN,
        mut heuristic: FH,
        mut success: FS,
    ) -> Result<(Vec<N>, C), SearchFailure>
    where
        FN: FnMut(&N) -> IN,
        IN: IntoIterator<Item = (N, C)>,
        FH: FnMut(&N) -> C,
        FS: FnMut(&N) -> bool,
    {
        self.reset();
        let h = heuristic(start);
        self.nodes.insert(
            start.clone(),
            NodeState {
                parent: NO_PARENT,
                cost: Zero::zero(),
                heuristic: h,
                order: 0,
                closed: false,
            },
        );
        self.push(0, Zero::zero(), h, h, 0);
        let mut next_order = 1;

        while let Some(SmallestCostHolder { cost, index, .. }) = self.to_see.pop() {
            let successors = {
                let (node, state) = self
                    .nodes
                    .get_index_mut(index)
                    .ok_or(SearchFailure::BrokenChain { at: index })?;
                // A node may sit in the heap several times if a cheaper way to it was found
                // after it was first pushed. Only the cheapest entry is expanded.
                if state.closed || cost > state.cost {
                    continue;
                }
                state.closed = true;
                self.expanded += 1;
                if success(node) {
                    let path = self.reverse_path(index)?;
                    return Ok((path, cost));
                }
                successors(node)
            };
            for (successor, move_cost) in successors {
                let Some(new_cost) = cost.checked_add(&move_cost) else {
                    continue;
                };
                let (n, estimate, h, order) = match self.nodes.entry(successor) {
                    Vacant(e) => {
                        let h = heuristic(e.key());
                        let Some(estimate) = new_cost.checked_add(&h) else {
                            continue;
                        };
                        let n = e.index();
                        e.insert(NodeState {
                            parent: index,
                            cost: new_cost,
                            heuristic: h,
                            order: next_order,
                            closed: false,
                        });
                        next_order += 1;
                        (n, estimate, h, next_order - 1)
                    }
                    Occupied(mut e) => {
                        let n = e.index();
                        let state = e.get_mut();
                        if state.closed || state.cost <= new_cost {
                            continue;
                        }
                        let Some(estimate) = new_cost.checked_add(&state.heuristic) else {
                            continue;
                        };
                        state.cost = new_cost;
                        state.parent = index;
                        (n, estimate, state.heuristic, state.order)
                    }
                };
                self.push(n, new_cost, estimate, h, order);
            }
        }
        Err(SearchFailure::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A small weighted digraph on integer nodes.
    fn edges(node: &u8) -> Vec<(u8, u32)> {
        match node {
            0 => vec![(1, 1), (2, 4)],
            1 => vec![(2, 1), (3, 5)],
            2 => vec![(3, 1)],
            _ => vec![],
        }
    }

    #[test]
    fn finds_cheapest_route() {
        let mut ct: SearchContext<u8, u32> = SearchContext::new();
        let (path, cost) = ct.astar(&0, edges, |_| 0, |n| *n == 3).unwrap();
        assert_eq!(path, vec![0, 1, 2, 3]);
        assert_eq!(cost, 3);
        assert_eq!(ct.node_at(0), Some(&0));
    }

    #[test]
    fn start_is_goal() {
        let mut ct: SearchContext<u8, u32> = SearchContext::new();
        let (path, cost) = ct.astar(&2, edges, |_| 0, |n| *n == 2).unwrap();
        assert_eq!(path, vec![2]);
        assert_eq!(cost, 0);
        assert_eq!(ct.expanded(), 1);
    }

    #[test]
    fn exhaustion() {
        let mut ct: SearchContext<u8, u32> = SearchContext::new();
        assert_eq!(
            ct.astar(&3, edges, |_| 0, |n| *n == 0),
            Err(SearchFailure::Exhausted)
        );
        assert_eq!(ct.discovered(), 1);
    }

    #[test]
    fn context_is_reset_between_runs() {
        let mut ct: SearchContext<u8, u32> = SearchContext::new();
        ct.astar(&0, edges, |_| 0, |n| *n == 3).unwrap();
        let (path, _) = ct.astar(&2, edges, |_| 0, |n| *n == 3).unwrap();
        assert_eq!(path, vec![2, 3]);
        assert_eq!(ct.discovered(), 2);
    }

    #[test]
    fn equal_estimates_prefer_earlier_discovery() {
        // Two branches of equal cost towards 3; the first listed successor wins.
        let diamond = |n: &u8| match n {
            0 => vec![(1, 1), (2, 1)],
            1 | 2 => vec![(3, 1)],
            _ => vec![],
        };
        let mut ct: SearchContext<u8, u32> = SearchContext::new();
        let (path, _) = ct.astar(&0, diamond, |_| 0, |n| *n == 3).unwrap();
        assert_eq!(path, vec![0, 1, 3]);
    }

    #[test]
    fn overflowing_routes_are_impassable() {
        // 0 -> 1 -> 3 would cost 300 and does not fit in a u8; 0 -> 2 -> 3 costs 250.
        let heavy = |n: &u8| -> Vec<(u8, u8)> {
            match n {
                0 => vec![(1, 150), (2, 200)],
                1 => vec![(3, 150)],
                2 => vec![(3, 50)],
                _ => vec![],
            }
        };
        let mut ct: SearchContext<u8, u8> = SearchContext::new();
        let (path, cost) = ct.astar(&0, heavy, |_| 0, |n| *n == 3).unwrap();
        assert_eq!(path, vec![0, 2, 3]);
        assert_eq!(cost, 250);

        let too_heavy = |n: &u8| -> Vec<(u8, u8)> {
            match n {
                0 => vec![(1, 200)],
                1 => vec![(2, 200)],
                _ => vec![],
            }
        };
        assert_eq!(
            ct.astar(&0, too_heavy, |_| 0, |n| *n == 2),
            Err(SearchFailure::Exhausted)
        );
    }

    #[test]
    fn overflowing_estimates_are_skipped() {
        let mut ct: SearchContext<u8, u8> = SearchContext::new();
        let line = |n: &u8| vec![(n + 1, 100)];
        // The heuristic pushes the estimate of node 1 past u8::MAX.
        let h = |n: &u8| if *n == 1 { 200 } else { 0 };
        assert_eq!(
            ct.astar(&0, line, h, |n| *n == 1),
            Err(SearchFailure::Exhausted)
        );
    }

    #[test]
    fn broken_parent_chain_is_reported() {
        let mut ct: SearchContext<u8, u32> = SearchContext::new();
        ct.astar(&0, edges, |_| 0, |n| *n == 3).unwrap();
        // Sever the link of the goal's parent.
        let (_, state) = ct.nodes.get_index_mut(1).unwrap();
        state.parent = NO_PARENT;
        let goal = ct.nodes.get_index_of(&3).unwrap();
        assert_eq!(
            ct.reverse_path(goal),
            Err(SearchFailure::BrokenChain { at: 1 })
        );
        // And a cycle.
        let (_, state) = ct.nodes.get_index_mut(1).unwrap();
        state.parent = goal;
        assert!(ct.reverse_path(goal).is_err());
    }
}
