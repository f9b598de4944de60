use grid_util::point::Point;

use crate::solver::GridSolver;

/// Uninformed search: a zero estimate turns A* into Dijkstra's algorithm. Useful as a reference
/// when checking that A* paths are optimal.
#[derive(Clone, Debug, Default)]
pub struct DijkstraSolver;

impl GridSolver for DijkstraSolver {
    fn heuristic(&self, _: &Point, _: &Point) -> u32 {
        0
    }
}
