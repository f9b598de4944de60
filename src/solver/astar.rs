use grid_util::point::Point;

use crate::solver::GridSolver;

/// A* guided by the [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry). Every
/// walkable cell costs at least 1 to enter, so the estimate is admissible and consistent.
#[derive(Clone, Debug, Default)]
pub struct AstarSolver;

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver
    }
}

impl GridSolver for AstarSolver {
    fn heuristic(&self, p1: &Point, p2: &Point) -> u32 {
        p1.manhattan_distance(p2).unsigned_abs()
    }
}
