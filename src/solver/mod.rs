use crate::cell::Cell;
use crate::error::{EndpointProblem, PathError};
use crate::grid::TileGrid;
use crate::search::{SearchContext, SearchFailure};
use grid_util::point::Point;
use log::{debug, error, info, warn};

pub mod astar;
pub mod dijkstra;

use astar::AstarSolver;

/// Supplies the cost estimate that steers a [PathFinder]. The estimate must never exceed the true
/// remaining cost for the returned paths to be optimal.
pub trait GridSolver {
    fn heuristic(&self, p1: &Point, p2: &Point) -> u32;
}

/// Computes least-cost 4-connected paths on a [TileGrid]. Entering a cell costs that cell's
/// traversal cost.
///
/// Each finder owns the search state of its runs, so a run needs `&mut` access to the finder but
/// only shared access to the grid. Concurrent queries on one grid use one finder each.
#[derive(Clone, Debug)]
pub struct PathFinder<S = AstarSolver> {
    solver: S,
    context: SearchContext<Point, u32>,
}

impl Default for PathFinder<AstarSolver> {
    fn default() -> Self {
        PathFinder::with_solver(AstarSolver::new())
    }
}

impl PathFinder<AstarSolver> {
    /// A finder using A* with the Manhattan distance heuristic.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: GridSolver> PathFinder<S> {
    pub fn with_solver(solver: S) -> Self {
        PathFinder {
            solver,
            context: SearchContext::new(),
        }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Number of cells expanded by the last run.
    pub fn expanded(&self) -> usize {
        self.context.expanded()
    }

    fn endpoint(grid: &TileGrid, position: Point) -> Result<Cell, PathError> {
        match grid.get(position) {
            Some(cell) if cell.walkable() => Ok(cell),
            Some(_) => Err(PathError::InvalidEndpoint {
                position,
                reason: EndpointProblem::Obstacle,
            }),
            None => Err(PathError::InvalidEndpoint {
                position,
                reason: EndpointProblem::OutOfBounds,
            }),
        }
    }

    /// Computes the cheapest path from `start` to `goal`, both included.
    pub fn find_path(
        &mut self,
        grid: &TileGrid,
        start: Point,
        goal: Point,
    ) -> Result<Vec<Point>, PathError> {
        self.find_path_with_cost(grid, start, goal)
            .map(|(path, _cost)| path)
    }

    /// Like [find_path](Self::find_path), additionally returning the accrued cost of the path.
    pub fn find_path_with_cost(
        &mut self,
        grid: &TileGrid,
        start: Point,
        goal: Point,
    ) -> Result<(Vec<Point>, u32), PathError> {
        Self::endpoint(grid, start)?;
        Self::endpoint(grid, goal)?;
        // Check if start and goal are on the same connected component.
        if grid.unreachable(start, goal) {
            info!("{} is not reachable from {}", goal, start);
            return Err(PathError::NoPath { start, goal });
        }
        debug!("{} is reachable from {}, computing path", goal, start);
        let solver = &self.solver;
        let result = self.context.astar(
            &start,
            |node| {
                grid.get(*node)
                    .map(|cell| grid.neighbors(&cell))
                    .unwrap_or_default()
                    .into_iter()
                    .map(|n| (n.position(), n.cost()))
            },
            |point| solver.heuristic(point, &goal),
            |point| *point == goal,
        );
        match result {
            Ok((path, cost)) => {
                debug!(
                    "Found path of {} cells with cost {} after expanding {} cells",
                    path.len(),
                    cost,
                    self.context.expanded()
                );
                Ok((path, cost))
            }
            Err(SearchFailure::Exhausted) => {
                warn!(
                    "Reachable goal {} could not be pathed to from {}, every route costs more than u32::MAX",
                    goal, start
                );
                Err(PathError::NoPath { start, goal })
            }
            Err(SearchFailure::BrokenChain { at }) => {
                let position = self.context.node_at(at).copied().unwrap_or(goal);
                error!("Broken parent chain at {} while reconstructing path", position);
                Err(PathError::CorruptSearchState { position })
            }
        }
    }
}
