//! # tile_pathfinding
//!
//! Pathfinding on procedurally generated tile grids. A [TileGrid] holds a rectangle of tiles with
//! a traversal cost each, where cost 0 marks an obstacle. A [PathFinder] computes least-cost
//! 4-connected paths between two walkable tiles using A* with the
//! [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) heuristic, where entering
//! a tile costs that tile's traversal cost. Connected components are
//! [pre-computed](https://en.wikipedia.org/wiki/Component_(graph_theory)) on generation to avoid
//! flood-filling behaviour if no path exists. A [PathFollower] walks an agent along a found path.
//!
//! ```
//! use grid_util::point::Point;
//! use tile_pathfinding::{PathFinder, TileGrid};
//!
//! let grid = TileGrid::parse(
//!     "...
//!      .#.
//!      ...",
//! )
//! .unwrap();
//! let mut finder = PathFinder::new();
//! let path = finder
//!     .find_path(&grid, Point::new(0, 0), Point::new(2, 2))
//!     .unwrap();
//! assert_eq!(path.len(), 5);
//! ```
mod cell;
mod config;
mod error;
mod follower;
mod grid;
pub mod search;
pub mod solver;

pub use cell::Cell;
pub use config::{FollowerConfig, GridConfig};
pub use error::{EndpointProblem, FollowerError, GridError, PathError};
pub use follower::{cell_center, Facing, FollowState, PathFollower};
pub use grid::{TileGrid, NEIGHBOUR_OFFSETS};
pub use solver::astar::AstarSolver;
pub use solver::dijkstra::DijkstraSolver;
pub use solver::{GridSolver, PathFinder};
