use grid_util::point::Point;
use thiserror::Error;

/// Why a requested start or goal cannot be used as a search endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndpointProblem {
    /// The position lies outside the generated grid (or no grid was generated yet).
    OutOfBounds,
    /// The position is an obstacle.
    Obstacle,
}

/// Errors returned by [PathFinder::find_path](crate::PathFinder::find_path).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("invalid endpoint {position}: {reason:?}")]
    InvalidEndpoint {
        position: Point,
        reason: EndpointProblem,
    },
    /// The search exhausted the reachable cells without meeting the goal. This is an ordinary
    /// outcome, not a failure of the search.
    #[error("no path from {start} to {goal}")]
    NoPath { start: Point, goal: Point },
    /// Path reconstruction met a broken parent chain. Indicates a bug in the search.
    #[error("search state is corrupt: broken parent chain at {position}")]
    CorruptSearchState { position: Point },
}

/// Errors produced while building or configuring a [TileGrid](crate::TileGrid).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GridError {
    #[error("obstacle probability must lie in [0, 1], got {0}")]
    InvalidObstacleProbability(f32),
    #[error("grid dimensions {width}x{height} exceed the addressable coordinate range")]
    DimensionTooLarge { width: usize, height: usize },
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile {tile:?} in row {row}")]
    UnknownTile { row: usize, tile: char },
}

/// Out-of-range movement parameters of a [PathFollower](crate::PathFollower).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FollowerError {
    #[error("speed must be finite and positive, got {0}")]
    InvalidSpeed(f32),
    #[error("arrival distance must be finite and not negative, got {0}")]
    InvalidArriveEpsilon(f32),
    #[error("tile size must be finite and positive, got {0}")]
    InvalidTileSize(f32),
}
