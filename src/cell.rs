use grid_util::point::Point;

/// A single tile of a [TileGrid](crate::TileGrid). The traversal cost is authoritative: a cost of
/// zero marks an obstacle and [walkable](Cell::walkable) is derived from it on construction, so the
/// two can never disagree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    position: Point,
    walkable: bool,
    cost: u32,
}

impl Cell {
    pub fn new(position: Point, cost: u32) -> Cell {
        Cell {
            position,
            walkable: cost > 0,
            cost,
        }
    }
    pub fn obstacle(position: Point) -> Cell {
        Cell::new(position, 0)
    }
    pub fn position(&self) -> Point {
        self.position
    }
    pub fn walkable(&self) -> bool {
        self.walkable
    }
    /// Cost accrued when the cell is entered.
    pub fn cost(&self) -> u32 {
        self.cost
    }
}
