use crate::cell::Cell;
use crate::config::{check_dimensions, check_obstacle_probability, GridConfig};
use crate::error::GridError;
use core::fmt;
use grid_util::grid::{SimpleValueGrid, ValueGrid};
use grid_util::point::Point;
use itertools::{iproduct, Itertools};
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

/// Offsets of the 4-neighbourhood in the order up, down, left, right. Searches rely on this order
/// for deterministic tie-breaking.
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 4] = [(0, 1), (0, -1), (-1, 0), (1, 0)];

/// [TileGrid] owns a rectangular lattice of tile costs, where a cost of zero marks an obstacle. In
/// addition to the costs it maintains the connected components of the walkable tiles in a
/// [UnionFind] structure so that unreachable goals can be rejected without flood-filling.
///
/// The grid is only ever replaced in bulk: [generate](TileGrid::generate),
/// [from_fn](TileGrid::from_fn) and [parse](TileGrid::parse) all build a complete new lattice and
/// recompute the components.
#[derive(Clone, Debug)]
pub struct TileGrid {
    costs: SimpleValueGrid<u32>,
    components: UnionFind<usize>,
}

impl Default for TileGrid {
    fn default() -> TileGrid {
        TileGrid {
            costs: SimpleValueGrid::new(0, 0, 0),
            components: UnionFind::new(0),
        }
    }
}

impl TileGrid {
    /// An empty grid: every lookup returns [None] until a layout is generated.
    pub fn new() -> TileGrid {
        TileGrid::default()
    }

    /// Builds and generates a grid from a [GridConfig].
    pub fn from_config(config: &GridConfig) -> Result<TileGrid, GridError> {
        let mut grid = TileGrid::new();
        grid.generate(
            config.width,
            config.height,
            config.obstacle_probability,
            config.seed,
        )?;
        Ok(grid)
    }

    /// Builds a grid whose tile costs are given by `cost` for every position.
    pub fn from_fn<F>(width: usize, height: usize, mut cost: F) -> Result<TileGrid, GridError>
    where
        F: FnMut(Point) -> u32,
    {
        check_dimensions(width, height)?;
        let mut costs = SimpleValueGrid::new(width, height, 0);
        for (y, x) in iproduct!(0..height as i32, 0..width as i32) {
            costs.set(x, y, cost(Point::new(x, y)));
        }
        Ok(TileGrid::with_costs(costs))
    }

    /// Parses a grid from text rows. `#` is an obstacle, `.` a tile of cost 1 and the digits `1`
    /// to `9` tiles of that cost. The first row is the top of the grid (highest `y`), matching the
    /// [Display] output.
    pub fn parse(layout: &str) -> Result<TileGrid, GridError> {
        let rows = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<&str>>();
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.chars().count());
        check_dimensions(width, height)?;
        let mut costs = SimpleValueGrid::new(width, height, 0);
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(GridError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            let y = (height - 1 - row) as i32;
            for (x, tile) in line.chars().enumerate() {
                let cost = match tile {
                    '#' => 0,
                    '.' => 1,
                    '1'..='9' => tile.to_digit(10).unwrap_or(1),
                    _ => return Err(GridError::UnknownTile { row, tile }),
                };
                costs.set(x as i32, y, cost);
            }
        }
        Ok(TileGrid::with_costs(costs))
    }

    /// Replaces the grid with a random layout in which every tile independently becomes an
    /// obstacle with probability `obstacle_probability`. A given seed always yields the same
    /// layout; without one the generator is seeded from entropy.
    pub fn generate(
        &mut self,
        width: usize,
        height: usize,
        obstacle_probability: f32,
        seed: Option<u64>,
    ) -> Result<(), GridError> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.generate_with_rng(width, height, obstacle_probability, &mut rng)
    }

    /// Like [generate](TileGrid::generate), drawing from the given random source. On error the
    /// current layout is left untouched.
    pub fn generate_with_rng<R>(
        &mut self,
        width: usize,
        height: usize,
        obstacle_probability: f32,
        rng: &mut R,
    ) -> Result<(), GridError>
    where
        R: Rng + ?Sized,
    {
        check_obstacle_probability(obstacle_probability)?;
        check_dimensions(width, height)?;
        let mut costs = SimpleValueGrid::new(width, height, 0);
        for x in 0..width as i32 {
            for y in 0..height as i32 {
                let walkable = rng.gen::<f32>() >= obstacle_probability;
                costs.set(x, y, u32::from(walkable));
            }
        }
        *self = TileGrid::with_costs(costs);
        info!(
            "Generated {}x{} grid with {} walkable tiles",
            width,
            height,
            self.walkable_count()
        );
        Ok(())
    }

    fn with_costs(costs: SimpleValueGrid<u32>) -> TileGrid {
        let mut grid = TileGrid {
            components: UnionFind::new(0),
            costs,
        };
        grid.generate_components();
        grid
    }

    pub fn width(&self) -> usize {
        self.costs.width()
    }
    pub fn height(&self) -> usize {
        self.costs.height()
    }
    pub fn len(&self) -> usize {
        self.width() * self.height()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width()
            && (point.y as usize) < self.height()
    }

    /// Row-major index of an in-bounds point.
    fn ix(&self, point: Point) -> usize {
        point.y as usize * self.width() + point.x as usize
    }

    /// The cell at `position`, or [None] if it lies outside the generated lattice.
    pub fn get(&self, position: Point) -> Option<Cell> {
        if self.in_bounds(position) {
            Some(Cell::new(position, self.costs.get(position.x, position.y)))
        } else {
            None
        }
    }

    /// The walkable cells directly above, below, left and right of `cell`, in that order.
    /// Obstacles and positions outside the grid or the `i32` range are skipped.
    pub fn neighbors(&self, cell: &Cell) -> SmallVec<[Cell; 4]> {
        let p = cell.position();
        NEIGHBOUR_OFFSETS
            .iter()
            .filter_map(|&(dx, dy)| {
                Some(Point::new(p.x.checked_add(dx)?, p.y.checked_add(dy)?))
            })
            .filter_map(|n| self.get(n))
            .filter(Cell::walkable)
            .collect()
    }

    /// Every cell in row-major order.
    pub fn all_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        iproduct!(0..self.height() as i32, 0..self.width() as i32)
            .map(move |(y, x)| Cell::new(Point::new(x, y), self.costs.get(x, y)))
    }

    pub fn walkable_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.all_cells().filter(Cell::walkable)
    }

    pub fn walkable_count(&self) -> usize {
        self.walkable_cells().count()
    }

    /// Total cost accrued along `path`, i.e. the summed cost of every entered cell. Returns [None]
    /// if the path is empty or contains a step that is not a move between 4-adjacent walkable
    /// cells.
    pub fn path_cost(&self, path: &[Point]) -> Option<u32> {
        self.get(*path.first()?).filter(Cell::walkable)?;
        path.iter().tuple_windows().try_fold(0u32, |total, (a, b)| {
            if a.manhattan_distance(b) != 1 {
                return None;
            }
            let cell = self.get(*b).filter(Cell::walkable)?;
            total.checked_add(cell.cost())
        })
    }

    /// Retrieves the component id a walkable [Point] belongs to.
    pub fn component(&self, point: Point) -> Option<usize> {
        self.get(point)
            .filter(Cell::walkable)
            .map(|_| self.components.find(self.ix(point)))
    }

    /// Checks if start and goal are walkable and on the same component.
    pub fn reachable(&self, start: Point, goal: Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: Point, goal: Point) -> bool {
        match (self.component(start), self.component(goal)) {
            (Some(a), Some(b)) => a != b,
            _ => true,
        }
    }

    /// Links up walkable 4-neighbours into the same components.
    fn generate_components(&mut self) {
        let w = self.width() as i32;
        let h = self.height() as i32;
        self.components = UnionFind::new(self.len());
        for (y, x) in iproduct!(0..h, 0..w) {
            let point = Point::new(x, y);
            if self.costs.get(x, y) == 0 {
                continue;
            }
            let parent_ix = self.ix(point);
            for neighbour in [Point::new(x + 1, y), Point::new(x, y + 1)] {
                if self.get(neighbour).is_some_and(|c| c.walkable()) {
                    let ix = self.ix(neighbour);
                    self.components.union(parent_ix, ix);
                }
            }
        }
        debug!("Generated connected components for {}x{} grid", w, h);
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in (0..self.height() as i32).rev() {
            let row = (0..self.width() as i32)
                .map(|x| match self.costs.get(x, y) {
                    0 => '#',
                    1 => '.',
                    c @ 2..=9 => char::from_digit(c, 10).unwrap_or('+'),
                    _ => '+',
                })
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}
