//! Checks on many small weighted grids that A* returns paths whose cost matches a brute-force
//! Bellman-Ford relaxation over all cells, and agrees with the uninformed Dijkstra solver.
use grid_util::point::Point;
use rand::prelude::*;
use std::collections::HashMap;
use tile_pathfinding::{DijkstraSolver, PathError, PathFinder, TileGrid};

fn random_weighted_grid(n: usize, rng: &mut StdRng) -> TileGrid {
    TileGrid::from_fn(n, n, |_| {
        if rng.gen_bool(0.25) {
            0
        } else {
            rng.gen_range(1..=4)
        }
    })
    .unwrap()
}

fn brute_force_cost(grid: &TileGrid, start: Point, goal: Point) -> Option<u32> {
    let mut dist: HashMap<Point, u32> = HashMap::new();
    dist.insert(start, 0);
    for _ in 0..grid.len() {
        let mut changed = false;
        for cell in grid.walkable_cells() {
            let Some(&d) = dist.get(&cell.position()) else {
                continue;
            };
            for n in grid.neighbors(&cell) {
                let candidate = d + n.cost();
                let best = dist.entry(n.position()).or_insert(u32::MAX);
                if candidate < *best {
                    *best = candidate;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    dist.get(&goal).copied()
}

#[test]
fn astar_is_optimal_on_small_grids() {
    const N: usize = 5;
    const N_GRIDS: usize = 5000;
    let mut rng = StdRng::seed_from_u64(0);
    let mut astar = PathFinder::new();
    let mut dijkstra = PathFinder::with_solver(DijkstraSolver);
    let mut found = 0;
    for _ in 0..N_GRIDS {
        let grid = random_weighted_grid(N, &mut rng);
        let walkable = grid
            .walkable_cells()
            .map(|c| c.position())
            .collect::<Vec<Point>>();
        let (Some(&start), Some(&goal)) = (walkable.choose(&mut rng), walkable.choose(&mut rng))
        else {
            continue;
        };
        let expected = brute_force_cost(&grid, start, goal);
        let astar_result = astar.find_path_with_cost(&grid, start, goal);
        match (expected, astar_result) {
            (Some(cost), Ok((path, astar_cost))) => {
                if astar_cost != cost {
                    println!("{grid}");
                    println!("Start: {start}; Goal: {goal}; A*: {astar_cost}; reference: {cost}");
                }
                assert_eq!(astar_cost, cost);
                assert_eq!(grid.path_cost(&path), Some(cost));
                let (_, dijkstra_cost) = dijkstra.find_path_with_cost(&grid, start, goal).unwrap();
                assert_eq!(dijkstra_cost, cost);
                found += 1;
            }
            (None, Err(e)) => assert_eq!(e, PathError::NoPath { start, goal }),
            (expected, result) => panic!("reference {expected:?} disagrees with {result:?}"),
        }
    }
    assert!(found > N_GRIDS / 4);
}
