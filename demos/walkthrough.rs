use tile_pathfinding::{
    FollowState, FollowerConfig, GridConfig, PathError, PathFinder, PathFollower, TileGrid,
};

// Generates a seeded 10x10 grid with 20% obstacles, finds a path between the bottom-left-most and
// top-right-most walkable tiles and walks an agent along it at 60 ticks per second.
//
// Run with `RUST_LOG=debug cargo run --example walkthrough` to see the search statistics.

fn main() {
    env_logger::init();
    let config = GridConfig {
        seed: Some(2024),
        ..GridConfig::default()
    };
    let grid = TileGrid::from_config(&config).unwrap();
    println!("{}", grid);

    let mut walkable = grid.walkable_cells().map(|c| c.position());
    let start = walkable.next().unwrap();
    let end = walkable.last().unwrap_or(start);

    let mut finder = PathFinder::new();
    let path = match finder.find_path(&grid, start, end) {
        Ok(path) => path,
        Err(e @ PathError::NoPath { .. }) => {
            println!("{}", e);
            return;
        }
        Err(e) => panic!("{}", e),
    };
    println!("Path of cost {:?}:", grid.path_cost(&path));
    for p in &path {
        println!("{:?}", p);
    }

    let mut follower = PathFollower::new(FollowerConfig::default()).unwrap();
    follower.set_path(&path);
    follower.start();
    let dt = 1.0 / 60.0;
    let mut ticks = 0;
    loop {
        ticks += 1;
        match follower.advance(dt) {
            FollowState::Moving => {}
            FollowState::Arrived | FollowState::Idle => break,
        }
    }
    println!(
        "Arrived at {:?} facing {:?} after {} ticks",
        follower.position(),
        follower.facing(),
        ticks
    );
}
