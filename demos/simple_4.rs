use core::fmt;
use grid_util::point::Point;
use spatial_grid::{GridOccupant, GridPathfinder, GridTransform, SpatialGrid};

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Nodes have a 4-neighborhood

struct Tile {
    blocked: bool,
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", if self.blocked { '#' } else { '.' })
    }
}

impl GridOccupant for Tile {}

fn main() {
    env_logger::init();
    let grid = SpatialGrid::new(3, 3, GridTransform::default(), |_, x, y| Tile {
        blocked: (x, y) == (1, 1),
    })
    .unwrap();
    println!("{}", grid);
    let start = Point::new(0, 2);
    let end = Point::new(2, 0);
    let mut pathfinder = GridPathfinder::new();
    let path = pathfinder
        .find_path(&grid, start, end, |grid, x, y| {
            grid.get(x, y).map_or(false, |t| !t.blocked)
        })
        .unwrap();
    println!("Path:");
    for p in path {
        println!("{:?}", p);
    }
}
