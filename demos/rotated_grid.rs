use core::fmt;
use glam::Vec3;
use grid_util::point::Point;
use spatial_grid::{CellPlacement, GridOccupant, GridPathfinder, GridSettings, SpatialGrid};

// A 6x4 floor grid lying in the XZ plane. A world position (think mouse ray hit) is resolved
// to a cell, a path is searched to it and the world positions along the path are printed.
// Moving the grid afterwards relocates every tile.

struct Tile {
    x: i32,
    y: i32,
    occupied: bool,
    world: Vec3,
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl GridOccupant for Tile {
    fn relocate(&mut self, placement: &CellPlacement) {
        self.world = placement.position;
    }
}

const SETTINGS: &str = r#"{
    "width": 6,
    "height": 4,
    "tile_size_x": 2.0,
    "tile_size_y": 2.0,
    "rotation": [90.0, 0.0, 0.0],
    "debug": true
}"#;

fn main() {
    env_logger::init();
    let settings = GridSettings::from_json(SETTINGS).unwrap();
    let mut grid = SpatialGrid::from_settings(&settings, |t, x, y| Tile {
        x,
        y,
        occupied: x == 2 && y < 3,
        world: t.grid_to_world(x, y).0,
    })
    .unwrap();

    let target = Vec3::new(9.7, 0.3, 4.1);
    let (gx, gy) = grid.world_to_grid(target);
    println!("{} lies over cell ({}, {})", target, gx, gy);

    let mut pathfinder = GridPathfinder::new();
    let is_free = |grid: &SpatialGrid<Tile>, x: i32, y: i32| {
        grid.get(x, y).map_or(false, |t| !t.occupied)
    };
    match pathfinder.find_path(&grid, Point::new(0, 0), Point::new(gx, gy), is_free) {
        Some(path) => {
            for tile in grid.occupants_along(&path) {
                println!("{} at {}", tile, tile.world);
            }
        }
        None => println!("No path to ({}, {})", gx, gy),
    }

    grid.set_position(Vec3::new(0.0, 1.0, 0.0));
    for label in grid.debug_labels().iter().take(4) {
        println!("label {} at {}", label.text, label.position);
    }
}
