//! # spatial_grid
//!
//! A fixed-size 2D grid of occupants that is embedded in world space by a position, an Euler
//! rotation and a per-axis tile size, together with an
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) pathfinder over its cells.
//!
//! The grid converts between cell coordinates and world positions in both directions, so a
//! world position (a mouse ray hit, an agent position) can be resolved to the occupant beneath
//! it. The pathfinder moves between 4-connected neighbours and asks a caller-supplied predicate
//! which cells may be entered; search state lives in the pathfinder, not in the occupants.
//!
//! ```
//! use core::fmt;
//! use grid_util::point::Point;
//! use spatial_grid::{GridOccupant, GridPathfinder, GridTransform, SpatialGrid};
//!
//! struct Tile {
//!     blocked: bool,
//! }
//! impl fmt::Display for Tile {
//!     fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
//!         write!(f, "{}", if self.blocked { '#' } else { '.' })
//!     }
//! }
//! impl GridOccupant for Tile {}
//!
//! let grid = SpatialGrid::new(3, 3, GridTransform::default(), |_, x, y| Tile {
//!     blocked: x == 1 && y == 1,
//! })
//! .unwrap();
//! let mut pathfinder = GridPathfinder::new();
//! let path = pathfinder
//!     .find_path(&grid, Point::new(0, 0), Point::new(2, 2), |grid, x, y| {
//!         grid.get(x, y).map_or(false, |t| !t.blocked)
//!     })
//!     .unwrap();
//! assert_eq!(path.len(), 5);
//! ```
pub mod components;
pub mod error;
pub mod pathfinder;
mod search_context;
pub mod settings;
pub mod spatial_grid;
pub mod transform;

pub use components::ComponentMap;
pub use error::{GridError, GridResult};
pub use pathfinder::{distance_cost, path_cost, GridPathfinder};
pub use settings::GridSettings;
pub use spatial_grid::{CellPlacement, DebugLabel, GridOccupant, OccupantFactory, SpatialGrid};
pub use transform::GridTransform;

/// Cost of a single axis-aligned step.
pub const STRAIGHT_COST: i32 = 10;

const N_SMALLVEC_SIZE: usize = 4;
