use grid_util::point::Point;
use itertools::Itertools;
use log::{debug, trace, warn};
use smallvec::{smallvec, SmallVec};

use crate::search_context::SearchContext;
use crate::spatial_grid::{GridOccupant, SpatialGrid};
use crate::{N_SMALLVEC_SIZE, STRAIGHT_COST};

/// Cost between two cells, used both as step cost and as heuristic:
/// `STRAIGHT_COST * ||dx| - |dy||`.
///
/// A unit step always costs [STRAIGHT_COST]. As an estimate it is zero for any goal on a
/// diagonal of the current cell, so it never overestimates a 4-connected route.
pub fn distance_cost(a: &Point, b: &Point) -> i32 {
    let delta_x = (a.x - b.x).abs();
    let delta_y = (a.y - b.y).abs();
    STRAIGHT_COST * (delta_x - delta_y).abs()
}

/// Sum of [distance_cost] over consecutive cells of a path.
pub fn path_cost(path: &[Point]) -> i32 {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| distance_cost(a, b))
        .sum()
}

/// Axis-aligned neighbours in expansion order: +x, -x, +y, -y.
pub fn neumann_neighborhood(p: &Point) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
    smallvec![
        Point::new(p.x + 1, p.y),
        Point::new(p.x - 1, p.y),
        Point::new(p.x, p.y + 1),
        Point::new(p.x, p.y - 1),
    ]
}

/// A* over the cells of a [SpatialGrid] with 4-connected movement.
///
/// The pathfinder owns the per-cell search state and reuses its allocations between calls.
/// Searches take `&mut self`, so one pathfinder never runs two searches at once; use one
/// pathfinder per thread if grids are searched in parallel.
#[derive(Debug, Default)]
pub struct GridPathfinder {
    context: SearchContext<i32>,
}

impl GridPathfinder {
    pub fn new() -> GridPathfinder {
        GridPathfinder {
            context: SearchContext::new(),
        }
    }

    /// Computes a least-cost path from `start` to `goal`, both inclusive.
    ///
    /// `is_traversable` decides which neighbouring cells may be entered and is called with
    /// coordinates that may lie outside the grid; it should return false for those. The start
    /// cell itself is never tested. Returns [None] if `start` or `goal` is outside the grid or
    /// the goal cannot be reached.
    pub fn find_path<T, P>(
        &mut self,
        grid: &SpatialGrid<T>,
        start: Point,
        goal: Point,
        mut is_traversable: P,
    ) -> Option<Vec<Point>>
    where
        T: GridOccupant,
        P: FnMut(&SpatialGrid<T>, i32, i32) -> bool,
    {
        let (start_ix, goal_ix) = match (
            grid.index_of(start.x, start.y),
            grid.index_of(goal.x, goal.y),
        ) {
            (Some(s), Some(g)) => (s, g),
            _ => {
                warn!("Path endpoints {} -> {} are not both inside the grid", start, goal);
                return None;
            }
        };
        let ct = &mut self.context;
        ct.reset(grid.len());
        ct.relax(start_ix, None, 0, distance_cost(&start, &goal));

        let mut expanded = 0usize;
        while let Some(current_ix) = ct.pop_lowest() {
            if current_ix == goal_ix {
                let path = ct
                    .reconstruct(goal_ix)
                    .into_iter()
                    .map(|ix| grid.coords_of(ix))
                    .collect::<Vec<Point>>();
                debug!(
                    "Found path {} -> {} of {} cells after expanding {} cells",
                    start,
                    goal,
                    path.len(),
                    expanded
                );
                return Some(path);
            }
            ct.close(current_ix);
            expanded += 1;
            let current = grid.coords_of(current_ix);
            trace!("Expanding {}", current);
            let current_g = ct.g[current_ix];

            for neighbour in neumann_neighborhood(&current) {
                if !is_traversable(grid, neighbour.x, neighbour.y) {
                    continue;
                }
                let n_ix = match grid.index_of(neighbour.x, neighbour.y) {
                    Some(ix) => ix,
                    None => {
                        trace!("Predicate accepted {} outside the grid", neighbour);
                        continue;
                    }
                };
                if ct.is_closed(n_ix) {
                    continue;
                }
                let tentative = current_g + distance_cost(&current, &neighbour);
                if tentative < ct.g[n_ix] {
                    ct.relax(
                        n_ix,
                        Some(current_ix),
                        tentative,
                        distance_cost(&neighbour, &goal),
                    );
                }
            }
        }
        debug!("No path {} -> {} after expanding {} cells", start, goal, expanded);
        None
    }
}
