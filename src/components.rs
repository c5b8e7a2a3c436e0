use grid_util::grid::{BoolGrid, Grid};
use grid_util::point::Point;
use petgraph::unionfind::UnionFind;

use crate::pathfinder::neumann_neighborhood;
use crate::spatial_grid::{GridOccupant, SpatialGrid};

/// Connected components of the traversable cells of a grid under 4-connected movement.
///
/// Built once for a given predicate, it answers whether [GridPathfinder::find_path](crate::GridPathfinder::find_path)
/// would find a path without flood-filling the grid. It is a snapshot: rebuild it after the
/// occupants or the predicate change.
#[derive(Clone, Debug)]
pub struct ComponentMap {
    traversable: BoolGrid,
    components: UnionFind<usize>,
}

impl ComponentMap {
    /// Generates a new [UnionFind] structure and links up traversable grid neighbours.
    pub fn new<T, P>(grid: &SpatialGrid<T>, mut is_traversable: P) -> ComponentMap
    where
        T: GridOccupant,
        P: FnMut(&SpatialGrid<T>, i32, i32) -> bool,
    {
        let (width, height) = (grid.width() as usize, grid.height() as usize);
        let mut traversable = BoolGrid::new(width, height, false);
        grid.for_each_occupant(|x, y, _| {
            traversable.set(x as usize, y as usize, is_traversable(grid, x, y));
        });
        let mut components = UnionFind::new(grid.len());
        for x in 0..grid.width() {
            for y in 0..grid.height() {
                let p = Point::new(x, y);
                if !traversable.get_point(p) {
                    continue;
                }
                // Linking right and up covers every 4-adjacent pair once.
                for n in [Point::new(x + 1, y), Point::new(x, y + 1)] {
                    if traversable.point_in_bounds(n) && traversable.get_point(n) {
                        let (p_ix, n_ix) = (traversable.get_ix_point(&p), traversable.get_ix_point(&n));
                        components.union(p_ix, n_ix);
                    }
                }
            }
        }
        ComponentMap {
            traversable,
            components,
        }
    }

    /// Component id of a traversable cell, [None] for blocked or out-of-grid cells.
    pub fn component_of(&self, p: &Point) -> Option<usize> {
        if !self.traversable.point_in_bounds(*p) || !self.traversable.get_point(*p) {
            return None;
        }
        Some(self.components.find(self.traversable.get_ix_point(p)))
    }

    /// Checks whether a 4-connected path leads from `start` to `goal`. Like the pathfinder,
    /// this never requires the start cell itself to be traversable.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        if !self.traversable.point_in_bounds(*start) {
            return false;
        }
        if start == goal {
            return true;
        }
        let goal_component = match self.component_of(goal) {
            Some(c) => c,
            None => return false,
        };
        neumann_neighborhood(start)
            .iter()
            .any(|n| self.component_of(n) == Some(goal_component))
    }

    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        !self.reachable(start, goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::GridTransform;
    use core::fmt;

    struct Cell(bool);

    impl fmt::Display for Cell {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "{}", self.0 as i32)
        }
    }

    impl GridOccupant for Cell {}

    fn grid_from_rows(rows: &[&str]) -> SpatialGrid<Cell> {
        let height = rows.len() as i32;
        let width = rows[0].len() as i32;
        let cells: Vec<Vec<bool>> = rows
            .iter()
            .rev()
            .map(|r| r.chars().map(|c| c == '#').collect())
            .collect();
        SpatialGrid::new(width, height, GridTransform::default(), move |_, x, y| {
            Cell(cells[y as usize][x as usize])
        })
        .unwrap()
    }

    fn open(grid: &SpatialGrid<Cell>, x: i32, y: i32) -> bool {
        grid.get(x, y).map_or(false, |c| !c.0)
    }

    /// Tests whether points are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        let grid = grid_from_rows(&[".#.", ".#."]);
        let map = ComponentMap::new(&grid, open);
        let left = map.component_of(&Point::new(0, 0));
        assert!(left.is_some());
        assert_eq!(left, map.component_of(&Point::new(0, 1)));
        assert_ne!(left, map.component_of(&Point::new(2, 0)));
        assert_eq!(map.component_of(&Point::new(1, 0)), None);
        assert_eq!(map.component_of(&Point::new(5, 0)), None);
    }

    /// Asserts that the two corners are connected on a 4-grid.
    #[test]
    fn reachable_around_obstacle() {
        let grid = grid_from_rows(&["...", ".#.", "..."]);
        let map = ComponentMap::new(&grid, open);
        assert!(map.reachable(&Point::new(0, 0), &Point::new(2, 2)));
    }

    #[test]
    fn diagonal_contact_is_not_connected() {
        //  ___
        // | #|
        // |# |
        let grid = grid_from_rows(&[".#", "#."]);
        let map = ComponentMap::new(&grid, open);
        assert!(map.unreachable(&Point::new(0, 1), &Point::new(1, 0)));
    }

    #[test]
    fn blocked_start_can_still_leave() {
        let grid = grid_from_rows(&["#.."]);
        let map = ComponentMap::new(&grid, open);
        assert!(map.reachable(&Point::new(0, 0), &Point::new(2, 0)));
        assert!(map.unreachable(&Point::new(2, 0), &Point::new(0, 0)));
        assert!(map.reachable(&Point::new(0, 0), &Point::new(0, 0)));
    }

    /// Grid wider than one word of the traversability bitset, split by a wall at x = 40.
    #[test]
    fn wide_grid_is_split_by_wall() {
        let row = |c: char| {
            (0..70)
                .map(|x| if x == 40 { c } else { '.' })
                .collect::<String>()
        };
        let walled = row('#');
        let grid = grid_from_rows(&[&walled, &walled, &walled]);
        let map = ComponentMap::new(&grid, open);
        assert!(map.unreachable(&Point::new(0, 0), &Point::new(69, 2)));
        assert_eq!(map.component_of(&Point::new(40, 1)), None);
        assert_eq!(
            map.component_of(&Point::new(0, 2)),
            map.component_of(&Point::new(39, 0))
        );
        assert_eq!(map.component_of(&Point::new(70, 0)), None);
        assert_eq!(map.component_of(&Point::new(0, 3)), None);

        let open_gap = grid_from_rows(&[&walled, &row('.'), &walled]);
        let map = ComponentMap::new(&open_gap, open);
        assert!(map.reachable(&Point::new(0, 0), &Point::new(69, 2)));
    }
}
