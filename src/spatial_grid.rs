use core::fmt;

use glam::Vec3;
use grid_util::point::Point;
use log::{debug, info};

use crate::error::{GridError, GridResult};
use crate::settings::GridSettings;
use crate::transform::{validate_tile_size, GridTransform};

/// Builds the occupant for cell `(x, y)`. Called once per cell on construction and whenever a
/// slot is reset with [SpatialGrid::set].
pub type OccupantFactory<T> = Box<dyn FnMut(&GridTransform, i32, i32) -> T>;

/// Where a cell currently lives in world space, handed to [GridOccupant::relocate].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellPlacement {
    pub x: i32,
    pub y: i32,
    pub position: Vec3,
    pub rotation: Vec3,
}

/// Text shown at a cell when the debug overlay is enabled.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugLabel {
    pub text: String,
    pub position: Vec3,
}

/// Payload stored in a grid cell. The [fmt::Display] output is used as the debug overlay text.
pub trait GridOccupant: fmt::Display {
    /// Per-frame update hook driven by [SpatialGrid::update_all] and [SpatialGrid::update_area].
    fn update(&mut self) {}
    /// Called after the grid pose or tile size changed.
    fn relocate(&mut self, _placement: &CellPlacement) {}
}

/// A fixed-size rectangle of occupants embedded in world space by a [GridTransform].
///
/// Occupants are stored column-major (`x * height + y`), which is also the order the factory is
/// invoked in. Every in-bounds cell always holds exactly one occupant.
pub struct SpatialGrid<T> {
    width: i32,
    height: i32,
    transform: GridTransform,
    occupants: Vec<T>,
    factory: OccupantFactory<T>,
    debug_labels: Option<Vec<DebugLabel>>,
}

impl<T: GridOccupant> SpatialGrid<T> {
    pub fn new<F>(width: i32, height: i32, transform: GridTransform, factory: F) -> GridResult<Self>
    where
        F: FnMut(&GridTransform, i32, i32) -> T + 'static,
    {
        let cell_count = match width.checked_mul(height) {
            Some(n) if width > 0 && height > 0 => n as usize,
            _ => return Err(GridError::InvalidDimensions { width, height }),
        };
        validate_tile_size(transform.tile_size_x, transform.tile_size_y)?;
        let mut factory: OccupantFactory<T> = Box::new(factory);
        let mut occupants = Vec::with_capacity(cell_count);
        for x in 0..width {
            for y in 0..height {
                occupants.push(factory(&transform, x, y));
            }
        }
        info!(
            "Created {}x{} grid at {} with tile size ({}, {})",
            width, height, transform.position, transform.tile_size_x, transform.tile_size_y
        );
        Ok(SpatialGrid {
            width,
            height,
            transform,
            occupants,
            factory,
            debug_labels: None,
        })
    }

    pub fn from_settings<F>(settings: &GridSettings, factory: F) -> GridResult<Self>
    where
        F: FnMut(&GridTransform, i32, i32) -> T + 'static,
    {
        let grid = SpatialGrid::new(
            settings.width,
            settings.height,
            settings.transform(),
            factory,
        )?;
        Ok(grid.with_debug(settings.debug))
    }

    /// Enables or disables the debug overlay labels.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.set_debug(debug);
        self
    }

    pub fn set_debug(&mut self, debug: bool) {
        if debug {
            self.refresh_debug_labels();
        } else {
            self.debug_labels = None;
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }
    pub fn height(&self) -> i32 {
        self.height
    }
    pub fn len(&self) -> usize {
        self.occupants.len()
    }
    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }
    pub fn transform(&self) -> &GridTransform {
        &self.transform
    }
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }
    pub fn rotation(&self) -> Vec3 {
        self.transform.rotation
    }
    pub fn tile_size(&self) -> (f32, f32) {
        (self.transform.tile_size_x, self.transform.tile_size_y)
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.position = position;
        self.relocate_all();
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.transform.rotation = rotation;
        self.relocate_all();
    }

    /// Changes the tile size. Non-positive sizes are rejected and leave the grid untouched.
    pub fn set_tile_size(&mut self, tile_size_x: f32, tile_size_y: f32) -> GridResult<()> {
        validate_tile_size(tile_size_x, tile_size_y)?;
        self.transform.tile_size_x = tile_size_x;
        self.transform.tile_size_y = tile_size_y;
        self.relocate_all();
        Ok(())
    }

    pub fn set_tile_size_uniform(&mut self, tile_size: f32) -> GridResult<()> {
        self.set_tile_size(tile_size, tile_size)
    }

    pub fn grid_to_world(&self, x: i32, y: i32) -> (Vec3, Vec3) {
        self.transform.grid_to_world(x, y)
    }

    pub fn world_to_grid(&self, world: Vec3) -> (i32, i32) {
        self.transform.world_to_grid(world)
    }

    /// Moves a world position to the centre of the cell it falls in.
    pub fn snap_world_position(&self, world: Vec3) -> Vec3 {
        let (x, y) = self.world_to_grid(world);
        self.grid_to_world(x, y).0
    }

    pub fn is_inside(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    pub fn is_inside_world(&self, world: Vec3) -> bool {
        let (x, y) = self.world_to_grid(world);
        self.is_inside(x, y)
    }

    /// Flat storage index of `(x, y)`, or [None] outside the grid.
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if self.is_inside(x, y) {
            Some((x * self.height + y) as usize)
        } else {
            None
        }
    }

    pub fn coords_of(&self, index: usize) -> Point {
        let index = index as i32;
        Point::new(index / self.height, index % self.height)
    }

    pub fn get(&self, x: i32, y: i32) -> Option<&T> {
        self.index_of(x, y).map(|ix| &self.occupants[ix])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut T> {
        let ix = self.index_of(x, y)?;
        Some(&mut self.occupants[ix])
    }

    pub fn get_at_world(&self, world: Vec3) -> Option<&T> {
        let (x, y) = self.world_to_grid(world);
        self.get(x, y)
    }

    /// Replaces the occupant at `(x, y)`. Passing [None] rebuilds the slot with the factory.
    /// Returns the stored occupant, or [None] if `(x, y)` is outside the grid.
    pub fn set(&mut self, x: i32, y: i32, occupant: Option<T>) -> Option<&T> {
        let ix = self.index_of(x, y)?;
        let occupant = match occupant {
            Some(occupant) => occupant,
            None => (self.factory)(&self.transform, x, y),
        };
        self.occupants[ix] = occupant;
        if self.debug_labels.is_some() {
            self.refresh_debug_label(ix);
        }
        Some(&self.occupants[ix])
    }

    pub fn set_at_world(&mut self, world: Vec3, occupant: Option<T>) -> Option<&T> {
        let (x, y) = self.world_to_grid(world);
        self.set(x, y, occupant)
    }

    /// Resolves a path of cells into the occupants along it, skipping cells outside the grid.
    pub fn occupants_along(&self, path: &[Point]) -> Vec<&T> {
        path.iter().filter_map(|p| self.get(p.x, p.y)).collect()
    }

    pub fn for_each_occupant<F>(&self, mut f: F)
    where
        F: FnMut(i32, i32, &T),
    {
        for (ix, occupant) in self.occupants.iter().enumerate() {
            let p = self.coords_of(ix);
            f(p.x, p.y, occupant);
        }
    }

    pub fn for_each_occupant_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(i32, i32, &mut T),
    {
        let height = self.height;
        for (ix, occupant) in self.occupants.iter_mut().enumerate() {
            let ix = ix as i32;
            f(ix / height, ix % height, occupant);
        }
    }

    /// Tells every occupant its current world placement and refreshes the debug overlay.
    pub fn relocate_all(&mut self) {
        let transform = self.transform;
        self.for_each_occupant_mut(|x, y, occupant| {
            let (position, rotation) = transform.grid_to_world(x, y);
            occupant.relocate(&CellPlacement {
                x,
                y,
                position,
                rotation,
            });
        });
        if self.debug_labels.is_some() {
            self.refresh_debug_labels();
        }
    }

    pub fn update_all(&mut self) {
        self.occupants.iter_mut().for_each(|o| o.update());
    }

    /// Updates the occupants in a window centred on `(center_x, center_y)`. Even sizes are
    /// grown to the next odd size so the window stays centred; the window is clipped to the grid.
    pub fn update_area(&mut self, center_x: i32, center_y: i32, width: i32, height: i32) {
        let half_w = width.max(1) / 2;
        let half_h = height.max(1) / 2;
        let x_range = (center_x - half_w).max(0)..=(center_x + half_w).min(self.width - 1);
        for x in x_range {
            let y_range = (center_y - half_h).max(0)..=(center_y + half_h).min(self.height - 1);
            for y in y_range {
                let ix = (x * self.height + y) as usize;
                self.occupants[ix].update();
            }
        }
    }

    /// Overlay labels, empty unless debug mode is on.
    pub fn debug_labels(&self) -> &[DebugLabel] {
        self.debug_labels.as_deref().unwrap_or(&[])
    }

    fn refresh_debug_labels(&mut self) {
        let labels = self
            .occupants
            .iter()
            .enumerate()
            .map(|(ix, occupant)| {
                let p = self.coords_of(ix);
                DebugLabel {
                    text: occupant.to_string(),
                    position: self.transform.grid_to_world(p.x, p.y).0,
                }
            })
            .collect::<Vec<_>>();
        self.debug_labels = Some(labels);
    }

    fn refresh_debug_label(&mut self, ix: usize) {
        let p = self.coords_of(ix);
        let label = DebugLabel {
            text: self.occupants[ix].to_string(),
            position: self.transform.grid_to_world(p.x, p.y).0,
        };
        if let Some(labels) = self.debug_labels.as_mut() {
            labels[ix] = label;
        }
    }

    /// Logs the rows `start_y..end_y` restricted to columns `start_x..end_x` at debug level.
    pub fn log_region(&self, start_x: i32, start_y: i32, end_x: i32, end_y: i32) {
        for y in start_y.max(0)..end_y.min(self.height) {
            let row = (start_x.max(0)..end_x.min(self.width))
                .filter_map(|x| self.get(x, y))
                .map(|o| o.to_string())
                .collect::<Vec<_>>()
                .join(" | ");
            debug!("| {} |", row);
        }
    }
}

impl<T> fmt::Debug for SpatialGrid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialGrid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("transform", &self.transform)
            .field("debug", &self.debug_labels.is_some())
            .finish()
    }
}

impl<T: GridOccupant> fmt::Display for SpatialGrid<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in (0..self.height).rev() {
            let values = (0..self.width)
                .filter_map(|x| self.get(x, y))
                .map(|o| o.to_string())
                .collect::<Vec<String>>();
            writeln!(f, "{:?}", values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Marker {
        x: i32,
        y: i32,
        tag: u32,
        updates: u32,
        placed_at: Option<Vec3>,
    }

    impl Marker {
        fn new(x: i32, y: i32, tag: u32) -> Self {
            Marker {
                x,
                y,
                tag,
                updates: 0,
                placed_at: None,
            }
        }
    }

    impl fmt::Display for Marker {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "({},{})", self.x, self.y)
        }
    }

    impl GridOccupant for Marker {
        fn update(&mut self) {
            self.updates += 1;
        }
        fn relocate(&mut self, placement: &CellPlacement) {
            self.placed_at = Some(placement.position);
        }
    }

    fn marker_grid(width: i32, height: i32) -> SpatialGrid<Marker> {
        SpatialGrid::new(width, height, GridTransform::default(), |_, x, y| {
            Marker::new(x, y, 0)
        })
        .unwrap()
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        for (w, h) in [(0, 3), (3, 0), (-1, 4)] {
            let result = SpatialGrid::new(w, h, GridTransform::default(), |_, x, y| {
                Marker::new(x, y, 0)
            });
            assert!(matches!(result, Err(GridError::InvalidDimensions { .. })));
        }
    }

    #[test]
    fn rejects_cell_count_overflow() {
        let result = SpatialGrid::new(50_000, 50_000, GridTransform::default(), |_, x, y| {
            Marker::new(x, y, 0)
        });
        assert!(matches!(
            result,
            Err(GridError::InvalidDimensions {
                width: 50_000,
                height: 50_000
            })
        ));
    }

    #[test]
    fn rejects_zero_tile_size() {
        let transform = GridTransform::new(Vec3::ZERO, Vec3::ZERO, 0.0, 1.0);
        let result = SpatialGrid::new(2, 2, transform, |_, x, y| Marker::new(x, y, 0));
        assert!(matches!(result, Err(GridError::InvalidTileSize { .. })));
    }

    #[test]
    fn factory_visits_every_cell_column_major() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let recorded = calls.clone();
        let grid = SpatialGrid::new(3, 2, GridTransform::default(), move |_, x, y| {
            recorded.borrow_mut().push((x, y));
            Marker::new(x, y, 0)
        })
        .unwrap();
        assert_eq!(
            *calls.borrow(),
            vec![(0, 0), (0, 1), (1, 0), (1, 1), (2, 0), (2, 1)]
        );
        for x in 0..3 {
            for y in 0..2 {
                let m = grid.get(x, y).unwrap();
                assert_eq!((m.x, m.y), (x, y));
            }
        }
    }

    #[test]
    fn inside_matches_bounds() {
        let grid = marker_grid(4, 3);
        for x in -2..6 {
            for y in -2..5 {
                let expected = (0..4).contains(&x) && (0..3).contains(&y);
                assert_eq!(grid.is_inside(x, y), expected);
                assert_eq!(grid.get(x, y).is_some(), expected);
            }
        }
    }

    #[test]
    fn set_replaces_and_none_refills_from_factory() {
        let mut grid = marker_grid(2, 2);
        grid.set(1, 0, Some(Marker::new(1, 0, 7)));
        assert_eq!(grid.get(1, 0).unwrap().tag, 7);
        grid.set(1, 0, None);
        assert_eq!(grid.get(1, 0).unwrap().tag, 0);
        assert!(grid.set(5, 5, Some(Marker::new(5, 5, 1))).is_none());
    }

    #[test]
    fn pose_changes_relocate_every_occupant() {
        let mut grid = marker_grid(3, 3);
        let pos = Vec3::new(10.0, -4.0, 2.0);
        grid.set_position(pos);
        assert_eq!(grid.grid_to_world(0, 0).0, pos);
        grid.for_each_occupant(|x, y, m| {
            assert_eq!(m.placed_at, Some(grid.grid_to_world(x, y).0));
        });
        grid.set_tile_size(2.0, 3.0).unwrap();
        assert_eq!(grid.get(1, 1).unwrap().placed_at, Some(pos + Vec3::new(2.0, 3.0, 0.0)));
        assert!(grid.set_tile_size(-1.0, 1.0).is_err());
        assert_eq!(grid.tile_size(), (2.0, 3.0));
    }

    #[test]
    fn update_area_is_centred_and_clipped() {
        let mut grid = marker_grid(5, 5);
        grid.update_area(0, 0, 2, 2);
        let mut updated = Vec::new();
        grid.for_each_occupant(|x, y, m| {
            if m.updates > 0 {
                updated.push((x, y));
            }
        });
        assert_eq!(updated, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        grid.update_all();
        assert_eq!(grid.get(4, 4).unwrap().updates, 1);
        assert_eq!(grid.get(0, 0).unwrap().updates, 2);
    }

    #[test]
    fn debug_labels_follow_pose_and_replacements() {
        let mut grid = marker_grid(2, 2);
        assert!(grid.debug_labels().is_empty());
        grid.set_debug(true);
        assert_eq!(grid.debug_labels().len(), 4);
        grid.set_position(Vec3::new(0.0, 0.0, 1.0));
        let ix = grid.index_of(1, 1).unwrap();
        assert_eq!(grid.debug_labels()[ix].position, Vec3::new(1.0, 1.0, 1.0));
        grid.set(1, 1, Some(Marker::new(9, 9, 0)));
        assert_eq!(grid.debug_labels()[ix].text, "(9,9)");
    }

    #[test]
    fn display_prints_top_row_first() {
        let grid = marker_grid(2, 2);
        let shown = grid.to_string();
        let first = shown.lines().next().unwrap();
        assert!(first.contains("(0,1)") && first.contains("(1,1)"));
    }
}
