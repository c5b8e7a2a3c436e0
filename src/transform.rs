//! Pose of a grid in world space and the math mapping cells to world positions and back.
use glam::{EulerRot, Quat, Vec3};

use crate::error::{GridError, GridResult};

/// Position, rotation and tile size that embed a grid in world space.
///
/// Cell `(x, y)` sits at local offset `(x * tile_size_x, y * tile_size_y, 0)`, which is rotated
/// by [rotation](Self::rotation) and then translated by [position](Self::position). The grid
/// therefore lies in the plane whose normal is the rotated `+Z` axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridTransform {
    pub position: Vec3,
    /// Euler angles in degrees. Applied around Z first, then X, then Y.
    pub rotation: Vec3,
    pub tile_size_x: f32,
    pub tile_size_y: f32,
}

impl Default for GridTransform {
    fn default() -> GridTransform {
        GridTransform {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            tile_size_x: 1.0,
            tile_size_y: 1.0,
        }
    }
}

/// Converts Euler angles in degrees into a quaternion, rotating around Z, X and then Y.
pub fn euler_to_quat(euler_deg: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        euler_deg.y.to_radians(),
        euler_deg.x.to_radians(),
        euler_deg.z.to_radians(),
    )
}

pub(crate) fn validate_tile_size(x: f32, y: f32) -> GridResult<()> {
    if x.is_finite() && y.is_finite() && x > 0.0 && y > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidTileSize { x, y })
    }
}

impl GridTransform {
    pub fn new(position: Vec3, rotation: Vec3, tile_size_x: f32, tile_size_y: f32) -> Self {
        GridTransform {
            position,
            rotation,
            tile_size_x,
            tile_size_y,
        }
    }

    pub fn quat(&self) -> Quat {
        euler_to_quat(self.rotation)
    }

    /// Unit normal of the grid plane.
    pub fn plane_normal(&self) -> Vec3 {
        (self.quat() * Vec3::Z).normalize()
    }

    /// In-plane `(right, up)` basis; cell x grows along `right` and cell y along `up`.
    ///
    /// Derived from the full rotation rather than from the normal alone, so a normal pointing
    /// straight down needs no special handling.
    pub fn plane_basis(&self) -> (Vec3, Vec3) {
        let q = self.quat();
        ((q * Vec3::X).normalize(), (q * Vec3::Y).normalize())
    }

    /// Orthogonally projects a world position onto the grid plane.
    pub fn project_onto_plane(&self, world: Vec3) -> Vec3 {
        let normal = self.plane_normal();
        let relative = world - self.position;
        world - relative.dot(normal) * normal
    }

    /// World position of cell `(x, y)` together with the cell rotation.
    ///
    /// The rotation is always the grid's own rotation; cells are never tilted individually.
    pub fn grid_to_world(&self, x: i32, y: i32) -> (Vec3, Vec3) {
        let local = Vec3::new(x as f32 * self.tile_size_x, y as f32 * self.tile_size_y, 0.0);
        (self.quat() * local + self.position, self.rotation)
    }

    /// Coordinates of the plane point closest to `world`, measured from the grid origin along
    /// the right and up axes in world units.
    pub fn local_plane_coords(&self, world: Vec3) -> (f32, f32) {
        let projected = self.project_onto_plane(world) - self.position;
        let (right, up) = self.plane_basis();
        (projected.dot(right), projected.dot(up))
    }

    /// Cell whose centre is nearest to the projection of `world` onto the grid plane.
    /// The result may lie outside any concrete grid.
    pub fn world_to_grid(&self, world: Vec3) -> (i32, i32) {
        let (local_x, local_y) = self.local_plane_coords(world);
        let x = ((local_x + self.tile_size_x / 2.0) / self.tile_size_x).floor() as i32;
        let y = ((local_y + self.tile_size_y / 2.0) / self.tile_size_y).floor() as i32;
        (x, y)
    }
}
