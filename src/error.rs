/// Errors raised while building or reconfiguring a [SpatialGrid](crate::SpatialGrid).
///
/// Lookups outside the grid are not errors; they return [None].
#[derive(thiserror::Error, Debug)]
pub enum GridError {
    /// Width or height was zero or negative, or the cell count does not fit in an `i32`.
    #[error("invalid grid dimensions {width}x{height}: both must be positive with at most i32::MAX cells")]
    InvalidDimensions { width: i32, height: i32 },

    /// A tile size was zero, negative or not finite.
    #[error("tile size must be positive and finite, got ({x}, {y})")]
    InvalidTileSize { x: f32, y: f32 },

    /// Grid settings could not be parsed.
    #[error("invalid grid settings: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type GridResult<T> = Result<T, GridError>;
