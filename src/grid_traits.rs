use crate::coordinates::WallCoordinate;

/// Receives the occupancy events of a `MazeGrid`, e.g. a renderer spawning and despawning blocks.
///
/// The grid never hands out mutable access to its state, observers only ever see coordinates.
pub trait GridObserver {
    /// Called once per wall grid cell when the grid is created.
    /// `is_wall` is false for path cells, which never hold a block.
    fn cell_created(&mut self, _coord: WallCoordinate, _is_wall: bool) {}

    /// Called when a wall cell between two maze cells is carved away.
    fn wall_cleared(&mut self, _coord: WallCoordinate) {}
}
