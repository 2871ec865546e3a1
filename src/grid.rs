use bit_set::BitSet;
use log::trace;
use smallvec::SmallVec;
use std::error::Error;
use std::fmt;

use crate::coordinates::{Direction, MazeCoordinate, WallCoordinate};
use crate::grid_traits::GridObserver;
use crate::units::{CellsCount, Height, PassagesCount, Width};

pub type CoordinateSmallVec = SmallVec<[MazeCoordinate; 4]>;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridError {
    /// A maze needs at least one cell in each direction and must fit u32 wall grid coordinates.
    InvalidDimensions,
    /// A maze coordinate outside of `[0, width) x [0, height)`.
    OutOfRange,
    /// Walls can only be removed between cells that share a side.
    NotAdjacent,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match *self {
            GridError::InvalidDimensions => "maze dimensions must be positive",
            GridError::OutOfRange => "maze coordinate is outside of the grid",
            GridError::NotAdjacent => "maze cells are not adjacent",
        };
        f.write_str(msg)
    }
}

impl Error for GridError {}

/// What one cell of the wall grid currently holds.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
enum WallCell {
    /// Odd, odd cells. Never a wall, so there is no occupancy to track.
    Path,
    Present,
    Cleared,
}

/// The logical maze: a wall grid of `(2w+1) * (2h+1)` blocks and the visited flag of each maze cell.
pub struct MazeGrid {
    width: Width,
    height: Height,
    cells: Vec<WallCell>, // row major over the wall grid
    visited: BitSet,
    observer: Option<Box<dyn GridObserver>>,
}

impl fmt::Debug for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "MazeGrid :: width: {:?}, height: {:?}, visited: {}, cleared walls: {}",
               self.width,
               self.height,
               self.visited_count(),
               self.passages_count().0)
    }
}

impl MazeGrid {
    pub fn new(width: Width, height: Height) -> Result<MazeGrid, GridError> {
        MazeGrid::build(width, height, None)
    }

    /// Create the grid reporting every wall grid cell to the observer as it is laid out.
    pub fn with_observer(width: Width,
                         height: Height,
                         observer: Box<dyn GridObserver>)
                         -> Result<MazeGrid, GridError> {
        MazeGrid::build(width, height, Some(observer))
    }

    fn build(width: Width,
             height: Height,
             mut observer: Option<Box<dyn GridObserver>>)
             -> Result<MazeGrid, GridError> {

        // The wall grid coordinates (2n + 1) have to fit a u32.
        let max_cells = ((u32::max_value() - 1) / 2) as usize;
        if width.0 == 0 || height.0 == 0 || width.0 > max_cells || height.0 > max_cells {
            return Err(GridError::InvalidDimensions);
        }

        let (wall_width, wall_height) = (2 * width.0 + 1, 2 * height.0 + 1);
        let mut cells = Vec::with_capacity(wall_width * wall_height);
        for y in 0..wall_height {
            for x in 0..wall_width {
                let coord = WallCoordinate::new(x as u32, y as u32);
                let is_wall = coord.is_wall_cell();
                cells.push(if is_wall { WallCell::Present } else { WallCell::Path });

                if let Some(obs) = observer.as_mut() {
                    obs.cell_created(coord, is_wall);
                }
            }
        }

        Ok(MazeGrid {
            width,
            height,
            cells,
            visited: BitSet::with_capacity(width.0 * height.0),
            observer,
        })
    }

    #[inline]
    pub fn set_observer(&mut self, observer: Option<Box<dyn GridObserver>>) {
        self.observer = observer;
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn wall_grid_width(&self) -> usize {
        2 * self.width.0 + 1
    }

    #[inline]
    pub fn wall_grid_height(&self) -> usize {
        2 * self.height.0 + 1
    }

    /// Number of maze cells.
    #[inline]
    pub fn cells_count(&self) -> CellsCount {
        CellsCount(self.width.0 * self.height.0)
    }

    /// Number of walls carved away between maze cells.
    pub fn passages_count(&self) -> PassagesCount {
        PassagesCount(self.cells.iter().filter(|&&cell| cell == WallCell::Cleared).count())
    }

    /// Is the coordinate within `[0, width) x [0, height)`?
    #[inline]
    pub fn is_valid_coordinate(&self, coord: MazeCoordinate) -> bool {
        (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0
    }

    /// Convert a maze coordinate to a one dimensional row major index in the range 0..cells_count.
    /// Returns None if the coordinate is invalid.
    #[inline]
    pub fn coordinate_to_index(&self, coord: MazeCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width.0 + coord.x as usize)
        } else {
            None
        }
    }

    pub fn index_to_coordinate(&self, index: usize) -> Option<MazeCoordinate> {
        if index < self.cells_count().0 {
            Some(MazeCoordinate::new((index % self.width.0) as u32, (index / self.width.0) as u32))
        } else {
            None
        }
    }

    /// All maze cells, row by row.
    pub fn iter(&self) -> impl Iterator<Item = MazeCoordinate> {
        let (w, h) = (self.width.0 as u32, self.height.0 as u32);
        (0..h).flat_map(move |y| (0..w).map(move |x| MazeCoordinate::new(x, y)))
    }

    pub fn is_visited(&self, coord: MazeCoordinate) -> Result<bool, GridError> {
        let index = self.coordinate_to_index(coord).ok_or(GridError::OutOfRange)?;
        Ok(self.visited.contains(index))
    }

    pub fn mark_visited(&mut self, coord: MazeCoordinate) -> Result<(), GridError> {
        let index = self.coordinate_to_index(coord).ok_or(GridError::OutOfRange)?;
        let _ = self.visited.insert(index);
        Ok(())
    }

    /// Forget every visit. Carved walls are left as they are.
    pub fn reset_visited(&mut self) {
        self.visited.clear();
    }

    #[inline]
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn is_fully_visited(&self) -> bool {
        self.visited_count() == self.cells_count().0
    }

    /// Neighbours sharing a side with `coord` that have not been visited yet.
    ///
    /// Always reported in the order left, right, down, up. Down is towards `y == 0`.
    pub fn unvisited_neighbours(&self, coord: MazeCoordinate) -> Result<CoordinateSmallVec, GridError> {
        if !self.is_valid_coordinate(coord) {
            return Err(GridError::OutOfRange);
        }

        let neighbours = Direction::ALL
            .iter()
            .filter_map(|&dir| coord.offset(dir))
            .filter(|&neighbour| {
                self.coordinate_to_index(neighbour)
                    .map_or(false, |index| !self.visited.contains(index))
            })
            .collect();
        Ok(neighbours)
    }

    /// Carve the wall between two adjacent maze cells.
    ///
    /// Returns true if a wall was removed, false if it was already gone.
    pub fn remove_wall_between(&mut self, a: MazeCoordinate, b: MazeCoordinate) -> Result<bool, GridError> {
        if !self.is_valid_coordinate(a) || !self.is_valid_coordinate(b) {
            return Err(GridError::OutOfRange);
        }
        let wall = a.wall_between(b).ok_or(GridError::NotAdjacent)?;
        let index = self.wall_index(wall).ok_or(GridError::OutOfRange)?;

        if self.cells[index] != WallCell::Present {
            return Ok(false);
        }
        self.cells[index] = WallCell::Cleared;
        trace!("cleared wall {} between {} and {}", wall, a, b);

        if let Some(obs) = self.observer.as_mut() {
            obs.wall_cleared(wall);
        }
        Ok(true)
    }

    /// Is there a block at this wall grid position?
    ///
    /// Path cells and positions outside the wall grid never hold a wall.
    pub fn is_wall_present(&self, coord: WallCoordinate) -> bool {
        self.wall_index(coord)
            .map_or(false, |index| self.cells[index] == WallCell::Present)
    }

    /// Are two maze cells joined by a carved passage?
    pub fn is_passage_between(&self, a: MazeCoordinate, b: MazeCoordinate) -> bool {
        if !self.is_valid_coordinate(a) || !self.is_valid_coordinate(b) {
            return false;
        }
        a.wall_between(b)
            .and_then(|wall| self.wall_index(wall))
            .map_or(false, |index| self.cells[index] == WallCell::Cleared)
    }

    /// Wall grid positions whose wall has been carved away, in row major order.
    pub fn cleared_walls<'a>(&'a self) -> impl Iterator<Item = WallCoordinate> + 'a {
        let wall_width = self.wall_grid_width();
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == WallCell::Cleared)
            .map(move |(index, _)| WallCoordinate::new((index % wall_width) as u32, (index / wall_width) as u32))
    }

    #[inline]
    fn wall_index(&self, coord: WallCoordinate) -> Option<usize> {
        let (x, y) = (coord.x as usize, coord.y as usize);
        if x < self.wall_grid_width() && y < self.wall_grid_height() {
            Some(y * self.wall_grid_width() + x)
        } else {
            None
        }
    }
}
