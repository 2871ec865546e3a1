use std::convert::From;
use std::fmt;

/// A cell of the maze proper, the walkable unit the generator visits.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct MazeCoordinate {
    pub x: u32,
    pub y: u32,
}

/// A cell of the larger `(2w+1) * (2h+1)` wall grid.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct WallCoordinate {
    pub x: u32,
    pub y: u32,
}

/// The four axis directions a maze cell can have neighbours in.
///
/// `Down` decreases `y` and `Up` increases it.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Direction {
    Left,
    Right,
    Down,
    Up,
}

impl Direction {
    /// The fixed order neighbours are reported in.
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Right, Direction::Down, Direction::Up];
}

impl MazeCoordinate {
    pub fn new(x: u32, y: u32) -> MazeCoordinate {
        MazeCoordinate { x, y }
    }

    /// The path cell in the wall grid that this maze cell maps to.
    #[inline]
    pub fn as_wall_coordinate(&self) -> WallCoordinate {
        WallCoordinate::new(2 * self.x + 1, 2 * self.y + 1)
    }

    /// Creates a new coordinate offset 1 cell away in the given direction.
    /// Returns None if the coordinate is not representable.
    ///
    /// There is no knowledge of the grid bounds here, the far side must be checked by the caller.
    pub fn offset(&self, direction: Direction) -> Option<MazeCoordinate> {
        let (x, y) = (self.x, self.y);
        match direction {
            Direction::Left => x.checked_sub(1).map(|x| MazeCoordinate::new(x, y)),
            Direction::Right => x.checked_add(1).map(|x| MazeCoordinate::new(x, y)),
            Direction::Down => y.checked_sub(1).map(|y| MazeCoordinate::new(x, y)),
            Direction::Up => y.checked_add(1).map(|y| MazeCoordinate::new(x, y)),
        }
    }

    /// Do the two cells differ by exactly 1 along exactly one axis?
    pub fn is_adjacent(&self, other: MazeCoordinate) -> bool {
        let dx = (i64::from(self.x) - i64::from(other.x)).abs();
        let dy = (i64::from(self.y) - i64::from(other.y)).abs();
        dx + dy == 1
    }

    /// The wall grid cell that separates two adjacent maze cells.
    pub fn wall_between(&self, other: MazeCoordinate) -> Option<WallCoordinate> {
        if !self.is_adjacent(other) {
            return None;
        }
        let x = self.x.checked_add(other.x)?.checked_add(1)?;
        let y = self.y.checked_add(other.y)?.checked_add(1)?;
        Some(WallCoordinate::new(x, y))
    }
}

impl WallCoordinate {
    pub fn new(x: u32, y: u32) -> WallCoordinate {
        WallCoordinate { x, y }
    }

    /// Path cells sit at odd, odd positions. Everything else is a wall cell.
    #[inline]
    pub fn is_path_cell(&self) -> bool {
        self.x % 2 == 1 && self.y % 2 == 1
    }

    #[inline]
    pub fn is_wall_cell(&self) -> bool {
        !self.is_path_cell()
    }

    pub fn as_maze_coordinate(&self) -> Option<MazeCoordinate> {
        if self.is_path_cell() {
            Some(MazeCoordinate::new(self.x / 2, self.y / 2))
        } else {
            None
        }
    }

    /// The two maze cells a wall cell separates, if it sits between two path cells.
    ///
    /// Border walls still report their cells, some of which may lie outside the maze.
    /// Corner walls (even, even) separate nothing.
    pub fn separated_cells(&self) -> Option<(MazeCoordinate, MazeCoordinate)> {
        let (x, y) = (self.x, self.y);
        match (x % 2, y % 2) {
            (0, 1) if x > 0 => Some((MazeCoordinate::new(x / 2 - 1, y / 2), MazeCoordinate::new(x / 2, y / 2))),
            (1, 0) if y > 0 => Some((MazeCoordinate::new(x / 2, y / 2 - 1), MazeCoordinate::new(x / 2, y / 2))),
            _ => None,
        }
    }
}

impl From<(u32, u32)> for MazeCoordinate {
    fn from(x_y_pair: (u32, u32)) -> MazeCoordinate {
        MazeCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

impl From<(u32, u32)> for WallCoordinate {
    fn from(x_y_pair: (u32, u32)) -> WallCoordinate {
        WallCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

impl fmt::Display for MazeCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for WallCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}
