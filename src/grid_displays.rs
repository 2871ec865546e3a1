use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::coordinates::WallCoordinate;
use crate::grid::MazeGrid;
use crate::grid_traits::GridObserver;

const WALL_BLOCK: char = '█';
const OPEN_BLOCK: char = ' ';

/// One wall grid cell per character, `█` for a standing wall.
///
/// Rows are printed from the highest `y` downwards so that `Direction::Up` points up the screen.
impl fmt::Display for MazeGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut output = String::with_capacity((self.wall_grid_width() * 3 + 1) * self.wall_grid_height());
        for y in (0..self.wall_grid_height()).rev() {
            for x in 0..self.wall_grid_width() {
                let present = self.is_wall_present(WallCoordinate::new(x as u32, y as u32));
                output.push(if present { WALL_BLOCK } else { OPEN_BLOCK });
            }
            output.push('\n');
        }
        write!(f, "{}", output)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridEvent {
    CellCreated(WallCoordinate, bool),
    WallCleared(WallCoordinate),
}

/// Keeps every event a grid emits.
///
/// Clones share the same event log, so one clone can be handed to the grid and another kept to
/// inspect what happened.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    events: Rc<RefCell<Vec<GridEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> RecordingObserver {
        RecordingObserver::default()
    }

    pub fn events(&self) -> Vec<GridEvent> {
        self.events.borrow().clone()
    }

    /// The cleared walls in the order they were carved.
    pub fn cleared_walls(&self) -> Vec<WallCoordinate> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match *event {
                GridEvent::WallCleared(coord) => Some(coord),
                GridEvent::CellCreated(..) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl GridObserver for RecordingObserver {
    fn cell_created(&mut self, coord: WallCoordinate, is_wall: bool) {
        self.events.borrow_mut().push(GridEvent::CellCreated(coord, is_wall));
    }

    fn wall_cleared(&mut self, coord: WallCoordinate) {
        self.events.borrow_mut().push(GridEvent::WallCleared(coord));
    }
}
