#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct Width(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub struct Height(pub usize);

/// Number of maze cells in a maze, `width * height`.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct CellsCount(pub usize);

/// Number of passages carved between maze cells.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct PassagesCount(pub usize);
