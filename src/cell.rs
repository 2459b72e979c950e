use std::ops::Add;

/// Integer coordinate on the logical grid. Origin is the middle of the field,
/// +y points up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub const ORIGIN: Cell = Cell::new(0, 0);

    /// The neighbouring cell one step in `dir`; `Direction::None` stays put.
    pub fn moved(self, dir: Direction) -> Cell {
        self + CellDelta::from(dir)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellDelta {
    pub x: i32,
    pub y: i32,
}

impl Add<CellDelta> for Cell {
    type Output = Cell;

    fn add(self, delta: CellDelta) -> Cell {
        Cell {
            x: self.x + delta.x,
            y: self.y + delta.y,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    None,
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::None => Direction::None,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Direction::None
    }

    /// True when turning from `self` to `other` would send the head straight
    /// back the way it came.
    pub fn is_reversal_of(&self, other: Direction) -> bool {
        !self.is_none() && self.opposite() == other
    }
}

impl From<Direction> for CellDelta {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::None => CellDelta { x: 0, y: 0 },
            Direction::Left => CellDelta { x: -1, y: 0 },
            Direction::Right => CellDelta { x: 1, y: 0 },
            Direction::Up => CellDelta { x: 0, y: 1 },
            Direction::Down => CellDelta { x: 0, y: -1 },
        }
    }
}
