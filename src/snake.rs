use std::collections::HashSet;

use crate::cell::{Cell, Direction};
use crate::deque::Deque;

/// Opaque handle for one body segment. The renderer keys its visuals on it;
/// the engine only ever moves the cell attached to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub id: SegmentId,
    pub cell: Cell,
}

/// What one call to [`SnakeState::tick`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickStep {
    pub previous_head: Cell,
    pub head: Cell,
    /// The former tail, now sitting right behind the head.
    pub relocated: Option<Segment>,
}

impl TickStep {
    pub fn moved(&self) -> bool {
        self.previous_head != self.head
    }
}

/// Head, body and heading of the snake.
///
/// The body is ordered from the segment nearest the head (front) to the
/// tail (back).
#[derive(Clone, Debug)]
pub struct SnakeState {
    head: Cell,
    body: Deque<Segment>,
    direction: Direction,
    pending_direction: Direction,
    next_segment_id: u32,
}

impl SnakeState {
    /// A length-one snake standing still at `head`.
    pub fn new(head: Cell) -> Self {
        SnakeState {
            head,
            body: Deque::new(),
            direction: Direction::None,
            pending_direction: Direction::None,
            next_segment_id: 0,
        }
    }

    /// Builds a snake from explicit cells, `body` ordered from the neck to the
    /// tail, already heading in `direction`.
    pub fn with_body(
        head: Cell,
        body: impl IntoIterator<Item = Cell>,
        direction: Direction,
    ) -> Self {
        let mut snake = SnakeState::new(head);
        for cell in body {
            snake.grow(cell);
        }
        snake.direction = direction;
        snake
    }

    pub fn head(&self) -> Cell {
        self.head
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Direction {
        self.pending_direction
    }

    pub fn body(&self) -> &Deque<Segment> {
        &self.body
    }

    pub fn body_cells(&self) -> impl DoubleEndedIterator<Item = Cell> + '_ {
        self.body.iter().map(|segment| segment.cell)
    }

    /// Latches `direction` for the next tick. Reversals of the committed
    /// heading and `Direction::None` are ignored; returns whether the input
    /// was taken. Only the latest accepted input before a tick counts.
    pub fn set_pending_direction(&mut self, direction: Direction) -> bool {
        if direction.is_none() || self.direction.is_reversal_of(direction) {
            return false;
        }
        self.pending_direction = direction;
        true
    }

    /// Advances one cell in the committed direction.
    ///
    /// The tail segment is lifted to the cell the head just left, so every
    /// segment ends up where the one ahead of it was before the tick. A snake
    /// without a heading does not move at all.
    pub fn tick(&mut self) -> TickStep {
        if !self.pending_direction.is_none() {
            self.direction = self.pending_direction;
            self.pending_direction = Direction::None;
        }

        let previous_head = self.head;
        if self.direction.is_none() {
            return TickStep {
                previous_head,
                head: previous_head,
                relocated: None,
            };
        }

        self.head = previous_head.moved(self.direction);

        let relocated = self.body.remove_back().map(|mut tail| {
            tail.cell = previous_head;
            self.body.insert_front(tail);
            tail
        });

        TickStep {
            previous_head,
            head: self.head,
            relocated,
        }
    }

    /// Appends a new tail segment at `cell` and returns it.
    pub fn grow(&mut self, cell: Cell) -> Segment {
        let segment = Segment {
            id: SegmentId(self.next_segment_id),
            cell,
        };
        self.next_segment_id += 1;
        self.body.insert_back(segment);
        segment
    }

    /// Head included.
    pub fn length(&self) -> usize {
        self.body.len() + 1
    }

    pub fn occupied_cells(&self) -> HashSet<Cell> {
        std::iter::once(self.head).chain(self.body_cells()).collect()
    }

    pub fn collides_with_body(&self, cell: Cell) -> bool {
        self.body.iter().any(|segment| segment.cell == cell)
    }
}
