use std::collections::HashSet;

use log::{error, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::cell::Cell;
use crate::error::GameError;

/// Rejection sampling attempts before falling back to scanning every cell.
const MAX_SAMPLE_ATTEMPTS: usize = 64;

/// Bounded square field of `size` x `size` cells centered on the origin.
///
/// For an even size the cells run from `-size/2` to `size/2 - 1` on both
/// axes; in world space each cell maps to the center of its grid square, so
/// the field spans `[-size/2, size/2]` exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionGrid {
    size: i32,
    min: i32,
    max: i32,
}

impl PositionGrid {
    /// Callers validate the size through [`GameConfig`](crate::GameConfig).
    pub fn new(size: i32) -> Self {
        let min = -(size / 2);
        PositionGrid {
            size,
            min,
            max: min + size - 1,
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Lowest in-bounds coordinate on either axis.
    pub fn min(&self) -> i32 {
        self.min
    }

    /// Highest in-bounds coordinate on either axis.
    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn cell_count(&self) -> usize {
        (self.size as usize) * (self.size as usize)
    }

    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        (self.min..=self.max).contains(&cell.x) && (self.min..=self.max).contains(&cell.y)
    }

    pub fn random_cell(&self, rng: &mut impl Rng) -> Cell {
        Cell {
            x: rng.gen_range(self.min..=self.max),
            y: rng.gen_range(self.min..=self.max),
        }
    }

    /// Uniformly picks a cell that is not in `occupied`.
    ///
    /// Fails with [`GameError::NoFreeCell`] only when every cell is taken.
    pub fn random_free_cell(
        &self,
        occupied: &HashSet<Cell>,
        rng: &mut impl Rng,
    ) -> Result<Cell, GameError> {
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let cell = self.random_cell(rng);
            if !occupied.contains(&cell) {
                return Ok(cell);
            }
        }

        warn!(
            "Food sampling missed {} times with {} of {} cells occupied, scanning the field",
            MAX_SAMPLE_ATTEMPTS,
            occupied.len(),
            self.cell_count()
        );
        let free: Vec<Cell> = self.cells().filter(|c| !occupied.contains(c)).collect();
        match free.choose(rng) {
            Some(cell) => Ok(*cell),
            None => {
                error!("No free cell left on the field");
                Err(GameError::NoFreeCell {
                    field_size: self.size,
                    occupied: occupied.len(),
                })
            }
        }
    }

    /// Every in-bounds cell, row by row from the bottom.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let (min, max) = (self.min, self.max);
        (min..=max).flat_map(move |y| (min..=max).map(move |x| Cell { x, y }))
    }

    /// Center of `cell` in world units.
    pub fn to_world(&self, cell: Cell) -> (f32, f32) {
        let offset = |c: i32| (c - self.min) as f32 + 0.5 - self.size as f32 / 2.0;
        (offset(cell.x), offset(cell.y))
    }
}
