//! Fixed-capacity brick grid
//!
//! Slots are stored column-major (`column * rows + row`). Only a prefix of
//! rows is laid out per level; the rest stay destroyed until the next reset.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::config::{BrickLayout, RowPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BrickStatus {
    Present,
    #[default]
    Destroyed,
}

/// A single grid slot
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Brick {
    /// Top-left corner
    pub pos: Vec2,
    pub status: BrickStatus,
}

impl Brick {
    pub fn is_present(&self) -> bool {
        self.status == BrickStatus::Present
    }

    /// Strict point-in-rectangle test (edges don't count)
    pub fn contains(&self, point: Vec2, layout: &BrickLayout) -> bool {
        point.x > self.pos.x
            && point.x < self.pos.x + layout.width
            && point.y > self.pos.y
            && point.y < self.pos.y + layout.height
    }
}

/// A present brick with its grid coordinates, for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedBrick {
    pub column: usize,
    pub row: usize,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickGrid {
    layout: BrickLayout,
    slots: Vec<Brick>,
    remaining: u32,
}

impl BrickGrid {
    /// Allocate an empty grid (every slot destroyed)
    pub fn new(layout: BrickLayout) -> Self {
        Self {
            layout,
            slots: vec![Brick::default(); layout.rows * layout.columns],
            remaining: 0,
        }
    }

    pub fn layout(&self) -> &BrickLayout {
        &self.layout
    }

    /// Bricks still standing in the current level
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Lay out a fresh wall for `level`
    pub fn reset(&mut self, level: u32, policy: RowPolicy) {
        let rows = policy.active_rows(level, self.layout.rows);
        self.slots.fill(Brick::default());

        for column in 0..self.layout.columns {
            for row in 0..rows {
                let idx = self.index(column, row);
                self.slots[idx] = Brick {
                    pos: Vec2::new(
                        column as f32 * self.layout.pitch_x() + self.layout.offset_left,
                        row as f32 * self.layout.pitch_y() + self.layout.offset_top,
                    ),
                    status: BrickStatus::Present,
                };
            }
        }

        self.remaining = (rows * self.layout.columns) as u32;
        log::debug!("Laid out {} bricks for level {}", self.remaining, level);
    }

    pub fn get(&self, column: usize, row: usize) -> Option<&Brick> {
        if column < self.layout.columns && row < self.layout.rows {
            self.slots.get(self.index(column, row))
        } else {
            None
        }
    }

    /// Destroy a present brick. Returns false (and changes nothing) for
    /// out-of-range or already destroyed slots.
    pub fn destroy(&mut self, column: usize, row: usize) -> bool {
        if column >= self.layout.columns || row >= self.layout.rows {
            return false;
        }
        let idx = self.index(column, row);
        let brick = &mut self.slots[idx];
        if !brick.is_present() {
            return false;
        }
        brick.status = BrickStatus::Destroyed;
        self.remaining = self.remaining.saturating_sub(1);
        true
    }

    /// Grid cell containing a point (may lie outside the grid)
    pub fn cell_of(&self, point: Vec2) -> (i32, i32) {
        (
            ((point.x - self.layout.offset_left) / self.layout.pitch_x()).floor() as i32,
            ((point.y - self.layout.offset_top) / self.layout.pitch_y()).floor() as i32,
        )
    }

    /// In-range cells of the 3×3 block around `cell`, column-major
    pub fn neighborhood(&self, cell: (i32, i32)) -> impl Iterator<Item = (usize, usize)> + use<> {
        let max_col = self.layout.columns as i32 - 1;
        let max_row = self.layout.rows as i32 - 1;
        let cols = (cell.0 - 1).max(0)..=(cell.0 + 1).min(max_col);
        let rows = (cell.1 - 1).max(0)..=(cell.1 + 1).min(max_row);
        cols.flat_map(move |c| rows.clone().map(move |r| (c as usize, r as usize)))
    }

    /// Present bricks in storage order
    pub fn present(&self) -> impl Iterator<Item = PlacedBrick> + '_ {
        let rows = self.layout.rows;
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_present())
            .map(move |(i, b)| PlacedBrick {
                column: i / rows,
                row: i % rows,
                pos: b.pos,
            })
    }

    fn index(&self, column: usize, row: usize) -> usize {
        column * self.layout.rows + row
    }
}
