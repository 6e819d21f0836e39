//! Tuning for the two game variants
//!
//! The hand-tracked game has lives and grows its brick wall row by row; the
//! classic game ends on the first miss and always starts with a full wall.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How many brick rows are live for a given level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowPolicy {
    /// Level 1 has one row, level 2 two rows, level 3+ the whole grid
    Progressive,
    /// Every level uses the whole grid
    Full,
}

impl RowPolicy {
    /// Number of live rows for `level`, never more than `total_rows`
    pub fn active_rows(self, level: u32, total_rows: usize) -> usize {
        match self {
            RowPolicy::Progressive => match level {
                0 | 1 => 1.min(total_rows),
                2 => 2.min(total_rows),
                _ => total_rows,
            },
            RowPolicy::Full => total_rows,
        }
    }
}

/// Fixed brick grid geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrickLayout {
    pub rows: usize,
    pub columns: usize,
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub offset_top: f32,
    pub offset_left: f32,
}

impl Default for BrickLayout {
    fn default() -> Self {
        Self {
            rows: 3,
            columns: 8,
            width: 65.0,
            height: 20.0,
            padding: 8.0,
            offset_top: 50.0,
            offset_left: 58.0,
        }
    }
}

impl BrickLayout {
    /// Horizontal distance between neighbouring brick origins
    pub fn pitch_x(&self) -> f32 {
        self.width + self.padding
    }

    /// Vertical distance between neighbouring brick origins
    pub fn pitch_y(&self) -> f32 {
        self.height + self.padding
    }
}

/// Everything that differs between game variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub initial_paddle_width: f32,
    /// Per-axis launch speed (pixels per tick)
    pub initial_ball_speed: f32,
    /// A miss costs a life instead of ending the game
    pub has_lives: bool,
    pub initial_lives: u32,
    pub row_policy: RowPolicy,
    pub bricks: BrickLayout,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::hand_tracked()
    }
}

impl GameConfig {
    /// The full game: three lives, wall grows over the first levels
    pub fn hand_tracked() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            initial_paddle_width: 150.0,
            initial_ball_speed: 7.0,
            has_lives: true,
            initial_lives: 3,
            row_policy: RowPolicy::Progressive,
            bricks: BrickLayout::default(),
        }
    }

    /// Single-life game on a full wall with a slower ball and a narrower paddle
    pub fn classic() -> Self {
        Self {
            initial_paddle_width: 120.0,
            initial_ball_speed: 5.0,
            has_lives: false,
            initial_lives: 1,
            row_policy: RowPolicy::Full,
            ..Self::hand_tracked()
        }
    }

    /// Fixed vertical position of the paddle's top edge
    pub fn paddle_y(&self) -> f32 {
        self.canvas_height - PADDLE_BOTTOM_OFFSET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progressive_rows() {
        assert_eq!(RowPolicy::Progressive.active_rows(1, 3), 1);
        assert_eq!(RowPolicy::Progressive.active_rows(2, 3), 2);
        assert_eq!(RowPolicy::Progressive.active_rows(3, 3), 3);
        assert_eq!(RowPolicy::Progressive.active_rows(9, 3), 3);
        // Smaller grids cap the count
        assert_eq!(RowPolicy::Progressive.active_rows(3, 2), 2);
    }

    #[test]
    fn test_full_rows_ignore_level() {
        for level in 1..6 {
            assert_eq!(RowPolicy::Full.active_rows(level, 3), 3);
        }
    }

    #[test]
    fn test_variants_diverge() {
        let rich = GameConfig::hand_tracked();
        let classic = GameConfig::classic();
        assert!(rich.has_lives);
        assert!(!classic.has_lives);
        assert_eq!(rich.row_policy.active_rows(1, rich.bricks.rows), 1);
        assert_eq!(classic.row_policy.active_rows(1, classic.bricks.rows), 3);
        assert_eq!(rich.bricks, classic.bricks);
    }
}
