use crate::games::SessionRng;
use super::grid::Grid;
use super::snake::Snake;
use super::types::Position;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Food {
    pub coordinates: Option<Position>,
    pub active: bool,
}

impl Food {
    pub fn inactive() -> Self {
        Self::default()
    }

    /// Position of the food while it is on the field.
    pub fn active_position(&self) -> Option<Position> {
        if self.active { self.coordinates } else { None }
    }

    pub fn is_at(&self, pos: Position) -> bool {
        self.active_position() == Some(pos)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FoodPlacement {
    AlreadyActive,
    /// Placed by a rejection-sampled random draw.
    Placed(Position),
    /// Placed by picking from the remaining free cells.
    PlacedFromFreeCells(Position),
    NoFreeCell,
}

pub struct FoodPlacer {
    pub max_attempts: u32,
    pub free_cell_sampling_threshold: f32,
}

impl FoodPlacer {
    pub fn place(&self, grid: &Grid, snake: &Snake, rng: &mut SessionRng) -> FoodPlacement {
        let occupancy = snake.len() as f32 / grid.cell_count() as f32;

        if occupancy < self.free_cell_sampling_threshold {
            for _ in 0..self.max_attempts {
                let column = rng.random_range(0..grid.columns());
                let row = rng.random_range(0..grid.rows());
                let candidate = grid.position_of(column, row);

                if !snake.contains(candidate) {
                    return FoodPlacement::Placed(candidate);
                }
            }
        }

        let free_cells: Vec<Position> = grid
            .positions()
            .filter(|pos| !snake.contains(*pos))
            .collect();

        match rng.choose(&free_cells) {
            Some(pos) => FoodPlacement::PlacedFromFreeCells(*pos),
            None => FoodPlacement::NoFreeCell,
        }
    }
}
