use super::game_state::GameState;
use super::types::{Direction, Phase, Position};

/// Greedy steering used for demos and benchmarks.
pub struct Autopilot;

impl Autopilot {
    pub fn choose(state: &GameState) -> Option<Direction> {
        if state.phase() != Phase::Running {
            return None;
        }

        let current = state.direction();
        let safe: Vec<Direction> = Self::get_valid_directions(current)
            .into_iter()
            .filter(|&dir| Self::is_safe(state, dir))
            .collect();

        let toward_food = state.food().active_position().and_then(|food| {
            safe.iter()
                .copied()
                .min_by_key(|&dir| Self::manhattan_distance(Self::next_position(state, dir), food))
        });

        toward_food
            .or_else(|| safe.first().copied())
            .or(Some(current))
    }

    fn get_valid_directions(current: Direction) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|dir| !dir.is_opposite(&current))
            .collect()
    }

    fn next_position(state: &GameState, direction: Direction) -> Position {
        state
            .snake()
            .next_head(direction, state.settings().grid.cell_size())
    }

    fn is_safe(state: &GameState, direction: Direction) -> bool {
        let next = Self::next_position(state, direction);
        let food_ahead = state.food().is_at(next);
        // the tail moves away this tick unless the snake grows
        state.is_free(next) || (next == state.snake().tail() && !food_ahead && state.snake().len() > 1)
    }

    fn manhattan_distance(a: Position, b: Position) -> i32 {
        (a.x - b.x).abs() + (a.y - b.y).abs()
    }
}
