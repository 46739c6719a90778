mod autopilot;
mod food;
mod game_state;
mod grid;
mod settings;
mod snake;
mod types;

pub use autopilot::Autopilot;
pub use food::{Food, FoodPlacement, FoodPlacer};
pub use game_state::{GameState, RoundSummary};
pub use grid::Grid;
pub use settings::{Difficulty, GameConfig, GameSettings, MAX_SCORE_REWARD, MAX_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS};
pub use snake::Snake;
pub use types::{CollisionKind, Direction, Phase, Position, TickResult};
