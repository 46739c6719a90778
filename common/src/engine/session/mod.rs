mod snake_session;
mod tick_schedule;

use std::future::Future;
use std::time::Duration;

use crate::games::snake::{Direction, Food, GameState, Grid, Phase, Position, RoundSummary};

pub use snake_session::{CommandOutcome, GameSession, SessionSummary, ROUND_HISTORY_SIZE};
pub use tick_schedule::TickSchedule;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Turn(Direction),
    SetTickInterval(Duration),
    Acknowledge,
    Quit,
}

/// Everything a renderer needs to paint one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct GameView {
    pub grid: Grid,
    pub snake: Vec<Position>,
    pub food: Food,
    pub direction: Direction,
    pub score: u32,
    pub phase: Phase,
    pub final_score: Option<u32>,
    pub best_score: Option<u32>,
    pub tick_interval: Duration,
}

impl GameView {
    pub fn from_state(state: &GameState, best_score: Option<u32>, tick_interval: Duration) -> Self {
        Self {
            grid: state.settings().grid,
            snake: state.snake().segments().copied().collect(),
            food: state.food(),
            direction: state.direction(),
            score: state.score(),
            phase: state.phase(),
            final_score: state.final_score(),
            best_score,
            tick_interval,
        }
    }
}

/// Renderer side of a session.
pub trait FrameSink: Send + Sync + Clone + 'static {
    fn present_frame(&self, view: GameView) -> impl Future<Output = ()> + Send;

    fn present_round_over(&self, summary: RoundSummary) -> impl Future<Output = ()> + Send;
}
