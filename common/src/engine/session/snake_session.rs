use std::time::Duration;

use ringbuffer::{AllocRingBuffer, RingBuffer};
use tokio::sync::mpsc;

use crate::games::SessionRng;
use crate::games::snake::{
    Autopilot, GameSettings, GameState, MAX_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS, Phase,
    RoundSummary, TickResult,
};
use crate::log;
use super::{FrameSink, GameView, SessionCommand, TickSchedule};

pub const ROUND_HISTORY_SIZE: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Ignored,
    Applied,
    /// Phase changed, the view should be redrawn.
    PhaseChanged,
    Quit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub rounds_played: u32,
    pub best_score: Option<u32>,
    pub recent_rounds: Vec<RoundSummary>,
}

/// Owns the game state and its tick schedule and processes one event at a time.
pub struct GameSession {
    state: GameState,
    rng: SessionRng,
    schedule: TickSchedule,
    history: AllocRingBuffer<RoundSummary>,
    rounds_played: u32,
    autopilot: bool,
}

impl GameSession {
    pub fn new(settings: GameSettings, rng: SessionRng) -> Self {
        let schedule = TickSchedule::new(settings.tick_interval);
        Self {
            state: GameState::new(settings),
            rng,
            schedule,
            history: AllocRingBuffer::new(ROUND_HISTORY_SIZE),
            rounds_played: 0,
            autopilot: false,
        }
    }

    pub fn with_autopilot(mut self, enabled: bool) -> Self {
        self.autopilot = enabled;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn schedule(&self) -> &TickSchedule {
        &self.schedule
    }

    pub fn recent_rounds(&self) -> impl Iterator<Item = &RoundSummary> {
        self.history.iter()
    }

    pub fn best_score(&self) -> Option<u32> {
        self.history.iter().map(|round| round.final_score).max()
    }

    pub fn view(&self) -> GameView {
        GameView::from_state(&self.state, self.best_score(), self.schedule.period())
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            rounds_played: self.rounds_played,
            best_score: self.best_score(),
            recent_rounds: self.history.iter().copied().collect(),
        }
    }

    pub fn handle_command(&mut self, command: SessionCommand) -> CommandOutcome {
        match command {
            SessionCommand::Start => {
                if !self.state.start() {
                    log!("Start ignored, round already running");
                    return CommandOutcome::Ignored;
                }
                if !self.schedule.start() {
                    log!("Tick schedule was still active at round start");
                }
                log!("Tick schedule started, period {:?}", self.schedule.period());
                CommandOutcome::PhaseChanged
            }
            SessionCommand::Turn(direction) => {
                if self.state.request_direction_change(direction) {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::Ignored
                }
            }
            SessionCommand::SetTickInterval(period) => {
                if self.state.phase() == Phase::Running {
                    log!("Tick interval change ignored while a round is running");
                    return CommandOutcome::Ignored;
                }
                let period = period.clamp(
                    Duration::from_millis(MIN_TICK_INTERVAL_MS as u64),
                    Duration::from_millis(MAX_TICK_INTERVAL_MS as u64),
                );
                if self.schedule.set_period(period) {
                    log!("Tick interval set to {:?}", period);
                    CommandOutcome::PhaseChanged
                } else {
                    CommandOutcome::Ignored
                }
            }
            SessionCommand::Acknowledge => {
                if self.state.phase() != Phase::Over {
                    return CommandOutcome::Ignored;
                }
                self.state.acknowledge();
                CommandOutcome::PhaseChanged
            }
            SessionCommand::Quit => CommandOutcome::Quit,
        }
    }

    /// One timer tick. Returns the summary when this tick ended the round.
    pub fn on_tick(&mut self) -> Option<RoundSummary> {
        if self.autopilot
            && let Some(direction) = Autopilot::choose(&self.state)
        {
            self.state.request_direction_change(direction);
        }

        match self.state.tick(&mut self.rng) {
            TickResult::Continued | TickResult::Idle => None,
            TickResult::Collided(reason) => {
                if self.schedule.cancel() {
                    log!("Tick schedule cancelled");
                }
                let summary = self.state.end_round(reason);
                self.rounds_played += 1;
                self.history.enqueue(summary);
                Some(summary)
            }
        }
    }

    pub async fn run<S: FrameSink>(
        mut self,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
        sink: S,
    ) -> SessionSummary {
        log!("Session started with seed {}", self.rng.seed());
        sink.present_frame(self.view()).await;

        loop {
            tokio::select! {
                _ = self.schedule.tick() => {
                    let finished = self.on_tick();
                    sink.present_frame(self.view()).await;
                    if let Some(summary) = finished {
                        sink.present_round_over(summary).await;
                    }
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        log!("Command channel closed");
                        break;
                    };
                    match self.handle_command(command) {
                        CommandOutcome::Quit => break,
                        CommandOutcome::PhaseChanged => sink.present_frame(self.view()).await,
                        CommandOutcome::Applied | CommandOutcome::Ignored => {}
                    }
                }
            }
        }

        self.schedule.cancel();
        log!(
            "Session finished after {} rounds, best score {:?}",
            self.rounds_played,
            self.best_score()
        );
        self.summary()
    }
}
