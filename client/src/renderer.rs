use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use snake_common::engine::session::{FrameSink, GameView, SessionCommand};
use snake_common::games::snake::{Phase, RoundSummary};
use snake_common::log;
use tokio::sync::mpsc;

use crate::config::RenderConfig;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub fn render_frame(view: &GameView, config: &RenderConfig) -> String {
    let columns = view.grid.columns() as usize;
    let rows = view.grid.rows() as usize;
    let mut cells = vec![vec![config.empty; columns]; rows];

    if let Some(food) = view.food.active_position()
        && let Some((column, row)) = view.grid.cell_of(food)
    {
        cells[row as usize][column as usize] = config.food;
    }

    for (i, segment) in view.snake.iter().enumerate().rev() {
        if let Some((column, row)) = view.grid.cell_of(*segment) {
            cells[row as usize][column as usize] = if i == 0 {
                config.snake_head
            } else {
                config.snake_body
            };
        }
    }

    let mut out = String::new();
    out.push_str(&status_line(view));
    out.push('\n');

    let border: String = std::iter::repeat_n(config.border, columns + 2).collect();
    out.push_str(&border);
    out.push('\n');
    for row in cells {
        out.push(config.border);
        out.extend(row);
        out.push(config.border);
        out.push('\n');
    }
    out.push_str(&border);
    out.push('\n');
    out.push_str(hint_line(view.phase));
    out.push('\n');
    out
}

fn status_line(view: &GameView) -> String {
    let best = view
        .best_score
        .map(|score| score.to_string())
        .unwrap_or_else(|| "-".to_string());

    match view.phase {
        Phase::Over => format!(
            "GAME OVER  Final score: {}  Best: {}",
            view.final_score.unwrap_or(0),
            best
        ),
        _ => format!(
            "Score: {}  Best: {}  Speed: {}ms",
            view.score,
            best,
            view.tick_interval.as_millis()
        ),
    }
}

fn hint_line(phase: Phase) -> &'static str {
    match phase {
        Phase::Ready => "Type 'start' to play, easy/normal/hard to pick a speed, 'q' to quit",
        Phase::Running => "Steer with w/a/s/d (or h/j/k/l) + Enter, 'q' to quit",
        Phase::Over => "Type 'start' to play again, 'ack' for the menu, 'q' to quit",
    }
}

/// Restarts rounds for unattended autopilot runs and quits after the last one.
#[derive(Clone)]
pub struct AutoRestart {
    pub command_tx: mpsc::UnboundedSender<SessionCommand>,
    pub rounds_left: Arc<AtomicU32>,
}

#[derive(Clone)]
pub struct TerminalSink {
    config: Arc<RenderConfig>,
    auto_restart: Option<AutoRestart>,
}

impl TerminalSink {
    pub fn new(config: RenderConfig, auto_restart: Option<AutoRestart>) -> Self {
        Self {
            config: Arc::new(config),
            auto_restart,
        }
    }
}

impl FrameSink for TerminalSink {
    async fn present_frame(&self, view: GameView) {
        let frame = render_frame(&view, &self.config);
        let mut stdout = std::io::stdout().lock();
        if self.config.clear_screen {
            let _ = write!(stdout, "{}", CLEAR_SCREEN);
        }
        let _ = write!(stdout, "{}", frame);
        let _ = stdout.flush();
    }

    async fn present_round_over(&self, summary: RoundSummary) {
        log!(
            "Round finished by {} with score {}",
            summary.reason,
            summary.final_score
        );

        let Some(auto_restart) = &self.auto_restart else {
            return;
        };
        let left = auto_restart
            .rounds_left
            .fetch_sub(1, Ordering::SeqCst)
            .saturating_sub(1);
        let next = if left > 0 {
            SessionCommand::Start
        } else {
            SessionCommand::Quit
        };
        let _ = auto_restart.command_tx.send(next);
    }
}
