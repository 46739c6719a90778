use std::io;
use std::time::Duration;

use snake_common::engine::session::SessionCommand;
use snake_common::games::snake::{Difficulty, Direction};
use snake_common::log;
use tokio::sync::mpsc;
use tokio_stream::{Stream, StreamExt};

/// Maps one input line to a session command. Unknown input yields `None`.
pub fn parse_command(line: &str) -> Option<SessionCommand> {
    let line = line.trim().to_ascii_lowercase();
    let mut words = line.split_whitespace();
    let word = words.next()?;

    match word {
        "start" | "r" | "restart" => Some(SessionCommand::Start),
        "ack" | "ok" | "menu" => Some(SessionCommand::Acknowledge),
        "quit" | "q" | "exit" => Some(SessionCommand::Quit),
        "speed" => {
            let ms: u64 = words.next()?.parse().ok()?;
            Some(SessionCommand::SetTickInterval(Duration::from_millis(ms)))
        }
        other => {
            if let Ok(difficulty) = other.parse::<Difficulty>() {
                return Some(SessionCommand::SetTickInterval(difficulty.tick_interval()));
            }
            other.parse::<Direction>().ok().map(SessionCommand::Turn)
        }
    }
}

/// Forwards parsed lines until the input ends or the session goes away.
pub async fn forward_commands<S>(
    mut lines: S,
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    quit_on_eof: bool,
) where
    S: Stream<Item = io::Result<String>> + Unpin,
{
    while let Some(line) = lines.next().await {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log!("Failed to read input: {}", e);
                break;
            }
        };

        // a line may carry several keys, e.g. "ww" or "w a"
        for command in split_keys(&line).filter_map(|key| parse_command(&key)) {
            if command_tx.send(command).is_err() {
                return;
            }
        }
    }

    if quit_on_eof {
        let _ = command_tx.send(SessionCommand::Quit);
    }
}

fn split_keys(line: &str) -> Box<dyn Iterator<Item = String> + '_> {
    let trimmed = line.trim();
    let is_key_run = trimmed.len() > 1
        && trimmed
            .chars()
            .all(|c| matches!(c.to_ascii_lowercase(), 'w' | 'a' | 's' | 'd' | 'h' | 'j' | 'k' | 'l'));

    if is_key_run {
        Box::new(trimmed.chars().map(String::from))
    } else if trimmed.starts_with("speed") {
        Box::new(std::iter::once(trimmed.to_string()))
    } else {
        Box::new(trimmed.split_whitespace().map(str::to_string))
    }
}
