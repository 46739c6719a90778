mod config;
mod input;
mod renderer;

use std::sync::Arc;
use std::sync::atomic::AtomicU32;

use clap::Parser;
use snake_common::config::Validate;
use snake_common::engine::session::{GameSession, SessionCommand};
use snake_common::games::SessionRng;
use snake_common::games::snake::{Difficulty, GameSettings};
use snake_common::logger::{self, LogTarget};
use snake_common::log;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_stream::wrappers::LinesStream;

use config::get_config_manager;
use renderer::{AutoRestart, TerminalSink};

#[derive(Parser)]
#[command(name = "snake_client", about = "Terminal snake driven by line-based input")]
struct Args {
    /// YAML config file, defaults to one next to the executable
    #[arg(long)]
    config: Option<String>,
    #[arg(long)]
    tick_interval_ms: Option<u32>,
    #[arg(long)]
    difficulty: Option<Difficulty>,
    /// Let the greedy autopilot steer
    #[arg(long)]
    autopilot: bool,
    /// Rounds to play unattended with --autopilot
    #[arg(long, default_value_t = 1)]
    rounds: u32,
    #[arg(long)]
    seed: Option<u64>,
    /// Write the effective config back to the config file
    #[arg(long)]
    save_config: bool,
    #[arg(long)]
    use_log_prefix: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(args));
    // the stdin reader sits on a blocking thread that would otherwise hold up exit
    runtime.shutdown_background();
    result
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let prefix = if args.use_log_prefix {
        Some("Client".to_string())
    } else {
        None
    };
    logger::init_logger(prefix, LogTarget::Stderr);

    let config_manager = get_config_manager(args.config.as_deref());
    let mut config = config_manager.get_config()?;
    if let Some(difficulty) = args.difficulty {
        config.difficulty = Some(difficulty);
    }
    if let Some(tick_interval_ms) = args.tick_interval_ms {
        config.difficulty = None;
        config.game.tick_interval_ms = tick_interval_ms;
    }
    config
        .validate()
        .map_err(|e| format!("Config validation error: {}", e))?;
    if args.save_config {
        config_manager.set_config(&config)?;
        log!("Config saved");
    }

    let settings = GameSettings::try_from(&config.effective_game_config())?;
    log!(
        "Grid {}x{} cells of {}px, tick every {:?}",
        settings.grid.columns(),
        settings.grid.rows(),
        settings.grid.cell_size(),
        settings.tick_interval
    );

    let rng = match args.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    let session = GameSession::new(settings, rng).with_autopilot(args.autopilot);

    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let auto_restart = if args.autopilot {
        command_tx.send(SessionCommand::Start)?;
        Some(AutoRestart {
            command_tx: command_tx.clone(),
            rounds_left: Arc::new(AtomicU32::new(args.rounds.max(1))),
        })
    } else {
        None
    };
    let sink = TerminalSink::new(config.render.clone(), auto_restart);

    let ctrl_c_tx = command_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log!("Ctrl+C received, quitting");
            let _ = ctrl_c_tx.send(SessionCommand::Quit);
        }
    });

    let stdin_lines = LinesStream::new(BufReader::new(tokio::io::stdin()).lines());
    let quit_on_eof = !args.autopilot;
    tokio::spawn(input::forward_commands(stdin_lines, command_tx, quit_on_eof));

    let summary = session.run(command_rx, sink).await;

    println!();
    println!("Rounds played: {}", summary.rounds_played);
    if let Some(best) = summary.best_score {
        println!("Best score: {}", best);
    }
    for (i, round) in summary.recent_rounds.iter().enumerate() {
        println!(
            "  #{:<2} score {:>4}  length {:>3}  {} ticks  ({})",
            i + 1,
            round.final_score,
            round.final_length,
            round.ticks,
            round.reason
        );
    }

    Ok(())
}
