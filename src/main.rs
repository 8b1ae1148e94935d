//! skirmish - run a battle in the terminal

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use skirmish::engine::{BattleOutcome, MIN_SPEED};
use skirmish::{Arena, ChannelRenderer, Config, Renderer, TerminalRenderer};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Heroes versus monsters, one round at a time
#[derive(Parser, Debug)]
#[command(name = "skirmish", version, about = "Turn-based heroes-versus-monsters battle")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the battle RNG
    #[arg(long)]
    seed: Option<u64>,

    /// Presentation speed multiplier
    #[arg(long)]
    speed: Option<f64>,

    /// Encounter tier (monster scaling)
    #[arg(long)]
    tier: Option<u32>,

    /// Start paused
    #[arg(long)]
    paused: bool,

    /// Emit presentation calls as JSON lines instead of text
    #[arg(long)]
    json: bool,

    /// Log as JSON
    #[arg(long)]
    log_json: bool,

    /// Ignore stdin controls
    #[arg(long)]
    no_input: bool,
}

type InputLines = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let mut config = Config::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(speed) = args.speed {
        config.speed = speed;
    }
    if let Some(tier) = args.tier {
        config.tier = Some(tier);
    }
    if args.paused {
        config.start_paused = true;
    }
    if args.no_input && config.start_paused {
        warn!("nothing can resume a paused start without input; starting unpaused");
        config.start_paused = false;
    }

    let input = !args.no_input;
    let outcome = if args.json {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let printer = tokio::spawn(async move {
            while let Some(call) = rx.recv().await {
                match serde_json::to_string(&call) {
                    Ok(line) => println!("{}", line),
                    Err(e) => warn!("failed to encode render call: {}", e),
                }
            }
        });

        let arena = Arena::new(config, move || ChannelRenderer::new(tx.clone()))?;
        let outcome = play(arena, input).await?;
        // Arena and its sender are gone; let the printer drain
        printer.await?;
        outcome
    } else {
        let arena = Arena::new(config, TerminalRenderer::stdout)?;
        play(arena, input).await?
    };

    match outcome {
        Some(outcome) if args.json => println!(
            "{}",
            serde_json::json!({ "winner": outcome.winner, "rounds": outcome.rounds })
        ),
        Some(outcome) => println!(
            "{} ({} rounds)",
            outcome.winner.victory_text(),
            outcome.rounds
        ),
        None => info!("quit before the battle ended"),
    }

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "skirmish=info".into());
    let (plain, json) = if json {
        (None, Some(fmt::layer().json().with_writer(std::io::stderr)))
    } else {
        (Some(fmt::layer().with_writer(std::io::stderr)), None)
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
        .init();
}

/// Run battles until one ends or the user quits
///
/// Stdin commands: `p` pause/resume, `+` double speed, `-` halve speed,
/// `r` restart, `q` quit.
async fn play<R, F>(mut arena: Arena<R, F>, input: bool) -> Result<Option<BattleOutcome>>
where
    R: Renderer + 'static,
    F: FnMut() -> R,
{
    let mut battle = arena.launch()?;
    let mut lines = input.then(|| BufReader::new(tokio::io::stdin()).lines());

    loop {
        tokio::select! {
            joined = &mut battle => {
                let outcome = joined??;
                return Ok(Some(outcome));
            }
            line = next_command(&mut lines) => {
                let Some(text) = line? else {
                    // stdin closed: nobody can resume, so let the battle run out
                    lines = None;
                    arena.set_running(true);
                    continue;
                };
                match text.trim() {
                    "p" => {
                        arena.toggle_running();
                    }
                    "+" => {
                        if let Err(e) = arena.set_speed(arena.controls().speed() * 2.0) {
                            warn!("{}", e);
                        }
                    }
                    "-" => {
                        let slower = (arena.controls().speed() / 2.0).max(MIN_SPEED);
                        if let Err(e) = arena.set_speed(slower) {
                            warn!("{}", e);
                        }
                    }
                    "r" => battle = arena.restart(battle).await?,
                    "q" => {
                        battle.abort();
                        return Ok(None);
                    }
                    "" => {}
                    other => warn!(input = other, "unknown command; use p, +, -, r or q"),
                }
            }
        }
    }
}

async fn next_command(lines: &mut Option<InputLines>) -> std::io::Result<Option<String>> {
    match lines {
        Some(lines) => lines.next_line().await,
        None => std::future::pending().await,
    }
}
