use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chordsweep_core::{self as game, Coord, Coord2, GameEvent, Intent, SessionState, Snapshot};
use chordsweep_protocol::{Command, Endpoints, GameUpdate};
use chrono::Utc;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};

use crate::settings::Settings;

mod render;
mod settings;

#[derive(Parser, Debug)]
#[command(
    name = "chordsweep",
    version,
    about = "Chord previews and move requests for a game snapshot",
    long_about = None
)]
struct Cli {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    /// Settings file (TOML)
    #[arg(short, long, env = "CHORDSWEEP_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides `api_url` from the settings file
    #[arg(long, env = "CHORDSWEEP_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Cells highlighted while the pointer is held down on a cell
    Preview {
        /// Server update JSON, `-` for stdin
        #[arg(short, long, default_value = "-")]
        update: PathBuf,
        #[arg(short)]
        x: Coord,
        #[arg(short)]
        y: Coord,
    },
    /// Request sent when the pointer is released on a cell
    Release {
        /// Server update JSON, `-` for stdin; without it no game exists yet
        #[arg(short, long)]
        update: Option<PathBuf>,
        #[arg(short)]
        x: Coord,
        #[arg(short)]
        y: Coord,
        /// Secondary button, toggles a flag
        #[arg(long)]
        flag: bool,
    },
    /// Draw the board as text
    Render {
        /// Server update JSON, `-` for stdin
        #[arg(short, long, default_value = "-")]
        update: PathBuf,
        /// Hold a press on X,Y while drawing
        #[arg(long, value_parser = parse_coords)]
        press: Option<Coord2>,
    },
    /// REST and socket URLs of a session
    Endpoints {
        #[arg(long)]
        session: String,
    },
}

fn parse_coords(s: &str) -> Result<Coord2> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| anyhow!("expected X,Y, got {s:?}"))?;
    Ok((x.trim().parse()?, y.trim().parse()?))
}

fn init_logging(verbose: &Verbosity<WarnLevel>) {
    let Some(level) = verbose.log_level() else {
        return;
    };

    let level = match level {
        log::Level::Error => tracing::Level::ERROR,
        log::Level::Warn => tracing::Level::WARN,
        log::Level::Info => tracing::Level::INFO,
        log::Level::Debug => tracing::Level::DEBUG,
        log::Level::Trace => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_update(path: &Path) -> Result<GameUpdate> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading update from stdin")?;
        text
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("reading update from {}", path.display()))?
    };

    GameUpdate::from_json(&text).context("parsing server update")
}

fn load_session(path: &Path, settings: &Settings) -> Result<SessionState> {
    let snapshot = Snapshot::try_from(read_update(path)?)?;
    log::info!(
        "loaded session {} ({}x{})",
        snapshot.session_id,
        snapshot.grid.width(),
        snapshot.grid.height()
    );

    let state = SessionState::with_preset(settings.preset, settings.game_params());
    Ok(game::reduce(
        state,
        GameEvent::GameInit {
            snapshot,
            now: Utc::now(),
        },
    ))
}

fn press(state: SessionState, coords: Coord2) -> Result<SessionState> {
    let cell = state
        .cell_at(coords)
        .ok_or_else(|| anyhow!("{:?} is outside the board", coords))?;
    Ok(game::reduce(
        state,
        GameEvent::CellDown {
            coords,
            state: cell,
        },
    ))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.verbose);

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    let endpoints = Endpoints::parse(&settings.api_url)?;

    match cli.command {
        Commands::Preview { update, x, y } => {
            let state = press(load_session(&update, &settings)?, (x, y))?;
            let width = state.board_size().0;
            for &index in state.pressed.iter().flatten() {
                let x = index % usize::from(width);
                let y = index / usize::from(width);
                println!("{index}\t{x}\t{y}");
            }
        }
        Commands::Release {
            update,
            x,
            y,
            flag,
        } => {
            let state = match update {
                Some(path) => load_session(&path, &settings)?,
                None => SessionState::with_preset(settings.preset, settings.game_params()),
            };

            let intent = if flag {
                game::flag_intent(&state, (x, y))
            } else {
                game::release_intent(&state, (x, y))
            };

            match intent {
                Some(Intent::Send(next_move)) => println!("{}", Command::from(next_move)),
                Some(Intent::CreateGame { origin, params }) => {
                    println!("POST {}", endpoints.new_game(origin, &params))
                }
                None => log::warn!("releasing on ({}, {}) sends nothing", x, y),
            }
        }
        Commands::Render { update, press: held } => {
            let mut state = load_session(&update, &settings)?;
            if let Some(coords) = held {
                state = press(state, coords)?;
            }

            println!(
                "{:03} {:?} {:03}",
                state.mines_left().clamp(0, 999),
                state.face,
                state.timer_secs.clamp(0, 999)
            );
            print!(
                "{}",
                render::render(&state.rendered_cells(), state.board_size().0)
            );
        }
        Commands::Endpoints { session } => {
            println!("game\t{}", endpoints.game(&session));
            println!("open\t{}", endpoints.open(&session, (0, 0)));
            println!("chord\t{}", endpoints.chord(&session, (0, 0)));
            println!("flag\t{}", endpoints.flag(&session, (0, 0)));
            println!("socket\t{}", endpoints.socket(&session)?);
        }
    }

    Ok(())
}
