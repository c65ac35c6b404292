use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{LevelFilter, error, info};
use snek::config::{BoardGeometry, THEME_CLASSIC, load_geometry, tick_interval_for_speed};
use snek::game::GameEngine;
use snek::input::{GameInput, InputHandler};
use snek::logging::init_file_logger;
use snek::renderer::Overlay;
use snek::terminal_runtime::GameScreen;

const FRAME_POLL_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(name = "snek", version, about = "Snake in the terminal")]
struct Cli {
    /// JSON file overriding board geometry; missing fields keep defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for food placement; each restart uses the next seed.
    #[arg(long)]
    seed: Option<u64>,

    /// File receiving log output.
    #[arg(long, default_value = "snek.log")]
    log_file: PathBuf,

    /// Log level (off, error, warn, info, debug, trace).
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

/// One game plus what the driver shows on top of it.
struct Session {
    geometry: BoardGeometry,
    seed: Option<u64>,
    games_started: u64,
    engine: GameEngine,
    overlay: Overlay,
}

impl Session {
    fn new(geometry: BoardGeometry, seed: Option<u64>) -> Self {
        Self {
            geometry,
            seed,
            games_started: 1,
            engine: new_engine(geometry, seed),
            overlay: Overlay::Start,
        }
    }

    fn restart(&mut self) {
        let seed = self.seed.map(|seed| seed.wrapping_add(self.games_started));
        self.games_started += 1;
        self.engine = new_engine(self.geometry, seed);
        self.overlay = Overlay::None;
        info!("game {} started", self.games_started);
    }

    /// Applies one input. Returns false when the player quits.
    fn handle_input(&mut self, input: GameInput) -> bool {
        match input {
            GameInput::Quit => return false,
            GameInput::Confirm if self.engine.is_over() => self.restart(),
            GameInput::Confirm if self.overlay == Overlay::Start => {
                self.overlay = Overlay::None;
            }
            GameInput::Confirm => {}
            GameInput::Pause if !self.engine.is_over() => {
                self.overlay = match self.overlay {
                    Overlay::None => Overlay::Pause,
                    Overlay::Pause => Overlay::None,
                    Overlay::Start => Overlay::Start,
                };
            }
            GameInput::Pause => {}
            GameInput::Direction(direction) => {
                if self.overlay == Overlay::None {
                    self.engine.set_direction(direction);
                }
            }
        }
        true
    }

    fn is_running(&self) -> bool {
        self.overlay == Overlay::None && !self.engine.is_over()
    }
}

fn new_engine(geometry: BoardGeometry, seed: Option<u64>) -> GameEngine {
    match seed {
        Some(seed) => GameEngine::new_with_seed(geometry, seed),
        None => GameEngine::new(geometry),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let geometry = match &cli.config {
        Some(path) => match load_geometry(path) {
            Ok(geometry) => geometry,
            Err(error) => {
                eprintln!("{}: {error}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => BoardGeometry::default(),
    };

    if let Err(error) = init_file_logger(&cli.log_file, cli.log_level) {
        eprintln!(
            "Logging disabled, cannot open {}: {error}",
            cli.log_file.display()
        );
    }
    info!("starting with {geometry:?}, seed {:?}", cli.seed);

    match run(geometry, cli.seed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(run_error) => {
            error!("terminal failure: {run_error}");
            eprintln!("snek: {run_error}");
            ExitCode::FAILURE
        }
    }
}

fn run(geometry: BoardGeometry, seed: Option<u64>) -> io::Result<()> {
    let mut screen = GameScreen::enter(geometry, &THEME_CLASSIC)?;
    let mut input = InputHandler::new(FRAME_POLL_INTERVAL);
    let mut session = Session::new(geometry, seed);
    let mut last_tick = Instant::now();

    loop {
        let state = session.engine.snapshot();
        screen.present(&state, session.overlay)?;

        if let Some(game_input) = input.poll_input()? {
            let games_started = session.games_started;
            if !session.handle_input(game_input) {
                break;
            }
            if session.games_started != games_started {
                screen.invalidate()?;
            }
        }

        if !session.is_running() {
            last_tick = Instant::now();
            continue;
        }

        if last_tick.elapsed() >= tick_interval_for_speed(state.speed_level) {
            session.engine.step();
            last_tick = Instant::now();
        }
    }

    info!("quit");
    Ok(())
}
