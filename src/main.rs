use std::io;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    style::ResetColor,
    terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode, size},
};
use log::{debug, error, info};

use rock_wedge::constants::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, DEFAULT_TICK_MS};
use rock_wedge::rendering::{OutputTarget, Renderer, ScreenBuffer, TerminalRenderer};
use rock_wedge::terminal_io::{InputCommand, InputSource, SimulatedInput};
use rock_wedge::{Game, GameConfig, GameError, TickReport};

const DEBUG_QUIT_FRAME: u64 = 10;

#[derive(Parser, Debug)]
#[command(name = "rock-wedge")]
#[command(about = "Wrap-around asteroids in the terminal")]
struct Cli {
    /// Play-field width in game units
    #[arg(long, default_value_t = DEFAULT_SCREEN_WIDTH)]
    width: i32,
    /// Play-field height in game units
    #[arg(long, default_value_t = DEFAULT_SCREEN_HEIGHT)]
    height: i32,
    /// Spawn seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Milliseconds between frames
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    tick_ms: u64,
    /// Run headless with scripted input, dumping each frame to the log
    #[arg(long)]
    debug: bool,
    /// Headless grid width in cells
    #[arg(long, default_value_t = 80)]
    debug_columns: u16,
    /// Headless grid height in cells
    #[arg(long, default_value_t = 24)]
    debug_rows: u16,
    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,
    /// Log per-tick detail
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> GameConfig {
        let seed = self.seed.unwrap_or_else(rand::random::<u64>);
        GameConfig {
            width: self.width,
            height: self.height,
            seed,
            tick_interval: Duration::from_millis(self.tick_ms),
        }
    }
}

/// Raw mode and a hidden cursor for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn acquire() -> Result<(Self, u16, u16), GameError> {
        info!("Attempting to enable raw mode.");
        enable_raw_mode().map_err(|e| GameError::InitializationFailure(format!("raw mode: {e}")))?;
        let guard = TerminalGuard;
        let (columns, rows) = size().map_err(|e| GameError::InitializationFailure(format!("terminal size: {e}")))?;
        execute!(io::stdout(), Hide, Clear(ClearType::All))
            .map_err(|e| GameError::InitializationFailure(format!("screen setup: {e}")))?;
        info!("Terminal size: {}x{}", columns, rows);
        Ok((guard, columns, rows))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), ResetColor, Clear(ClearType::All), Show) {
            error!("Failed to restore screen: {}", e);
        }
        if let Err(e) = disable_raw_mode() {
            error!("Failed to disable raw mode: {}", e);
        }
    }
}

/// Drives the session: drain input, advance one tick, draw. Returns the
/// number of frames run.
fn run_session(
    game: &mut Game,
    input: &mut InputSource,
    renderer: &mut impl Renderer,
    max_frames: Option<u64>,
    pause: Option<Duration>,
) -> io::Result<u64> {
    let mut frame = 0;
    'session: while max_frames.is_none_or(|max| frame < max) {
        for command in input.drain(frame)? {
            match command {
                InputCommand::Quit => {
                    info!("Quit requested at frame {}", frame);
                    break 'session;
                }
                InputCommand::Restart if !game.is_alive() => game.restart(),
                InputCommand::Restart => {}
                InputCommand::Player(action) => {
                    game.apply(action);
                }
            }
        }

        let report = game.step();
        if report != TickReport::default() {
            debug!("Tick {}: {:?}", game.ticks(), report);
        }

        renderer.draw(&game.view())?;
        frame += 1;

        if let Some(pause) = pause {
            thread::sleep(pause);
        }
    }
    Ok(frame)
}

fn run(cli: &Cli) -> Result<(), GameError> {
    let config = cli.config();
    let mut game = Game::new(config.clone())?;

    let frames = if cli.debug {
        info!("Debug mode enabled.");
        let (columns, rows) = (cli.debug_columns, cli.debug_rows);
        let quit_frame = cli.max_frames.unwrap_or(DEBUG_QUIT_FRAME);
        let mut input = InputSource::Simulated(SimulatedInput::demo_script(quit_frame));
        let mut renderer = TerminalRenderer::new(columns, rows, OutputTarget::ScreenBuffer(ScreenBuffer::new(columns, rows)));
        run_session(&mut game, &mut input, &mut renderer, Some(quit_frame + 1), None)?
    } else {
        let (_guard, columns, rows) = TerminalGuard::acquire()?;
        let mut input = InputSource::Terminal;
        let mut renderer = TerminalRenderer::new(columns, rows, OutputTarget::Stdout(io::stdout()));
        run_session(&mut game, &mut input, &mut renderer, cli.max_frames, Some(config.tick_interval))?
    };

    info!(
        "Session ended after {} frames: score {}, lives {}, level {}",
        frames,
        game.score(),
        game.lives(),
        game.level()
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    if let Err(e) = simple_logging::log_to_file("rock-wedge.log", level) {
        eprintln!("Failed to open log file: {e}");
    }
    info!("Starting rock-wedge.");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
