/// Entry point and game loop.
///
/// The loop polls input every frame, but the simulation only advances
/// once per `tick_rate_ms`. Directions pressed between ticks pile up in
/// the world's input queue and are all applied on the next tick.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::path::Path;
use std::time::{Duration, Instant};

use log::{error, info};

use config::GameConfig;
use sim::level::{self, LevelSet};
use sim::step;
use sim::world::WorldState;
use ui::gamepad::GamepadState;
use ui::input::{Command, InputState};
use ui::renderer::{Hud, Renderer};

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = GameConfig::load();

    // A level file on the command line is played alone.
    let levels = match std::env::args().nth(1) {
        Some(path) => match level::load_file(Path::new(&path)) {
            Ok(def) => LevelSet::new(vec![def]),
            Err(e) => {
                error!("cannot load {path}: {e}");
                eprintln!("Cannot load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => level::collect_levels(&config),
    };

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = game_loop(levels, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        error!("game stopped: {e}");
        eprintln!("Game error: {e}");
        std::process::exit(1);
    }
}

fn game_loop(
    mut levels: LevelSet,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);
    let mut last_tick = Instant::now();

    let mut world = start_level(levels.current())?;
    let mut status = String::new();

    loop {
        kb.drain_events();
        gp.update();

        let commands = kb.commands().iter().copied().chain(gp.commands());
        for cmd in commands {
            match cmd {
                Command::Move(dir) => world.push_input(dir),
                Command::Restart => {
                    info!("restarting {:?}", world.name());
                    world.restart();
                    status = "restarted".to_string();
                }
                Command::NextLevel => {
                    world = start_level(levels.advance())?;
                    status.clear();
                    renderer.invalidate()?;
                }
                Command::PrevLevel => {
                    world = start_level(levels.retreat())?;
                    status.clear();
                    renderer.invalidate()?;
                }
                Command::Quit => return Ok(()),
            }
        }

        if last_tick.elapsed() >= tick_rate {
            let events = step::advance_tick(&mut world)?;
            if let Some(last) = events.last() {
                status = last.describe();
            }
            last_tick = Instant::now();
        }

        let hud = Hud {
            level_index: levels.index(),
            level_count: levels.len(),
            status: &status,
            gamepad: gp.connected,
        };
        renderer.render(&world, &hud)?;
        std::thread::sleep(FRAME_SLEEP);
    }
}

fn start_level(def: &level::LevelDef) -> Result<WorldState, error::LevelError> {
    let world = WorldState::from_level(def)?;
    info!("loaded {:?} ({}x{})", world.name(), world.width(), world.height());
    Ok(world)
}
