/// Entry point and game loop.

mod ui;

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use rockfall::config::GameConfig;
use rockfall::domain::tile::Lock;
use rockfall::sim::level::{builtin_level, load_level};
use rockfall::{GameEvent, WorldState};
use ui::gamepad::GamepadState;
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// How long a status message stays up, in ticks (~2 s at the default rate).
const MESSAGE_TICKS: u32 = 60;

fn main() -> anyhow::Result<()> {
    let config = GameConfig::load();
    init_tracing(&config)?;
    for warning in &config.warnings {
        tracing::warn!(%warning, "config");
    }

    let level = match &config.level_file {
        Some(path) => load_level(path)
            .with_context(|| format!("failed to load level {}", path.display()))?,
        None => builtin_level().context("built-in level is invalid")?,
    };
    let mut world = WorldState::from_level(level).context("level cannot start")?;
    tracing::info!(
        level = %world.level_name,
        tick_rate_ms = config.speed.tick_rate_ms,
        "starting"
    );

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        let _ = renderer.cleanup();
        return Err(e).context("terminal init failed");
    }

    let result = game_loop(&mut world, &mut renderer, &config);
    let cleanup = renderer.cleanup();
    if let Err(e) = &result {
        tracing::error!(error = %e, tick = world.tick, "game loop aborted");
    }

    result?;
    cleanup.context("terminal cleanup failed")?;

    println!("Thanks for playing Rockfall! ({} ticks)", world.tick);
    Ok(())
}

/// `RUST_LOG` wins; otherwise warnings only. Writes to `log_file` when
/// configured, else stderr.
fn init_tracing(config: &GameConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact();

    match &config.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

// ── Status line ──

#[derive(Default)]
struct Status {
    text: String,
    ticks_left: u32,
}

impl Status {
    fn show(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.ticks_left = MESSAGE_TICKS;
    }

    fn tick(&mut self) {
        if self.ticks_left > 0 {
            self.ticks_left -= 1;
            if self.ticks_left == 0 { self.text.clear(); }
        }
    }
}

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    config: &GameConfig,
) -> anyhow::Result<()> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let mut status = Status::default();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(config.speed.tick_rate_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.quit_pressed() || gp.quit_pressed() {
            break;
        }
        if kb.restart_pressed() || gp.restart_pressed() {
            world.restart();
            status.show("Level restarted");
        }

        for &dir in kb.moves() {
            world.enqueue(dir);
        }
        for dir in gp.moves() {
            world.enqueue(dir);
        }

        if last_tick.elapsed() >= tick_rate {
            world.tick();
            last_tick = Instant::now();
            status.tick();
            for event in world.drain_events() {
                tracing::debug!(tick = world.tick, ?event, "game event");
                if let Some(text) = describe(&event) {
                    status.show(text);
                }
            }
        }

        renderer.render(world, &status.text).context("render failed")?;

        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Status-bar text for events worth telling the player about.
fn describe(event: &GameEvent) -> Option<String> {
    match *event {
        GameEvent::LocksOpened { lock, count } => {
            let n = match lock {
                Lock::One => 1,
                Lock::Two => 2,
            };
            Some(match count {
                0 => format!("Key {n} collected"),
                1 => format!("Key {n} collected: 1 lock opened"),
                _ => format!("Key {n} collected: {count} locks opened"),
            })
        }
        _ => None,
    }
}
