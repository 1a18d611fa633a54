use chrono::Local;
use color_eyre::Result;
use padcontrols::controller::GilrsHardware;
use padcontrols::input::{ids, press_action, ActionContext, AppContext, ButtonState, ScreenKind};
use padcontrols::movement::PlayerInput;
use padcontrols::{Controls, ControlsConfig};
use std::time::{Duration, Instant};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, trace};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

const STEP: Duration = Duration::from_millis(50);
const FRAME: Duration = Duration::from_millis(16);
const WINDOW: (u32, u32) = (854, 480);

type LogFilterHandle = reload::Handle<EnvFilter, Registry>;

/// Stand-in for the game: tracks the open screen and the player's input.
struct DemoHost {
    screen: ScreenKind,
    sneaking: bool,
    player: PlayerInput,
}

impl AppContext for DemoHost {
    fn screen(&self) -> ScreenKind {
        self.screen
    }

    fn is_sneaking(&self) -> bool {
        self.sneaking
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let log_filter = setup()?;

    let config_path = ControlsConfig::default_path()?;
    let config = ControlsConfig::load_or_default(&config_path).await?;
    if config.debug {
        log_filter.modify(|filter| *filter = EnvFilter::new("debug"))?;
        debug!("Debug logging enabled by config");
    }
    info!("Using config {}", config_path.display());

    let mappings_path = config.mappings_path(&config_path);
    let hardware = GilrsHardware::new()?;
    let mut controls = Controls::new(config, hardware, WINDOW)?.with_mappings_path(mappings_path);
    register_demo_actions(&mut controls)?;
    controls.init();

    let mut host = DemoHost {
        screen: ScreenKind::InGame,
        sneaking: false,
        player: PlayerInput::default(),
    };

    let mut step_timer = interval(STEP);
    step_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut frame_timer = interval(FRAME);
    frame_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_step = Instant::now();

    // For performance monitoring
    let mut event_count = 0usize;
    let mut last_log_time = Local::now();
    let log_interval = chrono::Duration::seconds(10);

    loop {
        tokio::select! {
            _ = step_timer.tick() => {
                last_step = Instant::now();
                if let Some(report) = controls.tick(&mut host) {
                    for event in &report.events {
                        debug!("{} {} ({:.2})", event.binding, event.state, event.value);
                    }
                    event_count += report.events.len();
                }
                controls.apply_movement(&mut host.player);

                for notification in controls.take_notifications() {
                    info!("{}", notification);
                }

                let now = Local::now();
                if now - last_log_time > log_interval {
                    info!(
                        "Controls stats: {} events in last {} seconds, mode {}, player {:?}",
                        event_count,
                        log_interval.num_seconds(),
                        controls.controls_mode(),
                        host.player
                    );
                    event_count = 0;
                    last_log_time = now;
                }
            }
            _ = frame_timer.tick() => {
                let fraction = (last_step.elapsed().as_secs_f32() / STEP.as_secs_f32()).min(1.0);
                let (x, y) = controls.render_position(fraction);
                trace!("Pointer at ({:.1}, {:.1})", x, y);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    controls.config().save(&config_path).await?;
    Ok(())
}

/// Screen and sneak toggles so the stock bindings have something to drive.
fn register_demo_actions(controls: &mut Controls<DemoHost, GilrsHardware>) -> Result<()> {
    let registry = controls.input_mut().registry_mut();

    registry.add_action(
        ids::INVENTORY,
        press_action(|cx: &mut ActionContext<'_, DemoHost>, _, state| {
            if state == ButtonState::Press {
                cx.app.screen = match cx.app.screen {
                    ScreenKind::Inventory => ScreenKind::InGame,
                    _ => ScreenKind::Inventory,
                };
                info!("Screen is now {:?}", cx.app.screen);
            }
            Ok(true)
        }),
    )?;

    registry.add_action(
        ids::PAUSE_GAME,
        press_action(|cx: &mut ActionContext<'_, DemoHost>, _, state| {
            if state == ButtonState::Press {
                cx.app.screen = match cx.app.screen {
                    ScreenKind::InGame => ScreenKind::NonInteractive,
                    _ => ScreenKind::InGame,
                };
                info!("Screen is now {:?}", cx.app.screen);
            }
            Ok(true)
        }),
    )?;

    registry.add_action(
        ids::SNEAK,
        press_action(|cx: &mut ActionContext<'_, DemoHost>, _, _| {
            cx.app.sneaking = cx.pressed;
            Ok(false)
        }),
    )?;
    Ok(())
}

fn setup() -> Result<LogFilterHandle> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    Ok(setup_logging_env())
}

/// Installs the subscriber with a `RUST_LOG` filter that can be raised later.
fn setup_logging_env() -> LogFilterHandle {
    let (filter, handle) = reload::Layer::new(EnvFilter::from_default_env());
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .pretty(),
        )
        .init();
    handle
}
