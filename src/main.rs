//! Headless choreography session: plays a preset and logs what the camera
//! and groups do.
//!
//! Frames are simulated at a fixed rate by default. `--realtime` paces them
//! against the wall clock instead.

use std::path::Path;
use std::time::Duration;

use choreo::animation::GroupState;
use choreo::util::frame_clock::FrameClock;
use choreo::{ChoreoCommand, ChoreoError, ChoreoOptions, Choreographer};

/// Simulated frame rate for the headless session.
const FRAME_RATE: f32 = 60.0;
/// Seconds the session runs before the groups are dissolved.
const DISSOLVE_AT: f32 = 5.0;
/// Hard stop for the session.
const SESSION_LENGTH: f32 = 8.0;

/// Where frame times come from.
enum FrameSource {
    /// Fixed steps of `1 / FRAME_RATE`, no waiting.
    Simulated { frame: u32 },
    /// Wall-clock time, sleeping roughly one frame between ticks.
    Realtime(FrameClock),
}

impl FrameSource {
    fn new(realtime: bool) -> Self {
        if realtime {
            Self::Realtime(FrameClock::new())
        } else {
            Self::Simulated { frame: 0 }
        }
    }

    /// `(now, dt)` for the next frame.
    fn next_frame(&mut self) -> (f32, f32) {
        let step = FRAME_RATE.recip();
        match self {
            Self::Simulated { frame } => {
                let now = *frame as f32 * step;
                *frame += 1;
                (now, step)
            }
            Self::Realtime(clock) => {
                std::thread::sleep(Duration::from_secs_f32(step));
                let time = clock.advance();
                (time.now, time.dt)
            }
        }
    }

    fn fps(&self) -> f32 {
        match self {
            Self::Simulated { .. } => FRAME_RATE,
            Self::Realtime(clock) => clock.fps(),
        }
    }
}

fn load_options(path: Option<&str>) -> Result<ChoreoOptions, ChoreoError> {
    match path {
        Some(path) => {
            log::info!("loading preset {path}");
            ChoreoOptions::load(Path::new(path))
        }
        None => Ok(ChoreoOptions::default()),
    }
}

#[allow(clippy::print_stdout)]
fn print_schema() -> Result<(), ChoreoError> {
    let schema = serde_json::to_string_pretty(&ChoreoOptions::json_schema())
        .map_err(|e| ChoreoError::OptionsParse(e.to_string()))?;
    println!("{schema}");
    Ok(())
}

fn set_all_groups(
    choreo: &mut Choreographer,
    state: GroupState,
) -> Result<(), ChoreoError> {
    let keys: Vec<String> = choreo.group_keys().map(str::to_owned).collect();
    for key in keys {
        choreo.execute(ChoreoCommand::SetGroupState { key, state })?;
    }
    Ok(())
}

/// Drive a scripted session: the first configured transition plays while
/// every group builds, then the groups dissolve.
fn run_session(
    options: &ChoreoOptions,
    realtime: bool,
) -> Result<(), ChoreoError> {
    let mut choreo = Choreographer::new(options)?;
    choreo.set_completion_handler(|key| {
        log::info!("completion handler: '{key}'");
    });

    if let Some(first) = options.transitions.first() {
        choreo.execute(ChoreoCommand::StartTransition {
            key: first.key.clone(),
        })?;
    }
    set_all_groups(&mut choreo, GroupState::Building)?;

    let mut frames = FrameSource::new(realtime);
    let mut frame: u32 = 0;
    let mut dissolved = false;
    loop {
        let (now, dt) = frames.next_frame();
        if now > SESSION_LENGTH {
            break;
        }
        if !dissolved && now >= DISSOLVE_AT {
            set_all_groups(&mut choreo, GroupState::Dissolving)?;
            dissolved = true;
        }

        let report = choreo.tick(now, dt);
        for (key, state) in &report.settled {
            log::info!("t={now:.2}s group '{key}' settled in {}", state.name());
        }
        if frame % 30 == 0 {
            let camera = choreo.camera_frame();
            log::info!(
                "t={now:.2}s fps={:.0} progress={:.3} eye={:.2} look_at={:.2}",
                frames.fps(),
                report.progress.unwrap_or(0.0),
                camera.pose.position,
                camera.pose.look_at,
            );
        }
        if dissolved && !choreo.is_animating() {
            log::info!("t={now:.2}s session at rest");
            break;
        }
        frame += 1;
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let has_flag = |flag: &str| args.iter().any(|a| a == flag);
    let preset = args.iter().find(|a| !a.starts_with("--"));

    let result = if has_flag("--schema") {
        print_schema()
    } else {
        load_options(preset.map(String::as_str)).and_then(|options| {
            run_session(&options, has_flag("--realtime"))
        })
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
