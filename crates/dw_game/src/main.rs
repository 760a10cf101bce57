//! Driftwood -- a small deterministic adventure, run from recorded input.
//!
//! The simulation is a pure fixed-timestep function of its input sequence:
//! load the asset tree, expand a replay script into one `InputState` per
//! tick, and feed them to the world in order. The default mode runs as fast
//! as the machine allows and verifies the script completes the story;
//! `--realtime` paces ticks against the wall clock so a run can be watched
//! through a logging render sink.

mod character;
mod chatbox;
mod defs;
mod guide;
mod interactable;
mod render;
mod replay;
mod room;
mod sprite;
mod story;
mod world;

use std::path::PathBuf;
use std::process::ExitCode;

use dw_core::input::InputState;
use dw_core::time::{TickClock, TICK_RATE};

use render::NullSink;
use replay::load_replay;
use world::World;

pub const SCREEN_W: i32 = 1080;
pub const SCREEN_H: i32 = 700;

/// Grace period after the script runs out, enough for any in-flight speech
/// to drain and the final beat to settle.
const TRAILING_IDLE_TICKS: u64 = 3000;

struct Args {
    asset_root: PathBuf,
    replay_path: PathBuf,
    realtime: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut asset_root = None;
    let mut replay_path = None;
    let mut realtime = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--realtime" => realtime = true,
            other if asset_root.is_none() => asset_root = Some(PathBuf::from(other)),
            other if replay_path.is_none() => replay_path = Some(PathBuf::from(other)),
            other => return Err(format!("Unexpected argument '{other}'")),
        }
    }
    match (asset_root, replay_path) {
        (Some(asset_root), Some(replay_path)) => Ok(Args {
            asset_root,
            replay_path,
            realtime,
        }),
        _ => Err("Usage: driftwood <asset_root> <replay.json> [--realtime]".to_string()),
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let script = load_replay(&args.replay_path)?;
    let inputs = script.expanded_inputs()?;
    let mut world = World::load(&args.asset_root)?;
    let mut sink = NullSink;

    if args.realtime {
        let mut clock = TickClock::new(TICK_RATE);
        let mut next = 0usize;
        while !world.is_finished() && world.tick_count() < inputs.len() as u64 + TRAILING_IDLE_TICKS
        {
            clock.begin_frame();
            while clock.should_step() {
                let input = inputs.get(next).cloned().unwrap_or_default();
                next += 1;
                world.tick(&input)?;
            }
            world.draw_into(&mut sink);
            clock.pace();
        }
    } else {
        for input in &inputs {
            world.tick(input)?;
            world.draw_into(&mut sink);
            if world.is_finished() {
                break;
            }
        }
        // Idle out the tail: conversations keep playing after the last frame.
        let idle = InputState::new();
        let mut remaining = TRAILING_IDLE_TICKS;
        while !world.is_finished() && remaining > 0 {
            world.tick(&idle)?;
            world.draw_into(&mut sink);
            remaining -= 1;
        }
    }

    if !world.is_finished() {
        return Err(format!(
            "Replay ended after {} ticks without completing the story (stuck in '{}')",
            world.tick_count(),
            world.current_room().key()
        ));
    }
    log::info!("Story completed in {} ticks", world.tick_count());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Driftwood starting...");
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
