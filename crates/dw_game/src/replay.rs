//! Recorded input scripts.
//!
//! A replay is a versioned JSON list of input frames, each optionally
//! repeated. Expanding a script yields one `InputState` per simulation tick;
//! feeding that sequence to a fresh world reproduces the run exactly, which
//! is what makes headless verification possible. Edge events (interact,
//! guide, any-key) fire only on the first tick of a repeated frame; held
//! keys persist across the whole span.

use dw_core::input::{Button, InputState, Key};
use dw_core::time::TICK_RATE;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    pub version: String,
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplayFrame {
    #[serde(default)]
    pub held: Vec<String>,
    #[serde(default)]
    pub interact: bool,
    #[serde(default)]
    pub guide: bool,
    #[serde(default)]
    pub any_key: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_tick_rate() -> u32 {
    TICK_RATE
}

fn default_repeat() -> u32 {
    1
}

impl ReplayScript {
    /// One `InputState` per tick, in order.
    pub fn expanded_inputs(&self) -> Result<Vec<InputState>, String> {
        let mut inputs = Vec::new();
        for frame in &self.frames {
            let mut first = InputState::new();
            for name in &frame.held {
                first.key_down(parse_key(name)?);
            }
            if frame.interact {
                first.button_down(Button::Interact);
            }
            if frame.guide {
                first.button_down(Button::Guide);
            }
            if frame.any_key {
                first.observe_key_event();
            }

            let mut rest = first.clone();
            rest.end_frame();
            inputs.push(first);
            for _ in 1..frame.repeat {
                inputs.push(rest.clone());
            }
        }
        Ok(inputs)
    }
}

fn parse_key(name: &str) -> Result<Key, String> {
    match name {
        "up" => Ok(Key::Up),
        "down" => Ok(Key::Down),
        "left" => Ok(Key::Left),
        "right" => Ok(Key::Right),
        other => Err(format!("Replay validation failed: unknown key '{other}'")),
    }
}

pub fn load_replay(path: &Path) -> Result<ReplayScript, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read replay {}: {e}", path.display()))?;
    let script: ReplayScript = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay {}: {e}", path.display()))?;
    validate_replay(&script)?;
    log::info!(
        "Loaded replay {} ({} frames)",
        path.display(),
        script.frames.len()
    );
    Ok(script)
}

fn validate_replay(script: &ReplayScript) -> Result<(), String> {
    if script.version != "0.1" {
        return Err(format!(
            "Replay validation failed: unsupported version '{}'",
            script.version
        ));
    }
    // A script recorded at a different rate would desync the whole run.
    if script.tick_rate != TICK_RATE {
        return Err(format!(
            "Replay validation failed: tick rate {} does not match the simulation rate {}",
            script.tick_rate, TICK_RATE
        ));
    }
    for (i, frame) in script.frames.iter().enumerate() {
        if frame.repeat == 0 {
            return Err(format!(
                "Replay validation failed: frame {i} has repeat 0"
            ));
        }
        for name in &frame.held {
            parse_key(name)?;
        }
    }
    Ok(())
}
