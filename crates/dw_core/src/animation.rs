//! Motion-type frame animation with deterministic counter-based advancement.
//!
//! An animator owns one frame sequence per named **motion type** ("left",
//! "front", "1h", ...). Each `advance` call bumps that type's counter by
//! exactly 1; the displayed frame index is `floor(counter * speed)`, and the
//! counter resets to 0 the moment that product would reach the sequence
//! length. `speed` in `(0, 1]` therefore throttles the perceived frame rate
//! without changing the counter's own growth within a cycle.
//!
//! Motion types live in a `BTreeMap`, so the `next_type` cycling used by
//! multi-state objects walks a fixed lexicographic order structurally -- no
//! separate ordering table to drift out of sync.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::ops::Bound;
use std::path::Path;

/// One motion type's frames plus its private progress counter.
#[derive(Debug, Clone)]
struct Track {
    frames: Vec<String>,
    counter: u32,
}

/// Top-level animator definition file (deserialized from JSON).
#[derive(Debug, Clone)]
pub struct AnimatorFile {
    pub version: String,
    pub animator_id: String,
    pub speed: f64,
    pub sequences: BTreeMap<String, Vec<String>>,
}

/// Runtime animator state. Counters are per-type and independent: switching
/// motion types never resets another type's progress.
#[derive(Debug, Clone)]
pub struct Animator {
    speed: f64,
    tracks: BTreeMap<String, Track>,
    current: Option<String>,
}

impl Animator {
    pub fn from_file(file: AnimatorFile) -> Self {
        let tracks = file
            .sequences
            .into_iter()
            .map(|(name, frames)| (name, Track { frames, counter: 0 }))
            .collect();
        Self {
            speed: file.speed,
            tracks,
            current: None,
        }
    }

    /// Advance the given motion type by one call and return the sprite id of
    /// the frame now displayed. Unknown types are an error, never an empty
    /// frame.
    pub fn advance(&mut self, motion_type: &str) -> Result<&str, String> {
        let speed = self.speed;
        let track = self
            .tracks
            .get_mut(motion_type)
            .ok_or_else(|| format!("Animator has no motion type '{motion_type}'"))?;

        track.counter += 1;
        let mut index = (f64::from(track.counter) * speed).floor() as usize;
        if index >= track.frames.len() {
            track.counter = 0;
            index = 0;
        }
        self.current = Some(motion_type.to_string());
        Ok(&self.tracks[motion_type].frames[index])
    }

    /// The motion type used by the most recent `advance`, if any.
    pub fn current_type(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Cycle to the lexicographically next known motion type, wrapping to the
    /// first after the last. Counters are untouched. Requires a prior
    /// `advance` so there is a current type to cycle from.
    pub fn next_type(&mut self) -> Result<String, String> {
        let current = self
            .current
            .clone()
            .ok_or_else(|| "Animator has no current motion type to cycle from".to_string())?;
        let next = self
            .tracks
            .range::<String, _>((Bound::Excluded(&current), Bound::Unbounded))
            .next()
            .or_else(|| self.tracks.iter().next())
            .map(|(name, _)| name.clone())
            .ok_or_else(|| "Animator has no motion types".to_string())?;
        self.current = Some(next.clone());
        Ok(next)
    }

    pub fn has_type(&self, motion_type: &str) -> bool {
        self.tracks.contains_key(motion_type)
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.tracks.keys().map(String::as_str)
    }

    /// Frame index the given type would display without advancing.
    pub fn frame_index(&self, motion_type: &str) -> Result<usize, String> {
        let track = self
            .tracks
            .get(motion_type)
            .ok_or_else(|| format!("Animator has no motion type '{motion_type}'"))?;
        Ok((f64::from(track.counter) * self.speed).floor() as usize)
    }
}

// --- JSON deserialization types (private) ---

#[derive(Debug, Deserialize)]
struct AnimatorFileJson {
    version: String,
    animator_id: String,
    speed: f64,
    sequences: BTreeMap<String, Vec<String>>,
}

/// Load an animator definition file from disk.
pub fn load_animator_file(path: &Path) -> Result<AnimatorFile, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read animator file {}: {e}", path.display()))?;
    let json: AnimatorFileJson = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse animator file {}: {e}", path.display()))?;
    validate_animator_json(&json)?;
    Ok(AnimatorFile {
        version: json.version,
        animator_id: json.animator_id,
        speed: json.speed,
        sequences: json.sequences,
    })
}

fn validate_animator_json(json: &AnimatorFileJson) -> Result<(), String> {
    if json.version != "0.1" {
        return Err(format!(
            "Animator validation failed: unsupported version '{}'",
            json.version
        ));
    }
    if json.animator_id.is_empty() {
        return Err("Animator validation failed: animator_id is empty".to_string());
    }
    if !(json.speed > 0.0 && json.speed <= 1.0) {
        return Err(format!(
            "Animator validation failed: speed {} outside (0, 1]",
            json.speed
        ));
    }
    if json.sequences.is_empty() {
        return Err("Animator validation failed: no motion types declared".to_string());
    }
    for (name, frames) in &json.sequences {
        if frames.is_empty() {
            return Err(format!(
                "Animator validation failed: motion type '{}' has no frames",
                name
            ));
        }
        for (i, sprite_id) in frames.iter().enumerate() {
            if sprite_id.is_empty() {
                return Err(format!(
                    "Animator validation failed: motion type '{}' frame {} has empty sprite id",
                    name, i
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "dw_anim_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn make_animator(speed: f64, sequences: &[(&str, usize)]) -> Animator {
        let sequences = sequences
            .iter()
            .map(|&(name, count)| {
                let frames = (0..count).map(|i| format!("{name}_{i}")).collect();
                (name.to_string(), frames)
            })
            .collect();
        Animator::from_file(AnimatorFile {
            version: "0.1".to_string(),
            animator_id: "test".to_string(),
            speed,
            sequences,
        })
    }

    #[test]
    fn full_speed_cycles_all_frames_and_wraps() {
        let mut animator = make_animator(1.0, &[("walk", 3)]);
        let seen: Vec<String> = (0..6)
            .map(|_| animator.advance("walk").expect("known type").to_string())
            .collect();
        // counter goes 1, 2, wrap-to-0, 1, 2, wrap-to-0
        assert_eq!(seen, ["walk_1", "walk_2", "walk_0", "walk_1", "walk_2", "walk_0"]);
    }

    #[test]
    fn half_speed_holds_each_frame_two_calls() {
        let mut animator = make_animator(0.5, &[("walk", 2)]);
        let seen: Vec<usize> = (0..8)
            .map(|_| {
                animator.advance("walk").expect("known type");
                animator.frame_index("walk").expect("known type")
            })
            .collect();
        // counter 1..=3 give indices 0,1,1 then product reaches len and wraps
        assert_eq!(seen, [0, 1, 1, 0, 0, 1, 1, 0]);
    }

    #[test]
    fn single_frame_always_index_zero() {
        let mut animator = make_animator(1.0, &[("idle", 1)]);
        for _ in 0..5 {
            assert_eq!(animator.advance("idle").expect("known type"), "idle_0");
        }
    }

    #[test]
    fn counters_are_independent_per_type() {
        let mut animator = make_animator(1.0, &[("left", 4), ("right", 4)]);
        animator.advance("left").expect("known type");
        animator.advance("left").expect("known type");
        // Switching types must not reset left's counter.
        assert_eq!(animator.advance("right").expect("known type"), "right_1");
        assert_eq!(animator.advance("left").expect("known type"), "left_3");
    }

    #[test]
    fn unknown_type_is_an_error() {
        let mut animator = make_animator(1.0, &[("walk", 2)]);
        let err = animator.advance("swim").expect_err("unknown type should fail");
        assert!(err.contains("no motion type 'swim'"));
    }

    #[test]
    fn current_type_tracks_last_advance() {
        let mut animator = make_animator(1.0, &[("left", 2), ("right", 2)]);
        assert_eq!(animator.current_type(), None);
        animator.advance("right").expect("known type");
        assert_eq!(animator.current_type(), Some("right"));
        animator.advance("left").expect("known type");
        assert_eq!(animator.current_type(), Some("left"));
    }

    #[test]
    fn next_type_walks_lexicographic_order_and_wraps() {
        let mut animator = make_animator(1.0, &[("0", 1), ("0h", 1), ("1", 1), ("1h", 1)]);
        animator.advance("0h").expect("known type");
        assert_eq!(animator.next_type().expect("has current"), "1");
        assert_eq!(animator.next_type().expect("has current"), "1h");
        assert_eq!(animator.next_type().expect("has current"), "0");
        assert_eq!(animator.current_type(), Some("0"));
    }

    #[test]
    fn next_type_without_advance_is_an_error() {
        let mut animator = make_animator(1.0, &[("walk", 2)]);
        assert!(animator.next_type().is_err());
    }

    #[test]
    fn load_animator_file_parses_valid_json() {
        let path = temp_file_path("valid");
        let json = r#"
        {
          "version": "0.1",
          "animator_id": "turtle",
          "speed": 0.5,
          "sequences": {
            "left": ["turtle-left-1", "turtle-left-2"],
            "right": ["turtle-right-1", "turtle-right-2"]
          }
        }
        "#;
        fs::write(&path, json).expect("write temp file");

        let file = load_animator_file(&path).expect("should parse");
        assert_eq!(file.animator_id, "turtle");
        assert_eq!(file.speed, 0.5);
        assert_eq!(file.sequences.len(), 2);
        assert_eq!(file.sequences["left"].len(), 2);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_animator_file_rejects_empty_sequence() {
        let path = temp_file_path("empty_seq");
        let json = r#"
        {
          "version": "0.1",
          "animator_id": "turtle",
          "speed": 0.5,
          "sequences": { "left": [] }
        }
        "#;
        fs::write(&path, json).expect("write temp file");
        let err = load_animator_file(&path).expect_err("empty sequence should fail");
        assert!(err.contains("has no frames"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_animator_file_rejects_bad_speed() {
        let path = temp_file_path("bad_speed");
        let json = r#"
        {
          "version": "0.1",
          "animator_id": "turtle",
          "speed": 1.5,
          "sequences": { "left": ["a"] }
        }
        "#;
        fs::write(&path, json).expect("write temp file");
        let err = load_animator_file(&path).expect_err("speed > 1 should fail");
        assert!(err.contains("outside (0, 1]"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_animator_file_rejects_bad_version() {
        let path = temp_file_path("bad_version");
        let json = r#"
        {
          "version": "9.9",
          "animator_id": "turtle",
          "speed": 0.5,
          "sequences": { "left": ["a"] }
        }
        "#;
        fs::write(&path, json).expect("write temp file");
        let err = load_animator_file(&path).expect_err("bad version should fail");
        assert!(err.contains("unsupported version"));
        let _ = fs::remove_file(path);
    }
}
