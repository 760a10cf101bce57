//! Entity definition files.
//!
//! Every entity the game constructs -- characters, interactables, rooms, the
//! guide -- is described by a small versioned JSON file under the asset root.
//! Loading is strict: a definition that fails validation is fatal for that
//! entity, since the game cannot meaningfully run with incomplete placement
//! or animation data.

use dw_core::geom::Rect;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct PlaceDef {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct SizeDef {
    pub w: i32,
    pub h: i32,
}

/// A player or NPC definition.
#[derive(Debug, Deserialize, Clone)]
pub struct CharacterDef {
    pub version: String,
    pub name: String,
    /// Path to the animator definition, relative to the asset root.
    pub animator: String,
    pub size: SizeDef,
    /// Some characters are placed dynamically (spawned at an entrance)
    /// instead of carrying a fixed position.
    #[serde(default)]
    pub place: Option<PlaceDef>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InteractableDef {
    pub version: String,
    pub name: String,
    pub animator: String,
    pub size: SizeDef,
    pub initial_state: u32,
    pub end_state: u32,
    #[serde(default)]
    pub place: Option<PlaceDef>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EntranceDef {
    /// Name of the room the player is arriving from.
    pub from: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExitDef {
    pub rect: Rect,
    /// Destination room key.
    pub to: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RoomInteractableDef {
    /// Path to the interactable definition, relative to the asset root.
    pub def: String,
    /// Placement override; falls back to the definition's own `place`.
    #[serde(default)]
    pub place: Option<PlaceDef>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RoomDef {
    pub version: String,
    pub name: String,
    /// Backdrop animator path, relative to the asset root.
    pub backdrop: String,
    #[serde(default)]
    pub place: Option<PlaceDef>,
    #[serde(default)]
    pub obstacles: Vec<Rect>,
    #[serde(default)]
    pub entrances: Vec<EntranceDef>,
    #[serde(default)]
    pub exits: Vec<ExitDef>,
    #[serde(default)]
    pub interactables: Vec<RoomInteractableDef>,
    /// Character definition paths for the NPCs this room owns.
    #[serde(default)]
    pub npcs: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GuideDef {
    pub version: String,
    pub lines: Vec<String>,
}

pub fn load_character_def(path: &Path) -> Result<CharacterDef, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read character def {}: {e}", path.display()))?;
    let def: CharacterDef = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse character def {}: {e}", path.display()))?;
    validate_common(&def.version, &def.name, def.size, "Character")?;
    Ok(def)
}

pub fn load_interactable_def(path: &Path) -> Result<InteractableDef, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read interactable def {}: {e}", path.display()))?;
    let def: InteractableDef = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse interactable def {}: {e}", path.display()))?;
    validate_common(&def.version, &def.name, def.size, "Interactable")?;
    Ok(def)
}

pub fn load_room_def(path: &Path) -> Result<RoomDef, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read room def {}: {e}", path.display()))?;
    let def: RoomDef = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse room def {}: {e}", path.display()))?;
    validate_room_def(&def)?;
    Ok(def)
}

pub fn load_guide_def(path: &Path) -> Result<GuideDef, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read guide def {}: {e}", path.display()))?;
    let def: GuideDef = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse guide def {}: {e}", path.display()))?;
    if def.version != "0.1" {
        return Err(format!(
            "Guide validation failed: unsupported version '{}'",
            def.version
        ));
    }
    if def.lines.is_empty() {
        return Err("Guide validation failed: line list is empty".to_string());
    }
    Ok(def)
}

fn validate_common(version: &str, name: &str, size: SizeDef, kind: &str) -> Result<(), String> {
    if version != "0.1" {
        return Err(format!(
            "{kind} validation failed: unsupported version '{version}'"
        ));
    }
    if name.is_empty() {
        return Err(format!("{kind} validation failed: name is empty"));
    }
    if size.w <= 0 || size.h <= 0 {
        return Err(format!(
            "{kind} validation failed: '{name}' has non-positive size {}x{}",
            size.w, size.h
        ));
    }
    Ok(())
}

fn validate_room_def(def: &RoomDef) -> Result<(), String> {
    if def.version != "0.1" {
        return Err(format!(
            "Room validation failed: unsupported version '{}'",
            def.version
        ));
    }
    if def.name.is_empty() {
        return Err("Room validation failed: name is empty".to_string());
    }

    // Entrance lookup must be unambiguous: one entrance per source room.
    let mut froms = HashSet::new();
    for entrance in &def.entrances {
        if entrance.from.is_empty() {
            return Err(format!(
                "Room validation failed: '{}' has an entrance with an empty source name",
                def.name
            ));
        }
        if !froms.insert(entrance.from.as_str()) {
            return Err(format!(
                "Room validation failed: '{}' has duplicate entrance for source '{}'",
                def.name, entrance.from
            ));
        }
    }

    for exit in &def.exits {
        if exit.to.is_empty() {
            return Err(format!(
                "Room validation failed: '{}' has an exit with an empty destination",
                def.name
            ));
        }
        if exit.rect.w <= 0 || exit.rect.h <= 0 {
            return Err(format!(
                "Room validation failed: '{}' has a degenerate exit rect toward '{}'",
                def.name, exit.to
            ));
        }
    }

    for obstacle in &def.obstacles {
        if obstacle.w <= 0 || obstacle.h <= 0 {
            return Err(format!(
                "Room validation failed: '{}' has a degenerate obstacle rect",
                def.name
            ));
        }
    }

    let mut interactable_defs = HashSet::new();
    for entry in &def.interactables {
        if !interactable_defs.insert(entry.def.as_str()) {
            return Err(format!(
                "Room validation failed: '{}' lists interactable def '{}' twice",
                def.name, entry.def
            ));
        }
    }

    if def.entrances.is_empty() {
        log::warn!(
            "Room '{}' has no entrances. The player can never spawn here.",
            def.name
        );
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
            "dw_defs_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn character_def_parses_valid_json() {
        let path = temp_file_path("char_valid");
        fs::write(
            &path,
            r#"{
              "version": "0.1",
              "name": "turtle",
              "animator": "animators/player.json",
              "size": { "w": 60, "h": 60 },
              "place": { "x": 100, "y": 350 }
            }"#,
        )
        .expect("write temp file");

        let def = load_character_def(&path).expect("valid character def");
        assert_eq!(def.name, "turtle");
        assert_eq!(def.size.w, 60);
        assert!(def.place.is_some());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn character_def_rejects_non_positive_size() {
        let path = temp_file_path("char_size");
        fs::write(
            &path,
            r#"{
              "version": "0.1",
              "name": "turtle",
              "animator": "animators/player.json",
              "size": { "w": 0, "h": 60 }
            }"#,
        )
        .expect("write temp file");

        let err = load_character_def(&path).expect_err("zero width should fail");
        assert!(err.contains("non-positive size"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn room_def_rejects_duplicate_entrance_sources() {
        let path = temp_file_path("room_dup_entrance");
        fs::write(
            &path,
            r#"{
              "version": "0.1",
              "name": "inn_lobby",
              "backdrop": "animators/rooms/inn_lobby.json",
              "entrances": [
                { "from": "hallway", "x": 950, "y": 350 },
                { "from": "hallway", "x": 10, "y": 10 }
              ]
            }"#,
        )
        .expect("write temp file");

        let err = load_room_def(&path).expect_err("duplicate entrance should fail");
        assert!(err.contains("duplicate entrance"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn room_def_rejects_empty_exit_destination() {
        let path = temp_file_path("room_bad_exit");
        fs::write(
            &path,
            r#"{
              "version": "0.1",
              "name": "inn_lobby",
              "backdrop": "animators/rooms/inn_lobby.json",
              "exits": [ { "rect": { "x": 0, "y": 0, "w": 40, "h": 120 }, "to": "" } ]
            }"#,
        )
        .expect("write temp file");

        let err = load_room_def(&path).expect_err("empty destination should fail");
        assert!(err.contains("empty destination"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn room_def_parses_full_layout() {
        let path = temp_file_path("room_valid");
        fs::write(
            &path,
            r#"{
              "version": "0.1",
              "name": "hallway",
              "backdrop": "animators/rooms/hallway.json",
              "obstacles": [ { "x": 0, "y": 0, "w": 1080, "h": 20 } ],
              "entrances": [ { "from": "inn_lobby", "x": 80, "y": 350 } ],
              "exits": [ { "rect": { "x": 1020, "y": 300, "w": 40, "h": 120 }, "to": "garden" } ],
              "interactables": [ { "def": "interactables/piano.json" } ],
              "npcs": []
            }"#,
        )
        .expect("write temp file");

        let def = load_room_def(&path).expect("valid room def");
        assert_eq!(def.name, "hallway");
        assert_eq!(def.obstacles.len(), 1);
        assert_eq!(def.exits[0].to, "garden");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn guide_def_rejects_empty_lines() {
        let path = temp_file_path("guide_empty");
        fs::write(&path, r#"{ "version": "0.1", "lines": [] }"#).expect("write temp file");
        let err = load_guide_def(&path).expect_err("empty guide should fail");
        assert!(err.contains("line list is empty"));
        let _ = fs::remove_file(path);
    }
}
