//! Rooms: obstacles, entrances, exits, interactables, and resident NPCs.
//!
//! Obstacle rects are absolute coordinates fixed at load time. Entrances are
//! keyed by the name of the room the player arrives from, and lookup failure
//! is an explicit error -- silently spawning somewhere else would corrupt
//! story progression invisibly. A room is "clear" when every interactable it
//! owns has reached its end state.

use dw_core::geom::Rect;
use glam::IVec2;
use std::path::Path;

use crate::character::Npc;
use crate::defs::{load_character_def, load_interactable_def, RoomDef, SizeDef};
use crate::interactable::Interactable;
use crate::sprite::Sprite;

#[derive(Debug, Clone)]
pub struct Entrance {
    pub from: String,
    pub pos: IVec2,
}

#[derive(Debug, Clone)]
pub struct Exit {
    pub rect: Rect,
    pub to: String,
}

#[derive(Debug)]
pub struct Room {
    name: String,
    backdrop: Sprite,
    obstacles: Vec<Rect>,
    entrances: Vec<Entrance>,
    exits: Vec<Exit>,
    interactables: Vec<Interactable>,
    npcs: Vec<Npc>,
}

impl Room {
    pub fn from_parts(
        name: &str,
        backdrop: Sprite,
        obstacles: Vec<Rect>,
        entrances: Vec<Entrance>,
        exits: Vec<Exit>,
        interactables: Vec<Interactable>,
        npcs: Vec<Npc>,
    ) -> Self {
        Self {
            name: name.to_string(),
            backdrop,
            obstacles,
            entrances,
            exits,
            interactables,
            npcs,
        }
    }

    /// Load a room and everything it owns from its definition.
    pub fn load(def: &RoomDef, asset_root: &Path) -> Result<Self, String> {
        // Backdrop defs carry no size; backdrops cover the whole scene.
        let backdrop = Sprite::load(
            &def.name,
            &def.backdrop,
            SizeDef {
                w: crate::SCREEN_W,
                h: crate::SCREEN_H,
            },
            def.place,
            asset_root,
            "main",
        )?;

        let entrances = def
            .entrances
            .iter()
            .map(|e| Entrance {
                from: e.from.clone(),
                pos: IVec2::new(e.x, e.y),
            })
            .collect();

        let exits = def
            .exits
            .iter()
            .map(|e| Exit {
                rect: e.rect,
                to: e.to.clone(),
            })
            .collect();

        let mut interactables = Vec::new();
        for entry in &def.interactables {
            let idef = load_interactable_def(&asset_root.join(&entry.def))?;
            interactables.push(Interactable::load(&idef, asset_root, entry.place)?);
        }

        let mut npcs = Vec::new();
        for npc_path in &def.npcs {
            let cdef = load_character_def(&asset_root.join(npc_path))?;
            npcs.push(Npc::load(&cdef, asset_root)?);
        }

        log::info!(
            "Loaded room '{}' ({} obstacles, {} interactables, {} NPCs)",
            def.name,
            def.obstacles.len(),
            interactables.len(),
            npcs.len()
        );
        Ok(Self::from_parts(
            &def.name,
            backdrop,
            def.obstacles.clone(),
            entrances,
            exits,
            interactables,
            npcs,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backdrop(&self) -> &Sprite {
        &self.backdrop
    }

    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    pub fn exits(&self) -> &[Exit] {
        &self.exits
    }

    /// Spawn position for a player arriving from the named room.
    pub fn entrance(&self, from: &str) -> Result<IVec2, String> {
        self.entrances
            .iter()
            .find(|e| e.from == from)
            .map(|e| e.pos)
            .ok_or_else(|| {
                format!(
                    "Room '{}' has no entrance for arrivals from '{}'",
                    self.name, from
                )
            })
    }

    /// First exit whose zone the given rect overlaps.
    pub fn exit_hit(&self, rect: Rect) -> Option<&Exit> {
        self.exits.iter().find(|e| e.rect.intersects(&rect))
    }

    /// Every owned interactable is in its end state. Vacuously true for a
    /// room with none.
    pub fn is_clear(&self) -> bool {
        self.interactables.iter().all(Interactable::is_end_state)
    }

    pub fn interactables(&self) -> &[Interactable] {
        &self.interactables
    }

    pub fn interactable_mut(&mut self, name: &str) -> Result<&mut Interactable, String> {
        let room = self.name.clone();
        self.interactables
            .iter_mut()
            .find(|i| i.name() == name)
            .ok_or_else(|| format!("Room '{room}' has no interactable '{name}'"))
    }

    pub fn npcs(&self) -> &[Npc] {
        &self.npcs
    }

    pub fn npc_mut(&mut self, name: &str) -> Result<&mut Npc, String> {
        let room = self.name.clone();
        self.npcs
            .iter_mut()
            .find(|n| n.character().name() == name)
            .ok_or_else(|| format!("Room '{room}' has no NPC '{name}'"))
    }

    /// Per-tick room update: backdrop animation, then the highlight/interact
    /// pass over interactables, then NPC speech. `interact_fired` is the
    /// already-consumed player flag; at most one interactable fires on it.
    pub fn update(&mut self, player_rect: Rect, interact_fired: bool) -> Result<(), String> {
        self.backdrop.advance("main")?;

        let mut fired = interact_fired;
        for interactable in &mut self.interactables {
            interactable.update(player_rect, &mut fired)?;
        }

        for npc in &mut self.npcs {
            npc.character_mut().tick_speech();
        }
        Ok(())
    }
}
