//! The scripted story: one beat per room, evaluated every tick.
//!
//! Rooms are identified by a sum type and dispatched with a match -- no
//! object-identity or index comparisons anywhere. A beat inspects player and
//! NPC positions and room-clear state, moves NPCs, queues dialogue, and
//! reports whether its narrative obligations are met. The world layer
//! combines that signal with the player standing in an exit zone to decide
//! room transitions.
//!
//! One-shot cues are tracked in a set so a beat that runs every tick fires
//! each scripted event exactly once per playthrough.

use glam::IVec2;
use std::collections::{HashSet, VecDeque};

use crate::character::{Npc, Player};
use crate::guide::Guide;
use crate::room::Room;

/// Ticks of cinematic pause requested when the hallway piano resolves.
pub const CINEMATIC_PAUSE_TICKS: u32 = 30;
/// NPC walking speed, px per axis per tick.
pub const NPC_WALK_STEP: i32 = 3;
/// Chebyshev distance at which an NPC notices the player.
const GREET_RANGE: i32 = 160;

const INNKEEPER_GREET_SPOT: IVec2 = IVec2::new(620, 380);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RoomId {
    InnLobby,
    Hallway,
    Garden,
}

impl RoomId {
    pub const ALL: &'static [RoomId] = &[RoomId::InnLobby, RoomId::Hallway, RoomId::Garden];

    /// Stable key used in room definitions, entrance names, and exit
    /// destinations.
    pub fn key(self) -> &'static str {
        match self {
            Self::InnLobby => "inn_lobby",
            Self::Hallway => "hallway",
            Self::Garden => "garden",
        }
    }

    pub fn def_path(self) -> &'static str {
        match self {
            Self::InnLobby => "rooms/inn_lobby.json",
            Self::Hallway => "rooms/hallway.json",
            Self::Garden => "rooms/garden.json",
        }
    }

    /// Resolve an exit destination. Unknown keys are an explicit error;
    /// defaulting here would corrupt story progression invisibly.
    pub fn parse(key: &str) -> Result<Self, String> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.key() == key)
            .ok_or_else(|| format!("No room is named '{key}'"))
    }
}

pub struct StoryController {
    conversation: VecDeque<String>,
    fired: HashSet<&'static str>,
}

impl StoryController {
    pub fn new() -> Self {
        Self {
            conversation: VecDeque::new(),
            fired: HashSet::new(),
        }
    }

    /// True the first time a cue fires, false ever after.
    fn once(&mut self, cue: &'static str) -> bool {
        self.fired.insert(cue)
    }

    pub fn pending_lines(&self) -> usize {
        self.conversation.len()
    }

    /// Evaluate the beat for the current room. Returns true when the beat's
    /// narrative obligations are complete this tick.
    pub fn step(
        &mut self,
        id: RoomId,
        room: &mut Room,
        player: &mut Player,
        guide: &mut Guide,
    ) -> Result<(bool, u32), String> {
        match id {
            RoomId::InnLobby => self.beat_inn_lobby(room, player, guide),
            RoomId::Hallway => self.beat_hallway(room, player, guide),
            RoomId::Garden => self.beat_garden(room, player, guide),
        }
    }

    /// While lines are queued and neither party is mid-phrase, hand the head
    /// line to the alternating speaker: odd remaining count means the first
    /// party (the NPC), even means the second (the player). Strict
    /// non-overlap falls out of the is_speaking gate.
    fn pump_conversation(&mut self, npc: &mut Npc, player: &mut Player) {
        if npc.character().is_speaking() || player.character().is_speaking() {
            return;
        }
        let npc_speaks = self.conversation.len() % 2 == 1;
        if let Some(line) = self.conversation.pop_front() {
            if npc_speaks {
                npc.character_mut().say_once(&line);
            } else {
                player.character_mut().say_once(&line);
            }
        }
    }

    fn queue_lines(&mut self, lines: &[&str]) {
        self.conversation.extend(lines.iter().map(|l| l.to_string()));
    }

    /// Opening beat. The innkeeper stays behind the desk until the lobby
    /// lamp is lit, then crosses the room to greet the player.
    fn beat_inn_lobby(
        &mut self,
        room: &mut Room,
        player: &mut Player,
        guide: &mut Guide,
    ) -> Result<(bool, u32), String> {
        if self.once("lobby_opening") {
            guide.unlock_next();
            player
                .character_mut()
                .say_once("So this is the Driftwood Inn. Dark in here.");
        }

        let clear = room.is_clear();
        if clear && self.once("lobby_lamp_lit") {
            guide.unlock_next();
            self.queue_lines(&[
                "Ah, light at last! Welcome, traveler.",
                "I was starting to think nobody worked here.",
                "Just me, and I can't reach the lamp. The hallway piano has been silent for years, too.",
                "A piano? I could try my luck.",
                "Through the east door, then. Mind the old furniture.",
            ]);
        }

        let greet_spot = INNKEEPER_GREET_SPOT;
        let npc = room.npc_mut("innkeeper")?;
        let post = npc.rect().pos();
        let target = if clear { greet_spot } else { post };
        npc.walk_towards(target, NPC_WALK_STEP)?;
        self.pump_conversation(npc, player);

        let npc_quiet = !npc.character().is_speaking();
        let done = clear
            && self.conversation.is_empty()
            && npc_quiet
            && !player.character().is_speaking();
        Ok((done, 0))
    }

    /// The hallway is pitch dark: spotlight on, and the beat resolves when
    /// the piano reaches its end state. Resolving it earns a short cinematic
    /// pause while the room "listens".
    fn beat_hallway(
        &mut self,
        room: &mut Room,
        player: &mut Player,
        guide: &mut Guide,
    ) -> Result<(bool, u32), String> {
        if self.once("hallway_spotlight") {
            player.set_spotlight(true);
            log::info!("Spotlight on: the hallway is dark");
        }

        let clear = room.is_clear();
        let mut pause = 0;
        if clear && self.once("hallway_piano") {
            guide.unlock_next();
            player
                .character_mut()
                .say_once("That old song again. The whole inn seems to lean closer.");
            pause = CINEMATIC_PAUSE_TICKS;
        }

        let done = clear && !player.character().is_speaking();
        Ok((done, pause))
    }

    /// Final beat: the gardener is waiting outside. No interactables, no
    /// exits -- the farewell conversation is the whole obligation.
    fn beat_garden(
        &mut self,
        room: &mut Room,
        player: &mut Player,
        guide: &mut Guide,
    ) -> Result<(bool, u32), String> {
        if self.once("garden_arrival") {
            player.set_spotlight(false);
            guide.unlock_next();
        }

        let gardener_center = room.npc_mut("gardener")?.character().center();
        let near = (player.character().center() - gardener_center)
            .abs()
            .max_element()
            < GREET_RANGE;
        if near && self.once("garden_greet") {
            self.queue_lines(&[
                "You woke the whole inn up, you know. Lamp, piano, all of it.",
                "It felt like the place wanted waking.",
                "It did. Come back whenever the music stops.",
            ]);
        }

        let npc = room.npc_mut("gardener")?;
        npc.character_mut().sprite_mut().advance("front")?;
        self.pump_conversation(npc, player);

        let done = self.fired.contains("garden_greet")
            && self.conversation.is_empty()
            && !npc.character().is_speaking()
            && !player.character().is_speaking();
        Ok((done, 0))
    }
}

impl Default for StoryController {
    fn default() -> Self {
        Self::new()
    }
}
