//! The world: every room, the player, the guide, and the story, advanced in
//! a fixed per-tick order so identical input sequences replay identically.
//!
//! Tick order: background animation, title gate, cinematic pause, button
//! routing, room update (interactables see the pre-move player rect),
//! movement, speech, guide toggle, story beat, then room transition. The
//! player's interact flag is consumed exactly once per tick and threaded
//! into the room update.

use dw_core::geom::Rect;
use dw_core::input::InputState;
use glam::IVec2;
use std::collections::BTreeMap;
use std::path::Path;

use crate::character::Player;
use crate::defs::{load_character_def, load_guide_def, load_room_def, SizeDef};
use crate::guide::{Guide, GuideMode};
use crate::render::RenderSink;
use crate::room::Room;
use crate::sprite::Sprite;
use crate::story::{RoomId, StoryController};

const TITLE_TEXT: &str = "The Driftwood Inn -- press any key";
const FINALE_TEXT: &str = "The inn sleeps soundly. Thanks for playing.";

pub struct World {
    background: Sprite,
    rooms: BTreeMap<RoomId, Room>,
    current: RoomId,
    player: Player,
    guide: Guide,
    story: StoryController,
    intro_done: bool,
    finished: bool,
    pause_remaining: u32,
    tick: u64,
}

impl World {
    /// Load the full game from an asset directory and spawn the player at
    /// the first room's "start" entrance.
    pub fn load(asset_root: &Path) -> Result<Self, String> {
        let background = Sprite::load(
            "nightsky",
            "animators/nightsky.json",
            SizeDef {
                w: crate::SCREEN_W,
                h: crate::SCREEN_H,
            },
            None,
            asset_root,
            "main",
        )?;

        let mut rooms = BTreeMap::new();
        for &id in RoomId::ALL {
            let def = load_room_def(&asset_root.join(id.def_path()))?;
            rooms.insert(id, Room::load(&def, asset_root)?);
        }

        let player_def = load_character_def(&asset_root.join("characters/player.json"))?;
        let player = Player::load(&player_def, asset_root)?;
        let guide = Guide::from_def(load_guide_def(&asset_root.join("guide/guide.json"))?);

        let current = RoomId::InnLobby;
        let mut world = Self::from_parts(background, rooms, current, player, guide);
        let spawn = world.room(current)?.entrance("start")?;
        world.player.spawn_at(spawn);
        log::info!("World loaded, player spawned in '{}'", current.key());
        Ok(world)
    }

    pub fn from_parts(
        background: Sprite,
        rooms: BTreeMap<RoomId, Room>,
        current: RoomId,
        player: Player,
        guide: Guide,
    ) -> Self {
        Self {
            background,
            rooms,
            current,
            player,
            guide,
            story: StoryController::new(),
            intro_done: false,
            finished: false,
            pause_remaining: 0,
            tick: 0,
        }
    }

    pub fn current_room(&self) -> RoomId {
        self.current
    }

    pub fn room(&self, id: RoomId) -> Result<&Room, String> {
        self.rooms
            .get(&id)
            .ok_or_else(|| format!("World has no room '{}'", id.key()))
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn guide(&self) -> &Guide {
        &self.guide
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Advance the simulation by one fixed tick.
    pub fn tick(&mut self, input: &InputState) -> Result<(), String> {
        self.tick += 1;
        self.background.advance("main")?;

        // Title screen: only the background animates until any key lands.
        if !self.intro_done {
            if input.any_key_pressed() {
                self.intro_done = true;
                log::info!("Title dismissed on tick {}", self.tick);
            }
            return Ok(());
        }

        if self.finished {
            return Ok(());
        }

        // Cinematic pause: animations and speech run, input is ignored.
        if self.pause_remaining > 0 {
            self.pause_remaining -= 1;
            let player_rect = self.player.rect();
            let room = self
                .rooms
                .get_mut(&self.current)
                .ok_or_else(|| format!("World has no room '{}'", self.current.key()))?;
            room.update(player_rect, false)?;
            self.player.character_mut().tick_speech();
            return Ok(());
        }

        self.player.handle_buttons(input, self.tick);
        let interact_fired = self.player.interacting();
        let player_rect = self.player.rect();

        let room = self
            .rooms
            .get_mut(&self.current)
            .ok_or_else(|| format!("World has no room '{}'", self.current.key()))?;
        room.update(player_rect, interact_fired)?;

        let obstacles = room.obstacles().to_vec();
        self.player.move_step(input, &obstacles)?;
        self.player.character_mut().tick_speech();

        if self.player.guide_toggled() {
            self.guide.toggle();
        }

        let (beat_done, pause) =
            self.story
                .step(self.current, room, &mut self.player, &mut self.guide)?;
        self.pause_remaining = pause;

        let mut transition = None;
        if beat_done {
            if room.exits().is_empty() {
                if !self.finished {
                    log::info!("Story complete on tick {}", self.tick);
                }
                self.finished = true;
            } else if let Some(exit) = room.exit_hit(self.player.rect()) {
                transition = Some(RoomId::parse(&exit.to)?);
            }
        }

        if let Some(dest) = transition {
            let from = self.current.key();
            let spawn = self.room(dest)?.entrance(from)?;
            self.player.spawn_at(spawn);
            log::info!("Left '{}' for '{}'", from, dest.key());
            self.current = dest;
        }
        Ok(())
    }

    /// Paint the whole scene back-to-front into a render sink.
    pub fn draw_into(&self, sink: &mut dyn RenderSink) {
        sink.draw_sprite(self.background.current_frame(), self.background.rect);

        if !self.intro_done {
            sink.draw_text(TITLE_TEXT, IVec2::new(crate::SCREEN_W / 2, crate::SCREEN_H / 2));
            sink.present();
            return;
        }

        if let Some(room) = self.rooms.get(&self.current) {
            sink.draw_sprite(room.backdrop().current_frame(), room.backdrop().rect);
            for interactable in room.interactables() {
                let sprite = interactable.sprite();
                sink.draw_sprite(sprite.current_frame(), sprite.rect);
            }
            for npc in room.npcs() {
                sink.draw_sprite(npc.character().sprite().current_frame(), npc.rect());
            }
            sink.draw_sprite(
                self.player.character().sprite().current_frame(),
                self.player.rect(),
            );
            if self.player.spotlight() {
                sink.draw_sprite("spotlight", spotlight_rect(self.player.rect()));
            }

            for npc in room.npcs() {
                draw_chat(sink, npc.character().chatbox().visible_lines(), npc.rect());
            }
            draw_chat(
                sink,
                self.player.character().chatbox().visible_lines(),
                self.player.rect(),
            );
        }

        match self.guide.mode() {
            GuideMode::Open => {
                for (i, line) in self.guide.visible_lines().iter().enumerate() {
                    sink.draw_text(line, IVec2::new(40, 40 + 24 * i as i32));
                }
            }
            GuideMode::Notification => {
                sink.draw_text("!", IVec2::new(40, 40));
            }
            GuideMode::Closed => {}
        }

        if self.finished {
            sink.draw_text(FINALE_TEXT, IVec2::new(crate::SCREEN_W / 2, crate::SCREEN_H / 2));
        }
        sink.present();
    }
}

fn spotlight_rect(player: Rect) -> Rect {
    let center = player.center();
    let radius = 180;
    Rect::new(center.x - radius, center.y - radius, radius * 2, radius * 2)
}

fn draw_chat(sink: &mut dyn RenderSink, lines: Vec<String>, speaker: Rect) {
    for (i, line) in lines.iter().enumerate() {
        let pos = IVec2::new(speaker.x, speaker.y - 20 * (lines.len() - i) as i32);
        sink.draw_text(line, pos);
    }
}
