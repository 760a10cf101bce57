//! Characters: the shared component plus the player and NPC variants.
//!
//! Movement is a fixed 5-pixel step per held direction per tick, with
//! provisional-move-then-rollback collision: the rect moves the full step and
//! is moved back by the exact inverse if it now overlaps an obstacle. Each
//! cardinal direction is resolved independently, so diagonal input slides
//! along walls instead of sticking.

use dw_core::geom::Rect;
use dw_core::input::{Button, DebouncedTrigger, InputState, Key};
use glam::IVec2;
use std::path::Path;

use crate::chatbox::Chatbox;
use crate::defs::CharacterDef;
use crate::sprite::Sprite;

pub const WALK_STEP: i32 = 5;
/// ~500ms at 30 ticks/s.
pub const TRIGGER_COOLDOWN_TICKS: u64 = 15;

/// What every character owns: a sprite, a voice, and pockets.
#[derive(Debug, Clone)]
pub struct Character {
    sprite: Sprite,
    chatbox: Chatbox,
    inventory: Vec<String>,
}

impl Character {
    pub fn new(sprite: Sprite) -> Self {
        Self {
            sprite,
            chatbox: Chatbox::new(),
            inventory: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.sprite.name()
    }

    pub fn rect(&self) -> Rect {
        self.sprite.rect
    }

    pub fn center(&self) -> IVec2 {
        self.sprite.rect.center()
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }

    pub fn collides(&self, other: Rect) -> bool {
        self.sprite.rect.intersects(&other)
    }

    pub fn say(&mut self, phrase: &str) {
        self.chatbox.say(phrase);
    }

    pub fn say_once(&mut self, phrase: &str) {
        self.chatbox.say_once(phrase);
    }

    pub fn is_speaking(&self) -> bool {
        self.chatbox.is_speaking()
    }

    pub fn chatbox(&self) -> &Chatbox {
        &self.chatbox
    }

    /// Advance the speech life cycle by one tick.
    pub fn tick_speech(&mut self) {
        self.chatbox.tick();
    }

    /// Items are ordered and duplicates are allowed.
    pub fn give(&mut self, item: &str) {
        self.inventory.push(item.to_string());
    }

    pub fn has(&self, item: &str) -> bool {
        self.inventory.iter().any(|i| i == item)
    }

    pub fn inventory(&self) -> &[String] {
        &self.inventory
    }
}

/// The player: movement from held keys, debounced edge triggers for
/// interact and guide-toggle, and the spotlight overlay flag.
#[derive(Debug, Clone)]
pub struct Player {
    character: Character,
    spotlight: bool,
    interact_trigger: DebouncedTrigger,
    guide_trigger: DebouncedTrigger,
}

impl Player {
    pub fn new(character: Character) -> Self {
        Self {
            character,
            spotlight: false,
            interact_trigger: DebouncedTrigger::new(TRIGGER_COOLDOWN_TICKS),
            guide_trigger: DebouncedTrigger::new(TRIGGER_COOLDOWN_TICKS),
        }
    }

    pub fn load(def: &CharacterDef, asset_root: &Path) -> Result<Self, String> {
        let sprite = Sprite::load(
            &def.name,
            &def.animator,
            def.size,
            def.place,
            asset_root,
            "front",
        )?;
        Ok(Self::new(Character::new(sprite)))
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn character_mut(&mut self) -> &mut Character {
        &mut self.character
    }

    pub fn rect(&self) -> Rect {
        self.character.rect()
    }

    /// Route this tick's button-down events into the debounced triggers.
    pub fn handle_buttons(&mut self, input: &InputState, tick: u64) {
        if input.is_just_pressed(Button::Interact) {
            self.interact_trigger.press(tick);
        }
        if input.is_just_pressed(Button::Guide) {
            self.guide_trigger.press(tick);
        }
    }

    /// Consume-once read of the pending interact flag. Single-consumer
    /// contract: poll exactly once per tick (the room update threads the
    /// result through its interactables).
    pub fn interacting(&mut self) -> bool {
        self.interact_trigger.take()
    }

    /// Consume-once read of the pending guide-toggle flag.
    pub fn guide_toggled(&mut self) -> bool {
        self.guide_trigger.take()
    }

    /// Apply held movement keys against the room's obstacle list. Each
    /// direction moves the full step and rolls back by the exact inverse on
    /// collision, so there is no drift and axes resolve independently.
    pub fn move_step(&mut self, input: &InputState, obstacles: &[Rect]) -> Result<(), String> {
        let steps = [
            (Key::Up, IVec2::new(0, -WALK_STEP)),
            (Key::Down, IVec2::new(0, WALK_STEP)),
            (Key::Left, IVec2::new(-WALK_STEP, 0)),
            (Key::Right, IVec2::new(WALK_STEP, 0)),
        ];
        for (key, step) in steps {
            if input.is_held(key) {
                let rect = &mut self.character.sprite_mut().rect;
                rect.translate(step);
                if rect.intersects_any(obstacles) {
                    rect.translate(-step);
                }
            }
        }

        // Facing follows the first held direction in a fixed priority order,
        // whether or not the move was rolled back.
        let facing = [
            (Key::Left, "left"),
            (Key::Right, "right"),
            (Key::Down, "front"),
            (Key::Up, "back"),
        ]
        .into_iter()
        .find(|&(key, _)| input.is_held(key));
        if let Some((_, motion_type)) = facing {
            self.character.sprite_mut().advance(motion_type)?;
        }
        Ok(())
    }

    pub fn spawn_at(&mut self, pos: IVec2) {
        self.character.sprite_mut().place(pos);
    }

    pub fn spotlight(&self) -> bool {
        self.spotlight
    }

    pub fn set_spotlight(&mut self, on: bool) {
        self.spotlight = on;
    }
}

/// NPCs move on authored paths and do not collide with obstacles.
#[derive(Debug, Clone)]
pub struct Npc {
    character: Character,
}

impl Npc {
    pub fn new(character: Character) -> Self {
        Self { character }
    }

    pub fn load(def: &CharacterDef, asset_root: &Path) -> Result<Self, String> {
        let sprite = Sprite::load(
            &def.name,
            &def.animator,
            def.size,
            def.place,
            asset_root,
            "front",
        )?;
        Ok(Self::new(Character::new(sprite)))
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn character_mut(&mut self) -> &mut Character {
        &mut self.character
    }

    pub fn rect(&self) -> Rect {
        self.character.rect()
    }

    pub fn place(&mut self, pos: IVec2) {
        self.character.sprite_mut().place(pos);
    }

    /// Walk at most `step` pixels per axis toward the target top-left
    /// position, animating by travel direction. Returns true once arrived.
    pub fn walk_towards(&mut self, target: IVec2, step: i32) -> Result<bool, String> {
        let pos = self.character.rect().pos();
        let delta = target - pos;
        if delta == IVec2::ZERO {
            self.character.sprite_mut().advance("front")?;
            return Ok(true);
        }

        let dx = delta.x.clamp(-step, step);
        let dy = delta.y.clamp(-step, step);
        self.character
            .sprite_mut()
            .rect
            .translate(IVec2::new(dx, dy));

        let motion_type = if dx < 0 {
            "left"
        } else if dx > 0 {
            "right"
        } else {
            "front"
        };
        self.character.sprite_mut().advance(motion_type)?;
        Ok(self.character.rect().pos() == target)
    }
}
