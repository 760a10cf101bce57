//! Stateful props the player can interact with.
//!
//! An interactable's state is a small non-negative integer mirrored in its
//! animator's motion types: state `N` renders from sequence `"N"`, or `"Nh"`
//! while the player is in range (the highlighted variant). `interact()`
//! cycles the animator to the lexicographically next motion type and adopts
//! the numeric state that type names -- from `"0h"` the next type is `"1"`,
//! so one interaction while highlighted advances state 0 to 1.

use dw_core::animation::Animator;
use dw_core::geom::Rect;
use glam::IVec2;
use std::path::Path;

use crate::defs::{InteractableDef, PlaceDef};
use crate::sprite::Sprite;

#[derive(Debug, Clone)]
pub struct Interactable {
    sprite: Sprite,
    state: u32,
    end_state: u32,
}

impl Interactable {
    pub fn new(sprite: Sprite, initial_state: u32, end_state: u32) -> Result<Self, String> {
        for required in [initial_state.to_string(), format!("{initial_state}h")] {
            if !sprite.animator().has_type(&required) {
                return Err(format!(
                    "Interactable '{}' missing motion type '{}' for its initial state",
                    sprite.name(),
                    required
                ));
            }
        }
        if !sprite.animator().has_type(&end_state.to_string()) {
            return Err(format!(
                "Interactable '{}' missing motion type for end state {}",
                sprite.name(),
                end_state
            ));
        }
        Ok(Self {
            sprite,
            state: initial_state,
            end_state,
        })
    }

    pub fn load(
        def: &InteractableDef,
        asset_root: &Path,
        place_override: Option<PlaceDef>,
    ) -> Result<Self, String> {
        let place = place_override.or(def.place);
        let sprite = Sprite::load(
            &def.name,
            &def.animator,
            def.size,
            place,
            asset_root,
            &def.initial_state.to_string(),
        )?;
        Self::new(sprite, def.initial_state, def.end_state)
    }

    pub fn name(&self) -> &str {
        self.sprite.name()
    }

    pub fn rect(&self) -> Rect {
        self.sprite.rect
    }

    pub fn place(&mut self, pos: IVec2) {
        self.sprite.place(pos);
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn is_end_state(&self) -> bool {
        self.state == self.end_state
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    /// Display the highlighted variant of the current state. Observation
    /// only; state is untouched.
    pub fn highlight(&mut self) -> Result<(), String> {
        self.sprite.advance(&format!("{}h", self.state))
    }

    /// Display the plain variant of the current state.
    pub fn un_highlight(&mut self) -> Result<(), String> {
        self.sprite.advance(&self.state.to_string())
    }

    /// Advance to the next visual type and adopt its numeric state. There is
    /// no reverse transition; authored state cycles wrap instead.
    pub fn interact(&mut self) -> Result<(), String> {
        let next = self.sprite.animator_mut().next_type()?;
        self.state = parse_state(&next).map_err(|e| {
            format!("Interactable '{}': {e}", self.sprite.name())
        })?;
        self.sprite.advance(&next)?;
        log::debug!(
            "Interactable '{}' advanced to state {}",
            self.sprite.name(),
            self.state
        );
        Ok(())
    }

    /// Per-tick update: highlight while the player is in range and consume
    /// the edge-triggered interact flag at most once. `interact_fired` is
    /// cleared when consumed so later interactables this tick see false.
    pub fn update(&mut self, player_rect: Rect, interact_fired: &mut bool) -> Result<(), String> {
        if self.sprite.rect.intersects(&player_rect) {
            self.highlight()?;
            if std::mem::take(interact_fired) {
                self.interact()?;
            }
        } else {
            self.un_highlight()?;
        }
        Ok(())
    }
}

/// Numeric state named by a motion type: `"2"` and `"2h"` both mean 2.
fn parse_state(motion_type: &str) -> Result<u32, String> {
    motion_type
        .strip_suffix('h')
        .unwrap_or(motion_type)
        .parse::<u32>()
        .map_err(|_| format!("motion type '{motion_type}' does not name a state"))
}
