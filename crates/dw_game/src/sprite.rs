//! The positioned-animated-entity component.
//!
//! Backgrounds, interactables, and characters all embed a `Sprite`: a name,
//! a bounding rect, an animator, and the frame currently displayed. The frame
//! is derived through the animator and never set directly.

use dw_core::animation::{load_animator_file, Animator};
use dw_core::geom::Rect;
use glam::IVec2;
use std::path::Path;

use crate::defs::{PlaceDef, SizeDef};

#[derive(Debug, Clone)]
pub struct Sprite {
    name: String,
    pub rect: Rect,
    animator: Animator,
    current_frame: String,
}

impl Sprite {
    /// Build a sprite and advance its animator once so `current_frame` is
    /// populated. Fails if the initial motion type is unknown -- a sprite
    /// with nothing to display is a configuration error.
    pub fn new(
        name: &str,
        rect: Rect,
        mut animator: Animator,
        initial_type: &str,
    ) -> Result<Self, String> {
        let current_frame = animator
            .advance(initial_type)
            .map_err(|e| format!("Sprite '{name}': {e}"))?
            .to_string();
        Ok(Self {
            name: name.to_string(),
            rect,
            animator,
            current_frame,
        })
    }

    /// Construct from definition fields, loading the animator file relative
    /// to the asset root. Entities without a `place` are parked at the origin
    /// until placed dynamically.
    pub fn load(
        name: &str,
        animator_path: &str,
        size: SizeDef,
        place: Option<PlaceDef>,
        asset_root: &Path,
        initial_type: &str,
    ) -> Result<Self, String> {
        let file = load_animator_file(&asset_root.join(animator_path))?;
        let place = place.unwrap_or(PlaceDef { x: 0, y: 0 });
        let rect = Rect::new(place.x, place.y, size.w, size.h);
        Self::new(name, rect, Animator::from_file(file), initial_type)
    }

    pub fn advance(&mut self, motion_type: &str) -> Result<(), String> {
        self.current_frame = self
            .animator
            .advance(motion_type)
            .map_err(|e| format!("Sprite '{}': {e}", self.name))?
            .to_string();
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_frame(&self) -> &str {
        &self.current_frame
    }

    pub fn place(&mut self, pos: IVec2) {
        self.rect.set_pos(pos);
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut Animator {
        &mut self.animator
    }
}
