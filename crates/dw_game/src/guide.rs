//! The guide overlay: a journal the story unlocks line by line.
//!
//! Visual mode is a tri-state -- open, closed, or closed-with-notification.
//! The line list is loaded once and never changes; progression is a
//! monotonic index into it.

use crate::defs::GuideDef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideMode {
    Open,
    Closed,
    Notification,
}

#[derive(Debug, Clone)]
pub struct Guide {
    mode: GuideMode,
    lines: Vec<String>,
    unlocked: usize,
}

impl Guide {
    pub fn from_def(def: GuideDef) -> Self {
        Self {
            mode: GuideMode::Closed,
            lines: def.lines,
            unlocked: 0,
        }
    }

    pub fn mode(&self) -> GuideMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.mode == GuideMode::Open
    }

    /// Unlock the next line, saturating at the end of the list. While the
    /// guide is closed this flips it to the notification mode so the player
    /// knows there is something new.
    pub fn unlock_next(&mut self) {
        if self.unlocked < self.lines.len() {
            self.unlocked += 1;
            log::debug!("Guide unlocked line {}/{}", self.unlocked, self.lines.len());
        }
        if self.mode != GuideMode::Open {
            self.mode = GuideMode::Notification;
        }
    }

    /// Flip open/closed; opening clears any pending notification.
    pub fn toggle(&mut self) {
        self.mode = match self.mode {
            GuideMode::Open => GuideMode::Closed,
            GuideMode::Closed | GuideMode::Notification => GuideMode::Open,
        };
    }

    /// The unlocked prefix of the line list.
    pub fn visible_lines(&self) -> &[String] {
        &self.lines[..self.unlocked]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_guide() -> Guide {
        Guide::from_def(GuideDef {
            version: "0.1".to_string(),
            lines: vec![
                "Light the lobby lamp.".to_string(),
                "Play the hallway piano.".to_string(),
                "Find the gardener.".to_string(),
            ],
        })
    }

    #[test]
    fn starts_closed_with_nothing_unlocked() {
        let guide = make_guide();
        assert_eq!(guide.mode(), GuideMode::Closed);
        assert!(guide.visible_lines().is_empty());
    }

    #[test]
    fn unlock_is_monotonic_and_saturating() {
        let mut guide = make_guide();
        for _ in 0..5 {
            guide.unlock_next();
        }
        assert_eq!(guide.visible_lines().len(), 3, "saturates at the list length");
        assert_eq!(guide.visible_lines()[0], "Light the lobby lamp.");
    }

    #[test]
    fn unlock_while_closed_raises_notification() {
        let mut guide = make_guide();
        guide.unlock_next();
        assert_eq!(guide.mode(), GuideMode::Notification);
    }

    #[test]
    fn toggle_open_clears_notification() {
        let mut guide = make_guide();
        guide.unlock_next();
        guide.toggle();
        assert_eq!(guide.mode(), GuideMode::Open);
        guide.toggle();
        assert_eq!(guide.mode(), GuideMode::Closed);
    }

    #[test]
    fn unlock_while_open_stays_open() {
        let mut guide = make_guide();
        guide.toggle();
        guide.unlock_next();
        assert_eq!(guide.mode(), GuideMode::Open);
        assert_eq!(guide.visible_lines().len(), 1);
    }
}
