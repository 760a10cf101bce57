//! Scrolling speech bubbles.
//!
//! A chatbox is either empty (not speaking) or revealing a phrase. Each tick
//! the reveal counter climbs by 1 and `floor(counter * REVEAL_SPEED)`
//! characters are shown. Once the whole phrase is out it holds on screen for
//! a while -- the hold is inversely proportional to phrase length so short
//! quips still linger but long monologues do not overstay -- then the box
//! clears itself. That timeout is the only way speech ends.

use std::collections::HashSet;

pub const REVEAL_SPEED: f64 = 0.6;
pub const HOLD_FACTOR: f64 = 50.0;
/// Characters per wrapped chat line.
pub const WRAP_WIDTH: usize = 19;
/// Trailing wrapped lines shown at once -- the scroll window.
pub const VISIBLE_LINES: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct Chatbox {
    phrase: String,
    counter: u32,
    spoken_once: HashSet<String>,
}

impl Chatbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a phrase, interrupting whatever was in progress.
    pub fn say(&mut self, phrase: &str) {
        self.phrase = phrase.to_string();
        self.counter = 0;
    }

    /// Like `say`, but suppressed if this exact phrase was already spoken
    /// through `say_once` on this chatbox. The history is unbounded.
    pub fn say_once(&mut self, phrase: &str) {
        if self.spoken_once.insert(phrase.to_string()) {
            self.say(phrase);
        }
    }

    pub fn is_speaking(&self) -> bool {
        !self.phrase.is_empty()
    }

    /// One display tick of the reveal/hold/clear life cycle.
    pub fn tick(&mut self) {
        if self.phrase.is_empty() {
            return;
        }
        self.counter += 1;
        let revealed = (f64::from(self.counter) * REVEAL_SPEED).floor();
        let len = self.phrase.chars().count() as f64;
        if revealed > len * (1.0 + HOLD_FACTOR / (len + 1.0)) {
            self.counter = 0;
            self.phrase.clear();
        }
    }

    /// The revealed prefix of the active phrase (full phrase during hold).
    pub fn revealed_text(&self) -> String {
        let revealed = (f64::from(self.counter) * REVEAL_SPEED).floor() as usize;
        self.phrase.chars().take(revealed).collect()
    }

    /// The trailing `VISIBLE_LINES` of the revealed text wrapped to
    /// `WRAP_WIDTH` characters -- what the render sink actually draws.
    pub fn visible_lines(&self) -> Vec<String> {
        let wrapped = wrap(&self.revealed_text(), WRAP_WIDTH);
        let skip = wrapped.len().saturating_sub(VISIBLE_LINES);
        wrapped.into_iter().skip(skip).collect()
    }
}

/// Greedy word wrap. Words longer than the width get hard-broken.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let split_at = word
                .char_indices()
                .nth(width)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            lines.push(word[..split_at].to_string());
            word = &word[split_at..];
        }
        if line.is_empty() {
            line.push_str(word);
        } else if line.chars().count() + 1 + word.chars().count() <= width {
            line.push(' ');
            line.push_str(word);
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
