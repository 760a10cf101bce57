//! The drawing seam. The simulation paints into a `RenderSink`; what the
//! sink does with the calls is its own business. Headless runs use
//! `NullSink`, tests use a recording sink to assert paint order.

use dw_core::geom::Rect;
use glam::IVec2;

pub trait RenderSink {
    /// Draw one sprite frame at the given scene rect.
    fn draw_sprite(&mut self, frame: &str, rect: Rect);
    /// Draw a line of text anchored at the given scene position.
    fn draw_text(&mut self, text: &str, pos: IVec2);
    /// Flush the frame.
    fn present(&mut self);
}

/// Discards everything. Replay verification runs entirely headless.
#[derive(Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn draw_sprite(&mut self, _frame: &str, _rect: Rect) {}
    fn draw_text(&mut self, _text: &str, _pos: IVec2) {}
    fn present(&mut self) {}
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum DrawCall {
        Sprite(String, Rect),
        Text(String, IVec2),
        Present,
    }

    /// Records every call for paint-order assertions.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSink {
        pub fn sprite_frames(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    DrawCall::Sprite(frame, _) => Some(frame.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl RenderSink for RecordingSink {
        fn draw_sprite(&mut self, frame: &str, rect: Rect) {
            self.calls.push(DrawCall::Sprite(frame.to_string(), rect));
        }

        fn draw_text(&mut self, text: &str, pos: IVec2) {
            self.calls.push(DrawCall::Text(text.to_string(), pos));
        }

        fn present(&mut self) {
            self.calls.push(DrawCall::Present);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{DrawCall, RecordingSink};
    use super::*;

    #[test]
    fn recording_sink_preserves_call_order() {
        let mut sink = RecordingSink::default();
        sink.draw_sprite("backdrop-main-0", Rect::new(0, 0, 1080, 700));
        sink.draw_text("hello", IVec2::new(10, 10));
        sink.present();
        assert_eq!(
            sink.calls,
            [
                DrawCall::Sprite("backdrop-main-0".to_string(), Rect::new(0, 0, 1080, 700)),
                DrawCall::Text("hello".to_string(), IVec2::new(10, 10)),
                DrawCall::Present,
            ]
        );
    }
}
