//! A recording [`DrawSurface`] with fixed-width glyphs for tests.

use super::{DrawSurface, Scheme};
use crate::client::Icon;
use crate::errors::WmResult;
use x11rb::protocol::xproto::Window;

pub const GLYPH_WIDTH: i32 = 8;
pub const FONT_HEIGHT: i32 = 16;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Resize { width: i32, height: i32 },
    Scheme(Scheme),
    Text {
        x: i32,
        width: i32,
        left_padding: i32,
        text: String,
    },
    Rect {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        filled: bool,
        invert: bool,
    },
    Picture { x: i32, y: i32 },
    Present { window: Window, width: i32 },
}

#[derive(Debug, Default)]
pub struct MockSurface {
    pub calls: Vec<DrawCall>,
}

impl MockSurface {
    pub fn presented(&self) -> Vec<Window> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Present { window, .. } => Some(*window),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl DrawSurface for MockSurface {
    fn font_height(&self) -> i32 {
        FONT_HEIGHT
    }

    fn resize(&mut self, width: i32, height: i32) -> WmResult<()> {
        self.calls.push(DrawCall::Resize { width, height });
        Ok(())
    }

    fn set_scheme(&mut self, scheme: Scheme) {
        self.calls.push(DrawCall::Scheme(scheme));
    }

    fn text_width(&self, text: &str) -> i32 {
        text.chars().count() as i32 * GLYPH_WIDTH
    }

    fn text(
        &mut self,
        x: i32,
        _y: i32,
        width: i32,
        _height: i32,
        left_padding: i32,
        text: &str,
        _invert: bool,
    ) -> i32 {
        self.calls.push(DrawCall::Text {
            x,
            width,
            left_padding,
            text: text.to_string(),
        });
        x + width
    }

    fn rect(&mut self, x: i32, y: i32, width: i32, height: i32, filled: bool, invert: bool) {
        self.calls.push(DrawCall::Rect {
            x,
            y,
            width,
            height,
            filled,
            invert,
        });
    }

    fn picture(&mut self, x: i32, y: i32, _icon: &Icon) {
        self.calls.push(DrawCall::Picture { x, y });
    }

    fn present(&mut self, window: Window, width: i32, _height: i32) -> WmResult<()> {
        self.calls.push(DrawCall::Present { window, width });
        Ok(())
    }
}
