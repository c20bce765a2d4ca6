//! The per-monitor status bar: tag strip, layout symbol, window titles and
//! status text, drawn through a [`DrawSurface`].

mod bar;
mod font;
#[cfg(test)]
pub mod mock;
mod surface;

pub use bar::{BarCells, BarContent, Span, TitleEntry, cells, draw, resolve_click};
pub use surface::XftSurface;

use crate::client::Icon;
use crate::errors::WmResult;
use serde::Deserialize;
use x11rb::protocol::xproto::Window;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum BarPosition {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Normal,
    Selected,
}

/// An off-screen canvas the bars are rendered into before being copied
/// onto their windows.
pub trait DrawSurface {
    fn font_height(&self) -> i32;
    fn resize(&mut self, width: i32, height: i32) -> WmResult<()>;
    fn set_scheme(&mut self, scheme: Scheme);
    fn text_width(&self, text: &str) -> i32;
    /// Fill the cell with the background (the foreground when inverted) and
    /// draw `text` after `left_padding`, truncated with dots when it does
    /// not fit. Returns the x coordinate right of the cell.
    fn text(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        left_padding: i32,
        text: &str,
        invert: bool,
    ) -> i32;
    fn rect(&mut self, x: i32, y: i32, width: i32, height: i32, filled: bool, invert: bool);
    fn picture(&mut self, x: i32, y: i32, icon: &Icon);
    /// Copy the top-left `width x height` of the canvas onto `window`.
    fn present(&mut self, window: Window, width: i32, height: i32) -> WmResult<()>;
}

/// The longest prefix of `text` that fits in `available` pixels, with its
/// last characters replaced by dots when it had to be cut. `None` when not
/// even one character fits.
pub fn fit_text(text: &str, available: i32, measure: impl Fn(&str) -> i32) -> Option<String> {
    if available <= 0 || text.is_empty() {
        return None;
    }
    if measure(text) <= available {
        return Some(text.to_string());
    }

    let mut fitting = 0;
    for (index, ch) in text.char_indices() {
        let end = index + ch.len_utf8();
        if measure(&text[..end]) > available {
            break;
        }
        fitting = end;
    }
    if fitting == 0 {
        return None;
    }

    let mut kept: Vec<char> = text[..fitting].chars().collect();
    let dots = kept.len().min(3);
    let len = kept.len();
    for ch in &mut kept[len - dots..] {
        *ch = '.';
    }

    Some(kept.into_iter().collect())
}
