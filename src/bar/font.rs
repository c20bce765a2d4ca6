//! Xft text for the bar canvas.

use super::fit_text;
use crate::errors::{WmResult, X11Error};
use std::collections::HashMap;
use std::ffi::CString;
use x11::xft::{self, XftColor, XftDraw, XftFont};
use x11::xlib::{Colormap, Display, Drawable, Visual};
use x11::xrender::{XGlyphInfo, XRenderColor};

/// An open Xft font with its vertical metrics read once.
pub struct Font {
    display: *mut Display,
    handle: *mut XftFont,
    height: i32,
    ascent: i32,
}

impl Font {
    pub fn open(display: *mut Display, screen: i32, name: &str) -> WmResult<Self> {
        let pattern = CString::new(name).map_err(|_| X11Error::FontLoadFailed(name.to_string()))?;
        let handle = unsafe { xft::XftFontOpenName(display, screen, pattern.as_ptr()) };
        if handle.is_null() {
            return Err(X11Error::FontLoadFailed(name.to_string()).into());
        }

        let (height, ascent) = unsafe { ((*handle).height, (*handle).ascent) };
        Ok(Self {
            display,
            handle,
            height,
            ascent,
        })
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Horizontal advance of `text`.
    pub fn width(&self, text: &str) -> i32 {
        if text.is_empty() {
            return 0;
        }
        let mut extents: XGlyphInfo = unsafe { std::mem::zeroed() };
        unsafe {
            xft::XftTextExtentsUtf8(
                self.display,
                self.handle,
                text.as_ptr(),
                text.len() as i32,
                &mut extents,
            );
        }
        i32::from(extents.xOff)
    }

    /// `text` cut down to `available` pixels, see [`fit_text`].
    pub fn fit(&self, text: &str, available: i32) -> Option<String> {
        fit_text(text, available, |s| self.width(s))
    }

    /// Baseline that centres a line vertically in a cell.
    pub fn baseline(&self, top: i32, cell_height: i32) -> i32 {
        centred_baseline(top, cell_height, self.height, self.ascent)
    }
}

impl Drop for Font {
    fn drop(&mut self) {
        unsafe { xft::XftFontClose(self.display, self.handle) };
    }
}

fn centred_baseline(top: i32, cell_height: i32, font_height: i32, ascent: i32) -> i32 {
    top + (cell_height - font_height) / 2 + ascent
}

/// `0xRRGGBB` widened to the 16-bit channels of an opaque render colour.
fn render_color(pixel: u32) -> XRenderColor {
    let channel = |shift: u32| {
        let value = ((pixel >> shift) & 0xff) as u16;
        value << 8 | value
    };
    XRenderColor {
        red: channel(16),
        green: channel(8),
        blue: channel(0),
        alpha: 0xffff,
    }
}

/// Draws text onto one drawable. Colours are allocated on first use and
/// kept until the pen is dropped.
pub struct Pen {
    display: *mut Display,
    visual: *mut Visual,
    colormap: Colormap,
    handle: *mut XftDraw,
    colors: HashMap<u32, XftColor>,
}

impl Pen {
    pub fn new(
        display: *mut Display,
        drawable: Drawable,
        visual: *mut Visual,
        colormap: Colormap,
    ) -> WmResult<Self> {
        let handle = unsafe { xft::XftDrawCreate(display, drawable, visual, colormap) };
        if handle.is_null() {
            return Err(X11Error::DrawCreateFailed.into());
        }
        Ok(Self {
            display,
            visual,
            colormap,
            handle,
            colors: HashMap::new(),
        })
    }

    /// Point the pen at a replacement drawable.
    pub fn retarget(&mut self, drawable: Drawable) {
        unsafe { xft::XftDrawChange(self.handle, drawable) };
    }

    fn color(&mut self, pixel: u32) -> Option<*const XftColor> {
        if !self.colors.contains_key(&pixel) {
            let wanted = render_color(pixel);
            let mut color: XftColor = unsafe { std::mem::zeroed() };
            let allocated = unsafe {
                xft::XftColorAllocValue(self.display, self.visual, self.colormap, &wanted, &mut color)
            };
            if allocated == 0 {
                return None;
            }
            self.colors.insert(pixel, color);
        }
        self.colors.get(&pixel).map(|color| color as *const XftColor)
    }

    pub fn draw(&mut self, font: &Font, pixel: u32, x: i32, baseline: i32, text: &str) {
        let Some(color) = self.color(pixel) else {
            return;
        };
        unsafe {
            xft::XftDrawStringUtf8(
                self.handle,
                color,
                font.handle,
                x,
                baseline,
                text.as_ptr(),
                text.len() as i32,
            );
        }
    }
}

impl Drop for Pen {
    fn drop(&mut self) {
        unsafe {
            for color in self.colors.values_mut() {
                xft::XftColorFree(self.display, self.visual, self.colormap, color);
            }
            xft::XftDrawDestroy(self.handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    #[test_case(0x00_00_00, (0x0000, 0x0000, 0x0000); "black")]
    #[test_case(0xff_ff_ff, (0xffff, 0xffff, 0xffff); "white")]
    #[test_case(0x12_80_fe, (0x1212, 0x8080, 0xfefe); "channels widen independently")]
    #[test]
    fn pixels_widen_to_render_channels(pixel: u32, expected: (u16, u16, u16)) {
        let color = render_color(pixel);
        assert_eq!((color.red, color.green, color.blue), expected);
        assert_eq!(color.alpha, 0xffff);
    }

    #[test_case(0, 20, 14, 11, 14; "centred in a taller cell")]
    #[test_case(5, 14, 14, 11, 16; "offset by the cell top")]
    #[test_case(0, 10, 14, 11, 9; "font taller than the cell")]
    #[test]
    fn baselines(top: i32, cell: i32, font_height: i32, ascent: i32, expected: i32) {
        assert_eq!(centred_baseline(top, cell, font_height, ascent), expected);
    }
}
