use super::font::{Font, Pen};
use super::{DrawSurface, Scheme};
use crate::ColorScheme;
use crate::client::Icon;
use crate::errors::{WmResult, X11Error, is_benign_x_error};
use std::mem::ManuallyDrop;
use std::os::raw::{c_char, c_int};
use x11::xlib::{self, Display, GC, Pixmap, XErrorEvent};
use x11rb::protocol::xproto::Window;

/// Logs asynchronous Xlib errors instead of aborting the process.
unsafe extern "C" fn on_x_error(_display: *mut Display, event: *mut XErrorEvent) -> c_int {
    let (error, request) = unsafe { ((*event).error_code, (*event).request_code) };
    if !is_benign_x_error(error, request) {
        tracing::error!(error, request, "xlib error while drawing the bar");
    }
    0
}

/// Off-screen pixmap rendered with Xft through a dedicated Xlib connection.
pub struct XftSurface {
    display: *mut Display,
    root: xlib::Window,
    depth: u32,
    visual: *mut xlib::Visual,
    colormap: xlib::Colormap,
    pixmap: Pixmap,
    gc: GC,
    font: ManuallyDrop<Font>,
    pen: ManuallyDrop<Pen>,
    width: i32,
    height: i32,
    normal: ColorScheme,
    selected: ColorScheme,
    scheme: Scheme,
}

impl XftSurface {
    pub fn new(font_name: &str, normal: ColorScheme, selected: ColorScheme) -> WmResult<Self> {
        let display = unsafe { xlib::XOpenDisplay(std::ptr::null()) };
        if display.is_null() {
            return Err(X11Error::DisplayOpenFailed.into());
        }

        unsafe {
            xlib::XSetErrorHandler(Some(on_x_error));
        }

        let screen = unsafe { xlib::XDefaultScreen(display) };
        let root = unsafe { xlib::XRootWindow(display, screen) };
        let width = unsafe { xlib::XDisplayWidth(display, screen) };
        let height = unsafe { xlib::XDisplayHeight(display, screen) };
        let depth = unsafe { xlib::XDefaultDepth(display, screen) } as u32;
        let visual = unsafe { xlib::XDefaultVisual(display, screen) };
        let colormap = unsafe { xlib::XDefaultColormap(display, screen) };

        let font = match Font::open(display, screen, font_name) {
            Ok(font) => font,
            Err(error) => {
                unsafe { xlib::XCloseDisplay(display) };
                return Err(error);
            }
        };

        let (pixmap, gc) = unsafe {
            let pixmap = xlib::XCreatePixmap(display, root, width as u32, height as u32, depth);
            let gc = xlib::XCreateGC(display, root, 0, std::ptr::null_mut());
            xlib::XSetLineAttributes(
                display,
                gc,
                1,
                xlib::LineSolid,
                xlib::CapButt,
                xlib::JoinMiter,
            );
            (pixmap, gc)
        };

        let pen = Pen::new(display, pixmap, visual, colormap)?;

        Ok(Self {
            display,
            root,
            depth,
            visual,
            colormap,
            pixmap,
            gc,
            font: ManuallyDrop::new(font),
            pen: ManuallyDrop::new(pen),
            width,
            height,
            normal,
            selected,
            scheme: Scheme::Normal,
        })
    }

    fn colors(&self) -> ColorScheme {
        match self.scheme {
            Scheme::Normal => self.normal,
            Scheme::Selected => self.selected,
        }
    }

    fn fill(&self, pixel: u32, x: i32, y: i32, width: i32, height: i32) {
        if width <= 0 || height <= 0 {
            return;
        }
        unsafe {
            xlib::XSetForeground(self.display, self.gc, pixel as u64);
            xlib::XFillRectangle(
                self.display,
                self.pixmap,
                self.gc,
                x,
                y,
                width as u32,
                height as u32,
            );
        }
    }
}

impl DrawSurface for XftSurface {
    fn font_height(&self) -> i32 {
        self.font.height()
    }

    fn resize(&mut self, width: i32, height: i32) -> WmResult<()> {
        if width == self.width && height == self.height {
            return Ok(());
        }

        let pixmap = unsafe {
            xlib::XCreatePixmap(
                self.display,
                self.root,
                width.max(1) as u32,
                height.max(1) as u32,
                self.depth,
            )
        };
        self.pen.retarget(pixmap);
        unsafe {
            xlib::XFreePixmap(self.display, self.pixmap);
        }

        self.pixmap = pixmap;
        self.width = width;
        self.height = height;

        Ok(())
    }

    fn set_scheme(&mut self, scheme: Scheme) {
        self.scheme = scheme;
    }

    fn text_width(&self, text: &str) -> i32 {
        self.font.width(text)
    }

    fn text(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        left_padding: i32,
        text: &str,
        invert: bool,
    ) -> i32 {
        if width <= 0 {
            return x;
        }

        let colors = self.colors();
        let (foreground, background) = if invert {
            (colors.background, colors.foreground)
        } else {
            (colors.foreground, colors.background)
        };

        self.fill(background, x, y, width, height);

        if let Some(fitted) = self.font.fit(text, width - left_padding) {
            let baseline = self.font.baseline(y, height);
            self.pen
                .draw(&self.font, foreground, x + left_padding, baseline, &fitted);
        }

        x + width
    }

    fn rect(&mut self, x: i32, y: i32, width: i32, height: i32, filled: bool, invert: bool) {
        let colors = self.colors();
        let pixel = if invert {
            colors.background
        } else {
            colors.foreground
        };

        if filled {
            self.fill(pixel, x, y, width, height);
        } else if width > 1 && height > 1 {
            unsafe {
                xlib::XSetForeground(self.display, self.gc, pixel as u64);
                xlib::XDrawRectangle(
                    self.display,
                    self.pixmap,
                    self.gc,
                    x,
                    y,
                    (width - 1) as u32,
                    (height - 1) as u32,
                );
            }
        }
    }

    fn picture(&mut self, x: i32, y: i32, icon: &Icon) {
        let background = self.colors().background;
        let mut data: Vec<u32> = icon
            .pixels
            .iter()
            .map(|&pixel| blend(pixel, background))
            .collect();

        unsafe {
            let image = xlib::XCreateImage(
                self.display,
                self.visual,
                self.depth,
                xlib::ZPixmap,
                0,
                data.as_mut_ptr() as *mut c_char,
                icon.width,
                icon.height,
                32,
                0,
            );
            if image.is_null() {
                return;
            }

            xlib::XPutImage(
                self.display,
                self.pixmap,
                self.gc,
                image,
                0,
                0,
                x,
                y,
                icon.width,
                icon.height,
            );

            // the pixel buffer stays owned by `data`
            (*image).data = std::ptr::null_mut();
            xlib::XFree(image as *mut _);
        }
    }

    fn present(&mut self, window: Window, width: i32, height: i32) -> WmResult<()> {
        if width <= 0 || height <= 0 {
            return Ok(());
        }
        unsafe {
            xlib::XCopyArea(
                self.display,
                self.pixmap,
                window as xlib::Window,
                self.gc,
                0,
                0,
                width as u32,
                height as u32,
                0,
                0,
            );
            xlib::XSync(self.display, xlib::False);
        }
        Ok(())
    }
}

impl Drop for XftSurface {
    fn drop(&mut self) {
        unsafe {
            ManuallyDrop::drop(&mut self.pen);
            ManuallyDrop::drop(&mut self.font);
            xlib::XFreePixmap(self.display, self.pixmap);
            xlib::XFreeGC(self.display, self.gc);
            xlib::XCloseDisplay(self.display);
        }
    }
}

/// Composite a premultiplied ARGB pixel over an opaque RGB background.
fn blend(pixel: u32, background: u32) -> u32 {
    let alpha = pixel >> 24;
    let channel = |shift: u32| {
        let source = (pixel >> shift) & 0xff;
        let under = (background >> shift) & 0xff;
        (source + under * (255 - alpha) / 255).min(255) << shift
    };

    channel(16) | channel(8) | channel(0)
}
