//! Builders shared by the window-manager tests.

pub use crate::bar::mock::MockSurface;
pub use crate::display::mock::{MockDisplay, ROOT};

use super::WindowManager;
use crate::Config;
use crate::display::WmEvent;
use crate::geometry::Rect;
use x11rb::protocol::xproto::Window;

pub type TestWm = WindowManager<MockDisplay, MockSurface>;

/// The stock configuration without window gaps, so that geometry in
/// assertions stays round.
pub fn config() -> Config {
    Config {
        gap_window: 0,
        ..Config::default()
    }
}

pub fn wm_with(display: MockDisplay) -> TestWm {
    wm_with_config(config(), display)
}

pub fn wm_with_config(config: Config, display: MockDisplay) -> TestWm {
    WindowManager::new(config, display, MockSurface::default()).expect("window manager")
}

pub fn wm() -> TestWm {
    wm_with(MockDisplay::new(1920, 1080))
}

/// Create `window` on the mock server and have it request mapping.
pub fn map(wm: &mut TestWm, window: Window) {
    wm.display.add_window(window, Rect::new(100, 100, 400, 300));
    wm.handle_event(WmEvent::MapRequest { window })
        .expect("map request");
}
