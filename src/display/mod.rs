//! The seam between window-management policy and the X server.
//!
//! [`DisplayServer`] is everything the manager asks of the server. The
//! production implementation speaks the X11 protocol through x11rb
//! (`crate::xserver::X11Display`); tests drive the manager through a recording
//! mock.

pub mod event;
#[cfg(test)]
pub mod mock;

pub use event::{ClientRequest, ConfigureRequest, Property, WmEvent};

use crate::errors::WmResult;
use crate::geometry::Rect;
use crate::keyboard::{ButtonBinding, KeyBinding};
use crate::size_hints::SizeHints;
use x11rb::protocol::xproto::Window;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    DeleteWindow,
    TakeFocus,
}

/// ICCCM `WM_STATE` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Withdrawn,
    Normal,
    Iconic,
}

impl WindowState {
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Withdrawn => 0,
            Self::Normal => 1,
            Self::Iconic => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    Normal,
    Move,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowAttributes {
    pub geometry: Rect,
    pub border_width: i32,
    pub override_redirect: bool,
    pub viewable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WmHints {
    pub urgent: bool,
    /// The input field, when the client set it.
    pub input: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassHint {
    pub class: String,
    pub instance: String,
}

/// Requests the window manager makes of the display server.
///
/// Queries about a window that vanished return `Ok(None)` or a neutral
/// value rather than an error; only connection failures are errors.
pub trait DisplayServer {
    fn root(&self) -> Window;
    fn screen_size(&self) -> (i32, i32);
    /// Geometries of the active outputs, `None` without multi-head support.
    fn output_geometries(&self) -> WmResult<Option<Vec<Rect>>>;

    fn next_event(&mut self) -> WmResult<WmEvent>;
    /// Round-trip so that all previous requests have been processed.
    fn sync(&self) -> WmResult<()>;
    /// Drop queued pointer-crossing events.
    fn discard_enter_events(&mut self) -> WmResult<()>;

    fn top_level_windows(&self) -> WmResult<Vec<Window>>;
    fn window_attributes(&self, window: Window) -> WmResult<Option<WindowAttributes>>;
    fn window_state(&self, window: Window) -> WmResult<Option<WindowState>>;
    fn transient_for(&self, window: Window) -> WmResult<Option<Window>>;
    fn class_hint(&self, window: Window) -> WmResult<ClassHint>;
    fn title(&self, window: Window) -> WmResult<Option<String>>;
    /// The root window name, which carries the status text.
    fn root_name(&self) -> WmResult<Option<String>>;
    fn normal_hints(&self, window: Window) -> WmResult<Option<SizeHints>>;
    fn wm_hints(&self, window: Window) -> WmResult<Option<WmHints>>;
    fn set_urgency_hint(&self, window: Window, urgent: bool) -> WmResult<()>;
    fn is_fullscreen_requested(&self, window: Window) -> WmResult<bool>;
    fn is_dialog(&self, window: Window) -> WmResult<bool>;
    /// Raw `_NET_WM_ICON` words.
    fn icon(&self, window: Window) -> WmResult<Option<Vec<u32>>>;
    fn supports_protocol(&self, window: Window, protocol: Protocol) -> WmResult<bool>;
    fn send_protocol(&self, window: Window, protocol: Protocol) -> WmResult<()>;
    /// The top-level window holding input focus.
    fn focused_window(&self) -> WmResult<Option<Window>>;

    /// Set position, size (border excluded) and border width.
    fn configure_window(&self, window: Window, geometry: Rect, border_width: i32) -> WmResult<()>;
    fn move_window(&self, window: Window, x: i32, y: i32) -> WmResult<()>;
    fn move_resize_window(&self, window: Window, geometry: Rect) -> WmResult<()>;
    fn set_border_width(&self, window: Window, border_width: i32) -> WmResult<()>;
    fn forward_configure_request(&self, request: &ConfigureRequest) -> WmResult<()>;
    /// Synthetic `ConfigureNotify` describing the authoritative geometry.
    fn send_configure_notify(
        &self,
        window: Window,
        geometry: Rect,
        border_width: i32,
    ) -> WmResult<()>;
    fn raise_window(&self, window: Window) -> WmResult<()>;
    fn stack_below(&self, window: Window, sibling: Window) -> WmResult<()>;
    fn set_border_color(&self, window: Window, pixel: u32) -> WmResult<()>;
    /// `None` or a value outside `[0, 1]` removes the opacity property.
    fn set_opacity(&self, window: Window, opacity: Option<f32>) -> WmResult<()>;
    fn set_window_state(&self, window: Window, state: WindowState) -> WmResult<()>;
    fn set_fullscreen_state(&self, window: Window, fullscreen: bool) -> WmResult<()>;
    fn select_client_events(&self, window: Window) -> WmResult<()>;
    /// Hand a window back when it is unmanaged without being destroyed.
    fn release_client(&self, window: Window, border_width: i32) -> WmResult<()>;
    /// `None` gives focus back to the root window.
    fn set_input_focus(&self, window: Option<Window>) -> WmResult<()>;
    fn set_active_window(&self, window: Option<Window>) -> WmResult<()>;
    fn set_client_list(&self, windows: &[Window]) -> WmResult<()>;
    fn append_client_list(&self, window: Window) -> WmResult<()>;
    fn map_window(&self, window: Window) -> WmResult<()>;
    fn unmap_window(&self, window: Window) -> WmResult<()>;
    fn kill_client(&self, window: Window) -> WmResult<()>;

    fn refresh_keyboard_mapping(&mut self) -> WmResult<()>;
    /// Modifier bit currently carrying NumLock.
    fn numlock_mask(&self) -> WmResult<u16>;
    fn grab_keys(&self, bindings: &[KeyBinding], numlock_mask: u16) -> WmResult<()>;
    /// Unfocused clients grab every button for click-to-focus; focused ones
    /// only the client-window bindings.
    fn grab_buttons(
        &self,
        window: Window,
        focused: bool,
        bindings: &[ButtonBinding],
        numlock_mask: u16,
    ) -> WmResult<()>;
    /// `false` when another client holds the pointer.
    fn grab_pointer(&self, cursor: CursorKind) -> WmResult<bool>;
    fn ungrab_pointer(&self) -> WmResult<()>;
    fn query_pointer(&self) -> WmResult<Option<(i32, i32)>>;
    fn warp_pointer(&self, window: Window, x: i32, y: i32) -> WmResult<()>;
    /// Release a button press frozen by a synchronous grab.
    fn replay_pointer(&self) -> WmResult<()>;

    fn create_bar_window(&self, geometry: Rect) -> WmResult<Window>;
    fn destroy_window(&self, window: Window) -> WmResult<()>;
    /// Ungrab everything and drop the EWMH bookkeeping on the way out.
    fn shutdown(&mut self) -> WmResult<()>;
}
