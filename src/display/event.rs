//! Display-server events, reduced to what the window manager reacts to.

use crate::keyboard::keysyms::Keysym;
use x11rb::protocol::xproto::{ConfigWindow, StackMode, Window};

#[derive(Debug, Clone, PartialEq)]
pub enum WmEvent {
    ButtonPress {
        window: Window,
        root_x: i32,
        root_y: i32,
        /// Pointer x relative to `window`.
        event_x: i32,
        button: u8,
        state: u16,
    },
    ButtonRelease {
        root_x: i32,
        root_y: i32,
    },
    ClientMessage {
        window: Window,
        request: ClientRequest,
    },
    ConfigureNotify {
        window: Window,
        width: i32,
        height: i32,
    },
    ConfigureRequest(ConfigureRequest),
    DestroyNotify {
        window: Window,
    },
    EnterNotify {
        window: Window,
        normal_mode: bool,
        inferior_detail: bool,
    },
    Expose {
        window: Window,
        count: u16,
    },
    FocusIn {
        window: Window,
    },
    KeyPress {
        keysym: Keysym,
        state: u16,
    },
    MappingNotify {
        keyboard: bool,
    },
    MapRequest {
        window: Window,
    },
    MotionNotify {
        window: Window,
        root_x: i32,
        root_y: i32,
        /// Server time in milliseconds.
        time: u32,
    },
    PropertyNotify {
        window: Window,
        property: Property,
        deleted: bool,
    },
    UnmapNotify {
        window: Window,
        synthetic: bool,
    },
    /// An asynchronous protocol error.
    Error {
        error_code: u8,
        request_code: u8,
    },
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientRequest {
    /// `_NET_WM_STATE` naming `_NET_WM_STATE_FULLSCREEN`; 0 remove, 1 add,
    /// 2 toggle.
    Fullscreen { action: u32 },
    /// `_NET_ACTIVE_WINDOW`.
    Activate,
    Other,
}

/// Properties whose changes are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    WmName,
    NetWmName,
    WmNormalHints,
    WmHints,
    WmTransientFor,
    NetWmIcon,
    NetWmWindowType,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigureRequest {
    pub window: Window,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub border_width: i32,
    pub sibling: Window,
    pub stack_mode: StackMode,
    pub value_mask: ConfigWindow,
}

impl ConfigureRequest {
    pub fn has(&self, field: ConfigWindow) -> bool {
        self.value_mask.contains(field)
    }
}
