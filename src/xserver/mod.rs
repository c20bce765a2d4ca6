//! The production [`DisplayServer`]: the X11 protocol spoken through
//! x11rb's pure-Rust connection.

mod atoms;
mod translate;

use crate::display::{
    ClassHint, ConfigureRequest, CursorKind, DisplayServer, Protocol, WindowAttributes,
    WindowState, WmEvent, WmHints,
};
use crate::errors::{WmError, WmResult, X11Error, protocol};
use crate::geometry::Rect;
use crate::keyboard::handlers::lock_variants;
use crate::keyboard::keysyms::{XK_NUM_LOCK, format_keysym};
use crate::keyboard::{ButtonBinding, ClickRegion, KeyBinding, KeyboardMapping};
use crate::size_hints::SizeHints;
use atoms::Atoms;
use std::collections::VecDeque;
use tracing::{debug, info, warn};
use x11rb::CURRENT_TIME;
use x11rb::connection::Connection;
use x11rb::cursor::Handle as CursorHandle;
use x11rb::errors::ReplyError;
use x11rb::protocol::Event;
use x11rb::protocol::xinerama::ConnectionExt as _;
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;

const WM_NAME: &str = "tilewm";

/// `WM_HINTS` flag bits.
const INPUT_HINT: u32 = 1 << 0;
const URGENCY_HINT: u32 = 1 << 8;
/// Words in a full `WM_HINTS` property.
const WM_HINTS_LENGTH: u32 = 9;
/// Words in a full `WM_NORMAL_HINTS` property.
const WM_SIZE_HINTS_LENGTH: u32 = 18;

struct Cursors {
    normal: Cursor,
    moving: Cursor,
    resizing: Cursor,
}

pub struct X11Display {
    connection: RustConnection,
    screen: Screen,
    atoms: Atoms,
    cursors: Cursors,
    keyboard: KeyboardMapping,
    /// Supporting window for `_NET_SUPPORTING_WM_CHECK`.
    check_window: Window,
    /// Events read ahead while dropping crossing events.
    pending: VecDeque<Event>,
}

/// A reply to a request about a window that no longer exists is `None`.
fn vanished<T>(reply: Result<T, ReplyError>) -> WmResult<Option<T>> {
    match reply {
        Ok(value) => Ok(Some(value)),
        Err(ReplyError::X11Error(_)) => Ok(None),
        Err(error) => Err(error.into()),
    }
}

fn read_keyboard_mapping(connection: &RustConnection) -> WmResult<KeyboardMapping> {
    let setup = connection.setup();
    let (min, max) = (setup.min_keycode, setup.max_keycode);
    let reply = connection
        .get_keyboard_mapping(min, max - min + 1)?
        .reply()?;
    Ok(KeyboardMapping::new(
        min,
        reply.keysyms_per_keycode,
        reply.keysyms,
    ))
}

impl X11Display {
    /// Connect to `$DISPLAY` and take over the root window.
    pub fn connect() -> WmResult<Self> {
        let (connection, screen_number) = x11rb::connect(None)?;
        let screen = connection
            .setup()
            .roots
            .get(screen_number)
            .cloned()
            .ok_or(X11Error::DisplayOpenFailed)?;
        let root = screen.root;

        // only one client may select substructure redirection on the root
        let redirect = connection
            .change_window_attributes(
                root,
                &ChangeWindowAttributesAux::new().event_mask(EventMask::SUBSTRUCTURE_REDIRECT),
            )?
            .check();
        match redirect {
            Err(ReplyError::X11Error(error)) if error.error_code == protocol::BAD_ACCESS => {
                return Err(WmError::OtherWmRunning);
            }
            other => other?,
        }

        let atoms = Atoms::new(&connection)?.reply()?;

        let database = x11rb::resource_manager::new_from_default(&connection)?;
        let handle = CursorHandle::new(&connection, screen_number, &database)?.reply()?;
        let cursors = Cursors {
            normal: handle.load_cursor(&connection, "left_ptr")?,
            moving: handle.load_cursor(&connection, "fleur")?,
            resizing: handle.load_cursor(&connection, "sizing")?,
        };

        let keyboard = read_keyboard_mapping(&connection)?;
        let check_window = connection.generate_id()?;

        let display = Self {
            connection,
            screen,
            atoms,
            cursors,
            keyboard,
            check_window,
            pending: VecDeque::new(),
        };
        display.advertise()?;
        display.select_root_events()?;

        let (width, height) = (display.screen.width_in_pixels, display.screen.height_in_pixels);
        info!(
            screen = screen_number,
            width = width,
            height = height,
            "connected to the X server"
        );
        Ok(display)
    }

    /// EWMH supporting window and `_NET_SUPPORTED`.
    fn advertise(&self) -> WmResult<()> {
        let root = self.screen.root;
        let check = self.check_window;

        self.connection.create_window(
            self.screen.root_depth,
            check,
            root,
            0,
            0,
            1,
            1,
            0,
            WindowClass::INPUT_OUTPUT,
            0,
            &CreateWindowAux::new(),
        )?;
        self.set_property32(
            PropMode::REPLACE,
            check,
            self.atoms._NET_SUPPORTING_WM_CHECK,
            AtomEnum::WINDOW,
            &[check],
        )?;
        self.connection.change_property(
            PropMode::REPLACE,
            check,
            self.atoms._NET_WM_NAME,
            self.atoms.UTF8_STRING,
            8,
            WM_NAME.len() as u32,
            WM_NAME.as_bytes(),
        )?;
        self.set_property32(
            PropMode::REPLACE,
            root,
            self.atoms._NET_SUPPORTING_WM_CHECK,
            AtomEnum::WINDOW,
            &[check],
        )?;
        self.set_property32(
            PropMode::REPLACE,
            root,
            self.atoms._NET_SUPPORTED,
            AtomEnum::ATOM,
            &self.atoms.supported(),
        )?;
        self.connection
            .delete_property(root, self.atoms._NET_CLIENT_LIST)?;
        Ok(())
    }

    fn select_root_events(&self) -> WmResult<()> {
        let mask = EventMask::SUBSTRUCTURE_REDIRECT
            | EventMask::SUBSTRUCTURE_NOTIFY
            | EventMask::BUTTON_PRESS
            | EventMask::POINTER_MOTION
            | EventMask::ENTER_WINDOW
            | EventMask::LEAVE_WINDOW
            | EventMask::STRUCTURE_NOTIFY
            | EventMask::PROPERTY_CHANGE;
        self.connection.change_window_attributes(
            self.screen.root,
            &ChangeWindowAttributesAux::new()
                .event_mask(mask)
                .cursor(self.cursors.normal),
        )?;
        Ok(())
    }

    fn set_property32(
        &self,
        mode: PropMode,
        window: Window,
        property: impl Into<Atom>,
        type_: impl Into<Atom>,
        values: &[u32],
    ) -> WmResult<()> {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_ne_bytes()).collect();
        self.connection.change_property(
            mode,
            window,
            property,
            type_,
            32,
            values.len() as u32,
            &bytes,
        )?;
        Ok(())
    }

    /// The property, `None` when it is unset or the window is gone.
    fn property(
        &self,
        window: Window,
        property: impl Into<Atom>,
        type_: impl Into<Atom>,
        length: u32,
    ) -> WmResult<Option<GetPropertyReply>> {
        let reply = vanished(
            self.connection
                .get_property(false, window, property, type_, 0, length)?
                .reply(),
        )?;
        Ok(reply.filter(|r| r.format != 0))
    }

    fn property32(
        &self,
        window: Window,
        property: impl Into<Atom>,
        type_: impl Into<Atom>,
        length: u32,
    ) -> WmResult<Vec<u32>> {
        Ok(self
            .property(window, property, type_, length)?
            .and_then(|r| r.value32().map(|values| values.collect()))
            .unwrap_or_default())
    }

    fn text_property(&self, window: Window, property: impl Into<Atom>) -> WmResult<Option<String>> {
        Ok(self
            .property(window, property, AtomEnum::ANY, u32::MAX)?
            .and_then(|r| translate::text(&r.value)))
    }

    fn has_atom(&self, window: Window, property: Atom, atom: Atom) -> WmResult<bool> {
        Ok(self
            .property32(window, property, AtomEnum::ATOM, u32::MAX)?
            .contains(&atom))
    }

    fn protocol_atom(&self, protocol: Protocol) -> Atom {
        match protocol {
            Protocol::DeleteWindow => self.atoms.WM_DELETE_WINDOW,
            Protocol::TakeFocus => self.atoms.WM_TAKE_FOCUS,
        }
    }

    fn configure(&self, window: Window, aux: &ConfigureWindowAux) -> WmResult<()> {
        self.connection.configure_window(window, aux)?;
        Ok(())
    }

    fn round_trip(&self) -> WmResult<()> {
        self.connection.get_input_focus()?.reply()?;
        Ok(())
    }
}

impl DisplayServer for X11Display {
    fn root(&self) -> Window {
        self.screen.root
    }

    fn screen_size(&self) -> (i32, i32) {
        (
            self.screen.width_in_pixels.into(),
            self.screen.height_in_pixels.into(),
        )
    }

    fn output_geometries(&self) -> WmResult<Option<Vec<Rect>>> {
        let active = self
            .connection
            .xinerama_is_active()
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .is_some_and(|reply| reply.state != 0);
        if !active {
            return Ok(None);
        }

        let reply = self.connection.xinerama_query_screens()?.reply()?;
        let outputs = reply
            .screen_info
            .iter()
            .filter(|info| info.width > 0 && info.height > 0)
            .map(|info| {
                Rect::new(
                    info.x_org.into(),
                    info.y_org.into(),
                    info.width.into(),
                    info.height.into(),
                )
            })
            .collect();
        Ok(Some(outputs))
    }

    fn next_event(&mut self) -> WmResult<WmEvent> {
        let event = match self.pending.pop_front() {
            Some(event) => event,
            None => {
                self.connection.flush()?;
                self.connection.wait_for_event()?
            }
        };
        Ok(translate::event(event, &self.atoms, &self.keyboard))
    }

    fn sync(&self) -> WmResult<()> {
        self.round_trip()
    }

    fn discard_enter_events(&mut self) -> WmResult<()> {
        self.round_trip()?;
        self.pending
            .retain(|event| !matches!(event, Event::EnterNotify(_)));
        while let Some(event) = self.connection.poll_for_event()? {
            if !matches!(event, Event::EnterNotify(_)) {
                self.pending.push_back(event);
            }
        }
        Ok(())
    }

    fn top_level_windows(&self) -> WmResult<Vec<Window>> {
        let tree = self.connection.query_tree(self.screen.root)?.reply()?;
        Ok(tree.children)
    }

    fn window_attributes(&self, window: Window) -> WmResult<Option<WindowAttributes>> {
        let attributes_cookie = self.connection.get_window_attributes(window)?;
        let geometry_cookie = self.connection.get_geometry(window)?;
        let Some(attributes) = vanished(attributes_cookie.reply())? else {
            return Ok(None);
        };
        let Some(geometry) = vanished(geometry_cookie.reply())? else {
            return Ok(None);
        };

        Ok(Some(WindowAttributes {
            geometry: Rect::new(
                geometry.x.into(),
                geometry.y.into(),
                geometry.width.into(),
                geometry.height.into(),
            ),
            border_width: geometry.border_width.into(),
            override_redirect: attributes.override_redirect,
            viewable: attributes.map_state == MapState::VIEWABLE,
        }))
    }

    fn window_state(&self, window: Window) -> WmResult<Option<WindowState>> {
        let state = self.property32(window, self.atoms.WM_STATE, self.atoms.WM_STATE, 2)?;
        Ok(match state.first() {
            Some(0) => Some(WindowState::Withdrawn),
            Some(1) => Some(WindowState::Normal),
            Some(3) => Some(WindowState::Iconic),
            _ => None,
        })
    }

    fn transient_for(&self, window: Window) -> WmResult<Option<Window>> {
        let parent = self.property32(window, AtomEnum::WM_TRANSIENT_FOR, AtomEnum::WINDOW, 1)?;
        Ok(parent.first().copied().filter(|&w| w != x11rb::NONE))
    }

    fn class_hint(&self, window: Window) -> WmResult<ClassHint> {
        Ok(self
            .property(window, AtomEnum::WM_CLASS, AtomEnum::STRING, u32::MAX)?
            .map(|r| translate::class_hint(&r.value))
            .unwrap_or_default())
    }

    fn title(&self, window: Window) -> WmResult<Option<String>> {
        match self.text_property(window, self.atoms._NET_WM_NAME)? {
            Some(title) => Ok(Some(title)),
            None => self.text_property(window, AtomEnum::WM_NAME),
        }
    }

    fn root_name(&self) -> WmResult<Option<String>> {
        self.text_property(self.screen.root, AtomEnum::WM_NAME)
    }

    fn normal_hints(&self, window: Window) -> WmResult<Option<SizeHints>> {
        let Some(reply) = self.property(
            window,
            AtomEnum::WM_NORMAL_HINTS,
            AtomEnum::WM_SIZE_HINTS,
            WM_SIZE_HINTS_LENGTH,
        )?
        else {
            return Ok(None);
        };
        let raw: Vec<u32> = reply
            .value32()
            .map(|values| values.collect())
            .unwrap_or_default();
        Ok(Some(SizeHints::from_normal_hints(&raw)))
    }

    fn wm_hints(&self, window: Window) -> WmResult<Option<WmHints>> {
        let raw = self.property32(window, AtomEnum::WM_HINTS, AtomEnum::WM_HINTS, WM_HINTS_LENGTH)?;
        let Some(&flags) = raw.first() else {
            return Ok(None);
        };
        Ok(Some(WmHints {
            urgent: flags & URGENCY_HINT != 0,
            input: (flags & INPUT_HINT != 0).then(|| raw.get(1).is_some_and(|&i| i != 0)),
        }))
    }

    fn set_urgency_hint(&self, window: Window, urgent: bool) -> WmResult<()> {
        let mut raw = self.property32(window, AtomEnum::WM_HINTS, AtomEnum::WM_HINTS, WM_HINTS_LENGTH)?;
        let Some(flags) = raw.first_mut() else {
            return Ok(());
        };
        if urgent {
            *flags |= URGENCY_HINT;
        } else {
            *flags &= !URGENCY_HINT;
        }
        self.set_property32(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_HINTS,
            AtomEnum::WM_HINTS,
            &raw,
        )
    }

    fn is_fullscreen_requested(&self, window: Window) -> WmResult<bool> {
        self.has_atom(
            window,
            self.atoms._NET_WM_STATE,
            self.atoms._NET_WM_STATE_FULLSCREEN,
        )
    }

    fn is_dialog(&self, window: Window) -> WmResult<bool> {
        self.has_atom(
            window,
            self.atoms._NET_WM_WINDOW_TYPE,
            self.atoms._NET_WM_WINDOW_TYPE_DIALOG,
        )
    }

    fn icon(&self, window: Window) -> WmResult<Option<Vec<u32>>> {
        let raw = self.property32(window, self.atoms._NET_WM_ICON, AtomEnum::CARDINAL, u32::MAX)?;
        Ok((!raw.is_empty()).then_some(raw))
    }

    fn supports_protocol(&self, window: Window, protocol: Protocol) -> WmResult<bool> {
        let atom = self.protocol_atom(protocol);
        self.has_atom(window, self.atoms.WM_PROTOCOLS, atom)
    }

    fn send_protocol(&self, window: Window, protocol: Protocol) -> WmResult<()> {
        let event = ClientMessageEvent::new(
            32,
            window,
            self.atoms.WM_PROTOCOLS,
            [self.protocol_atom(protocol), CURRENT_TIME, 0, 0, 0],
        );
        self.connection
            .send_event(false, window, EventMask::NO_EVENT, event)?;
        Ok(())
    }

    fn focused_window(&self) -> WmResult<Option<Window>> {
        let root = self.screen.root;
        let mut window = self.connection.get_input_focus()?.reply()?.focus;
        if window == root || window == x11rb::NONE || window == u32::from(InputFocus::POINTER_ROOT) {
            return Ok(None);
        }

        loop {
            let Some(tree) = vanished(self.connection.query_tree(window)?.reply())? else {
                return Ok(None);
            };
            if tree.parent == root || tree.parent == x11rb::NONE {
                return Ok(Some(window));
            }
            window = tree.parent;
        }
    }

    fn configure_window(&self, window: Window, geometry: Rect, border_width: i32) -> WmResult<()> {
        self.configure(
            window,
            &ConfigureWindowAux::new()
                .x(geometry.x)
                .y(geometry.y)
                .width(geometry.width.max(1) as u32)
                .height(geometry.height.max(1) as u32)
                .border_width(border_width.max(0) as u32),
        )
    }

    fn move_window(&self, window: Window, x: i32, y: i32) -> WmResult<()> {
        self.configure(window, &ConfigureWindowAux::new().x(x).y(y))
    }

    fn move_resize_window(&self, window: Window, geometry: Rect) -> WmResult<()> {
        self.configure(
            window,
            &ConfigureWindowAux::new()
                .x(geometry.x)
                .y(geometry.y)
                .width(geometry.width.max(1) as u32)
                .height(geometry.height.max(1) as u32),
        )
    }

    fn set_border_width(&self, window: Window, border_width: i32) -> WmResult<()> {
        self.configure(
            window,
            &ConfigureWindowAux::new().border_width(border_width.max(0) as u32),
        )
    }

    fn forward_configure_request(&self, request: &ConfigureRequest) -> WmResult<()> {
        let mut aux = ConfigureWindowAux::new();
        if request.has(ConfigWindow::X) {
            aux = aux.x(request.x);
        }
        if request.has(ConfigWindow::Y) {
            aux = aux.y(request.y);
        }
        if request.has(ConfigWindow::WIDTH) {
            aux = aux.width(request.width.max(1) as u32);
        }
        if request.has(ConfigWindow::HEIGHT) {
            aux = aux.height(request.height.max(1) as u32);
        }
        if request.has(ConfigWindow::BORDER_WIDTH) {
            aux = aux.border_width(request.border_width.max(0) as u32);
        }
        if request.has(ConfigWindow::SIBLING) {
            aux = aux.sibling(request.sibling);
        }
        if request.has(ConfigWindow::STACK_MODE) {
            aux = aux.stack_mode(request.stack_mode);
        }
        self.configure(request.window, &aux)
    }

    fn send_configure_notify(
        &self,
        window: Window,
        geometry: Rect,
        border_width: i32,
    ) -> WmResult<()> {
        let event = ConfigureNotifyEvent {
            response_type: CONFIGURE_NOTIFY_EVENT,
            sequence: 0,
            event: window,
            window,
            above_sibling: x11rb::NONE,
            x: geometry.x as i16,
            y: geometry.y as i16,
            width: geometry.width.max(1) as u16,
            height: geometry.height.max(1) as u16,
            border_width: border_width.max(0) as u16,
            override_redirect: false,
        };
        self.connection
            .send_event(false, window, EventMask::STRUCTURE_NOTIFY, event)?;
        Ok(())
    }

    fn raise_window(&self, window: Window) -> WmResult<()> {
        self.configure(window, &ConfigureWindowAux::new().stack_mode(StackMode::ABOVE))
    }

    fn stack_below(&self, window: Window, sibling: Window) -> WmResult<()> {
        self.configure(
            window,
            &ConfigureWindowAux::new()
                .sibling(sibling)
                .stack_mode(StackMode::BELOW),
        )
    }

    fn set_border_color(&self, window: Window, pixel: u32) -> WmResult<()> {
        self.connection.change_window_attributes(
            window,
            &ChangeWindowAttributesAux::new().border_pixel(pixel),
        )?;
        Ok(())
    }

    fn set_opacity(&self, window: Window, opacity: Option<f32>) -> WmResult<()> {
        match translate::opacity(opacity) {
            Some(value) => self.set_property32(
                PropMode::REPLACE,
                window,
                self.atoms._NET_WM_WINDOW_OPACITY,
                AtomEnum::CARDINAL,
                &[value],
            ),
            None => {
                self.connection
                    .delete_property(window, self.atoms._NET_WM_WINDOW_OPACITY)?;
                Ok(())
            }
        }
    }

    fn set_window_state(&self, window: Window, state: WindowState) -> WmResult<()> {
        self.set_property32(
            PropMode::REPLACE,
            window,
            self.atoms.WM_STATE,
            self.atoms.WM_STATE,
            &[state.as_u32(), x11rb::NONE],
        )
    }

    fn set_fullscreen_state(&self, window: Window, fullscreen: bool) -> WmResult<()> {
        let state: &[Atom] = if fullscreen {
            &[self.atoms._NET_WM_STATE_FULLSCREEN]
        } else {
            &[]
        };
        self.set_property32(
            PropMode::REPLACE,
            window,
            self.atoms._NET_WM_STATE,
            AtomEnum::ATOM,
            state,
        )
    }

    fn select_client_events(&self, window: Window) -> WmResult<()> {
        let mask = EventMask::ENTER_WINDOW
            | EventMask::FOCUS_CHANGE
            | EventMask::PROPERTY_CHANGE
            | EventMask::STRUCTURE_NOTIFY;
        self.connection.change_window_attributes(
            window,
            &ChangeWindowAttributesAux::new().event_mask(mask),
        )?;
        Ok(())
    }

    fn release_client(&self, window: Window, border_width: i32) -> WmResult<()> {
        self.connection.grab_server()?;
        self.set_border_width(window, border_width)?;
        self.connection
            .ungrab_button(ButtonIndex::ANY, window, ModMask::ANY)?;
        self.set_window_state(window, WindowState::Withdrawn)?;
        self.round_trip()?;
        self.connection.ungrab_server()?;
        Ok(())
    }

    fn set_input_focus(&self, window: Option<Window>) -> WmResult<()> {
        let target = window.unwrap_or(self.screen.root);
        self.connection
            .set_input_focus(InputFocus::POINTER_ROOT, target, CURRENT_TIME)?;
        Ok(())
    }

    fn set_active_window(&self, window: Option<Window>) -> WmResult<()> {
        let root = self.screen.root;
        match window {
            Some(window) => self.set_property32(
                PropMode::REPLACE,
                root,
                self.atoms._NET_ACTIVE_WINDOW,
                AtomEnum::WINDOW,
                &[window],
            ),
            None => {
                self.connection
                    .delete_property(root, self.atoms._NET_ACTIVE_WINDOW)?;
                Ok(())
            }
        }
    }

    fn set_client_list(&self, windows: &[Window]) -> WmResult<()> {
        self.set_property32(
            PropMode::REPLACE,
            self.screen.root,
            self.atoms._NET_CLIENT_LIST,
            AtomEnum::WINDOW,
            windows,
        )
    }

    fn append_client_list(&self, window: Window) -> WmResult<()> {
        self.set_property32(
            PropMode::APPEND,
            self.screen.root,
            self.atoms._NET_CLIENT_LIST,
            AtomEnum::WINDOW,
            &[window],
        )
    }

    fn map_window(&self, window: Window) -> WmResult<()> {
        self.connection.map_window(window)?;
        Ok(())
    }

    fn unmap_window(&self, window: Window) -> WmResult<()> {
        self.connection.unmap_window(window)?;
        Ok(())
    }

    fn kill_client(&self, window: Window) -> WmResult<()> {
        self.connection.grab_server()?;
        self.connection.set_close_down_mode(CloseDown::DESTROY_ALL)?;
        self.connection.kill_client(window)?;
        self.round_trip()?;
        self.connection.ungrab_server()?;
        Ok(())
    }

    fn refresh_keyboard_mapping(&mut self) -> WmResult<()> {
        self.keyboard = read_keyboard_mapping(&self.connection)?;
        debug!("keyboard mapping refreshed");
        Ok(())
    }

    fn numlock_mask(&self) -> WmResult<u16> {
        let reply = self.connection.get_modifier_mapping()?.reply()?;
        let per_modifier = reply.keycodes.len() / 8;
        let numlock = self.keyboard.keycodes_for(XK_NUM_LOCK);
        Ok(translate::numlock_mask(&reply.keycodes, per_modifier, &numlock))
    }

    fn grab_keys(&self, bindings: &[KeyBinding], numlock_mask: u16) -> WmResult<()> {
        let root = self.screen.root;
        self.connection
            .ungrab_key(Grab::ANY, root, ModMask::ANY)?;

        for binding in bindings {
            let keycodes = self.keyboard.keycodes_for(binding.keysym);
            if keycodes.is_empty() {
                warn!(key = %format_keysym(binding.keysym), "no keycode produces the bound key");
            }
            for keycode in keycodes {
                for variant in lock_variants(numlock_mask) {
                    self.connection.grab_key(
                        true,
                        root,
                        ModMask::from(binding.modifiers | variant),
                        keycode,
                        GrabMode::ASYNC,
                        GrabMode::ASYNC,
                    )?;
                }
            }
        }
        Ok(())
    }

    fn grab_buttons(
        &self,
        window: Window,
        focused: bool,
        bindings: &[ButtonBinding],
        numlock_mask: u16,
    ) -> WmResult<()> {
        let mask = EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE;
        self.connection
            .ungrab_button(ButtonIndex::ANY, window, ModMask::ANY)?;

        if !focused {
            self.connection.grab_button(
                false,
                window,
                mask,
                GrabMode::SYNC,
                GrabMode::SYNC,
                x11rb::NONE,
                x11rb::NONE,
                ButtonIndex::ANY,
                ModMask::ANY,
            )?;
        }

        for binding in bindings.iter().filter(|b| b.click == ClickRegion::ClientWindow) {
            for variant in lock_variants(numlock_mask) {
                self.connection.grab_button(
                    false,
                    window,
                    mask,
                    GrabMode::ASYNC,
                    GrabMode::SYNC,
                    x11rb::NONE,
                    x11rb::NONE,
                    ButtonIndex::from(binding.button),
                    ModMask::from(binding.modifiers | variant),
                )?;
            }
        }
        Ok(())
    }

    fn grab_pointer(&self, cursor: CursorKind) -> WmResult<bool> {
        let cursor = match cursor {
            CursorKind::Normal => self.cursors.normal,
            CursorKind::Move => self.cursors.moving,
            CursorKind::Resize => self.cursors.resizing,
        };
        let reply = self
            .connection
            .grab_pointer(
                false,
                self.screen.root,
                EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE | EventMask::POINTER_MOTION,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
                x11rb::NONE,
                cursor,
                CURRENT_TIME,
            )?
            .reply()?;
        Ok(reply.status == GrabStatus::SUCCESS)
    }

    fn ungrab_pointer(&self) -> WmResult<()> {
        self.connection.ungrab_pointer(CURRENT_TIME)?;
        Ok(())
    }

    fn query_pointer(&self) -> WmResult<Option<(i32, i32)>> {
        let reply = self.connection.query_pointer(self.screen.root)?.reply()?;
        Ok(reply
            .same_screen
            .then(|| (reply.root_x.into(), reply.root_y.into())))
    }

    fn warp_pointer(&self, window: Window, x: i32, y: i32) -> WmResult<()> {
        self.connection
            .warp_pointer(x11rb::NONE, window, 0, 0, 0, 0, x as i16, y as i16)?;
        Ok(())
    }

    fn replay_pointer(&self) -> WmResult<()> {
        self.connection
            .allow_events(Allow::REPLAY_POINTER, CURRENT_TIME)?;
        Ok(())
    }

    fn create_bar_window(&self, geometry: Rect) -> WmResult<Window> {
        let window = self.connection.generate_id()?;
        self.connection.create_window(
            self.screen.root_depth,
            window,
            self.screen.root,
            geometry.x as i16,
            geometry.y as i16,
            geometry.width.max(1) as u16,
            geometry.height.max(1) as u16,
            0,
            WindowClass::INPUT_OUTPUT,
            self.screen.root_visual,
            &CreateWindowAux::new()
                .override_redirect(1)
                .background_pixmap(BackPixmap::PARENT_RELATIVE)
                .event_mask(EventMask::BUTTON_PRESS | EventMask::EXPOSURE)
                .cursor(self.cursors.normal),
        )?;

        let class = format!("{WM_NAME}\0{WM_NAME}\0");
        self.connection.change_property(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_CLASS,
            AtomEnum::STRING,
            8,
            class.len() as u32,
            class.as_bytes(),
        )?;
        self.connection.map_window(window)?;
        self.raise_window(window)?;
        debug!(window, ?geometry, "created bar window");
        Ok(window)
    }

    fn destroy_window(&self, window: Window) -> WmResult<()> {
        self.connection.destroy_window(window)?;
        Ok(())
    }

    fn shutdown(&mut self) -> WmResult<()> {
        let root = self.screen.root;
        self.connection
            .ungrab_key(Grab::ANY, root, ModMask::ANY)?;
        self.connection.destroy_window(self.check_window)?;
        for cursor in [
            self.cursors.normal,
            self.cursors.moving,
            self.cursors.resizing,
        ] {
            self.connection.free_cursor(cursor)?;
        }
        self.connection.set_input_focus(
            InputFocus::POINTER_ROOT,
            InputFocus::POINTER_ROOT,
            CURRENT_TIME,
        )?;
        self.connection
            .delete_property(root, self.atoms._NET_ACTIVE_WINDOW)?;
        self.round_trip()?;
        info!("released the display");
        Ok(())
    }
}
