//! A scripted display server that records every request.

use super::*;
use crate::errors::WmError;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

pub const ROOT: Window = 1;

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Configure { window: Window, geometry: Rect, border_width: i32 },
    Move { window: Window, x: i32, y: i32 },
    MoveResize { window: Window, geometry: Rect },
    BorderWidth { window: Window, border_width: i32 },
    ForwardConfigure(Window),
    ConfigureNotify { window: Window, geometry: Rect },
    Raise(Window),
    StackBelow { window: Window, sibling: Window },
    BorderColor { window: Window, pixel: u32 },
    Opacity { window: Window, opacity: Option<f32> },
    WindowState { window: Window, state: WindowState },
    FullscreenState { window: Window, fullscreen: bool },
    SelectEvents(Window),
    Release { window: Window, border_width: i32 },
    InputFocus(Option<Window>),
    ActiveWindow(Option<Window>),
    ClientList(Vec<Window>),
    AppendClientList(Window),
    Map(Window),
    Unmap(Window),
    Kill(Window),
    SendProtocol { window: Window, protocol: Protocol },
    Urgency { window: Window, urgent: bool },
    GrabKeys(usize),
    GrabButtons { window: Window, focused: bool },
    GrabPointer(CursorKind),
    UngrabPointer,
    Warp { window: Window, x: i32, y: i32 },
    ReplayPointer,
    CreateBar(Window),
    DestroyWindow(Window),
    DiscardEnterEvents,
    RefreshKeyboardMapping,
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct MockWindow {
    pub attributes: WindowAttributes,
    pub title: Option<String>,
    pub class: ClassHint,
    pub size_hints: Option<SizeHints>,
    pub wm_hints: Option<WmHints>,
    pub transient_for: Option<Window>,
    pub fullscreen: bool,
    pub dialog: bool,
    pub icon: Option<Vec<u32>>,
    pub protocols: Vec<Protocol>,
    pub state: Option<WindowState>,
}

impl MockWindow {
    pub fn new(geometry: Rect) -> Self {
        Self {
            attributes: WindowAttributes {
                geometry,
                border_width: 0,
                override_redirect: false,
                viewable: true,
            },
            title: None,
            class: ClassHint::default(),
            size_hints: None,
            wm_hints: None,
            transient_for: None,
            fullscreen: false,
            dialog: false,
            icon: None,
            protocols: Vec::new(),
            state: None,
        }
    }
}

pub struct MockDisplay {
    pub screen: (i32, i32),
    pub outputs: RefCell<Option<Vec<Rect>>>,
    pub windows: RefCell<HashMap<Window, MockWindow>>,
    pub events: VecDeque<WmEvent>,
    pub requests: RefCell<Vec<Request>>,
    pub pointer: Cell<Option<(i32, i32)>>,
    pub pointer_grabbable: Cell<bool>,
    pub focused: Cell<Option<Window>>,
    pub root_name: RefCell<Option<String>>,
    pub numlock: u16,
    next_id: Cell<Window>,
}

impl MockDisplay {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            screen: (width, height),
            outputs: RefCell::new(None),
            windows: RefCell::new(HashMap::new()),
            events: VecDeque::new(),
            requests: RefCell::new(Vec::new()),
            pointer: Cell::new(Some((0, 0))),
            pointer_grabbable: Cell::new(true),
            focused: Cell::new(None),
            root_name: RefCell::new(None),
            numlock: 1 << 4,
            next_id: Cell::new(0x1000),
        }
    }

    pub fn with_outputs(width: i32, height: i32, outputs: Vec<Rect>) -> Self {
        let display = Self::new(width, height);
        display.outputs.replace(Some(outputs));
        display
    }

    pub fn add_window(&self, window: Window, geometry: Rect) {
        self.windows.borrow_mut().insert(window, MockWindow::new(geometry));
    }

    pub fn update_window(&self, window: Window, f: impl FnOnce(&mut MockWindow)) {
        if let Some(w) = self.windows.borrow_mut().get_mut(&window) {
            f(w);
        }
    }

    pub fn take_requests(&self) -> Vec<Request> {
        self.requests.take()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    fn record(&self, request: Request) -> WmResult<()> {
        self.requests.borrow_mut().push(request);
        Ok(())
    }

    fn with_window<T>(&self, window: Window, f: impl FnOnce(&MockWindow) -> T) -> Option<T> {
        self.windows.borrow().get(&window).map(f)
    }
}

impl DisplayServer for MockDisplay {
    fn root(&self) -> Window {
        ROOT
    }

    fn screen_size(&self) -> (i32, i32) {
        self.screen
    }

    fn output_geometries(&self) -> WmResult<Option<Vec<Rect>>> {
        Ok(self.outputs.borrow().clone())
    }

    fn next_event(&mut self) -> WmResult<WmEvent> {
        self.events.pop_front().ok_or_else(|| {
            WmError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "no scripted events left",
            ))
        })
    }

    fn sync(&self) -> WmResult<()> {
        Ok(())
    }

    fn discard_enter_events(&mut self) -> WmResult<()> {
        self.events
            .retain(|e| !matches!(e, WmEvent::EnterNotify { .. }));
        self.record(Request::DiscardEnterEvents)
    }

    fn top_level_windows(&self) -> WmResult<Vec<Window>> {
        let mut windows: Vec<Window> = self.windows.borrow().keys().copied().collect();
        windows.sort_unstable();
        Ok(windows)
    }

    fn window_attributes(&self, window: Window) -> WmResult<Option<WindowAttributes>> {
        Ok(self.with_window(window, |w| w.attributes))
    }

    fn window_state(&self, window: Window) -> WmResult<Option<WindowState>> {
        Ok(self.with_window(window, |w| w.state).flatten())
    }

    fn transient_for(&self, window: Window) -> WmResult<Option<Window>> {
        Ok(self.with_window(window, |w| w.transient_for).flatten())
    }

    fn class_hint(&self, window: Window) -> WmResult<ClassHint> {
        Ok(self.with_window(window, |w| w.class.clone()).unwrap_or_default())
    }

    fn title(&self, window: Window) -> WmResult<Option<String>> {
        Ok(self.with_window(window, |w| w.title.clone()).flatten())
    }

    fn root_name(&self) -> WmResult<Option<String>> {
        Ok(self.root_name.borrow().clone())
    }

    fn normal_hints(&self, window: Window) -> WmResult<Option<SizeHints>> {
        Ok(self.with_window(window, |w| w.size_hints).flatten())
    }

    fn wm_hints(&self, window: Window) -> WmResult<Option<WmHints>> {
        Ok(self.with_window(window, |w| w.wm_hints).flatten())
    }

    fn set_urgency_hint(&self, window: Window, urgent: bool) -> WmResult<()> {
        self.record(Request::Urgency { window, urgent })
    }

    fn is_fullscreen_requested(&self, window: Window) -> WmResult<bool> {
        Ok(self.with_window(window, |w| w.fullscreen).unwrap_or(false))
    }

    fn is_dialog(&self, window: Window) -> WmResult<bool> {
        Ok(self.with_window(window, |w| w.dialog).unwrap_or(false))
    }

    fn icon(&self, window: Window) -> WmResult<Option<Vec<u32>>> {
        Ok(self.with_window(window, |w| w.icon.clone()).flatten())
    }

    fn supports_protocol(&self, window: Window, protocol: Protocol) -> WmResult<bool> {
        Ok(self
            .with_window(window, |w| w.protocols.contains(&protocol))
            .unwrap_or(false))
    }

    fn send_protocol(&self, window: Window, protocol: Protocol) -> WmResult<()> {
        self.record(Request::SendProtocol { window, protocol })
    }

    fn focused_window(&self) -> WmResult<Option<Window>> {
        Ok(self.focused.get())
    }

    fn configure_window(&self, window: Window, geometry: Rect, border_width: i32) -> WmResult<()> {
        self.record(Request::Configure {
            window,
            geometry,
            border_width,
        })
    }

    fn move_window(&self, window: Window, x: i32, y: i32) -> WmResult<()> {
        self.record(Request::Move { window, x, y })
    }

    fn move_resize_window(&self, window: Window, geometry: Rect) -> WmResult<()> {
        self.record(Request::MoveResize { window, geometry })
    }

    fn set_border_width(&self, window: Window, border_width: i32) -> WmResult<()> {
        self.record(Request::BorderWidth {
            window,
            border_width,
        })
    }

    fn forward_configure_request(&self, request: &ConfigureRequest) -> WmResult<()> {
        self.record(Request::ForwardConfigure(request.window))
    }

    fn send_configure_notify(
        &self,
        window: Window,
        geometry: Rect,
        _border_width: i32,
    ) -> WmResult<()> {
        self.record(Request::ConfigureNotify { window, geometry })
    }

    fn raise_window(&self, window: Window) -> WmResult<()> {
        self.record(Request::Raise(window))
    }

    fn stack_below(&self, window: Window, sibling: Window) -> WmResult<()> {
        self.record(Request::StackBelow { window, sibling })
    }

    fn set_border_color(&self, window: Window, pixel: u32) -> WmResult<()> {
        self.record(Request::BorderColor { window, pixel })
    }

    fn set_opacity(&self, window: Window, opacity: Option<f32>) -> WmResult<()> {
        self.record(Request::Opacity { window, opacity })
    }

    fn set_window_state(&self, window: Window, state: WindowState) -> WmResult<()> {
        self.record(Request::WindowState { window, state })
    }

    fn set_fullscreen_state(&self, window: Window, fullscreen: bool) -> WmResult<()> {
        self.record(Request::FullscreenState { window, fullscreen })
    }

    fn select_client_events(&self, window: Window) -> WmResult<()> {
        self.record(Request::SelectEvents(window))
    }

    fn release_client(&self, window: Window, border_width: i32) -> WmResult<()> {
        self.record(Request::Release {
            window,
            border_width,
        })
    }

    fn set_input_focus(&self, window: Option<Window>) -> WmResult<()> {
        self.focused.set(window);
        self.record(Request::InputFocus(window))
    }

    fn set_active_window(&self, window: Option<Window>) -> WmResult<()> {
        self.record(Request::ActiveWindow(window))
    }

    fn set_client_list(&self, windows: &[Window]) -> WmResult<()> {
        self.record(Request::ClientList(windows.to_vec()))
    }

    fn append_client_list(&self, window: Window) -> WmResult<()> {
        self.record(Request::AppendClientList(window))
    }

    fn map_window(&self, window: Window) -> WmResult<()> {
        self.record(Request::Map(window))
    }

    fn unmap_window(&self, window: Window) -> WmResult<()> {
        self.record(Request::Unmap(window))
    }

    fn kill_client(&self, window: Window) -> WmResult<()> {
        self.record(Request::Kill(window))
    }

    fn refresh_keyboard_mapping(&mut self) -> WmResult<()> {
        self.record(Request::RefreshKeyboardMapping)
    }

    fn numlock_mask(&self) -> WmResult<u16> {
        Ok(self.numlock)
    }

    fn grab_keys(&self, bindings: &[KeyBinding], _numlock_mask: u16) -> WmResult<()> {
        self.record(Request::GrabKeys(bindings.len()))
    }

    fn grab_buttons(
        &self,
        window: Window,
        focused: bool,
        _bindings: &[ButtonBinding],
        _numlock_mask: u16,
    ) -> WmResult<()> {
        self.record(Request::GrabButtons { window, focused })
    }

    fn grab_pointer(&self, cursor: CursorKind) -> WmResult<bool> {
        if !self.pointer_grabbable.get() {
            return Ok(false);
        }
        self.record(Request::GrabPointer(cursor))?;
        Ok(true)
    }

    fn ungrab_pointer(&self) -> WmResult<()> {
        self.record(Request::UngrabPointer)
    }

    fn query_pointer(&self) -> WmResult<Option<(i32, i32)>> {
        Ok(self.pointer.get())
    }

    fn warp_pointer(&self, window: Window, x: i32, y: i32) -> WmResult<()> {
        self.record(Request::Warp { window, x, y })
    }

    fn replay_pointer(&self) -> WmResult<()> {
        self.record(Request::ReplayPointer)
    }

    fn create_bar_window(&self, _geometry: Rect) -> WmResult<Window> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.record(Request::CreateBar(id))?;
        Ok(id)
    }

    fn destroy_window(&self, window: Window) -> WmResult<()> {
        self.record(Request::DestroyWindow(window))
    }

    fn shutdown(&mut self) -> WmResult<()> {
        self.record(Request::Shutdown)
    }
}
