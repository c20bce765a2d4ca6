use super::WindowManager;
use crate::bar::DrawSurface;
use crate::client::Position;
use crate::display::{
    ClientRequest, ConfigureRequest, DisplayServer, Property, WindowState, WmEvent,
};
use crate::errors::{WmResult, X11Error, is_benign_x_error};
use crate::geometry::Rect;
use crate::keyboard::{ClickRegion, matching_buttons, matching_keys};
use tracing::{debug, error, trace};
use x11rb::protocol::xproto::{ConfigWindow, Window};

const WHEEL_UP: u8 = 4;
const WHEEL_DOWN: u8 = 5;

impl<X: DisplayServer, D: DrawSurface> WindowManager<X, D> {
    /// React to one event. While a mouse drag is in progress the drag sees
    /// every event first.
    pub fn handle_event(&mut self, event: WmEvent) -> WmResult<()> {
        trace!(?event, "event");
        if self.drag.is_some() {
            return self.handle_drag_event(event);
        }
        self.dispatch(event)
    }

    pub(super) fn dispatch(&mut self, event: WmEvent) -> WmResult<()> {
        match event {
            WmEvent::ButtonPress {
                window,
                root_x,
                root_y,
                event_x,
                button,
                state,
            } => self.button_press(window, root_x, root_y, event_x, button, state),
            WmEvent::ButtonRelease { .. } => Ok(()),
            WmEvent::ClientMessage { window, request } => self.client_message(window, request),
            WmEvent::ConfigureNotify {
                window,
                width,
                height,
            } => self.configure_notify(window, width, height),
            WmEvent::ConfigureRequest(request) => self.configure_request(request),
            WmEvent::DestroyNotify { window } => {
                if self.clients.contains_key(&window) {
                    self.unmanage(window, true)?;
                }
                Ok(())
            }
            WmEvent::EnterNotify {
                window,
                normal_mode,
                inferior_detail,
            } => self.enter_notify(window, normal_mode, inferior_detail),
            WmEvent::Expose { window, count } => {
                if count == 0 {
                    let m = self.window_to_monitor(window)?;
                    self.draw_bar(m)?;
                }
                Ok(())
            }
            WmEvent::FocusIn { window } => {
                // some clients grab focus on their own
                match self.selected_client() {
                    Some(selected) if selected != window => self.set_focus(selected),
                    _ => Ok(()),
                }
            }
            WmEvent::KeyPress { keysym, state } => {
                let actions =
                    matching_keys(&self.config.keybindings, keysym, state, self.numlock_mask);
                for (action, arg) in actions {
                    self.execute(action, &arg)?;
                }
                Ok(())
            }
            WmEvent::MappingNotify { keyboard } => {
                self.display.refresh_keyboard_mapping()?;
                if keyboard {
                    self.numlock_mask = self.display.numlock_mask()?;
                    self.display
                        .grab_keys(&self.config.keybindings, self.numlock_mask)?;
                }
                Ok(())
            }
            WmEvent::MapRequest { window } => {
                let Some(attributes) = self.display.window_attributes(window)? else {
                    return Ok(());
                };
                if attributes.override_redirect || self.clients.contains_key(&window) {
                    return Ok(());
                }
                self.manage(window, attributes)
            }
            WmEvent::MotionNotify {
                window,
                root_x,
                root_y,
                ..
            } => self.motion_notify(window, root_x, root_y),
            WmEvent::PropertyNotify {
                window,
                property,
                deleted,
            } => self.property_notify(window, property, deleted),
            WmEvent::UnmapNotify { window, synthetic } => {
                if !self.clients.contains_key(&window) {
                    return Ok(());
                }
                if synthetic {
                    self.display.set_window_state(window, WindowState::Withdrawn)
                } else {
                    self.unmanage(window, false)
                }
            }
            WmEvent::Error {
                error_code,
                request_code,
            } => {
                if is_benign_x_error(error_code, request_code) {
                    trace!(error_code, request_code, "ignoring X error");
                    return Ok(());
                }
                error!(error_code, request_code, "fatal X error");
                Err(X11Error::Protocol {
                    request: request_code,
                    error: error_code,
                }
                .into())
            }
            WmEvent::Ignored => Ok(()),
        }
    }

    fn button_press(
        &mut self,
        window: Window,
        root_x: i32,
        root_y: i32,
        event_x: i32,
        button: u8,
        state: u16,
    ) -> WmResult<()> {
        let wheel = matches!(button, WHEEL_UP | WHEEL_DOWN);

        if !wheel || self.config.focus_monitor_on_wheel {
            let m = self.monitor_at(root_x, root_y);
            self.focus_monitor(m, true)?;
        }

        let bar_monitor = self
            .monitors
            .iter()
            .position(|m| m.bar_window == Some(window));

        let (click, arg) = if let Some(m) = bar_monitor {
            self.resolve_bar_click(m, event_x)
        } else if self.clients.contains_key(&window) {
            if !wheel || self.config.focus_on_wheel {
                self.focus(Some(window))?;
                if let Some(m) = self.clients.get(&window).map(|c| c.monitor_index) {
                    self.restack(m)?;
                }
            }
            self.display.replay_pointer()?;
            (ClickRegion::ClientWindow, None)
        } else {
            (ClickRegion::RootWindow, None)
        };

        let actions = matching_buttons(
            &self.config.buttons,
            click,
            button,
            state,
            self.numlock_mask,
            arg.as_ref(),
        );
        for (action, arg) in actions {
            self.execute(action, &arg)?;
        }
        Ok(())
    }

    fn client_message(&mut self, window: Window, request: ClientRequest) -> WmResult<()> {
        let Some(client) = self.clients.get(&window) else {
            return Ok(());
        };

        match request {
            ClientRequest::Fullscreen { action } => {
                let fullscreen = client.position == Position::Fullscreen;
                let restore = client.old_position;
                if action == 1 || (action == 2 && !fullscreen) {
                    self.set_position(window, Position::Fullscreen, false)?;
                    self.focus(Some(window))
                } else if fullscreen {
                    self.set_position(window, restore, false)
                } else {
                    Ok(())
                }
            }
            ClientRequest::Activate => {
                if self.selected_client() != Some(window) && !client.is_urgent {
                    self.set_urgent(window, true)?;
                    self.draw_bars()?;
                }
                Ok(())
            }
            ClientRequest::Other => Ok(()),
        }
    }

    /// The root window changes size when outputs are added or removed.
    fn configure_notify(&mut self, window: Window, width: i32, height: i32) -> WmResult<()> {
        if window != self.display.root() {
            return Ok(());
        }

        let dirty = self.screen_width != width || self.screen_height != height;
        self.screen_width = width;
        self.screen_height = height;
        for monitor in &mut self.monitors {
            monitor.previous_screen = monitor.screen_rect();
        }

        if !self.update_geometry()? && !dirty {
            return Ok(());
        }
        debug!(width, height, "screen reconfigured");

        self.surface.resize(width, self.bar_height)?;
        self.update_bars()?;

        for m in 0..self.monitors.len() {
            let previous = self.monitors[m].previous_screen;
            let current = self.monitors[m].screen_rect();

            if previous.width > 0 && previous.height > 0 {
                for window in self.clients_in_order(m) {
                    let Some(client) = self.clients.get(&window) else {
                        continue;
                    };
                    if client.position != Position::None {
                        continue;
                    }
                    let scaled = Rect::new(
                        client.x_position * current.width / previous.width,
                        client.y_position * current.height / previous.height,
                        client.width * current.width / previous.width,
                        client.height * current.height / previous.height,
                    );
                    self.resize_client(window, scaled)?;
                }
            }

            if let Some(bar) = self.monitors[m].bar_window {
                self.display
                    .move_resize_window(bar, self.monitors[m].bar_rect())?;
            }
        }

        self.focus(None)?;
        self.arrange(None)
    }

    fn configure_request(&mut self, request: ConfigureRequest) -> WmResult<()> {
        let window = request.window;
        let Some(client) = self.clients.get(&window) else {
            self.display.forward_configure_request(&request)?;
            return self.display.sync();
        };
        let m = client.monitor_index;
        let free = client.position == Position::None || self.monitors[m].layout().is_floating();

        if request.has(ConfigWindow::BORDER_WIDTH) {
            if let Some(client) = self.clients.get_mut(&window) {
                client.border_width = request.border_width;
            }
        } else if client.ignore_hints {
            // keeps whatever geometry we gave it
        } else if free {
            let screen = self.monitors[m].screen_rect();
            let mut geometry = client.geometry();
            let border = client.border_width;
            let position = client.position;

            if request.has(ConfigWindow::X) {
                geometry.x = screen.x + request.x;
            }
            if request.has(ConfigWindow::Y) {
                geometry.y = screen.y + request.y;
            }
            if request.has(ConfigWindow::WIDTH) {
                geometry.width = request.width;
            }
            if request.has(ConfigWindow::HEIGHT) {
                geometry.height = request.height;
            }

            if position == Position::None {
                if geometry.x + geometry.width + 2 * border > screen.x + screen.width {
                    geometry.x = screen.x + (screen.width / 2 - (geometry.width + 2 * border) / 2);
                }
                if geometry.y + geometry.height + 2 * border > screen.y + screen.height {
                    geometry.y =
                        screen.y + (screen.height / 2 - (geometry.height + 2 * border) / 2);
                }
            }

            let moved_only = (request.has(ConfigWindow::X) || request.has(ConfigWindow::Y))
                && !request.has(ConfigWindow::WIDTH)
                && !request.has(ConfigWindow::HEIGHT);

            let visible = self.is_visible_window(window);
            if let Some(client) = self.clients.get_mut(&window) {
                client.set_geometry(geometry);
            }
            if moved_only {
                self.display
                    .send_configure_notify(window, geometry, border)?;
            }
            if visible {
                self.display.move_resize_window(window, geometry)?;
            }
        } else {
            self.display
                .send_configure_notify(window, client.geometry(), client.border_width)?;
        }

        self.display.sync()
    }

    fn enter_notify(
        &mut self,
        window: Window,
        normal_mode: bool,
        inferior_detail: bool,
    ) -> WmResult<()> {
        let root = self.display.root();
        if (!normal_mode || inferior_detail) && window != root {
            return Ok(());
        }

        let Some(m) = self.clients.get(&window).map(|c| c.monitor_index) else {
            return Ok(());
        };
        if !self.config.focus_on_hover {
            if self.config.focus_monitor_on_hover {
                self.focus_monitor(m, true)?;
            }
            return Ok(());
        }
        self.focus(Some(window))
    }

    /// Pointer motion moves the selection to the monitor under the
    /// pointer and focuses the client it is over.
    fn motion_notify(&mut self, window: Window, root_x: i32, root_y: i32) -> WmResult<()> {
        if !self.config.focus_monitor_on_hover {
            return Ok(());
        }
        let m = self.monitor_at(root_x, root_y);
        if m != self.selected_monitor {
            self.focus_monitor(m, true)?;
        }

        let over_bar = self.monitors[self.selected_monitor].bar_window == Some(window);
        if window != self.display.root()
            && !over_bar
            && self.selected_client() != Some(window)
            && self.clients.contains_key(&window)
        {
            self.focus(Some(window))?;
        }
        Ok(())
    }

    fn property_notify(&mut self, window: Window, property: Property, deleted: bool) -> WmResult<()> {
        if window == self.display.root() {
            if property == Property::WmName {
                self.update_status()?;
            }
            return Ok(());
        }
        if deleted {
            return Ok(());
        }
        let Some(client) = self.clients.get(&window) else {
            return Ok(());
        };
        let m = client.monitor_index;

        match property {
            Property::WmTransientFor => {
                if client.position != Position::None {
                    let parent = self.display.transient_for(window)?;
                    if parent.is_some_and(|p| self.clients.contains_key(&p)) {
                        self.set_position(window, Position::None, false)?;
                    }
                }
                Ok(())
            }
            Property::WmNormalHints => {
                if let Some(client) = self.clients.get_mut(&window) {
                    client.hints_valid = false;
                }
                Ok(())
            }
            Property::WmHints => {
                self.update_wm_hints(window)?;
                self.draw_bars()
            }
            Property::WmName | Property::NetWmName => {
                self.update_title(window)?;
                self.draw_bar(m)
            }
            Property::NetWmIcon => {
                self.update_icon(window)?;
                self.draw_bar(m)
            }
            Property::NetWmWindowType => self.update_window_type(window),
            Property::Other => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixture::*;
    use crate::client::Position;
    use crate::display::mock::Request;
    use crate::display::{ClientRequest, ConfigureRequest, Property, WindowState, WmEvent};
    use crate::geometry::Rect;
    use crate::keyboard::keysyms::XK_J;
    use simple_test_case::test_case;
    use x11rb::protocol::xproto::{ConfigWindow, StackMode};

    const MOD4: u16 = 1 << 6;

    fn request(window: u32, mask: ConfigWindow, geometry: Rect) -> WmEvent {
        WmEvent::ConfigureRequest(ConfigureRequest {
            window,
            x: geometry.x,
            y: geometry.y,
            width: geometry.width,
            height: geometry.height,
            border_width: 0,
            sibling: 0,
            stack_mode: StackMode::ABOVE,
            value_mask: mask,
        })
    }

    #[test]
    fn key_presses_run_their_bindings() {
        let mut wm = wm();
        map(&mut wm, 10);
        map(&mut wm, 11);
        assert_eq!(wm.selected_client(), Some(11));

        wm.handle_event(WmEvent::KeyPress { keysym: XK_J, state: MOD4 })
            .unwrap();

        assert_eq!(wm.selected_client(), Some(10));
    }

    #[test]
    fn key_presses_ignore_numlock() {
        let mut wm = wm();
        map(&mut wm, 10);
        map(&mut wm, 11);
        let numlock = wm.display.numlock;

        wm.handle_event(WmEvent::KeyPress { keysym: XK_J, state: MOD4 | numlock })
            .unwrap();

        assert_eq!(wm.selected_client(), Some(10));
    }

    #[test_case(1, false, true; "add")]
    #[test_case(2, false, true; "toggle on")]
    #[test_case(2, true, false; "toggle off")]
    #[test_case(0, true, false; "remove")]
    #[test]
    fn fullscreen_requests(action: u32, start_fullscreen: bool, expected: bool) {
        let mut wm = wm();
        map(&mut wm, 10);
        if start_fullscreen {
            wm.set_position(10, Position::Fullscreen, false).unwrap();
        }

        wm.handle_event(WmEvent::ClientMessage {
            window: 10,
            request: ClientRequest::Fullscreen { action },
        })
        .unwrap();

        assert_eq!(wm.clients[&10].position == Position::Fullscreen, expected);
    }

    #[test]
    fn removing_fullscreen_from_a_windowed_client_is_ignored() {
        let mut wm = wm();
        map(&mut wm, 10);
        wm.display.take_requests();

        wm.handle_event(WmEvent::ClientMessage {
            window: 10,
            request: ClientRequest::Fullscreen { action: 0 },
        })
        .unwrap();

        assert_eq!(wm.clients[&10].position, Position::Tiled);
        assert!(wm.display.requests().is_empty());
    }

    #[test]
    fn activation_requests_mark_unfocused_clients_urgent() {
        let mut wm = wm();
        map(&mut wm, 10);
        map(&mut wm, 11);

        wm.handle_event(WmEvent::ClientMessage {
            window: 10,
            request: ClientRequest::Activate,
        })
        .unwrap();

        assert!(wm.clients[&10].is_urgent);
        assert_eq!(wm.selected_client(), Some(11));
    }

    #[test]
    fn configure_requests_of_unmanaged_windows_are_forwarded() {
        let mut wm = wm();

        wm.handle_event(request(42, ConfigWindow::WIDTH, Rect::new(0, 0, 50, 50)))
            .unwrap();

        assert!(wm.display.requests().contains(&Request::ForwardConfigure(42)));
    }

    #[test]
    fn tiled_clients_are_told_their_current_geometry() {
        let mut wm = wm();
        map(&mut wm, 10);
        let geometry = wm.clients[&10].geometry();
        wm.display.take_requests();

        wm.handle_event(request(10, ConfigWindow::WIDTH, Rect::new(0, 0, 50, 50)))
            .unwrap();

        assert_eq!(wm.clients[&10].geometry(), geometry);
        assert_eq!(wm.display.requests(), vec![Request::ConfigureNotify {
            window: 10,
            geometry
        }]);
    }

    #[test]
    fn floating_clients_get_the_geometry_they_ask_for() {
        let mut wm = wm();
        map(&mut wm, 10);
        wm.set_position(10, Position::None, false).unwrap();
        wm.display.take_requests();

        let asked = Rect::new(200, 150, 640, 480);
        wm.handle_event(request(
            10,
            ConfigWindow::X | ConfigWindow::Y | ConfigWindow::WIDTH | ConfigWindow::HEIGHT,
            asked,
        ))
        .unwrap();

        assert_eq!(wm.clients[&10].geometry(), asked);
        assert!(wm.display.requests().contains(&Request::MoveResize {
            window: 10,
            geometry: asked
        }));
    }

    #[test]
    fn oversized_floating_requests_are_centred() {
        let mut wm = wm();
        map(&mut wm, 10);
        wm.set_position(10, Position::None, false).unwrap();

        wm.handle_event(request(
            10,
            ConfigWindow::X | ConfigWindow::WIDTH,
            Rect::new(1800, 0, 400, 0),
        ))
        .unwrap();

        assert_eq!(wm.clients[&10].x_position, 960 - 200);
    }

    #[test]
    fn destroyed_windows_are_forgotten() {
        let mut wm = wm();
        map(&mut wm, 10);
        wm.display.take_requests();

        wm.handle_event(WmEvent::DestroyNotify { window: 10 }).unwrap();

        assert!(wm.clients.is_empty());
        assert!(!wm
            .display
            .requests()
            .iter()
            .any(|r| matches!(r, Request::Release { .. })));
    }

    #[test]
    fn synthetic_unmaps_withdraw_without_unmanaging() {
        let mut wm = wm();
        map(&mut wm, 10);

        wm.handle_event(WmEvent::UnmapNotify { window: 10, synthetic: true })
            .unwrap();

        assert!(wm.clients.contains_key(&10));
        assert!(wm.display.requests().contains(&Request::WindowState {
            window: 10,
            state: WindowState::Withdrawn
        }));
    }

    #[test]
    fn title_changes_are_picked_up() {
        let mut wm = wm();
        map(&mut wm, 10);
        wm.display.update_window(10, |w| w.title = Some("htop".into()));
        wm.surface.calls.clear();

        wm.handle_event(WmEvent::PropertyNotify {
            window: 10,
            property: Property::NetWmName,
            deleted: false,
        })
        .unwrap();

        assert_eq!(wm.clients[&10].name, "htop");
        assert!(wm.surface.texts().contains(&"htop"));
    }

    #[test]
    fn root_name_changes_update_the_status() {
        let mut wm = wm();
        wm.display.root_name.replace(Some("cpu 3%".into()));

        wm.handle_event(WmEvent::PropertyNotify {
            window: ROOT,
            property: Property::WmName,
            deleted: false,
        })
        .unwrap();

        assert_eq!(wm.status_text, "cpu 3%");
    }

    #[test]
    fn enter_focuses_the_hovered_client() {
        let mut wm = wm();
        map(&mut wm, 10);
        map(&mut wm, 11);

        wm.handle_event(WmEvent::EnterNotify {
            window: 10,
            normal_mode: true,
            inferior_detail: false,
        })
        .unwrap();

        assert_eq!(wm.selected_client(), Some(10));
    }

    #[test]
    fn benign_errors_are_ignored_and_others_are_fatal() {
        let mut wm = wm();

        assert!(wm
            .handle_event(WmEvent::Error { error_code: 3, request_code: 12 })
            .is_ok());
        assert!(wm
            .handle_event(WmEvent::Error { error_code: 2, request_code: 1 })
            .is_err());
    }

    #[test]
    fn root_resizes_rescale_floating_clients() {
        let mut wm = wm();
        map(&mut wm, 10);
        wm.set_position(10, Position::None, false).unwrap();
        wm.resize_client(10, Rect::new(400, 200, 800, 400)).unwrap();

        wm.display.screen = (960, 540);
        wm.handle_event(WmEvent::ConfigureNotify {
            window: ROOT,
            width: 960,
            height: 540,
        })
        .unwrap();

        assert_eq!(wm.monitors[0].screen_rect(), Rect::new(0, 0, 960, 540));
        assert_eq!(wm.clients[&10].geometry(), Rect::new(200, 100, 400, 200));
    }
}
