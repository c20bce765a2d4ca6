use super::{BROKEN_TITLE, WindowManager};
use crate::bar::DrawSurface;
use crate::client::{Client, Icon, Position, apply_rules};
use crate::display::{DisplayServer, WindowAttributes, WindowState};
use crate::errors::WmResult;
use tracing::debug;
use x11rb::protocol::xproto::Window;

impl<X: DisplayServer, D: DrawSurface> WindowManager<X, D> {
    /// Start managing `window`: place it by its transient parent or the
    /// rules, publish it and give it focus.
    pub(super) fn manage(&mut self, window: Window, attributes: WindowAttributes) -> WmResult<()> {
        let transient_for = self.display.transient_for(window)?;
        let parent = transient_for
            .and_then(|parent| self.clients.get(&parent))
            .map(|parent| (parent.monitor_index, parent.tags));

        let mut client = Client::new(window, self.selected_monitor, 0);
        client.reset_geometry(attributes.geometry);
        client.border_width = self.config.border_width;
        client.old_border_width = attributes.border_width;
        client.name = self.read_title(window)?;
        client.icon = self.read_icon(window)?;

        match parent {
            Some((monitor, tags)) => {
                client.monitor_index = monitor;
                client.tags = tags;
            }
            None => self.apply_rules(&mut client)?,
        }

        let area = self.monitors[client.monitor_index].work_area();
        if client.x_position + client.width_with_border() > area.x + area.width {
            client.x_position = area.x + area.width - client.width_with_border();
        }
        if client.y_position + client.height_with_border() > area.y + area.height {
            client.y_position = area.y + area.height - client.height_with_border();
        }
        client.x_position = client.x_position.max(area.x);
        client.y_position = client.y_position.max(area.y);

        let geometry = client.geometry();
        let border_width = client.border_width;
        let monitor = client.monitor_index;
        debug!(window, name = %client.name, monitor, tags = client.tags, "managing window");
        self.clients.insert(window, client);

        self.display.set_border_width(window, border_width)?;
        self.display
            .set_border_color(window, self.config.scheme_normal.border)?;
        self.display
            .send_configure_notify(window, geometry, border_width)?;
        self.update_window_type(window)?;
        self.update_size_hints(window)?;
        self.update_wm_hints(window)?;
        self.display.select_client_events(window)?;
        self.display
            .grab_buttons(window, false, &self.config.buttons, self.numlock_mask)?;

        if let Some(client) = self.clients.get_mut(&window) {
            if client.position != Position::None && (transient_for.is_some() || client.is_fixed) {
                client.position = Position::None;
            }
            if client.position == Position::None {
                self.display.raise_window(window)?;
            }
        }

        self.attach(window);
        self.attach_stack(window);
        self.display.append_client_list(window)?;
        self.hide_client(window)?;
        self.display.set_window_state(window, WindowState::Normal)?;

        self.focus(Some(window))?;
        self.arrange(Some(monitor))?;
        self.display.map_window(window)?;
        self.set_focus(window)
    }

    fn apply_rules(&self, client: &mut Client) -> WmResult<()> {
        let hint = self.display.class_hint(client.window)?;
        let class = non_empty(&hint.class);
        let instance = non_empty(&hint.instance);

        client.ignore_hints = self.config.ignore_hints_exact.iter().any(|c| c == class)
            || self
                .config
                .ignore_hints_contains
                .iter()
                .any(|c| class.contains(c.as_str()));

        let outcome = apply_rules(
            &self.config.rules,
            class,
            instance,
            &client.name,
            self.monitors.len(),
        );
        client.position = outcome.position;
        if let Some(monitor) = outcome.monitor {
            client.monitor_index = monitor;
        }

        let tags = outcome.tags & self.config.tag_mask();
        client.tags = if tags != 0 {
            tags
        } else {
            self.monitors[client.monitor_index].active_tags()
        };
        Ok(())
    }

    /// Stop managing `window`. A window that still exists gets its border
    /// back and is withdrawn.
    pub(super) fn unmanage(&mut self, window: Window, destroyed: bool) -> WmResult<()> {
        let Some(client) = self.clients.get(&window) else {
            return Ok(());
        };
        let monitor = client.monitor_index;
        let border_width = client.old_border_width;

        self.detach(window);
        self.detach_stack(window);
        if !destroyed {
            self.display.release_client(window, border_width)?;
        }

        self.clients.remove(&window);
        if self.grabbed_client == Some(window) {
            self.grabbed_client = None;
        }
        debug!(window, destroyed, "unmanaged window");

        self.focus(None)?;
        self.update_client_list()?;
        self.arrange(Some(monitor))
    }

    pub(super) fn update_client_list(&self) -> WmResult<()> {
        let windows: Vec<Window> = (0..self.monitors.len())
            .flat_map(|m| self.clients_in_order(m))
            .collect();
        self.display.set_client_list(&windows)
    }

    pub(super) fn update_size_hints(&mut self, window: Window) -> WmResult<()> {
        if self.clients.get(&window).is_none_or(|c| c.ignore_hints) {
            return Ok(());
        }
        let hints = self.display.normal_hints(window)?.unwrap_or_default();

        if let Some(client) = self.clients.get_mut(&window) {
            client.is_fixed = hints.is_fixed();
            client.size_hints = hints;
            client.hints_valid = true;
        }
        Ok(())
    }

    pub(super) fn update_wm_hints(&mut self, window: Window) -> WmResult<()> {
        let Some(hints) = self.display.wm_hints(window)? else {
            return Ok(());
        };
        let selected = self.selected_client() == Some(window);

        if selected && hints.urgent {
            self.display.set_urgency_hint(window, false)?;
        } else if let Some(client) = self.clients.get_mut(&window) {
            client.is_urgent = hints.urgent;
        }
        if let Some(client) = self.clients.get_mut(&window) {
            client.never_focus = hints.input == Some(false);
        }
        Ok(())
    }

    pub(super) fn update_window_type(&mut self, window: Window) -> WmResult<()> {
        if self.display.is_fullscreen_requested(window)? {
            return self.set_position(window, Position::Fullscreen, false);
        }
        if self.display.is_dialog(window)? {
            return self.set_position(window, Position::None, false);
        }
        Ok(())
    }

    fn read_title(&self, window: Window) -> WmResult<String> {
        Ok(self
            .display
            .title(window)?
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| BROKEN_TITLE.to_string()))
    }

    pub(super) fn update_title(&mut self, window: Window) -> WmResult<()> {
        let title = self.read_title(window)?;
        if let Some(client) = self.clients.get_mut(&window) {
            client.name = title;
        }
        Ok(())
    }

    fn read_icon(&self, window: Window) -> WmResult<Option<Icon>> {
        Ok(self
            .display
            .icon(window)?
            .and_then(|data| Icon::from_net_wm_icon(&data, self.icon_size())))
    }

    pub(super) fn update_icon(&mut self, window: Window) -> WmResult<()> {
        let icon = self.read_icon(window)?;
        if let Some(client) = self.clients.get_mut(&window) {
            client.icon = icon;
        }
        Ok(())
    }
}

fn non_empty(value: &str) -> &str {
    if value.is_empty() {
        BROKEN_TITLE
    } else {
        value
    }
}
