use super::WindowManager;
use crate::Config;
use crate::bar::{self, BarContent, DrawSurface, TitleEntry};
use crate::client::Client;
use crate::display::DisplayServer;
use crate::errors::WmResult;
use crate::keyboard::{Arg, ClickRegion};
use crate::monitor::Monitor;
use std::collections::HashMap;
use x11rb::protocol::xproto::Window;

/// Borrowed view of the state one monitor's bar shows.
struct BarState<'a> {
    config: &'a Config,
    clients: &'a HashMap<Window, Client>,
    monitors: &'a [Monitor],
    selected_monitor: usize,
    status: &'a str,
    padding: i32,
}

impl<'a> BarState<'a> {
    fn content(&self, m: usize, members: &[Window]) -> BarContent<'a> {
        let monitor = &self.monitors[m];
        let is_selected_monitor = m == self.selected_monitor;
        let focused = self.monitors[self.selected_monitor].selected_client;
        let clients = self.clients;

        let occupancy = members
            .iter()
            .filter_map(|w| clients.get(w))
            .map(|c| (c.tags, focused == Some(c.window)))
            .collect();

        let titles = members
            .iter()
            .filter_map(|w| clients.get(w))
            .filter(|c| c.tags & monitor.active_tags() != 0)
            .map(|c| TitleEntry {
                window: c.window,
                name: c.name.as_str(),
                icon: c.icon.as_ref(),
                selected: is_selected_monitor && monitor.selected_client == Some(c.window),
                always_on_top: c.is_always_on_top,
            })
            .collect();

        BarContent {
            tags: &self.config.tags,
            active_tags: monitor.active_tags(),
            occupancy,
            layout_symbol: monitor.layout().symbol(),
            status: is_selected_monitor.then_some(self.status),
            titles,
            width: monitor.bar_width,
            height: monitor.bar_height,
            padding: self.padding,
        }
    }
}

impl<X: DisplayServer, D: DrawSurface> WindowManager<X, D> {
    fn bar_state(&self) -> BarState<'_> {
        BarState {
            config: &self.config,
            clients: &self.clients,
            monitors: &self.monitors,
            selected_monitor: self.selected_monitor,
            status: &self.status_text,
            padding: self.text_padding,
        }
    }

    pub(super) fn draw_bar(&mut self, m: usize) -> WmResult<()> {
        let Some(monitor) = self.monitors.get(m) else {
            return Ok(());
        };
        let Some(window) = monitor.bar_window else {
            return Ok(());
        };
        if !monitor.show_bar || monitor.restacking {
            return Ok(());
        }
        let (width, height) = (monitor.bar_width, monitor.bar_height);

        let members = self.clients_in_order(m);
        let state = BarState {
            config: &self.config,
            clients: &self.clients,
            monitors: &self.monitors,
            selected_monitor: self.selected_monitor,
            status: &self.status_text,
            padding: self.text_padding,
        };
        let content = state.content(m, &members);
        bar::draw(&mut self.surface, &content);
        self.surface.present(window, width, height)
    }

    pub(super) fn draw_bars(&mut self) -> WmResult<()> {
        for m in 0..self.monitors.len() {
            self.draw_bar(m)?;
        }
        Ok(())
    }

    /// Region and argument of a click at `x` on the bar of monitor `m`.
    pub(super) fn resolve_bar_click(&self, m: usize, x: i32) -> (ClickRegion, Option<Arg>) {
        let members = self.clients_in_order(m);
        let content = self.bar_state().content(m, &members);
        bar::resolve_click(&self.surface, &content, x)
    }
}
