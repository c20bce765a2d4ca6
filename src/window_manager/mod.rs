//! Window-management policy: the client registry, placement, focus and
//! the event state machine, driven over a [`DisplayServer`] and drawn
//! through a [`DrawSurface`].

mod bar;
mod commands;
mod drag;
mod events;
mod focus;
mod manage;
mod monitors;
mod placement;
mod registry;

#[cfg(test)]
mod fixture;

use crate::Config;
use crate::bar::DrawSurface;
use crate::client::{Client, TagMask};
use crate::display::{DisplayServer, WindowState};
use crate::errors::WmResult;
use crate::keyboard::Arg;
use crate::monitor::Monitor;
use drag::Drag;
use std::collections::HashMap;
use tracing::{debug, info};
use x11rb::protocol::xproto::Window;

/// Smallest width and height a client can be given.
const MIN_CLIENT_SIZE: i32 = 10;
const BROKEN_TITLE: &str = "broken";

pub struct WindowManager<X: DisplayServer, D: DrawSurface> {
    config: Config,
    display: X,
    surface: D,
    clients: HashMap<Window, Client>,
    monitors: Vec<Monitor>,
    selected_monitor: usize,
    screen_width: i32,
    screen_height: i32,
    bar_height: i32,
    /// Horizontal padding around bar text.
    text_padding: i32,
    status_text: String,
    numlock_mask: u16,
    running: bool,
    drag: Option<Drag>,
    /// The client held by a mouse drag; cleared when it is unmanaged.
    grabbed_client: Option<Window>,
    alt_tab_index: usize,
}

impl<X: DisplayServer, D: DrawSurface> WindowManager<X, D> {
    pub fn new(config: Config, display: X, surface: D) -> WmResult<Self> {
        let (screen_width, screen_height) = display.screen_size();
        let font_height = surface.font_height();
        let numlock_mask = display.numlock_mask()?;

        let mut wm = Self {
            config,
            display,
            surface,
            clients: HashMap::new(),
            monitors: Vec::new(),
            selected_monitor: 0,
            screen_width,
            screen_height,
            bar_height: font_height * 3 / 2,
            text_padding: font_height / 2,
            status_text: default_status(),
            numlock_mask,
            running: true,
            drag: None,
            grabbed_client: None,
            alt_tab_index: 0,
        };

        wm.update_geometry()?;
        wm.surface.resize(screen_width, wm.bar_height)?;
        wm.update_bars()?;
        wm.update_status()?;
        wm.display
            .grab_keys(&wm.config.keybindings, wm.numlock_mask)?;
        wm.focus(None)?;

        info!(
            monitors = wm.monitors.len(),
            width = screen_width,
            height = screen_height,
            "window manager ready"
        );

        Ok(wm)
    }

    /// Adopt the windows that already exist, transients last so that their
    /// parents are managed first.
    pub fn scan(&mut self) -> WmResult<()> {
        let windows = self.display.top_level_windows()?;
        let mut transients = Vec::new();

        for window in windows {
            let Some(attributes) = self.display.window_attributes(window)? else {
                continue;
            };
            if attributes.override_redirect {
                continue;
            }
            if self.display.transient_for(window)?.is_some() {
                transients.push((window, attributes));
                continue;
            }
            if attributes.viewable
                || self.display.window_state(window)? == Some(WindowState::Iconic)
            {
                self.manage(window, attributes)?;
            }
        }

        for (window, attributes) in transients {
            if attributes.viewable
                || self.display.window_state(window)? == Some(WindowState::Iconic)
            {
                self.manage(window, attributes)?;
            }
        }

        debug!(clients = self.clients.len(), "scanned existing windows");
        Ok(())
    }

    pub fn run(&mut self) -> WmResult<()> {
        self.display.sync()?;

        while self.running {
            let event = self.display.next_event()?;
            self.handle_event(event)?;
        }

        info!("leaving the event loop");
        Ok(())
    }

    /// Show every client, hand all windows back and release the server.
    pub fn cleanup(&mut self) -> WmResult<()> {
        self.drag = None;
        self.view(&Arg::Tags(TagMask::MAX))?;

        for index in 0..self.monitors.len() {
            while let Some(window) = self.monitors[index].stack_head {
                self.unmanage(window, false)?;
            }
        }

        for monitor in &mut self.monitors {
            if let Some(bar) = monitor.bar_window.take() {
                self.display.destroy_window(bar)?;
            }
        }

        self.display.shutdown()?;
        self.display.sync()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Refresh the status text from the root window name.
    fn update_status(&mut self) -> WmResult<()> {
        self.status_text = self
            .display
            .root_name()?
            .filter(|name| !name.is_empty())
            .unwrap_or_else(default_status);
        self.draw_bar(self.selected_monitor)
    }

    fn is_visible(&self, client: &Client) -> bool {
        self.monitors
            .get(client.monitor_index)
            .is_some_and(|m| client.tags & m.active_tags() != 0)
    }

    fn is_visible_window(&self, window: Window) -> bool {
        self.clients
            .get(&window)
            .is_some_and(|c| self.is_visible(c))
    }

    fn selected_client(&self) -> Option<Window> {
        self.monitors
            .get(self.selected_monitor)
            .and_then(|m| m.selected_client)
    }

    fn icon_size(&self) -> u32 {
        (self.bar_height - 2).max(1) as u32
    }
}

fn default_status() -> String {
    format!("tilewm-{}", env!("CARGO_PKG_VERSION"))
}
