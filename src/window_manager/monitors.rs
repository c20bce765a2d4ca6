use super::WindowManager;
use crate::bar::DrawSurface;
use crate::display::DisplayServer;
use crate::errors::WmResult;
use crate::geometry::Rect;
use crate::monitor::{Monitor, unique_geometries};
use tracing::info;
use x11rb::protocol::xproto::Window;

impl<X: DisplayServer, D: DrawSurface> WindowManager<X, D> {
    /// Bring the monitor list in line with the outputs. Returns whether
    /// anything changed.
    pub(super) fn update_geometry(&mut self) -> WmResult<bool> {
        let mut dirty = false;

        let unique = self
            .display
            .output_geometries()?
            .map(|outputs| unique_geometries(&outputs))
            .unwrap_or_default();

        if unique.is_empty() {
            if self.monitors.is_empty() {
                self.monitors
                    .push(Monitor::new(&self.config, self.bar_height));
            }
            let screen = Rect::new(0, 0, self.screen_width, self.screen_height);
            let monitor = &mut self.monitors[0];
            if monitor.screen_rect() != screen {
                dirty = true;
                monitor.set_screen(screen);
                monitor.update_bar_position();
            }
        } else {
            let existing = self.monitors.len();

            for _ in existing..unique.len() {
                self.monitors
                    .push(Monitor::new(&self.config, self.bar_height));
            }

            for (index, output) in unique.iter().enumerate() {
                let monitor = &mut self.monitors[index];
                if index >= existing || monitor.screen_rect() != *output {
                    dirty = true;
                    monitor.num = index;
                    monitor.set_screen(*output);
                    monitor.update_bar_position();
                }
            }

            while self.monitors.len() > unique.len() {
                self.remove_last_monitor()?;
                dirty = true;
            }
        }

        if dirty {
            self.selected_monitor = 0;
            self.selected_monitor = self.window_to_monitor(self.display.root())?;
            info!(monitors = self.monitors.len(), "monitor layout changed");
        }

        Ok(dirty)
    }

    /// Move every client of the last monitor onto the first one and drop
    /// the monitor.
    fn remove_last_monitor(&mut self) -> WmResult<()> {
        let last = self.monitors.len() - 1;
        let members = self.clients_in_order(last);
        let tags = self.monitors[0].active_tags();

        for &window in &members {
            if let Some(client) = self.clients.get_mut(&window) {
                client.next = None;
                client.stack_next = None;
                client.monitor_index = 0;
                client.tags = tags;
            }
        }
        self.monitors[last].clients_head = None;
        self.monitors[last].stack_head = None;

        for &window in &members {
            self.attach_tail(window);
            self.attach_stack_tail(window);
        }

        if let Some(bar) = self.monitors[last].bar_window.take() {
            self.display.destroy_window(bar)?;
        }
        if self.selected_monitor == last {
            self.selected_monitor = 0;
        }
        self.monitors.pop();
        Ok(())
    }

    /// Create the bar windows monitors are still missing.
    pub(super) fn update_bars(&mut self) -> WmResult<()> {
        for index in 0..self.monitors.len() {
            if self.monitors[index].bar_window.is_some() {
                continue;
            }
            let window = self
                .display
                .create_bar_window(self.monitors[index].bar_rect())?;
            if !self.monitors[index].show_bar {
                self.display.unmap_window(window)?;
            }
            self.monitors[index].bar_window = Some(window);
        }
        Ok(())
    }

    /// The monitor containing the point, the selected one when none does.
    pub(super) fn monitor_at(&self, x: i32, y: i32) -> usize {
        if self
            .monitors
            .get(self.selected_monitor)
            .is_some_and(|m| m.contains_point(x, y))
        {
            return self.selected_monitor;
        }
        self.monitors
            .iter()
            .position(|m| m.contains_point(x, y))
            .unwrap_or(self.selected_monitor)
    }

    pub(super) fn window_to_monitor(&self, window: Window) -> WmResult<usize> {
        if window == self.display.root() {
            if let Some((x, y)) = self.display.query_pointer()? {
                return Ok(self.monitor_at(x, y));
            }
        }
        if let Some(index) = self
            .monitors
            .iter()
            .position(|m| m.bar_window == Some(window))
        {
            return Ok(index);
        }
        Ok(self
            .clients
            .get(&window)
            .map_or(self.selected_monitor, |c| c.monitor_index))
    }

    /// The neighbour of the selected monitor in direction `dir`, wrapping.
    pub(super) fn dir_to_monitor(&self, dir: i32) -> usize {
        let count = self.monitors.len();
        if dir > 0 {
            (self.selected_monitor + 1) % count
        } else {
            (self.selected_monitor + count - 1) % count
        }
    }

    /// Move `window` to monitor `target`, adopting its visible tags.
    pub(super) fn send_monitor(&mut self, window: Window, target: usize, refocus: bool) -> WmResult<()> {
        let Some(current) = self.clients.get(&window).map(|c| c.monitor_index) else {
            return Ok(());
        };
        if current == target || target >= self.monitors.len() {
            return Ok(());
        }

        self.unfocus(window, true)?;
        self.detach(window);
        self.detach_stack(window);

        let tags = self.monitors[target].active_tags();
        if let Some(client) = self.clients.get_mut(&window) {
            client.monitor_index = target;
            client.tags = tags;
        }
        self.attach(window);
        self.attach_stack(window);

        self.focus(refocus.then_some(window))?;
        self.arrange(None)
    }
}
