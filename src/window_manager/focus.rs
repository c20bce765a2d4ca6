use super::WindowManager;
use crate::bar::DrawSurface;
use crate::client::Position;
use crate::display::{DisplayServer, Protocol};
use crate::errors::WmResult;
use tracing::trace;
use x11rb::protocol::xproto::Window;

impl<X: DisplayServer, D: DrawSurface> WindowManager<X, D> {
    /// Give focus to `target`, or to the most recent visible client of the
    /// selected monitor when `target` is missing or hidden.
    pub(super) fn focus(&mut self, target: Option<Window>) -> WmResult<()> {
        let target = target
            .filter(|&w| self.is_visible_window(w))
            .or_else(|| self.visible_stack(self.selected_monitor).first().copied());

        if let Some(selected) = self.selected_client() {
            self.unfocus(selected, false)?;
        }

        match target {
            Some(window) => {
                let Some(monitor) = self.clients.get(&window).map(|c| c.monitor_index) else {
                    return Ok(());
                };
                self.focus_monitor(monitor, false)?;

                if self.clients.get(&window).is_some_and(|c| c.is_urgent) {
                    self.set_urgent(window, false)?;
                }
                self.detach_stack(window);
                self.attach_stack(window);

                self.display
                    .grab_buttons(window, true, &self.config.buttons, self.numlock_mask)?;
                self.apply_opacity(window, self.config.opacity_focus)?;
                self.display
                    .set_border_color(window, self.config.scheme_selected.border)?;
                self.set_focus(window)?;
                self.display.raise_window(window)?;
            }
            None => {
                let bar = self.monitors[self.selected_monitor].bar_window;
                self.display.set_input_focus(bar)?;
                self.display.set_active_window(None)?;
            }
        }

        trace!(window = ?target, "focus");
        self.monitors[self.selected_monitor].selected_client = target;
        self.draw_bars()
    }

    /// Fullscreen clients carry the fullscreen opacity when one is set,
    /// everything else `opacity`.
    fn apply_opacity(&mut self, window: Window, opacity: Option<f32>) -> WmResult<()> {
        let Some(client) = self.clients.get_mut(&window) else {
            return Ok(());
        };
        let opacity = match self.config.opacity_fullscreen {
            Some(fullscreen) if client.position == Position::Fullscreen => Some(fullscreen),
            _ => opacity,
        };
        if opacity.is_none() || client.opacity == opacity {
            return Ok(());
        }

        client.opacity = opacity;
        self.display.set_opacity(window, opacity)
    }

    pub(super) fn unfocus(&mut self, window: Window, set_focus: bool) -> WmResult<()> {
        if !self.clients.contains_key(&window) {
            return Ok(());
        }

        self.display
            .grab_buttons(window, false, &self.config.buttons, self.numlock_mask)?;
        self.apply_opacity(window, self.config.opacity_unfocus)?;
        self.display
            .set_border_color(window, self.config.scheme_normal.border)?;

        if set_focus {
            self.display.set_input_focus(None)?;
            self.display.set_active_window(None)?;
        }
        Ok(())
    }

    /// Select monitor `index`, taking its focus-history head as selection.
    pub(super) fn focus_monitor(&mut self, index: usize, refocus: bool) -> WmResult<()> {
        if index == self.selected_monitor || index >= self.monitors.len() {
            return Ok(());
        }

        if self.config.opacity_focus != self.config.opacity_unfocus {
            if let Some(bar) = self.monitors[self.selected_monitor].bar_window {
                self.display.set_opacity(bar, self.config.opacity_unfocus)?;
            }
            if let Some(bar) = self.monitors[index].bar_window {
                self.display.set_opacity(bar, self.config.opacity_focus)?;
            }
        }

        if let Some(selected) = self.selected_client() {
            self.unfocus(selected, false)?;
        }

        self.selected_monitor = index;
        self.monitors[index].selected_client = self.monitors[index].stack_head;

        if refocus {
            self.focus(None)?;
        }
        Ok(())
    }

    pub(super) fn set_focus(&mut self, window: Window) -> WmResult<()> {
        let Some(client) = self.clients.get(&window) else {
            return Ok(());
        };

        if !client.never_focus {
            self.display.set_input_focus(Some(window))?;
            self.display.set_active_window(Some(window))?;
        }
        if self.display.supports_protocol(window, Protocol::TakeFocus)? {
            self.display.send_protocol(window, Protocol::TakeFocus)?;
        }
        Ok(())
    }

    pub(super) fn set_urgent(&mut self, window: Window, urgent: bool) -> WmResult<()> {
        let Some(client) = self.clients.get_mut(&window) else {
            return Ok(());
        };
        client.is_urgent = urgent;
        self.display.set_urgency_hint(window, urgent)
    }

    /// Re-establish the stacking order of monitor `m`: the selection on
    /// top of its layer, tiled clients below the bar in focus-history
    /// order, always-on-top clients above everything.
    pub(super) fn restack(&mut self, m: usize) -> WmResult<()> {
        let Some(selected) = self.monitors[m].selected_client else {
            return Ok(());
        };
        let layout = self.monitors[m].layout();

        if let Some(client) = self.clients.get(&selected) {
            if self.is_visible(client) && (!client.is_tiled() || layout.is_floating()) {
                self.display.raise_window(selected)?;
            }
        }

        if !layout.is_floating() {
            let mut sibling = self.monitors[m].bar_window;
            for window in self.visible_stack(m) {
                if !self.clients.get(&window).is_some_and(|c| c.is_tiled()) {
                    continue;
                }
                if let Some(sibling) = sibling {
                    self.display.stack_below(window, sibling)?;
                }
                sibling = Some(window);
            }
        }

        for monitor in 0..self.monitors.len() {
            for window in self.visible_stack(monitor) {
                if self.clients.get(&window).is_some_and(|c| c.is_always_on_top) {
                    self.display.raise_window(window)?;
                }
            }
        }

        self.display.sync()?;
        self.draw_bar(m)
    }

    fn focus_restack(&mut self, window: Window) -> WmResult<()> {
        let Some(monitor) = self.clients.get(&window).map(|c| c.monitor_index) else {
            return Ok(());
        };
        self.focus(Some(window))?;
        self.restack(monitor)
    }

    pub(super) fn start_alt_tab(&mut self) {
        self.alt_tab_index = 0;
    }

    /// Walk one step further through the focus history of the selected
    /// monitor. Earlier steps of the same walk are replayed first so that
    /// the history ends up in walk order.
    pub(super) fn alt_tab(&mut self) -> WmResult<()> {
        let m = self.selected_monitor;
        if self.monitors[m].restacking {
            return Ok(());
        }
        self.monitors[m].restacking = true;

        for _ in 0..self.alt_tab_index {
            if let Some(&window) = self.visible_stack(m).get(self.alt_tab_index) {
                self.focus_restack(window)?;
            }
        }

        let visible = self.visible_stack(m);
        if visible.is_empty() {
            self.monitors[m].restacking = false;
            return Ok(());
        }

        self.alt_tab_index = (self.alt_tab_index + 1) % visible.len();
        let result = self.focus_restack(visible[self.alt_tab_index]);
        self.monitors[m].restacking = false;
        result?;

        self.draw_bar(m)
    }
}
