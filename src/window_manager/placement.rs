use super::{MIN_CLIENT_SIZE, WindowManager};
use crate::bar::DrawSurface;
use crate::client::{Client, Position};
use crate::display::DisplayServer;
use crate::errors::WmResult;
use crate::geometry::Rect;
use crate::layout::position::{centered_origin, preset_rect};
use crate::size_hints::{HintBounds, apply_size_hints};
use tracing::debug;
use x11rb::protocol::xproto::Window;

impl<X: DisplayServer, D: DrawSurface> WindowManager<X, D> {
    fn hint_bounds(&self, client: &Client) -> HintBounds {
        HintBounds {
            screen_width: self.screen_width,
            screen_height: self.screen_height,
            work_area: self.monitors[client.monitor_index].work_area(),
            current: client.geometry(),
            border_width: client.border_width,
            min_size: MIN_CLIENT_SIZE,
        }
    }

    /// Move and resize through the size-hint resolver; nothing is sent
    /// when the constrained geometry equals the current one.
    pub(super) fn resize(&mut self, window: Window, geometry: Rect, interact: bool) -> WmResult<()> {
        let Some(client) = self.clients.get(&window) else {
            return Ok(());
        };
        let use_hints = self.config.resize_hints && !client.ignore_hints;
        if use_hints && !client.hints_valid {
            self.update_size_hints(window)?;
        }

        let Some(client) = self.clients.get(&window) else {
            return Ok(());
        };
        let bounds = self.hint_bounds(client);
        let hints = use_hints.then_some(&client.size_hints);
        let (geometry, changed) = apply_size_hints(hints, geometry, &bounds, interact);

        if changed {
            self.resize_client(window, geometry)?;
        }
        Ok(())
    }

    /// Apply `geometry` unconditionally.
    pub(super) fn resize_client(&mut self, window: Window, geometry: Rect) -> WmResult<()> {
        let Some(client) = self.clients.get_mut(&window) else {
            return Ok(());
        };
        client.set_geometry(geometry);
        let border_width = client.border_width;

        self.display
            .configure_window(window, geometry, border_width)?;
        self.display
            .send_configure_notify(window, geometry, border_width)?;
        self.display.sync()
    }

    /// Recompute the geometry of a preset placement.
    pub(super) fn set_position_move(
        &mut self,
        window: Window,
        position: Position,
        forced: bool,
    ) -> WmResult<()> {
        let Some(client) = self.clients.get(&window) else {
            return Ok(());
        };
        let monitor = &self.monitors[client.monitor_index];
        let area = monitor.work_area();
        let screen = monitor.screen_rect();
        let border = client.border_width;

        let outer = match position {
            Position::None | Position::Tiled => return Ok(()),
            Position::Fullscreen => {
                return if forced {
                    self.resize_client(window, screen)
                } else {
                    self.resize(window, screen, true)
                };
            }
            Position::DoubleFullscreen => {
                let double = Rect::new(
                    screen.x,
                    screen.y,
                    screen.width * 2,
                    screen.height * 2,
                );
                return self.resize_client(window, double);
            }
            Position::Center => {
                let (width, height) = if forced {
                    (client.width_with_border(), client.height_with_border())
                } else {
                    let gap = monitor.gap_window;
                    let half = Rect::new(
                        0,
                        0,
                        area.width / 2 - gap / 2,
                        area.height / 2 - gap / 2,
                    );
                    let bounds = self.hint_bounds(client);
                    let hints = (self.config.resize_hints && !client.ignore_hints)
                        .then_some(&client.size_hints);
                    let (fitted, _) = apply_size_hints(hints, half, &bounds, true);
                    (fitted.width, fitted.height)
                };
                let (x, y) = centered_origin(area.width, area.height, width, height);
                if forced && area.x + x == client.x_position && area.y + y == client.y_position {
                    return Ok(());
                }
                Rect::new(x, y, width, height)
            }
            preset => match preset_rect(preset, area.width, area.height, monitor.gap_window) {
                Some(rect) => rect,
                None => return Ok(()),
            },
        };

        let geometry = Rect::new(
            area.x + outer.x,
            area.y + outer.y,
            outer.width - 2 * border,
            outer.height - 2 * border,
        );

        if forced {
            self.resize_client(window, geometry)
        } else {
            self.resize(window, geometry, true)
        }
    }

    /// Switch placement mode. A repeated mode only re-applies when forced.
    pub(super) fn set_position(
        &mut self,
        window: Window,
        position: Position,
        forced: bool,
    ) -> WmResult<()> {
        let Some(client) = self.clients.get_mut(&window) else {
            return Ok(());
        };

        let was_fullscreen = client.position == Position::Fullscreen;
        if client.position == position {
            if !forced {
                return Ok(());
            }
            client.old_position = Position::None;
        } else {
            client.old_position = client.position;
        }
        client.position = position;
        let previous = client.old_position;
        let monitor = client.monitor_index;

        debug!(window, ?previous, ?position, forced, "placement");

        if previous == Position::Fullscreen && position != Position::Fullscreen {
            client.border_width = client.old_border_width;
            let border_width = client.border_width;
            let saved = client.saved_geometry;
            self.display.set_border_width(window, border_width)?;
            self.display.set_fullscreen_state(window, false)?;
            if position == Position::None {
                return self.resize_client(window, saved);
            }
        } else if position == Position::Fullscreen && !was_fullscreen {
            client.old_border_width = client.border_width;
            client.border_width = 0;
            client.saved_geometry = client.geometry();
            self.display.set_border_width(window, 0)?;
            self.display.set_fullscreen_state(window, true)?;
        }

        if previous == Position::Tiled || position == Position::Tiled {
            return self.arrange(Some(monitor));
        }

        self.set_position_move(window, position, forced)
    }

    /// Flip between the layout and free floating.
    pub(super) fn toggle_floating(&mut self, window: Window) -> WmResult<()> {
        let Some(client) = self.clients.get_mut(&window) else {
            return Ok(());
        };
        let monitor = client.monitor_index;

        if client.is_tiled() {
            client.position = Position::None;
        } else {
            client.position = Position::Tiled;
            client.is_always_on_top = false;
        }

        self.arrange(Some(monitor))
    }

    /// Show, lay out and restack one monitor, or every monitor.
    pub(super) fn arrange(&mut self, monitor: Option<usize>) -> WmResult<()> {
        match monitor {
            Some(m) => {
                self.show_hide(m)?;
                self.arrange_monitor(m)?;
                self.restack(m)
            }
            None => {
                for m in 0..self.monitors.len() {
                    self.show_hide(m)?;
                }
                for m in 0..self.monitors.len() {
                    self.arrange_monitor(m)?;
                }
                self.display.sync()?;
                self.display.discard_enter_events()
            }
        }
    }

    /// Move visible clients on-screen top-down and hidden ones off-screen
    /// bottom-up.
    fn show_hide(&mut self, m: usize) -> WmResult<()> {
        let stack = self.stack_in_order(m);
        let floating_layout = self.monitors[m].layout().is_floating();

        let (visible, hidden): (Vec<Window>, Vec<Window>) =
            stack.into_iter().partition(|&w| self.is_visible_window(w));

        for window in visible {
            let Some(client) = self.clients.get(&window) else {
                continue;
            };
            let geometry = client.geometry();
            self.display
                .move_window(window, geometry.x, geometry.y)?;

            let free = floating_layout || client.position == Position::None;
            if free && client.position != Position::Fullscreen {
                self.resize(window, geometry, false)?;
            }
        }

        for window in hidden.into_iter().rev() {
            self.hide_client(window)?;
        }

        Ok(())
    }

    /// Park `window` beyond the screen edge closest to it: vertically on
    /// a landscape screen, towards the bar side, horizontally otherwise.
    pub(super) fn hide_client(&mut self, window: Window) -> WmResult<()> {
        let Some(client) = self.clients.get(&window) else {
            return Ok(());
        };
        let monitor = &self.monitors[client.monitor_index];
        let (sw, sh) = (self.screen_width, self.screen_height);
        let (w, h) = (client.width_with_border(), client.height_with_border());

        let (x, y) = if sw > sh {
            let y = if monitor.top_bar {
                sh * 2 + h * 2
            } else {
                -sh - h * 2
            };
            (client.x_position, y)
        } else {
            let area = monitor.work_area();
            let centre = client.x_position + w / 2;
            let x = if centre < area.x + area.width / 2 {
                sw * 2 + w * 2
            } else {
                -sw - w * 2
            };
            (x, client.y_position)
        };

        self.display.move_window(window, x, y)
    }

    fn arrange_monitor(&mut self, m: usize) -> WmResult<()> {
        for window in self.clients_in_order(m) {
            let Some(client) = self.clients.get(&window) else {
                continue;
            };
            if self.is_visible(client) && client.position.is_preset() {
                let position = client.position;
                self.set_position_move(window, position, false)?;
            }
        }

        let layout = self.monitors[m].layout();
        let tiled = self.tiled_clients(m);
        if tiled.is_empty() || layout.is_floating() {
            return Ok(());
        }

        let cells = layout.arrange(&self.monitors[m].layout_area(), tiled.len());
        for (window, cell) in tiled.into_iter().zip(cells) {
            match cell {
                Some(cell) => {
                    let border = self.clients.get(&window).map_or(0, |c| c.border_width);
                    self.resize(window, cell.without_border(border), false)?;
                }
                None => self.hide_client(window)?,
            }
        }

        Ok(())
    }
}
