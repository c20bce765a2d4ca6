use super::WindowManager;
use crate::bar::DrawSurface;
use crate::client::{Position, TagMask};
use crate::display::{DisplayServer, Protocol};
use crate::errors::WmResult;
use crate::keyboard::{Arg, KeyAction};
use crate::spawn;
use tracing::{debug, info, warn};

const MIN_MASTER_FACTOR: f32 = 0.05;
const MAX_MASTER_FACTOR: f32 = 0.95;

/// Tag bits named by a command argument: a mask, or the index of one tag.
fn tag_arg(arg: &Arg) -> TagMask {
    match arg {
        Arg::Tags(tags) => *tags,
        Arg::Int(index) if *index >= 0 => 1u32.checked_shl(*index as u32).unwrap_or(0),
        _ => 0,
    }
}

/// Step a gap by `delta`; zero resets it and it never goes negative.
fn step_gap(gap: i32, delta: i32) -> i32 {
    if delta == 0 || gap + delta < 0 {
        0
    } else {
        gap + delta
    }
}

impl<X: DisplayServer, D: DrawSurface> WindowManager<X, D> {
    pub(super) fn execute(&mut self, action: KeyAction, arg: &Arg) -> WmResult<()> {
        debug!(?action, ?arg, "command");
        let m = self.selected_monitor;

        match action {
            KeyAction::Spawn => {
                self.spawn(arg);
                Ok(())
            }
            KeyAction::KillClient => self.kill_selected(),
            KeyAction::Quit => {
                info!("quit requested");
                self.running = false;
                Ok(())
            }
            KeyAction::FocusClient => match arg {
                Arg::Client(window) => self.focus(Some(*window)),
                _ => Ok(()),
            },
            KeyAction::FocusMonitor => {
                if self.monitors.len() < 2 {
                    return Ok(());
                }
                let target = self.dir_to_monitor(arg.int());
                self.focus_monitor(target, true)
            }
            KeyAction::FocusStack => self.focus_stack(arg.int()),
            KeyAction::IncLayout => self.inc_layout(arg.int()),
            KeyAction::IncNumMaster => {
                let monitor = &mut self.monitors[m];
                monitor.num_master = (monitor.num_master + arg.int()).max(0);
                self.arrange(Some(m))
            }
            KeyAction::MoveMouse => self.start_move(),
            KeyAction::ResizeMouse => self.start_resize(arg.int() != 0),
            KeyAction::SetGapWindow => {
                let monitor = &mut self.monitors[m];
                monitor.gap_window = step_gap(monitor.gap_window, arg.int());
                self.arrange(Some(m))
            }
            KeyAction::SetGapBar => {
                let monitor = &mut self.monitors[m];
                monitor.gap_bar = step_gap(monitor.gap_bar, arg.int());
                monitor.update_bar_position();
                if let Some(bar) = monitor.bar_window {
                    self.display.move_resize_window(bar, monitor.bar_rect())?;
                }
                self.arrange(Some(m))?;
                self.draw_bar(m)
            }
            KeyAction::SetGapEdge => {
                let monitor = &mut self.monitors[m];
                monitor.gap_edge = step_gap(monitor.gap_edge, arg.int());
                monitor.update_bar_position();
                self.arrange(Some(m))?;
                self.draw_bar(m)
            }
            KeyAction::SetLayout => self.set_layout(arg),
            KeyAction::SetMasterFactor => self.set_master_factor(arg),
            KeyAction::SetPosition => {
                let (Some(window), Arg::Position { position, forced }) = (self.selected_client(), arg)
                else {
                    return Ok(());
                };
                self.set_position(window, *position, *forced)?;
                self.focus(Some(window))
            }
            KeyAction::SendMonitor => {
                let Some(window) = self.selected_client() else {
                    return Ok(());
                };
                if self.monitors.len() < 2 {
                    return Ok(());
                }
                let target = self.dir_to_monitor(arg.int());
                self.send_monitor(window, target, true)
            }
            KeyAction::Tag => {
                let tags = tag_arg(arg) & self.config.tag_mask();
                let Some(window) = self.selected_client() else {
                    return Ok(());
                };
                if tags == 0 {
                    return Ok(());
                }
                if let Some(client) = self.clients.get_mut(&window) {
                    client.tags = tags;
                }
                self.focus(None)?;
                self.arrange(Some(m))
            }
            KeyAction::ToggleBar => self.toggle_bar(),
            KeyAction::ToggleFloating => match self.selected_client() {
                Some(window) => self.toggle_floating(window),
                None => Ok(()),
            },
            KeyAction::ToggleAlwaysOnTop => self.toggle_always_on_top(arg),
            KeyAction::ToggleTag => {
                let Some(window) = self.selected_client() else {
                    return Ok(());
                };
                let toggled = tag_arg(arg) & self.config.tag_mask();
                let Some(client) = self.clients.get_mut(&window) else {
                    return Ok(());
                };
                let tags = client.tags ^ toggled;
                if tags == 0 {
                    return Ok(());
                }
                client.tags = tags;
                self.focus(None)?;
                self.arrange(Some(m))
            }
            KeyAction::ToggleView => {
                let toggled = tag_arg(arg) & self.config.tag_mask();
                let monitor = &mut self.monitors[m];
                let tags = monitor.active_tags() ^ toggled;
                if tags == 0 {
                    return Ok(());
                }
                monitor.tagset[monitor.selected_tags_index] = tags;
                self.focus(None)?;
                self.arrange(Some(m))
            }
            KeyAction::View => self.view(arg),
            KeyAction::WinView => {
                let Some(window) = self.display.focused_window()? else {
                    return Ok(());
                };
                match self.clients.get(&window).map(|c| c.tags) {
                    Some(tags) => self.view(&Arg::Tags(tags)),
                    None => Ok(()),
                }
            }
            KeyAction::Zoom => self.zoom(),
            KeyAction::StartAltTab => {
                self.start_alt_tab();
                Ok(())
            }
            KeyAction::AltTab => self.alt_tab(),
        }
    }

    fn spawn(&self, arg: &Arg) {
        let argv: Vec<String> = match arg {
            Arg::Str(command) => command.split_whitespace().map(str::to_string).collect(),
            Arg::Array(argv) => argv.clone(),
            _ => Vec::new(),
        };
        if argv.is_empty() {
            warn!(?arg, "spawn without a command");
            return;
        }
        spawn::spawn(&argv, self.selected_monitor);
    }

    /// Ask the selection to close, or kill it when it does not take part in
    /// the delete protocol.
    fn kill_selected(&mut self) -> WmResult<()> {
        let Some(window) = self.selected_client() else {
            return Ok(());
        };
        if self
            .display
            .supports_protocol(window, Protocol::DeleteWindow)?
        {
            self.display.send_protocol(window, Protocol::DeleteWindow)
        } else {
            self.display.kill_client(window)
        }
    }

    /// Select the next (`direction > 0`) or previous visible client in
    /// arrangement order, wrapping.
    fn focus_stack(&mut self, direction: i32) -> WmResult<()> {
        let m = self.selected_monitor;
        let Some(selected) = self.selected_client() else {
            return Ok(());
        };
        let visible: Vec<_> = self
            .clients_in_order(m)
            .into_iter()
            .filter(|&w| self.is_visible_window(w))
            .collect();
        let Some(index) = visible.iter().position(|&w| w == selected) else {
            return Ok(());
        };

        let count = visible.len();
        let target = if direction > 0 {
            visible[(index + 1) % count]
        } else {
            visible[(index + count - 1) % count]
        };
        self.focus(Some(target))?;
        self.restack(m)
    }

    fn inc_layout(&mut self, steps: i32) -> WmResult<()> {
        let m = self.selected_monitor;
        let layouts = &self.config.layouts;
        if layouts.is_empty() {
            return Ok(());
        }

        let monitor = &mut self.monitors[m];
        let current = layouts
            .iter()
            .position(|&l| l == monitor.layout())
            .unwrap_or(0) as i32;
        let next = (current + steps).rem_euclid(layouts.len() as i32) as usize;
        monitor.layouts[monitor.selected_layout_index] = layouts[next];

        self.relayout(m)
    }

    fn set_layout(&mut self, arg: &Arg) -> WmResult<()> {
        let m = self.selected_monitor;
        let requested = match arg {
            Arg::Layout(layout) => Some(*layout),
            _ => None,
        };

        let monitor = &mut self.monitors[m];
        if requested != Some(monitor.layout()) {
            monitor.selected_layout_index ^= 1;
        }
        if let Some(layout) = requested {
            monitor.layouts[monitor.selected_layout_index] = layout;
        }

        self.relayout(m)
    }

    /// Arrange after a layout change, or only redraw the bar symbol when
    /// there is nothing to arrange.
    fn relayout(&mut self, m: usize) -> WmResult<()> {
        if self.monitors[m].selected_client.is_some() {
            self.arrange(Some(m))
        } else {
            self.draw_bar(m)
        }
    }

    /// Values below 1.0 are deltas, larger ones set `value - 1.0`.
    fn set_master_factor(&mut self, arg: &Arg) -> WmResult<()> {
        let m = self.selected_monitor;
        let Arg::Float(value) = *arg else {
            return Ok(());
        };
        let monitor = &mut self.monitors[m];
        if value == 0.0 || monitor.layout().is_floating() {
            return Ok(());
        }

        let factor = if value < 1.0 {
            value + monitor.master_factor
        } else {
            value - 1.0
        };
        if !(MIN_MASTER_FACTOR..=MAX_MASTER_FACTOR).contains(&factor) {
            return Ok(());
        }
        monitor.master_factor = factor;
        self.arrange(Some(m))
    }

    fn toggle_bar(&mut self) -> WmResult<()> {
        let m = self.selected_monitor;
        let monitor = &mut self.monitors[m];
        monitor.show_bar = !monitor.show_bar;
        monitor.update_bar_position();

        if let Some(bar) = monitor.bar_window {
            if monitor.show_bar {
                self.display.move_resize_window(bar, monitor.bar_rect())?;
                self.display.map_window(bar)?;
            } else {
                self.display.unmap_window(bar)?;
            }
        }
        self.arrange(Some(m))
    }

    /// `Arg::Int(1)` makes the client the only always-on-top one among the
    /// visible clients of its monitor; `Arg::Client` names the target.
    fn toggle_always_on_top(&mut self, arg: &Arg) -> WmResult<()> {
        let target = match arg {
            Arg::Client(window) => Some(*window),
            _ => self.selected_client(),
        };
        let Some(window) = target else {
            return Ok(());
        };
        let Some(client) = self.clients.get(&window) else {
            return Ok(());
        };
        let m = client.monitor_index;

        if client.is_always_on_top {
            if let Some(client) = self.clients.get_mut(&window) {
                client.is_always_on_top = false;
            }
        } else {
            if arg.int() == 1 {
                for other in self.clients_in_order(m) {
                    if self.is_visible_window(other) {
                        if let Some(c) = self.clients.get_mut(&other) {
                            c.is_always_on_top = false;
                        }
                    }
                }
            }
            if let Some(client) = self.clients.get_mut(&window) {
                client.is_always_on_top = true;
            }
        }

        self.arrange(Some(m))
    }

    /// Show the tags in `arg`. The previous set stays in the other slot, so
    /// viewing nothing switches back to it.
    pub(super) fn view(&mut self, arg: &Arg) -> WmResult<()> {
        let m = self.selected_monitor;
        let tags = tag_arg(arg) & self.config.tag_mask();
        let monitor = &mut self.monitors[m];
        if tags == monitor.active_tags() {
            return Ok(());
        }

        monitor.selected_tags_index ^= 1;
        if tags != 0 {
            monitor.tagset[monitor.selected_tags_index] = tags;
        }
        self.focus(None)?;
        self.arrange(Some(m))
    }

    /// Promote the selection to master, or swap in the next tiled client
    /// when the selection already is the master.
    fn zoom(&mut self) -> WmResult<()> {
        let m = self.selected_monitor;
        if self.monitors[m].layout().is_floating() {
            return Ok(());
        }
        let Some(selected) = self.selected_client() else {
            return Ok(());
        };
        let Some(client) = self.clients.get(&selected) else {
            return Ok(());
        };
        if client.position == Position::None {
            return Ok(());
        }

        let mut target = selected;
        if self.next_tiled(self.monitors[m].clients_head) == Some(selected) {
            match self.next_tiled(client.next) {
                Some(next) => target = next,
                None => return Ok(()),
            }
        }
        self.pop(target)
    }
}
