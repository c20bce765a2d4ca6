//! Mouse move and resize. A drag is a small state machine fed by the main
//! event loop instead of a nested one: motion and release events go to the
//! drag, everything else is dispatched as usual.

use super::WindowManager;
use crate::bar::DrawSurface;
use crate::client::Position;
use crate::display::{CursorKind, DisplayServer, WmEvent};
use crate::errors::WmResult;
use crate::geometry::Rect;
use tracing::debug;
use x11rb::protocol::xproto::Window;

/// Motion events closer together than this are dropped.
const MOTION_INTERVAL_MS: u32 = 1000 / 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DragKind {
    Move,
    Resize,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Drag {
    kind: DragKind,
    window: Window,
    /// Pointer position the offsets are measured from.
    pointer_x: i32,
    pointer_y: i32,
    start: Rect,
    last_motion: u32,
    moved: bool,
    /// Resize without size hints.
    forced: bool,
}

impl<X: DisplayServer, D: DrawSurface> WindowManager<X, D> {
    pub(super) fn start_move(&mut self) -> WmResult<()> {
        let Some(window) = self.selected_client() else {
            return Ok(());
        };
        let Some((pointer_x, pointer_y)) = self.display.query_pointer()? else {
            return Ok(());
        };
        if !self.display.grab_pointer(CursorKind::Move)? {
            return Ok(());
        }
        let Some(start) = self.clients.get(&window).map(|c| c.geometry()) else {
            return self.display.ungrab_pointer();
        };

        self.begin_drag(Drag {
            kind: DragKind::Move,
            window,
            pointer_x,
            pointer_y,
            start,
            last_motion: 0,
            moved: false,
            forced: false,
        })
    }

    pub(super) fn start_resize(&mut self, forced: bool) -> WmResult<()> {
        let Some(window) = self.selected_client() else {
            return Ok(());
        };
        let Some(client) = self.clients.get(&window) else {
            return Ok(());
        };
        let start = client.geometry();
        let border = client.border_width;

        if !self.display.grab_pointer(CursorKind::Resize)? {
            return Ok(());
        }

        let (pointer_x, pointer_y) = if self.config.resize_mouse_warp {
            self.display
                .warp_pointer(window, start.width + border, start.height + border)?;
            (
                start.x + start.width + border,
                start.y + start.height + border,
            )
        } else {
            match self.display.query_pointer()? {
                Some(pointer) => pointer,
                None => return self.display.ungrab_pointer(),
            }
        };

        self.begin_drag(Drag {
            kind: DragKind::Resize,
            window,
            pointer_x,
            pointer_y,
            start,
            last_motion: 0,
            moved: false,
            forced,
        })
    }

    fn begin_drag(&mut self, drag: Drag) -> WmResult<()> {
        debug!(window = drag.window, kind = ?drag.kind, "drag started");
        self.grabbed_client = Some(drag.window);
        self.drag = Some(drag);
        self.focus(Some(drag.window))
    }

    pub(super) fn handle_drag_event(&mut self, event: WmEvent) -> WmResult<()> {
        match event {
            WmEvent::MotionNotify {
                root_x,
                root_y,
                time,
                ..
            } => self.drag_motion(root_x, root_y, time)?,
            WmEvent::ButtonRelease { root_x, root_y } => return self.finish_drag(root_x, root_y),
            event => {
                self.dispatch(event)?;
                if let Some(drag) = self.drag {
                    let released = self.grabbed_client != Some(drag.window);
                    let taken_over = drag.moved
                        && self
                            .clients
                            .get(&drag.window)
                            .is_some_and(|c| c.position != Position::None);
                    if released || taken_over {
                        return self.cancel_drag();
                    }
                }
            }
        }

        match self.drag {
            Some(drag) if !self.is_visible_window(drag.window) => self.cancel_drag(),
            _ => Ok(()),
        }
    }

    fn drag_motion(&mut self, root_x: i32, root_y: i32, time: u32) -> WmResult<()> {
        let Some(drag) = self.drag.as_mut() else {
            return Ok(());
        };
        if time.wrapping_sub(drag.last_motion) <= MOTION_INTERVAL_MS {
            return Ok(());
        }
        drag.last_motion = time;
        let drag = *drag;

        let Some(client) = self.clients.get(&drag.window) else {
            return self.cancel_drag();
        };
        let window = drag.window;
        let dx = root_x - drag.pointer_x;
        let dy = root_y - drag.pointer_y;

        match drag.kind {
            DragKind::Move => {
                let area = self.monitors[self.selected_monitor].work_area();
                let snap = self.config.snap;
                let (outer_w, outer_h) = (client.width_with_border(), client.height_with_border());

                let mut x = drag.start.x + dx;
                let mut y = drag.start.y + dy;
                if (area.x - x).abs() < snap {
                    x = area.x;
                } else if ((area.x + area.width) - (x + outer_w)).abs() < snap {
                    x = area.x + area.width - outer_w;
                }
                if (area.y - y).abs() < snap {
                    y = area.y;
                } else if ((area.y + area.height) - (y + outer_h)).abs() < snap {
                    y = area.y + area.height - outer_h;
                }

                let geometry = Rect::new(x, y, client.width, client.height);
                self.resize_client(window, geometry)?;
                if !drag.moved {
                    self.release_to_floating(window)?;
                }
            }
            DragKind::Resize => {
                let width = drag.start.width + dx;
                let height = drag.start.height + dy;
                if width == client.width && height == client.height {
                    return Ok(());
                }

                let abs_width = width.abs().max(1);
                let abs_height = height.abs().max(1);
                let geometry = Rect::new(
                    if width < 0 { drag.start.x - abs_width } else { drag.start.x },
                    if height < 0 { drag.start.y - abs_height } else { drag.start.y },
                    abs_width,
                    abs_height,
                );

                if drag.forced {
                    self.resize_client(window, geometry)?;
                } else {
                    self.resize(window, geometry, true)?;
                }

                let floating = self
                    .clients
                    .get(&window)
                    .is_some_and(|c| c.position == Position::None);
                if !drag.moved || !floating {
                    self.release_to_floating(window)?;
                }
            }
        }
        Ok(())
    }

    /// The first effective drag step takes the client out of its layout.
    fn release_to_floating(&mut self, window: Window) -> WmResult<()> {
        if let Some(drag) = self.drag.as_mut() {
            drag.moved = true;
        }
        if let Some(client) = self.clients.get_mut(&window) {
            client.is_always_on_top = false;
        }
        self.set_position(window, Position::None, false)
    }

    fn finish_drag(&mut self, root_x: i32, root_y: i32) -> WmResult<()> {
        let Some(drag) = self.drag.take() else {
            return Ok(());
        };
        self.display.ungrab_pointer()?;
        self.grabbed_client = None;
        debug!(window = drag.window, moved = drag.moved, "drag finished");

        match drag.kind {
            DragKind::Move if drag.moved => {
                let target = self.monitor_at(root_x, root_y);
                if target != self.selected_monitor {
                    self.send_monitor(drag.window, target, true)?;
                }
                Ok(())
            }
            // a click without motion promotes the client
            DragKind::Move => self.set_master(drag.window),
            DragKind::Resize => self.display.discard_enter_events(),
        }
    }

    fn cancel_drag(&mut self) -> WmResult<()> {
        if let Some(drag) = self.drag.take() {
            debug!(window = drag.window, "drag cancelled");
        }
        self.grabbed_client = None;
        self.display.ungrab_pointer()
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixture::*;
    use crate::client::Position;
    use crate::display::WmEvent;
    use crate::display::mock::Request;
    use crate::geometry::Rect;

    fn motion(root_x: i32, root_y: i32, time: u32) -> WmEvent {
        WmEvent::MotionNotify {
            window: ROOT,
            root_x,
            root_y,
            time,
        }
    }

    #[test]
    fn moving_floats_the_client_and_follows_the_pointer() {
        let mut wm = wm();
        map(&mut wm, 10);
        let start = wm.clients[&10].geometry();

        wm.start_move().unwrap();
        wm.handle_event(motion(50, 40, 100)).unwrap();

        let c = &wm.clients[&10];
        assert_eq!(c.position, Position::None);
        assert_eq!(
            c.geometry(),
            Rect::new(start.x + 50, start.y + 40, start.width, start.height)
        );

        wm.handle_event(WmEvent::ButtonRelease { root_x: 50, root_y: 40 })
            .unwrap();
        assert!(wm.drag.is_none());
        assert!(wm.grabbed_client.is_none());
        assert!(wm.display.requests().contains(&Request::UngrabPointer));
    }

    #[test]
    fn motion_is_throttled() {
        let mut wm = wm();
        map(&mut wm, 10);
        let start = wm.clients[&10].geometry();

        wm.start_move().unwrap();
        wm.handle_event(motion(50, 40, 100)).unwrap();
        wm.handle_event(motion(80, 80, 105)).unwrap();

        assert_eq!(wm.clients[&10].x_position, start.x + 50);
    }

    #[test]
    fn destroying_the_dragged_window_cancels_the_drag() {
        let mut wm = wm();
        map(&mut wm, 10);
        wm.start_move().unwrap();
        wm.display.take_requests();

        wm.handle_event(WmEvent::DestroyNotify { window: 10 }).unwrap();

        assert!(wm.drag.is_none());
        assert!(wm.display.requests().contains(&Request::UngrabPointer));
    }

    #[test]
    fn a_click_without_motion_promotes_to_master() {
        let mut wm = wm();
        map(&mut wm, 10);
        map(&mut wm, 11);
        wm.focus(Some(10)).unwrap();

        wm.start_move().unwrap();
        wm.handle_event(WmEvent::ButtonRelease { root_x: 0, root_y: 0 })
            .unwrap();

        assert_eq!(wm.clients_in_order(0).first(), Some(&10));
    }

    #[test]
    fn resizing_warps_to_the_corner_and_grows_from_the_origin() {
        let mut wm = wm();
        map(&mut wm, 10);
        wm.set_position(10, Position::None, false).unwrap();
        wm.resize_client(10, Rect::new(100, 100, 400, 300)).unwrap();

        wm.start_resize(true).unwrap();
        assert!(wm.display.requests().contains(&Request::Warp {
            window: 10,
            x: 400,
            y: 300
        }));

        // the drag starts at the warped corner (500, 400)
        wm.handle_event(motion(600, 450, 100)).unwrap();
        assert_eq!(wm.clients[&10].geometry(), Rect::new(100, 100, 500, 350));
    }

    #[test]
    fn hiding_the_dragged_client_cancels_the_drag() {
        let mut wm = wm();
        map(&mut wm, 10);
        wm.start_move().unwrap();

        wm.handle_event(WmEvent::KeyPress {
            keysym: crate::keyboard::keysyms::XK_2,
            state: 1 << 6,
        })
        .unwrap();

        assert!(wm.drag.is_none());
    }
}
