pub mod icon;
pub mod position;
pub mod rules;

pub use icon::Icon;
pub use position::Position;
pub use rules::{Rule, RuleOutcome, apply_rules};

use crate::geometry::Rect;
use crate::size_hints::SizeHints;
use x11rb::protocol::xproto::Window;

pub type TagMask = u32;

/// A managed top-level window. Clients live in the window manager's arena
/// keyed by `window`; `next` and `stack_next` thread the per-monitor member
/// list and focus history through that arena.
#[derive(Debug, Clone)]
pub struct Client {
    pub name: String,
    pub x_position: i32,
    pub y_position: i32,
    pub width: i32,
    pub height: i32,
    pub old_x_position: i32,
    pub old_y_position: i32,
    pub old_width: i32,
    pub old_height: i32,
    /// Geometry to restore when leaving fullscreen.
    pub saved_geometry: Rect,
    pub size_hints: SizeHints,
    pub hints_valid: bool,
    pub border_width: i32,
    pub old_border_width: i32,
    pub tags: TagMask,
    pub position: Position,
    pub old_position: Position,
    pub is_fixed: bool,
    pub is_urgent: bool,
    pub is_always_on_top: bool,
    pub never_focus: bool,
    pub ignore_hints: bool,
    /// Last opacity written to `_NET_WM_WINDOW_OPACITY`, `None` when unset.
    pub opacity: Option<f32>,
    pub icon: Option<Icon>,
    pub next: Option<Window>,
    pub stack_next: Option<Window>,
    pub monitor_index: usize,
    pub window: Window,
}

impl Client {
    pub fn new(window: Window, monitor_index: usize, tags: TagMask) -> Self {
        Self {
            name: String::new(),
            x_position: 0,
            y_position: 0,
            width: 0,
            height: 0,
            old_x_position: 0,
            old_y_position: 0,
            old_width: 0,
            old_height: 0,
            saved_geometry: Rect::default(),
            size_hints: SizeHints::default(),
            hints_valid: false,
            border_width: 0,
            old_border_width: 0,
            tags,
            position: Position::None,
            old_position: Position::None,
            is_fixed: false,
            is_urgent: false,
            is_always_on_top: false,
            never_focus: false,
            ignore_hints: false,
            opacity: None,
            icon: None,
            next: None,
            stack_next: None,
            monitor_index,
            window,
        }
    }

    pub fn geometry(&self) -> Rect {
        Rect::new(self.x_position, self.y_position, self.width, self.height)
    }

    /// Record the current geometry as the previous one and adopt `rect`.
    pub fn set_geometry(&mut self, rect: Rect) {
        self.old_x_position = self.x_position;
        self.old_y_position = self.y_position;
        self.old_width = self.width;
        self.old_height = self.height;
        self.x_position = rect.x;
        self.y_position = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    /// Adopt `rect` as both the current and the previous geometry.
    pub fn reset_geometry(&mut self, rect: Rect) {
        self.set_geometry(rect);
        self.set_geometry(rect);
    }

    pub fn width_with_border(&self) -> i32 {
        self.width + 2 * self.border_width
    }

    pub fn height_with_border(&self) -> i32 {
        self.height + 2 * self.border_width
    }

    pub fn is_tiled(&self) -> bool {
        self.position == Position::Tiled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_geometry_keeps_the_previous_rect() {
        let mut c = Client::new(1, 0, 1);
        c.set_geometry(Rect::new(10, 20, 300, 200));
        c.set_geometry(Rect::new(0, 0, 1920, 1080));

        assert_eq!(c.geometry(), Rect::new(0, 0, 1920, 1080));
        assert_eq!(
            (c.old_x_position, c.old_y_position, c.old_width, c.old_height),
            (10, 20, 300, 200)
        );
    }
}
