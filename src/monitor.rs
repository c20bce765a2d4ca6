use crate::Config;
use crate::bar::BarPosition;
use crate::client::TagMask;
use crate::geometry::Rect;
use crate::layout::{LayoutArea, LayoutType};
use x11rb::protocol::xproto::Window;

/// One physical output. `clients_head` starts the member list in
/// arrangement order and `stack_head` the focus history, most recent first.
#[derive(Debug, Clone)]
pub struct Monitor {
    pub num: usize,
    pub screen_x: i32,
    pub screen_y: i32,
    pub screen_width: i32,
    pub screen_height: i32,
    /// Output geometry before the last reconfiguration.
    pub previous_screen: Rect,
    pub window_area_x: i32,
    pub window_area_y: i32,
    pub window_area_width: i32,
    pub window_area_height: i32,
    pub bar_x: i32,
    pub bar_y: i32,
    pub bar_width: i32,
    pub bar_height: i32,
    pub bar_window: Option<Window>,
    pub show_bar: bool,
    pub top_bar: bool,
    pub gap_window: i32,
    pub gap_bar: i32,
    pub gap_edge: i32,
    pub master_factor: f32,
    pub num_master: i32,
    pub layouts: [LayoutType; 2],
    pub selected_layout_index: usize,
    pub tagset: [TagMask; 2],
    pub selected_tags_index: usize,
    pub clients_head: Option<Window>,
    pub stack_head: Option<Window>,
    pub selected_client: Option<Window>,
    /// Set while a restack sequence is in flight; suppresses bar redraws.
    pub restacking: bool,
}

impl Monitor {
    pub fn new(config: &Config, bar_height: i32) -> Self {
        let first = config.layouts.first().copied().unwrap_or(LayoutType::Tile);
        let second = config
            .layouts
            .get(1 % config.layouts.len().max(1))
            .copied()
            .unwrap_or(first);

        Self {
            num: 0,
            screen_x: 0,
            screen_y: 0,
            screen_width: 0,
            screen_height: 0,
            previous_screen: Rect::default(),
            window_area_x: 0,
            window_area_y: 0,
            window_area_width: 0,
            window_area_height: 0,
            bar_x: 0,
            bar_y: 0,
            bar_width: 0,
            bar_height,
            bar_window: None,
            show_bar: config.show_bar,
            top_bar: config.bar_position == BarPosition::Top,
            gap_window: config.gap_window,
            gap_bar: config.gap_bar,
            gap_edge: config.gap_edge,
            master_factor: config.master_factor,
            num_master: config.num_master,
            layouts: [first, second],
            selected_layout_index: 0,
            tagset: [1, 1],
            selected_tags_index: 0,
            clients_head: None,
            stack_head: None,
            selected_client: None,
            restacking: false,
        }
    }

    pub fn screen_rect(&self) -> Rect {
        Rect::new(
            self.screen_x,
            self.screen_y,
            self.screen_width,
            self.screen_height,
        )
    }

    pub fn work_area(&self) -> Rect {
        Rect::new(
            self.window_area_x,
            self.window_area_y,
            self.window_area_width,
            self.window_area_height,
        )
    }

    pub fn bar_rect(&self) -> Rect {
        Rect::new(self.bar_x, self.bar_y, self.bar_width, self.bar_height)
    }

    pub fn set_screen(&mut self, rect: Rect) {
        self.screen_x = rect.x;
        self.screen_y = rect.y;
        self.screen_width = rect.width;
        self.screen_height = rect.height;
    }

    pub fn active_tags(&self) -> TagMask {
        self.tagset[self.selected_tags_index]
    }

    pub fn layout(&self) -> LayoutType {
        self.layouts[self.selected_layout_index]
    }

    pub fn layout_area(&self) -> LayoutArea {
        LayoutArea {
            x: self.window_area_x,
            y: self.window_area_y,
            width: self.window_area_width,
            height: self.window_area_height,
            gap: self.gap_window,
            master_factor: self.master_factor,
            num_master: self.num_master.max(0) as usize,
        }
    }

    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.screen_rect().contains_point(x, y)
    }

    /// Recompute the work area and bar rectangle from the output geometry,
    /// the bar visibility and the three gaps.
    pub fn update_bar_position(&mut self) {
        self.window_area_x = self.screen_x + self.gap_edge;
        self.window_area_width = self.screen_width - 2 * self.gap_edge;

        if !self.show_bar {
            self.window_area_y = self.screen_y + self.gap_edge;
            self.window_area_height = self.screen_height - 2 * self.gap_edge;
            self.bar_x = 0;
            self.bar_width = 0;
            self.bar_y = -self.bar_height;
            return;
        }

        self.bar_x = self.screen_x + self.gap_bar;
        self.bar_width = self.screen_width - 2 * self.gap_bar;
        self.window_area_height =
            self.screen_height - self.bar_height - 2 * self.gap_edge - self.gap_bar;

        if self.top_bar {
            self.window_area_y = self.screen_y + self.bar_height + self.gap_edge + self.gap_bar;
            self.bar_y = self.screen_y + self.gap_bar;
        } else {
            self.window_area_y = self.screen_y + self.gap_edge;
            self.bar_y = self.screen_y + self.screen_height - self.bar_height - self.gap_bar;
        }
    }
}

/// Drop zero-sized and duplicate output geometries. First occurrences
/// keep the order the server reported them in.
pub fn unique_geometries(outputs: &[Rect]) -> Vec<Rect> {
    let mut unique: Vec<Rect> = Vec::with_capacity(outputs.len());

    for output in outputs {
        let has_valid_dimensions = output.width > 0 && output.height > 0;
        if has_valid_dimensions && !unique.contains(output) {
            unique.push(*output);
        }
    }

    unique
}
