pub mod bottom_stack;
pub mod columns;
pub mod floating;
pub mod grid;
pub mod monocle;
pub mod position;
pub mod tiling;

use crate::geometry::Rect;
use std::str::FromStr;

/// The region a layout arranges into, together with the monitor's
/// arrangement parameters.
#[derive(Debug, Clone, Copy)]
pub struct LayoutArea {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Gap between neighbouring windows.
    pub gap: i32,
    pub master_factor: f32,
    pub num_master: usize,
}

impl LayoutArea {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// A tiling algorithm: given the number of tiled clients, produce one
/// outer cell (border included) per client in member-list order. `None`
/// marks a client the layout has no room for; it is hidden off-screen.
pub trait Layout {
    fn arrange(&self, area: &LayoutArea, count: usize) -> Vec<Option<Rect>>;
    fn name(&self) -> &'static str;
    fn symbol(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutType {
    Tile,
    BottomStack,
    Columns,
    Grid,
    Monocle,
    Floating,
}

impl LayoutType {
    fn layout(&self) -> &'static dyn Layout {
        match self {
            Self::Tile => &tiling::TilingLayout,
            Self::BottomStack => &bottom_stack::BottomStackLayout,
            Self::Columns => &columns::ColumnsLayout,
            Self::Grid => &grid::GridLayout,
            Self::Monocle => &monocle::MonocleLayout,
            Self::Floating => &floating::FloatingLayout,
        }
    }

    pub fn arrange(&self, area: &LayoutArea, count: usize) -> Vec<Option<Rect>> {
        match count {
            0 => Vec::new(),
            1 if !self.is_floating() => vec![Some(area.rect())],
            _ => self.layout().arrange(area, count),
        }
    }

    pub fn symbol(&self) -> &'static str {
        self.layout().symbol()
    }

    /// The floating layout leaves geometry to the clients.
    pub fn is_floating(&self) -> bool {
        matches!(self, Self::Floating)
    }

    pub fn as_str(&self) -> &'static str {
        self.layout().name()
    }
}

impl FromStr for LayoutType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tile" | "tiling" => Ok(Self::Tile),
            "bottom_stack" | "bstack" => Ok(Self::BottomStack),
            "columns" | "col" => Ok(Self::Columns),
            "grid" => Ok(Self::Grid),
            "monocle" => Ok(Self::Monocle),
            "floating" | "none" => Ok(Self::Floating),
            _ => Err(format!("Invalid Layout Type: {}", s)),
        }
    }
}

/// Split `total` pixels (gap included once per cell) into `parts` cells of
/// `total / parts` each, returning the start offset and extent of cell
/// `index` with the trailing gap removed.
pub(crate) fn cell(total: i32, parts: usize, index: usize, gap: i32) -> (i32, i32) {
    let step = total / parts as i32;
    (index as i32 * step, step - gap)
}
