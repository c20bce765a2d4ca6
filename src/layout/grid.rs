use super::{Layout, LayoutArea};
use crate::geometry::Rect;

/// Near-square grid. Wide work areas fill column by column, tall ones row by
/// row; when the count does not divide evenly the first column (or row)
/// takes the remainder with taller (or wider) cells.
pub struct GridLayout;

impl GridLayout {
    /// Smallest `a x a` or `a x (a + 1)` grid holding `count` cells, returned
    /// as `(columns, rows)` with the longer side along the longer axis.
    fn dimensions(count: usize, wide: bool) -> (usize, usize) {
        let mut side = 1;
        loop {
            if side * side >= count {
                return (side, side);
            }
            if side * (side + 1) >= count {
                return if wide { (side + 1, side) } else { (side, side + 1) };
            }
            side += 1;
        }
    }
}

impl Layout for GridLayout {
    fn name(&self) -> &'static str {
        "grid"
    }

    fn symbol(&self) -> &'static str {
        "[#]"
    }

    fn arrange(&self, area: &LayoutArea, count: usize) -> Vec<Option<Rect>> {
        let gap = area.gap;
        let full_width = area.width + gap;
        let full_height = area.height + gap;
        let wide = area.width > area.height;
        let (columns, rows) = Self::dimensions(count, wide);

        // cells per line along the fill direction
        let line = if wide { rows } else { columns };
        let remainder = count % line;

        let regular = (full_width / columns as i32, full_height / rows as i32);
        let mut size = match remainder {
            0 => regular,
            r if wide => (regular.0, full_height / r as i32),
            r => (full_width / r as i32, regular.1),
        };

        let mut cells = Vec::with_capacity(count);
        let mut slot = 0;
        for _ in 0..count {
            if remainder != 0 && slot == remainder {
                size = regular;
                slot = line;
            }

            let (column, row) = if wide {
                (slot / rows, slot % rows)
            } else {
                (slot % columns, slot / columns)
            };
            cells.push(Some(Rect::new(
                area.x + column as i32 * size.0,
                area.y + row as i32 * size.1,
                size.0 - gap,
                size.1 - gap,
            )));
            slot += 1;
        }

        cells
    }
}
