use super::{Layout, LayoutArea, cell};
use crate::geometry::Rect;

/// Every client gets a full-height column. Master columns share the
/// master fraction of the width, the others share the rest.
pub struct ColumnsLayout;

impl Layout for ColumnsLayout {
    fn name(&self) -> &'static str {
        "columns"
    }

    fn symbol(&self) -> &'static str {
        "|||"
    }

    fn arrange(&self, area: &LayoutArea, count: usize) -> Vec<Option<Rect>> {
        let gap = area.gap;
        let full_width = area.width + gap;
        let masters = area.num_master.min(count);
        let stacked = count - masters;

        let master_width = match (masters, stacked) {
            (0, _) => 0,
            (_, 0) => full_width,
            _ => (full_width as f32 * area.master_factor) as i32,
        };
        let stack_hidden = masters > 0 && area.master_factor >= 1.0;

        let mut cells = Vec::with_capacity(count);
        for i in 0..masters {
            let (dx, width) = cell(master_width, masters, i, gap);
            cells.push(Some(Rect::new(area.x + dx, area.y, width, area.height)));
        }
        for i in 0..stacked {
            if stack_hidden {
                cells.push(None);
                continue;
            }
            let (dx, width) = cell(full_width - master_width, stacked, i, gap);
            cells.push(Some(Rect::new(
                area.x + master_width + dx,
                area.y,
                width,
                area.height,
            )));
        }

        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_master_and_two_stack_columns() {
        let area = LayoutArea {
            x: 0,
            y: 0,
            width: 990,
            height: 600,
            gap: 10,
            master_factor: 0.5,
            num_master: 1,
        };

        let cells = ColumnsLayout.arrange(&area, 3);

        assert_eq!(cells, vec![
            Some(Rect::new(0, 0, 490, 600)),
            Some(Rect::new(500, 0, 240, 600)),
            Some(Rect::new(750, 0, 240, 600)),
        ]);
    }
}
