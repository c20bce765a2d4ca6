use super::{Layout, LayoutArea, cell};
use crate::geometry::Rect;

/// Master column on the left, remaining clients stacked on the right.
pub struct TilingLayout;

impl Layout for TilingLayout {
    fn name(&self) -> &'static str {
        "tile"
    }

    fn symbol(&self) -> &'static str {
        "[]="
    }

    fn arrange(&self, area: &LayoutArea, count: usize) -> Vec<Option<Rect>> {
        let gap = area.gap;
        let full_width = area.width + gap;
        let full_height = area.height + gap;
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
            let (dy, height) = cell(full_height, masters, i, gap);
            cells.push(Some(Rect::new(area.x, area.y + dy, master_width - gap, height)));
        }

        for i in 0..stacked {
            if stack_hidden {
                cells.push(None);
                continue;
            }
            let (dy, height) = cell(full_height, stacked, i, gap);
            cells.push(Some(Rect::new(
                area.x + master_width,
                area.y + dy,
                full_width - master_width - gap,
                height,
            )));
        }

        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(master_factor: f32, num_master: usize) -> LayoutArea {
        LayoutArea {
            x: 0,
            y: 0,
            width: 1000,
            height: 800,
            gap: 10,
            master_factor,
            num_master,
        }
    }

    #[test]
    fn three_clients_split_master_and_stack() {
        let cells = TilingLayout.arrange(&area(0.5, 1), 3);

        assert_eq!(cells, vec![
            Some(Rect::new(0, 0, 495, 800)),
            Some(Rect::new(505, 0, 495, 395)),
            Some(Rect::new(505, 405, 495, 395)),
        ]);
    }

    #[test]
    fn masters_alone_take_the_full_width() {
        let cells = TilingLayout.arrange(&area(0.5, 2), 2);

        assert_eq!(cells, vec![
            Some(Rect::new(0, 0, 1000, 395)),
            Some(Rect::new(0, 405, 1000, 395)),
        ]);
    }

    #[test]
    fn zero_masters_stack_everything() {
        let cells = TilingLayout.arrange(&area(0.5, 0), 2);

        assert_eq!(cells, vec![
            Some(Rect::new(0, 0, 1000, 395)),
            Some(Rect::new(0, 405, 1000, 395)),
        ]);
    }

    #[test]
    fn full_master_factor_hides_the_stack() {
        let cells = TilingLayout.arrange(&area(1.0, 1), 3);

        assert_eq!(cells[0], Some(Rect::new(0, 0, 1000, 800)));
        assert_eq!(&cells[1..], &[None, None]);
    }
}
