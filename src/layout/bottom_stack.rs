use super::{Layout, LayoutArea, cell};
use crate::geometry::Rect;

/// Master row across the top, remaining clients side by side underneath.
pub struct BottomStackLayout;

impl Layout for BottomStackLayout {
    fn name(&self) -> &'static str {
        "bottom_stack"
    }

    fn symbol(&self) -> &'static str {
        "TTT"
    }

    fn arrange(&self, area: &LayoutArea, count: usize) -> Vec<Option<Rect>> {
        let gap = area.gap;
        let full_width = area.width + gap;
        let full_height = area.height + gap;
        let masters = area.num_master.min(count);
        let stacked = count - masters;

        let master_height = match (masters, stacked) {
            (0, _) => 0,
            (_, 0) => full_height,
            _ => (full_height as f32 * area.master_factor) as i32,
        };
        let stack_hidden = masters > 0 && area.master_factor >= 1.0;

        let masters_iter = (0..masters).map(|i| {
            let (dx, width) = cell(full_width, masters, i, gap);
            Some(Rect::new(area.x + dx, area.y, width, master_height - gap))
        });

        let stack_iter = (0..stacked).map(|i| {
            if stack_hidden {
                return None;
            }
            let (dx, width) = cell(full_width, stacked, i, gap);
            Some(Rect::new(
                area.x + dx,
                area.y + master_height,
                width,
                full_height - master_height - gap,
            ))
        });

        masters_iter.chain(stack_iter).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masters_on_top_stack_below() {
        let area = LayoutArea {
            x: 0,
            y: 20,
            width: 1000,
            height: 800,
            gap: 10,
            master_factor: 0.5,
            num_master: 1,
        };

        let cells = BottomStackLayout.arrange(&area, 3);

        assert_eq!(cells, vec![
            Some(Rect::new(0, 20, 1000, 395)),
            Some(Rect::new(0, 425, 495, 395)),
            Some(Rect::new(505, 425, 495, 395)),
        ]);
    }
}
