use super::{Layout, LayoutArea};
use crate::geometry::Rect;

pub struct MonocleLayout;

impl Layout for MonocleLayout {
    fn name(&self) -> &'static str {
        "monocle"
    }

    fn symbol(&self) -> &'static str {
        "[M]"
    }

    fn arrange(&self, area: &LayoutArea, count: usize) -> Vec<Option<Rect>> {
        vec![Some(area.rect()); count]
    }
}
