use super::{Layout, LayoutArea};
use crate::geometry::Rect;

/// No arrangement at all: clients keep the geometry they ask for.
pub struct FloatingLayout;

impl Layout for FloatingLayout {
    fn name(&self) -> &'static str {
        "floating"
    }

    fn symbol(&self) -> &'static str {
        "><>"
    }

    fn arrange(&self, _area: &LayoutArea, _count: usize) -> Vec<Option<Rect>> {
        Vec::new()
    }
}
