//! Preset regions of the work area for pinned clients.

use crate::client::Position;
use crate::geometry::Rect;

/// Outer rectangle (border included) of a compass or fill preset, relative
/// to the work area origin. Halves lose half a window gap on their inner
/// edge. Positions that are not regions of the work area yield `None`.
pub fn preset_rect(position: Position, width: i32, height: i32, gap: i32) -> Option<Rect> {
    let half_width = width / 2 - gap / 2;
    let half_height = height / 2 - gap / 2;
    let far_x = width / 2 + gap / 2;
    let far_y = height / 2 + gap / 2;

    let rect = match position {
        Position::NorthWest => Rect::new(0, 0, half_width, half_height),
        Position::West => Rect::new(0, 0, half_width, height),
        Position::SouthWest => Rect::new(0, far_y, half_width, half_height),
        Position::North => Rect::new(0, 0, width, half_height),
        Position::Fill => Rect::new(0, 0, width, height),
        Position::South => Rect::new(0, far_y, width, half_height),
        Position::NorthEast => Rect::new(far_x, 0, half_width, half_height),
        Position::East => Rect::new(far_x, 0, half_width, height),
        Position::SouthEast => Rect::new(far_x, far_y, half_width, half_height),
        Position::None
        | Position::Tiled
        | Position::Center
        | Position::Fullscreen
        | Position::DoubleFullscreen => return None,
    };

    Some(rect)
}

/// Offset that centres an outer box of `outer_width x outer_height` in the
/// work area.
pub fn centered_origin(width: i32, height: i32, outer_width: i32, outer_height: i32) -> (i32, i32) {
    (width / 2 - outer_width / 2, height / 2 - outer_height / 2)
}
