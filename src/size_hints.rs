//! ICCCM `WM_NORMAL_HINTS` decoding and the geometry constraint solver.

use crate::geometry::Rect;

pub mod flags {
    pub const P_MIN_SIZE: u32 = 1 << 4;
    pub const P_MAX_SIZE: u32 = 1 << 5;
    pub const P_RESIZE_INC: u32 = 1 << 6;
    pub const P_ASPECT: u32 = 1 << 7;
    pub const P_BASE_SIZE: u32 = 1 << 8;
}

pub mod offset {
    pub const FLAGS: usize = 0;
    pub const MIN_WIDTH: usize = 5;
    pub const MIN_HEIGHT: usize = 6;
    pub const MAX_WIDTH: usize = 7;
    pub const MAX_HEIGHT: usize = 8;
    pub const WIDTH_INC: usize = 9;
    pub const HEIGHT_INC: usize = 10;
    pub const MIN_ASPECT_X: usize = 11;
    pub const MIN_ASPECT_Y: usize = 12;
    pub const MAX_ASPECT_X: usize = 13;
    pub const MAX_ASPECT_Y: usize = 14;
    pub const BASE_WIDTH: usize = 15;
    pub const BASE_HEIGHT: usize = 16;
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeHints {
    pub base_width: i32,
    pub base_height: i32,
    pub increment_width: i32,
    pub increment_height: i32,
    pub max_width: i32,
    pub max_height: i32,
    pub min_width: i32,
    pub min_height: i32,
    /// Minimum height/width ratio, zero when unset.
    pub min_aspect: f32,
    /// Maximum width/height ratio, zero when unset.
    pub max_aspect: f32,
}

impl SizeHints {
    /// Decode the raw 32-bit words of a `WM_NORMAL_HINTS` property. Short
    /// properties from pre-ICCCM clients read missing words as zero.
    pub fn from_normal_hints(raw: &[u32]) -> Self {
        let word = |index: usize| raw.get(index).copied().unwrap_or(0) as i32;
        let ratio = |numerator: usize, denominator: usize| {
            let denominator = word(denominator);
            if denominator == 0 {
                0.0
            } else {
                word(numerator) as f32 / denominator as f32
            }
        };

        let hint_flags = raw.get(offset::FLAGS).copied().unwrap_or(0);
        let has = |flag: u32| hint_flags & flag != 0;
        let mut hints = SizeHints::default();

        if has(flags::P_BASE_SIZE) {
            hints.base_width = word(offset::BASE_WIDTH);
            hints.base_height = word(offset::BASE_HEIGHT);
        } else if has(flags::P_MIN_SIZE) {
            hints.base_width = word(offset::MIN_WIDTH);
            hints.base_height = word(offset::MIN_HEIGHT);
        }

        if has(flags::P_RESIZE_INC) {
            hints.increment_width = word(offset::WIDTH_INC);
            hints.increment_height = word(offset::HEIGHT_INC);
        }

        if has(flags::P_MAX_SIZE) {
            hints.max_width = word(offset::MAX_WIDTH);
            hints.max_height = word(offset::MAX_HEIGHT);
        }

        if has(flags::P_MIN_SIZE) {
            hints.min_width = word(offset::MIN_WIDTH);
            hints.min_height = word(offset::MIN_HEIGHT);
        } else if has(flags::P_BASE_SIZE) {
            hints.min_width = hints.base_width;
            hints.min_height = hints.base_height;
        }

        if has(flags::P_ASPECT) {
            hints.min_aspect = ratio(offset::MIN_ASPECT_Y, offset::MIN_ASPECT_X);
            hints.max_aspect = ratio(offset::MAX_ASPECT_X, offset::MAX_ASPECT_Y);
        }

        hints
    }

    /// A client whose minimum and maximum sizes coincide cannot be resized.
    pub fn is_fixed(&self) -> bool {
        self.max_width > 0
            && self.max_height > 0
            && self.max_width == self.min_width
            && self.max_height == self.min_height
    }
}

/// Everything about the client's surroundings the solver needs.
#[derive(Debug, Clone, Copy)]
pub struct HintBounds {
    pub screen_width: i32,
    pub screen_height: i32,
    pub work_area: Rect,
    /// The client's current geometry, border excluded.
    pub current: Rect,
    pub border_width: i32,
    /// Floor for both dimensions.
    pub min_size: i32,
}

/// Constrain `candidate` (border excluded) and report whether it differs
/// from the client's current geometry.
///
/// Interactive requests are kept on the screen, others inside the work
/// area. With `hints` present the ICCCM base, aspect, increment, minimum
/// and maximum rules are applied in that order.
pub fn apply_size_hints(
    hints: Option<&SizeHints>,
    candidate: Rect,
    bounds: &HintBounds,
    interact: bool,
) -> (Rect, bool) {
    let Rect {
        mut x,
        mut y,
        mut width,
        mut height,
    } = candidate;
    let border = bounds.border_width;
    let outer_width = bounds.current.width + 2 * border;
    let outer_height = bounds.current.height + 2 * border;

    width = width.max(bounds.min_size);
    height = height.max(bounds.min_size);

    if interact {
        if x > bounds.screen_width {
            x = bounds.screen_width - outer_width;
        }
        if y > bounds.screen_height {
            y = bounds.screen_height - outer_height;
        }
        if x + width + 2 * border < 0 {
            x = 0;
        }
        if y + height + 2 * border < 0 {
            y = 0;
        }
    } else {
        let area = bounds.work_area;
        if x >= area.x + area.width {
            x = area.x + area.width - outer_width;
        }
        if y >= area.y + area.height {
            y = area.y + area.height - outer_height;
        }
        if x + width + 2 * border <= area.x {
            x = area.x;
        }
        if y + height + 2 * border <= area.y {
            y = area.y;
        }
    }

    if let Some(hints) = hints {
        let base_is_min =
            hints.base_width == hints.min_width && hints.base_height == hints.min_height;

        // ICCCM 4.1.2.3: aspect limits exclude the base size unless it
        // doubles as the minimum size
        if !base_is_min {
            width -= hints.base_width;
            height -= hints.base_height;
        }

        if hints.min_aspect > 0.0 && hints.max_aspect > 0.0 {
            if hints.max_aspect < width as f32 / height as f32 {
                width = (height as f32 * hints.max_aspect + 0.5) as i32;
            } else if hints.min_aspect < height as f32 / width as f32 {
                height = (width as f32 * hints.min_aspect + 0.5) as i32;
            }
        }

        if base_is_min {
            width -= hints.base_width;
            height -= hints.base_height;
        }

        if hints.increment_width > 0 {
            width -= width % hints.increment_width;
        }
        if hints.increment_height > 0 {
            height -= height % hints.increment_height;
        }

        width = (width + hints.base_width).max(hints.min_width);
        height = (height + hints.base_height).max(hints.min_height);

        if hints.max_width > 0 {
            width = width.min(hints.max_width);
        }
        if hints.max_height > 0 {
            height = height.min(hints.max_height);
        }
    }

    let resolved = Rect::new(x, y, width, height);
    (resolved, resolved != bounds.current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    fn bounds(current: Rect) -> HintBounds {
        HintBounds {
            screen_width: 1920,
            screen_height: 1080,
            work_area: Rect::new(0, 20, 1920, 1060),
            current,
            border_width: 1,
            min_size: 20,
        }
    }

    fn terminal_hints() -> SizeHints {
        SizeHints {
            base_width: 4,
            base_height: 4,
            increment_width: 9,
            increment_height: 17,
            min_width: 13,
            min_height: 21,
            ..SizeHints::default()
        }
    }

    #[test]
    fn decodes_base_and_increments() {
        let mut raw = vec![0u32; 18];
        raw[offset::FLAGS] = flags::P_BASE_SIZE | flags::P_RESIZE_INC | flags::P_MAX_SIZE;
        raw[offset::BASE_WIDTH] = 4;
        raw[offset::BASE_HEIGHT] = 6;
        raw[offset::WIDTH_INC] = 9;
        raw[offset::HEIGHT_INC] = 17;
        raw[offset::MAX_WIDTH] = 800;
        raw[offset::MAX_HEIGHT] = 600;

        let hints = SizeHints::from_normal_hints(&raw);

        assert_eq!(hints.base_width, 4);
        assert_eq!(hints.min_width, 4, "base size doubles as the minimum");
        assert_eq!(hints.increment_height, 17);
        assert_eq!(hints.max_width, 800);
        assert!(!hints.is_fixed());
    }

    #[test]
    fn aspect_with_zero_denominator_is_unset() {
        let mut raw = vec![0u32; 18];
        raw[offset::FLAGS] = flags::P_ASPECT;
        raw[offset::MIN_ASPECT_Y] = 3;
        raw[offset::MAX_ASPECT_X] = 16;
        raw[offset::MAX_ASPECT_Y] = 9;

        let hints = SizeHints::from_normal_hints(&raw);

        assert_eq!(hints.min_aspect, 0.0);
        assert!((hints.max_aspect - 16.0 / 9.0).abs() < f32::EPSILON);
    }

    #[test]
    fn short_property_reads_as_zero() {
        let hints = SizeHints::from_normal_hints(&[flags::P_BASE_SIZE]);
        assert_eq!(hints, SizeHints::default());
    }

    #[test]
    fn equal_min_and_max_is_fixed() {
        let hints = SizeHints {
            min_width: 200,
            max_width: 200,
            min_height: 100,
            max_height: 100,
            ..SizeHints::default()
        };
        assert!(hints.is_fixed());
    }

    #[test_case(Rect::new(10, 30, 500, 400); "typical window")]
    #[test_case(Rect::new(0, 20, 1, 1); "tiny window")]
    #[test_case(Rect::new(5000, 5000, 300, 300); "beyond the work area")]
    #[test]
    fn applying_twice_is_a_fixed_point(candidate: Rect) {
        let hints = terminal_hints();
        let (first, _) = apply_size_hints(Some(&hints), candidate, &bounds(candidate), false);
        let (second, changed) = apply_size_hints(Some(&hints), first, &bounds(first), false);

        assert_eq!(first, second);
        assert!(!changed);
    }

    #[test]
    fn snaps_to_increments_above_base() {
        let current = Rect::new(0, 20, 100, 100);
        let (r, changed) = apply_size_hints(
            Some(&terminal_hints()),
            Rect::new(0, 20, 500, 400),
            &bounds(current),
            false,
        );

        assert!(changed);
        assert_eq!((r.width - 4) % 9, 0);
        assert_eq!((r.height - 4) % 17, 0);
        assert!(r.width <= 500 && r.height <= 400);
    }

    #[test]
    fn max_aspect_narrows_wide_requests() {
        let hints = SizeHints {
            min_aspect: 0.5,
            max_aspect: 1.0,
            ..SizeHints::default()
        };
        let current = Rect::new(0, 20, 100, 100);
        let (r, _) = apply_size_hints(Some(&hints), Rect::new(0, 20, 400, 200), &bounds(current), false);
        assert_eq!((r.width, r.height), (200, 200));
    }

    #[test]
    fn dimensions_never_drop_below_the_minimum_size() {
        let current = Rect::new(0, 20, 100, 100);
        let (r, _) = apply_size_hints(None, Rect::new(0, 20, -5, 3), &bounds(current), false);
        assert_eq!((r.width, r.height), (20, 20));
    }

    #[test]
    fn work_area_containment_sees_the_floored_size() {
        let current = Rect::new(0, 20, 100, 100);
        let (r, _) = apply_size_hints(None, Rect::new(-15, 100, 3, 3), &bounds(current), false);
        assert_eq!(r, Rect::new(-15, 100, 20, 20));
    }

    #[test]
    fn non_interactive_requests_are_pulled_back_into_the_work_area() {
        let current = Rect::new(0, 20, 100, 100);
        let (r, _) = apply_size_hints(None, Rect::new(1920, 1080, 100, 100), &bounds(current), false);
        assert_eq!((r.x, r.y), (1920 - 102, 1080 - 102));

        let (r, _) = apply_size_hints(None, Rect::new(-300, -300, 100, 100), &bounds(current), false);
        assert_eq!((r.x, r.y), (0, 20));
    }

    #[test]
    fn interactive_requests_only_need_to_stay_on_screen() {
        let current = Rect::new(0, 20, 100, 100);
        let (r, _) = apply_size_hints(None, Rect::new(1900, 0, 100, 100), &bounds(current), true);
        assert_eq!((r.x, r.y), (1900, 0));
    }

    #[test]
    fn unchanged_geometry_reports_no_change() {
        let current = Rect::new(10, 30, 300, 200);
        let (r, changed) = apply_size_hints(None, current, &bounds(current), false);
        assert_eq!(r, current);
        assert!(!changed);
    }
}
