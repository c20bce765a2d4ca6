//! Selection and scaling of `_NET_WM_ICON` images for the bar.

/// Icon entries at or above this size are treated as corrupt.
const MAX_DIMENSION: u32 = 16384;

/// A scaled icon with premultiplied ARGB pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Icon {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl Icon {
    /// Pick the best entry of a `_NET_WM_ICON` property for a target edge of
    /// `size` pixels and scale it so that its longer edge equals `size`.
    ///
    /// The smallest entry whose longer edge reaches `size` wins; failing
    /// that the largest smaller one.
    pub fn from_net_wm_icon(data: &[u32], size: u32) -> Option<Icon> {
        if size == 0 {
            return None;
        }

        let entries = entries(data)?;

        let best = entries
            .iter()
            .filter(|e| e.longest() >= size)
            .min_by_key(|e| e.longest() - size)
            .or_else(|| entries.iter().max_by_key(|e| e.longest()))?;

        if best.width == 0 || best.height == 0 {
            return None;
        }

        let (width, height) = if best.width <= best.height {
            (((best.width * size) / best.height).max(1), size)
        } else {
            (size, ((best.height * size) / best.width).max(1))
        };

        let mut pixels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            let source_y = y * best.height / height;
            for x in 0..width {
                let source_x = x * best.width / width;
                let pixel = best.pixels[(source_y * best.width + source_x) as usize];
                pixels.push(premultiply(pixel));
            }
        }

        Some(Icon {
            width,
            height,
            pixels,
        })
    }
}

struct Entry<'a> {
    width: u32,
    height: u32,
    pixels: &'a [u32],
}

impl Entry<'_> {
    fn longest(&self) -> u32 {
        self.width.max(self.height)
    }
}

/// Split the property into `(width, height, pixels)` entries, stopping at a
/// truncated entry. Any oversized entry invalidates the whole property.
fn entries(data: &[u32]) -> Option<Vec<Entry<'_>>> {
    let mut found = Vec::new();
    let mut rest = data;

    while let [width, height, tail @ ..] = rest {
        let (width, height) = (*width, *height);
        if width >= MAX_DIMENSION || height >= MAX_DIMENSION {
            return None;
        }

        let len = (width * height) as usize;
        if len > tail.len() {
            break;
        }

        found.push(Entry {
            width,
            height,
            pixels: &tail[..len],
        });
        rest = &tail[len..];
    }

    Some(found)
}

fn premultiply(pixel: u32) -> u32 {
    let alpha = pixel >> 24;
    let scale = |shift: u32| (((pixel >> shift) & 0xff) * alpha / 255) << shift;
    (alpha << 24) | scale(16) | scale(8) | scale(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(width: u32, height: u32, pixel: u32) -> Vec<u32> {
        let mut v = vec![width, height];
        v.extend(std::iter::repeat_n(pixel, (width * height) as usize));
        v
    }

    #[test]
    fn prefers_the_smallest_entry_at_least_as_large_as_the_target() {
        let mut data = entry(16, 16, 0xff00_0001);
        data.extend(entry(32, 32, 0xff00_0002));
        data.extend(entry(64, 64, 0xff00_0003));

        let icon = Icon::from_net_wm_icon(&data, 22).unwrap();

        assert_eq!((icon.width, icon.height), (22, 22));
        assert!(icon.pixels.iter().all(|&p| p == 0xff00_0002));
    }

    #[test]
    fn falls_back_to_the_largest_smaller_entry() {
        let mut data = entry(8, 8, 0xff00_0001);
        data.extend(entry(16, 16, 0xff00_0002));

        let icon = Icon::from_net_wm_icon(&data, 22).unwrap();

        assert!(icon.pixels.iter().all(|&p| p == 0xff00_0002));
    }

    #[test]
    fn scaling_keeps_the_aspect_ratio() {
        let icon = Icon::from_net_wm_icon(&entry(32, 16, 0xffff_ffff), 20).unwrap();
        assert_eq!((icon.width, icon.height), (20, 10));
    }

    #[test]
    fn oversized_entries_reject_the_property() {
        let data = vec![MAX_DIMENSION, 1, 0];
        assert_eq!(Icon::from_net_wm_icon(&data, 22), None);
    }

    #[test]
    fn truncated_entries_are_ignored() {
        let mut data = entry(4, 4, 0xff00_0001);
        data.extend([64, 64, 0, 0]);

        let icon = Icon::from_net_wm_icon(&data, 4).unwrap();
        assert_eq!((icon.width, icon.height), (4, 4));
    }

    #[test]
    fn channels_are_premultiplied_by_alpha() {
        assert_eq!(premultiply(0x80ff_ff00), 0x8080_8000);
        assert_eq!(premultiply(0x00ff_ffff), 0);
        assert_eq!(premultiply(0xff12_3456), 0xff12_3456);
    }
}
