use super::{DrawSurface, Scheme};
use crate::client::{Icon, TagMask};
use crate::keyboard::{Arg, ClickRegion};
use x11rb::protocol::xproto::Window;

/// Everything drawn on one monitor's bar, captured from window-manager
/// state before drawing.
#[derive(Debug, Clone)]
pub struct BarContent<'a> {
    pub tags: &'a [String],
    pub active_tags: TagMask,
    /// Tags of every client on the monitor, member order, paired with
    /// whether that client holds focus.
    pub occupancy: Vec<(TagMask, bool)>,
    pub layout_symbol: &'a str,
    /// Present on the selected monitor only.
    pub status: Option<&'a str>,
    pub titles: Vec<TitleEntry<'a>>,
    pub width: i32,
    pub height: i32,
    pub padding: i32,
}

#[derive(Debug, Clone)]
pub struct TitleEntry<'a> {
    pub window: Window,
    pub name: &'a str,
    pub icon: Option<&'a Icon>,
    pub selected: bool,
    pub always_on_top: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub x: i32,
    pub width: i32,
}

impl Span {
    fn contains(&self, x: i32) -> bool {
        x >= self.x && x < self.x + self.width
    }
}

/// Horizontal layout of the bar, shared by drawing and click resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarCells {
    pub tags: Vec<Span>,
    pub layout_symbol: Span,
    pub status: Option<Span>,
    pub titles: Vec<Span>,
    /// Whatever the titles leave over.
    pub filler: Span,
}

pub fn cells<S: DrawSurface>(surface: &S, content: &BarContent) -> BarCells {
    let padding = content.padding;
    let cell = |text: &str| (surface.text_width(text) + 2 * padding).max(content.height);

    let mut x = 0;
    let tags = content
        .tags
        .iter()
        .map(|tag| {
            let span = Span { x, width: cell(tag) };
            x += span.width;
            span
        })
        .collect();

    let layout_symbol = Span {
        x,
        width: cell(content.layout_symbol),
    };
    x += layout_symbol.width;

    let mut remaining = content.width - x;

    let status = content.status.filter(|_| remaining > 0).map(|text| {
        let width = (surface.text_width(text) + 2 * padding).min(remaining);
        remaining -= width;
        Span {
            x: content.width - width,
            width,
        }
    });

    let mut titles = Vec::new();
    let count = content.titles.len() as i32;
    if remaining > 0 && count > 0 {
        let each = remaining / count;
        for _ in 0..count {
            titles.push(Span { x, width: each });
            x += each;
        }
        remaining -= each * count;
    }

    BarCells {
        tags,
        layout_symbol,
        status,
        titles,
        filler: Span {
            x,
            width: remaining.max(0),
        },
    }
}

/// Map an x coordinate on the bar to the region and argument a button
/// binding receives.
pub fn resolve_click<S: DrawSurface>(
    surface: &S,
    content: &BarContent,
    x: i32,
) -> (ClickRegion, Option<Arg>) {
    let cells = cells(surface, content);

    if let Some(index) = cells.tags.iter().position(|span| x < span.x + span.width) {
        return (ClickRegion::TagBar, Some(Arg::Tags(1 << index)));
    }
    if cells.layout_symbol.contains(x) {
        return (ClickRegion::LayoutSymbol, None);
    }
    if cells.status.is_some_and(|span| span.contains(x)) {
        return (ClickRegion::StatusText, None);
    }
    if let Some(index) = cells.titles.iter().position(|span| span.contains(x)) {
        let window = content.titles[index].window;
        return (ClickRegion::WindowTitle, Some(Arg::Client(window)));
    }

    (ClickRegion::StatusText, None)
}

/// Render `content` onto the surface. The caller presents it afterwards.
pub fn draw<S: DrawSurface>(surface: &mut S, content: &BarContent) {
    let cells = cells(surface, content);
    let height = content.height;
    let padding = content.padding;

    for (index, (tag, span)) in content.tags.iter().zip(&cells.tags).enumerate() {
        let bit = 1 << index;
        surface.set_scheme(if content.active_tags & bit != 0 {
            Scheme::Selected
        } else {
            Scheme::Normal
        });

        let natural = surface.text_width(tag) + 2 * padding;
        let left_padding = if natural < height {
            (height - natural) / 2 + padding
        } else {
            padding
        };
        surface.text(span.x, 0, span.width, height, left_padding, tag, false);

        let occupants = content.occupancy.iter().filter(|(tags, _)| tags & bit != 0);
        for (slot, (_, focused)) in occupants.enumerate() {
            surface.rect(span.x + 1 + slot as i32 * 4, height - 4, 3, 3, *focused, false);
        }
    }

    surface.set_scheme(Scheme::Normal);
    let symbol = cells.layout_symbol;
    let symbol_width = surface.text_width(content.layout_symbol);
    surface.text(
        symbol.x,
        0,
        symbol.width,
        height,
        (symbol.width - symbol_width) / 2,
        content.layout_symbol,
        false,
    );

    if let (Some(text), Some(span)) = (content.status, cells.status) {
        surface.text(span.x, 0, span.width, height, padding, text, false);
    }

    for (entry, span) in content.titles.iter().zip(&cells.titles) {
        surface.set_scheme(if entry.selected {
            Scheme::Selected
        } else {
            Scheme::Normal
        });
        draw_title(surface, entry, *span, height, padding);
    }

    surface.set_scheme(Scheme::Normal);
    surface.rect(cells.filler.x, 0, cells.filler.width, height, true, true);
}

fn draw_title<S: DrawSurface>(
    surface: &mut S,
    entry: &TitleEntry,
    span: Span,
    height: i32,
    padding: i32,
) {
    let Span { x, width } = span;

    let icon = entry
        .icon
        .filter(|icon| (icon.width as f32) <= width as f32 * 1.2);
    let icon_width = icon.map_or(0, |icon| icon.width as i32);

    let text_width = if entry.name.is_empty() {
        0
    } else {
        surface
            .text_width(entry.name)
            .min(width - icon_width - 2 * padding)
            .max(0)
    };

    match icon {
        Some(icon) if text_width > 0 => {
            let icon_y = (height - icon.height as i32) / 2;
            if text_width < width - 2 * icon_width - 4 * padding {
                surface.text(x, 0, width, height, (width - text_width) / 2, entry.name, false);
                surface.picture(x + padding, icon_y, icon);
            } else {
                let icon_cell = icon_width + 2 * padding;
                surface.rect(x, 0, icon_cell, height, true, true);
                surface.picture(x + padding, icon_y, icon);
                surface.text(x + icon_cell, 0, width - icon_cell, height, 0, entry.name, false);
            }
        }
        Some(icon) => {
            let icon_y = (height - icon.height as i32) / 2;
            surface.rect(x, 0, width, height, true, true);
            if icon_width > width {
                surface.picture(x, icon_y, icon);
            } else {
                surface.picture(x + (width - icon_width) / 2, icon_y, icon);
            }
        }
        None if text_width > 0 => {
            surface.text(x, 0, width, height, (width - text_width) / 2, entry.name, false);
        }
        None => surface.rect(x, 0, width, height, true, true),
    }

    if entry.always_on_top {
        surface.rect(x + 1, 1, 4, 4, false, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bar::mock::{DrawCall, MockSurface};
    use simple_test_case::test_case;

    fn tags() -> Vec<String> {
        ["1", "2", "3"].iter().map(|s| s.to_string()).collect()
    }

    // Glyphs are 8px wide, padding 8 and bar height 24: every tag cell is
    // 24px, the symbol "[]=" is 40px and ends at 112.
    fn content<'a>(tags: &'a [String], titles: Vec<TitleEntry<'a>>) -> BarContent<'a> {
        BarContent {
            tags,
            active_tags: 0b001,
            occupancy: vec![(0b001, true), (0b011, false)],
            layout_symbol: "[]=",
            status: Some("status"),
            titles,
            width: 500,
            height: 24,
            padding: 8,
        }
    }

    fn title(window: Window, name: &str) -> TitleEntry<'_> {
        TitleEntry {
            window,
            name,
            icon: None,
            selected: false,
            always_on_top: false,
        }
    }

    #[test]
    fn cells_share_the_width() {
        let tags = tags();
        let c = content(&tags, vec![title(10, "a"), title(11, "b")]);
        let cells = cells(&MockSurface::default(), &c);

        assert_eq!(cells.tags.len(), 3);
        assert!(cells.tags.iter().all(|s| s.width == 24));
        assert_eq!(cells.layout_symbol, Span { x: 72, width: 40 });
        // "status" is 48px plus padding
        assert_eq!(cells.status, Some(Span { x: 436, width: 64 }));
        // 324px left for two titles
        assert_eq!(
            cells.titles,
            vec![Span { x: 112, width: 162 }, Span { x: 274, width: 162 }]
        );
        assert_eq!(cells.filler, Span { x: 436, width: 0 });
    }

    #[test_case(0, ClickRegion::TagBar, Some(Arg::Tags(1)); "first tag")]
    #[test_case(50, ClickRegion::TagBar, Some(Arg::Tags(4)); "third tag")]
    #[test_case(80, ClickRegion::LayoutSymbol, None; "layout symbol")]
    #[test_case(120, ClickRegion::WindowTitle, Some(Arg::Client(10)); "first title")]
    #[test_case(300, ClickRegion::WindowTitle, Some(Arg::Client(11)); "second title")]
    #[test_case(450, ClickRegion::StatusText, None; "status text")]
    #[test]
    fn click_regions(x: i32, region: ClickRegion, arg: Option<Arg>) {
        let tags = tags();
        let c = content(&tags, vec![title(10, "a"), title(11, "b")]);

        assert_eq!(resolve_click(&MockSurface::default(), &c, x), (region, arg));
    }

    #[test]
    fn clicks_without_titles_fall_through_to_status() {
        let tags = tags();
        let mut c = content(&tags, vec![]);
        c.status = None;

        assert_eq!(
            resolve_click(&MockSurface::default(), &c, 300),
            (ClickRegion::StatusText, None)
        );
    }

    #[test]
    fn occupancy_squares_are_filled_for_the_focused_client() {
        let tags = tags();
        let c = content(&tags, vec![]);
        let mut surface = MockSurface::default();
        draw(&mut surface, &c);

        let squares: Vec<_> = surface
            .calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Rect { x, y: 20, width: 3, filled, .. } => Some((*x, *filled)),
                _ => None,
            })
            .collect();

        // tag 1 holds both clients, tag 2 only the unfocused one
        assert_eq!(squares, vec![(1, true), (5, false), (25, false)]);
    }

    #[test]
    fn selected_title_uses_the_selected_scheme() {
        let tags = tags();
        let mut entry = title(10, "editor");
        entry.selected = true;
        let c = content(&tags, vec![entry]);
        let mut surface = MockSurface::default();
        draw(&mut surface, &c);

        let title_call = surface
            .calls
            .iter()
            .position(|call| matches!(call, DrawCall::Text { text, .. } if text == "editor"))
            .expect("title drawn");

        let scheme_before = surface.calls[..title_call]
            .iter()
            .rev()
            .find_map(|call| match call {
                DrawCall::Scheme(s) => Some(*s),
                _ => None,
            });
        assert_eq!(scheme_before, Some(Scheme::Selected));
    }
}
