//! Reduction of raw protocol events and property payloads to the types the
//! window manager works with.

use super::atoms::Atoms;
use crate::display::{ClassHint, ClientRequest, ConfigureRequest, Property, WmEvent};
use crate::keyboard::KeyboardMapping;
use x11rb::protocol::Event;
use x11rb::protocol::xproto::{self, Atom, AtomEnum, Keycode, Mapping, NotifyDetail, NotifyMode};

/// Bit set in the response type of events sent with `SendEvent`.
const SYNTHETIC: u8 = 0x80;

pub fn event(event: Event, atoms: &Atoms, keyboard: &KeyboardMapping) -> WmEvent {
    match event {
        Event::ButtonPress(e) => WmEvent::ButtonPress {
            window: e.event,
            root_x: e.root_x.into(),
            root_y: e.root_y.into(),
            event_x: e.event_x.into(),
            button: e.detail,
            state: e.state.into(),
        },
        Event::ButtonRelease(e) => WmEvent::ButtonRelease {
            root_x: e.root_x.into(),
            root_y: e.root_y.into(),
        },
        Event::ClientMessage(e) => WmEvent::ClientMessage {
            window: e.window,
            request: client_request(atoms, e.type_, e.format, e.data.as_data32()),
        },
        Event::ConfigureNotify(e) => WmEvent::ConfigureNotify {
            window: e.window,
            width: e.width.into(),
            height: e.height.into(),
        },
        Event::ConfigureRequest(e) => WmEvent::ConfigureRequest(ConfigureRequest {
            window: e.window,
            x: e.x.into(),
            y: e.y.into(),
            width: e.width.into(),
            height: e.height.into(),
            border_width: e.border_width.into(),
            sibling: e.sibling,
            stack_mode: e.stack_mode,
            value_mask: e.value_mask,
        }),
        Event::DestroyNotify(e) => WmEvent::DestroyNotify { window: e.window },
        Event::EnterNotify(e) => WmEvent::EnterNotify {
            window: e.event,
            normal_mode: e.mode == NotifyMode::NORMAL,
            inferior_detail: e.detail == NotifyDetail::INFERIOR,
        },
        Event::Expose(e) => WmEvent::Expose {
            window: e.window,
            count: e.count,
        },
        Event::FocusIn(e) => WmEvent::FocusIn { window: e.event },
        Event::KeyPress(e) => WmEvent::KeyPress {
            keysym: keyboard.keycode_to_keysym(e.detail),
            state: e.state.into(),
        },
        Event::MappingNotify(e) => WmEvent::MappingNotify {
            keyboard: e.request == Mapping::KEYBOARD,
        },
        Event::MapRequest(e) => WmEvent::MapRequest { window: e.window },
        Event::MotionNotify(e) => WmEvent::MotionNotify {
            window: e.event,
            root_x: e.root_x.into(),
            root_y: e.root_y.into(),
            time: e.time,
        },
        Event::PropertyNotify(e) => WmEvent::PropertyNotify {
            window: e.window,
            property: property(atoms, e.atom),
            deleted: e.state == xproto::Property::DELETE,
        },
        Event::UnmapNotify(e) => WmEvent::UnmapNotify {
            window: e.window,
            synthetic: e.response_type & SYNTHETIC != 0,
        },
        Event::Error(e) => WmEvent::Error {
            error_code: e.error_code,
            request_code: e.major_opcode,
        },
        _ => WmEvent::Ignored,
    }
}

pub fn property(atoms: &Atoms, atom: Atom) -> Property {
    match atom {
        a if a == u32::from(AtomEnum::WM_NAME) => Property::WmName,
        a if a == u32::from(AtomEnum::WM_NORMAL_HINTS) => Property::WmNormalHints,
        a if a == u32::from(AtomEnum::WM_HINTS) => Property::WmHints,
        a if a == u32::from(AtomEnum::WM_TRANSIENT_FOR) => Property::WmTransientFor,
        a if a == atoms._NET_WM_NAME => Property::NetWmName,
        a if a == atoms._NET_WM_ICON => Property::NetWmIcon,
        a if a == atoms._NET_WM_WINDOW_TYPE => Property::NetWmWindowType,
        _ => Property::Other,
    }
}

pub fn client_request(atoms: &Atoms, message_type: Atom, format: u8, data: [u32; 5]) -> ClientRequest {
    if format != 32 {
        return ClientRequest::Other;
    }
    if message_type == atoms._NET_WM_STATE {
        let fullscreen = atoms._NET_WM_STATE_FULLSCREEN;
        if data[1] == fullscreen || data[2] == fullscreen {
            return ClientRequest::Fullscreen { action: data[0] };
        }
        return ClientRequest::Other;
    }
    if message_type == atoms._NET_ACTIVE_WINDOW {
        return ClientRequest::Activate;
    }
    ClientRequest::Other
}

/// `WM_CLASS` holds the instance and the class as two NUL-terminated
/// strings.
pub fn class_hint(raw: &[u8]) -> ClassHint {
    let mut parts = raw.split(|&b| b == 0);
    let instance = parts.next().unwrap_or_default();
    let class = parts.next().unwrap_or_default();
    ClassHint {
        class: String::from_utf8_lossy(class).into_owned(),
        instance: String::from_utf8_lossy(instance).into_owned(),
    }
}

/// Text properties up to the first NUL, `None` when empty.
pub fn text(raw: &[u8]) -> Option<String> {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let text = String::from_utf8_lossy(&raw[..end]);
    (!text.is_empty()).then(|| text.into_owned())
}

/// The modifier bit whose keycodes include one of `numlock_keycodes`.
pub fn numlock_mask(modifier_keycodes: &[Keycode], per_modifier: usize, numlock_keycodes: &[Keycode]) -> u16 {
    if per_modifier == 0 {
        return 0;
    }
    modifier_keycodes
        .chunks(per_modifier)
        .take(8)
        .enumerate()
        .find(|(_, keycodes)| {
            keycodes
                .iter()
                .any(|k| *k != 0 && numlock_keycodes.contains(k))
        })
        .map(|(bit, _)| 1 << bit)
        .unwrap_or(0)
}

/// `_NET_WM_WINDOW_OPACITY` value, `None` when the property should be
/// removed.
pub fn opacity(opacity: Option<f32>) -> Option<u32> {
    opacity
        .filter(|o| (0.0..=1.0).contains(o))
        .map(|o| (f64::from(o) * f64::from(u32::MAX)) as u32)
}

#[cfg(test)]
pub(crate) fn test_atoms() -> Atoms {
    Atoms {
        UTF8_STRING: 100,
        WM_PROTOCOLS: 101,
        WM_DELETE_WINDOW: 102,
        WM_STATE: 103,
        WM_TAKE_FOCUS: 104,
        _NET_ACTIVE_WINDOW: 105,
        _NET_SUPPORTED: 106,
        _NET_WM_NAME: 107,
        _NET_WM_STATE: 108,
        _NET_SUPPORTING_WM_CHECK: 109,
        _NET_WM_STATE_FULLSCREEN: 110,
        _NET_WM_WINDOW_TYPE: 111,
        _NET_WM_WINDOW_TYPE_DIALOG: 112,
        _NET_WM_ICON: 113,
        _NET_WM_WINDOW_OPACITY: 114,
        _NET_CLIENT_LIST: 115,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    #[test_case([1, 110, 0, 0, 0], ClientRequest::Fullscreen { action: 1 }; "first property")]
    #[test_case([2, 0, 110, 0, 0], ClientRequest::Fullscreen { action: 2 }; "second property")]
    #[test_case([1, 42, 43, 0, 0], ClientRequest::Other; "other state")]
    #[test]
    fn wm_state_messages(data: [u32; 5], expected: ClientRequest) {
        let atoms = test_atoms();
        assert_eq!(client_request(&atoms, atoms._NET_WM_STATE, 32, data), expected);
    }

    #[test]
    fn activation_messages() {
        let atoms = test_atoms();
        assert_eq!(
            client_request(&atoms, atoms._NET_ACTIVE_WINDOW, 32, [0; 5]),
            ClientRequest::Activate
        );
        assert_eq!(
            client_request(&atoms, atoms._NET_ACTIVE_WINDOW, 8, [0; 5]),
            ClientRequest::Other
        );
    }

    #[test_case(u32::from(AtomEnum::WM_NAME), Property::WmName; "wm name")]
    #[test_case(u32::from(AtomEnum::WM_HINTS), Property::WmHints; "wm hints")]
    #[test_case(107, Property::NetWmName; "net wm name")]
    #[test_case(111, Property::NetWmWindowType; "window type")]
    #[test_case(999, Property::Other; "other")]
    #[test]
    fn tracked_properties(atom: Atom, expected: Property) {
        assert_eq!(property(&test_atoms(), atom), expected);
    }

    #[test]
    fn class_hint_splits_instance_and_class() {
        let hint = class_hint(b"navigator\0Firefox\0");
        assert_eq!(hint.instance, "navigator");
        assert_eq!(hint.class, "Firefox");
    }

    #[test]
    fn class_hint_without_class() {
        let hint = class_hint(b"xterm");
        assert_eq!(hint.instance, "xterm");
        assert_eq!(hint.class, "");
    }

    #[test_case(b"hello\0junk", Some("hello"); "stops at nul")]
    #[test_case(b"", None; "empty")]
    #[test_case(b"\0", None; "only nul")]
    #[test]
    fn text_properties(raw: &[u8], expected: Option<&str>) {
        assert_eq!(text(raw).as_deref(), expected);
    }

    #[test]
    fn numlock_is_found_in_mod2() {
        // shift, lock, control, mod1, mod2 with two keycodes each
        let map = [50, 62, 66, 0, 37, 105, 64, 108, 77, 0];
        assert_eq!(numlock_mask(&map, 2, &[77]), 1 << 4);
        assert_eq!(numlock_mask(&map, 2, &[200]), 0);
    }

    #[test_case(None, None; "unset")]
    #[test_case(Some(1.5), None; "out of range")]
    #[test_case(Some(1.0), Some(u32::MAX); "opaque")]
    #[test_case(Some(0.0), Some(0); "transparent")]
    #[test]
    fn opacity_values(input: Option<f32>, expected: Option<u32>) {
        assert_eq!(opacity(input), expected);
    }
}
