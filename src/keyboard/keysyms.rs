#![allow(dead_code)]

pub type Keysym = u32;
pub const XK_ESCAPE: Keysym = 0xff1b;
pub const XK_RETURN: Keysym = 0xff0d;
pub const XK_SPACE: Keysym = 0x0020;
pub const XK_TAB: Keysym = 0xff09;
pub const XK_BACKSPACE: Keysym = 0xff08;
pub const XK_DELETE: Keysym = 0xffff;
pub const XK_F1: Keysym = 0xffbe;
pub const XK_F2: Keysym = 0xffbf;
pub const XK_F3: Keysym = 0xffc0;
pub const XK_F4: Keysym = 0xffc1;
pub const XK_F5: Keysym = 0xffc2;
pub const XK_F6: Keysym = 0xffc3;
pub const XK_F7: Keysym = 0xffc4;
pub const XK_F8: Keysym = 0xffc5;
pub const XK_F9: Keysym = 0xffc6;
pub const XK_F10: Keysym = 0xffc7;
pub const XK_F11: Keysym = 0xffc8;
pub const XK_F12: Keysym = 0xffc9;
pub const XK_A: Keysym = 0x0061;
pub const XK_B: Keysym = 0x0062;
pub const XK_C: Keysym = 0x0063;
pub const XK_D: Keysym = 0x0064;
pub const XK_E: Keysym = 0x0065;
pub const XK_F: Keysym = 0x0066;
pub const XK_G: Keysym = 0x0067;
pub const XK_H: Keysym = 0x0068;
pub const XK_I: Keysym = 0x0069;
pub const XK_J: Keysym = 0x006a;
pub const XK_K: Keysym = 0x006b;
pub const XK_L: Keysym = 0x006c;
pub const XK_M: Keysym = 0x006d;
pub const XK_N: Keysym = 0x006e;
pub const XK_O: Keysym = 0x006f;
pub const XK_P: Keysym = 0x0070;
pub const XK_Q: Keysym = 0x0071;
pub const XK_R: Keysym = 0x0072;
pub const XK_S: Keysym = 0x0073;
pub const XK_T: Keysym = 0x0074;
pub const XK_U: Keysym = 0x0075;
pub const XK_V: Keysym = 0x0076;
pub const XK_W: Keysym = 0x0077;
pub const XK_X: Keysym = 0x0078;
pub const XK_Y: Keysym = 0x0079;
pub const XK_Z: Keysym = 0x007a;
pub const XK_0: Keysym = 0x0030;
pub const XK_1: Keysym = 0x0031;
pub const XK_2: Keysym = 0x0032;
pub const XK_3: Keysym = 0x0033;
pub const XK_4: Keysym = 0x0034;
pub const XK_5: Keysym = 0x0035;
pub const XK_6: Keysym = 0x0036;
pub const XK_7: Keysym = 0x0037;
pub const XK_8: Keysym = 0x0038;
pub const XK_9: Keysym = 0x0039;
pub const XK_LEFT: Keysym = 0xff51;
pub const XK_UP: Keysym = 0xff52;
pub const XK_RIGHT: Keysym = 0xff53;
pub const XK_DOWN: Keysym = 0xff54;
pub const XK_HOME: Keysym = 0xff50;
pub const XK_END: Keysym = 0xff57;
pub const XK_PAGE_UP: Keysym = 0xff55;
pub const XK_PAGE_DOWN: Keysym = 0xff56;
pub const XK_INSERT: Keysym = 0xff63;
pub const XK_MINUS: Keysym = 0x002d;
pub const XK_EQUAL: Keysym = 0x003d;
pub const XK_LEFT_BRACKET: Keysym = 0x005b;
pub const XK_RIGHT_BRACKET: Keysym = 0x005d;
pub const XK_SEMICOLON: Keysym = 0x003b;
pub const XK_APOSTROPHE: Keysym = 0x0027;
pub const XK_GRAVE: Keysym = 0x0060;
pub const XK_BACKSLASH: Keysym = 0x005c;
pub const XK_COMMA: Keysym = 0x002c;
pub const XK_PERIOD: Keysym = 0x002e;
pub const XK_SLASH: Keysym = 0x002f;
pub const XK_PRINT: Keysym = 0xff61;
pub const XK_NUM_LOCK: Keysym = 0xff7f;
pub const XK_SUPER_L: Keysym = 0xffeb;
pub const XK_SUPER_R: Keysym = 0xffec;

pub const XF86_AUDIO_RAISE_VOLUME: Keysym = 0x1008ff13;
pub const XF86_AUDIO_LOWER_VOLUME: Keysym = 0x1008ff11;
pub const XF86_AUDIO_MUTE: Keysym = 0x1008ff12;
pub const XF86_MON_BRIGHTNESS_UP: Keysym = 0x1008ff02;
pub const XF86_MON_BRIGHTNESS_DOWN: Keysym = 0x1008ff03;

/// Names accepted in configuration files, besides single letters and digits.
const NAMED: &[(&str, Keysym)] = &[
    ("Return", XK_RETURN),
    ("Escape", XK_ESCAPE),
    ("space", XK_SPACE),
    ("Tab", XK_TAB),
    ("BackSpace", XK_BACKSPACE),
    ("Delete", XK_DELETE),
    ("Left", XK_LEFT),
    ("Right", XK_RIGHT),
    ("Up", XK_UP),
    ("Down", XK_DOWN),
    ("Home", XK_HOME),
    ("End", XK_END),
    ("Prior", XK_PAGE_UP),
    ("Next", XK_PAGE_DOWN),
    ("Insert", XK_INSERT),
    ("Print", XK_PRINT),
    ("Num_Lock", XK_NUM_LOCK),
    ("Super_L", XK_SUPER_L),
    ("Super_R", XK_SUPER_R),
    ("F1", XK_F1),
    ("F2", XK_F2),
    ("F3", XK_F3),
    ("F4", XK_F4),
    ("F5", XK_F5),
    ("F6", XK_F6),
    ("F7", XK_F7),
    ("F8", XK_F8),
    ("F9", XK_F9),
    ("F10", XK_F10),
    ("F11", XK_F11),
    ("F12", XK_F12),
    ("minus", XK_MINUS),
    ("equal", XK_EQUAL),
    ("bracketleft", XK_LEFT_BRACKET),
    ("bracketright", XK_RIGHT_BRACKET),
    ("semicolon", XK_SEMICOLON),
    ("apostrophe", XK_APOSTROPHE),
    ("grave", XK_GRAVE),
    ("backslash", XK_BACKSLASH),
    ("comma", XK_COMMA),
    ("period", XK_PERIOD),
    ("slash", XK_SLASH),
    ("XF86AudioRaiseVolume", XF86_AUDIO_RAISE_VOLUME),
    ("XF86AudioLowerVolume", XF86_AUDIO_LOWER_VOLUME),
    ("XF86AudioMute", XF86_AUDIO_MUTE),
    ("XF86MonBrightnessUp", XF86_MON_BRIGHTNESS_UP),
    ("XF86MonBrightnessDown", XF86_MON_BRIGHTNESS_DOWN),
];

/// Resolve an X keysym name as written in `config.ron`.
pub fn keysym_from_name(name: &str) -> Option<Keysym> {
    if let Some(&(_, keysym)) = NAMED.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
        return Some(keysym);
    }

    match name.as_bytes() {
        [c @ b'a'..=b'z'] | [c @ b'0'..=b'9'] => Some(*c as Keysym),
        [c @ b'A'..=b'Z'] => Some(c.to_ascii_lowercase() as Keysym),
        _ => None,
    }
}

pub fn format_keysym(keysym: Keysym) -> String {
    if let Some((name, _)) = NAMED.iter().find(|(_, k)| *k == keysym) {
        return name.to_string();
    }

    match keysym {
        XK_A..=XK_Z | XK_0..=XK_9 => (keysym as u8 as char).to_string(),
        _ => format!("0x{:x}", keysym),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    #[test_case("Return", Some(XK_RETURN); "named")]
    #[test_case("super_l", Some(XK_SUPER_L); "case insensitive name")]
    #[test_case("Q", Some(XK_Q); "upper case letter")]
    #[test_case("7", Some(XK_7); "digit")]
    #[test_case("Hyper_Q", None; "unknown")]
    #[test]
    fn keysym_names(name: &str, expected: Option<Keysym>) {
        assert_eq!(keysym_from_name(name), expected);
    }

    #[test]
    fn unnamed_keysyms_format_as_hex() {
        assert_eq!(format_keysym(XK_F4), "F4");
        assert_eq!(format_keysym(XK_T), "t");
        assert_eq!(format_keysym(0xfe03), "0xfe03");
    }
}
