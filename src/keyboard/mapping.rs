use super::keysyms::Keysym;
use x11rb::protocol::xproto::Keycode;

/// Snapshot of the server's keycode to keysym table. Only the first
/// column (unshifted group one) takes part in binding resolution.
#[derive(Debug, Clone, Default)]
pub struct KeyboardMapping {
    min_keycode: Keycode,
    keysyms_per_keycode: u8,
    keysyms: Vec<Keysym>,
}

impl KeyboardMapping {
    pub fn new(min_keycode: Keycode, keysyms_per_keycode: u8, keysyms: Vec<Keysym>) -> Self {
        Self {
            min_keycode,
            keysyms_per_keycode,
            keysyms,
        }
    }

    pub fn keycode_to_keysym(&self, keycode: Keycode) -> Keysym {
        if keycode < self.min_keycode || self.keysyms_per_keycode == 0 {
            return 0;
        }
        let index = (keycode - self.min_keycode) as usize * self.keysyms_per_keycode as usize;
        self.keysyms.get(index).copied().unwrap_or(0)
    }

    pub fn keycodes_for(&self, keysym: Keysym) -> Vec<Keycode> {
        if self.keysyms_per_keycode == 0 {
            return Vec::new();
        }
        self.keysyms
            .chunks(self.keysyms_per_keycode as usize)
            .enumerate()
            .filter(|(_, syms)| syms.first() == Some(&keysym))
            .filter_map(|(i, _)| Keycode::try_from(i + self.min_keycode as usize).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::keysyms::{XK_A, XK_NUM_LOCK, XK_RETURN};

    fn mapping() -> KeyboardMapping {
        // keycodes 8, 9, 10 with two columns each
        KeyboardMapping::new(8, 2, vec![XK_A, 0x41, XK_RETURN, 0, XK_NUM_LOCK, 0])
    }

    #[test]
    fn first_column_resolves_keycodes() {
        let m = mapping();
        assert_eq!(m.keycode_to_keysym(8), XK_A);
        assert_eq!(m.keycode_to_keysym(9), XK_RETURN);
        assert_eq!(m.keycode_to_keysym(7), 0);
        assert_eq!(m.keycode_to_keysym(200), 0);
    }

    #[test]
    fn reverse_lookup_ignores_shifted_columns() {
        let m = mapping();
        assert_eq!(m.keycodes_for(XK_NUM_LOCK), vec![10]);
        assert!(m.keycodes_for(0x41).is_empty());
    }
}
