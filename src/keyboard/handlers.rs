use super::keysyms::Keysym;
use crate::client::{Position, TagMask};
use crate::layout::LayoutType;
use serde::Deserialize;
use x11rb::protocol::xproto::{KeyButMask, ModMask, Window};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Spawn,
    KillClient,
    Quit,
    FocusClient,
    FocusMonitor,
    FocusStack,
    IncLayout,
    IncNumMaster,
    MoveMouse,
    ResizeMouse,
    SetGapWindow,
    SetGapBar,
    SetGapEdge,
    SetLayout,
    SetMasterFactor,
    SetPosition,
    SendMonitor,
    Tag,
    ToggleBar,
    ToggleFloating,
    ToggleAlwaysOnTop,
    ToggleTag,
    ToggleView,
    View,
    WinView,
    Zoom,
    StartAltTab,
    AltTab,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    None,
    Int(i32),
    Float(f32),
    Str(String),
    Array(Vec<String>),
    Tags(TagMask),
    Layout(LayoutType),
    Position { position: Position, forced: bool },
    Client(Window),
}

impl Arg {
    pub const fn none() -> Self {
        Arg::None
    }

    pub fn int(&self) -> i32 {
        match self {
            Arg::Int(i) => *i,
            _ => 0,
        }
    }
}

/// Where on screen a pointer button was pressed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub enum ClickRegion {
    TagBar,
    LayoutSymbol,
    StatusText,
    WindowTitle,
    ClientWindow,
    RootWindow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyBinding {
    pub modifiers: u16,
    pub keysym: Keysym,
    pub action: KeyAction,
    pub arg: Arg,
}

impl KeyBinding {
    pub fn new(modifiers: &[KeyButMask], keysym: Keysym, action: KeyAction, arg: Arg) -> Self {
        Self {
            modifiers: modifiers_to_mask(modifiers),
            keysym,
            action,
            arg,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonBinding {
    pub click: ClickRegion,
    pub modifiers: u16,
    pub button: u8,
    pub action: KeyAction,
    pub arg: Arg,
}

impl ButtonBinding {
    pub fn new(
        click: ClickRegion,
        modifiers: &[KeyButMask],
        button: u8,
        action: KeyAction,
        arg: Arg,
    ) -> Self {
        Self {
            click,
            modifiers: modifiers_to_mask(modifiers),
            button,
            action,
            arg,
        }
    }
}

pub fn modifiers_to_mask(modifiers: &[KeyButMask]) -> u16 {
    modifiers
        .iter()
        .fold(0u16, |acc, &modifier| acc | u16::from(modifier))
}

/// Strip the lock modifiers and the button state bits from an event state
/// so that bindings fire regardless of CapsLock or NumLock.
pub fn clean_mask(state: u16, numlock_mask: u16) -> u16 {
    let significant = u16::from(
        ModMask::SHIFT | ModMask::CONTROL | ModMask::M1 | ModMask::M2 | ModMask::M3 | ModMask::M4 | ModMask::M5,
    );
    state & !(numlock_mask | u16::from(ModMask::LOCK)) & significant
}

/// Modifier combinations a binding must be grabbed with so that it also
/// fires under CapsLock and NumLock.
pub fn lock_variants(numlock_mask: u16) -> [u16; 4] {
    let lock = u16::from(ModMask::LOCK);
    [0, lock, numlock_mask, numlock_mask | lock]
}

/// Actions of every key binding matching the pressed keysym and state.
pub fn matching_keys(
    bindings: &[KeyBinding],
    keysym: Keysym,
    state: u16,
    numlock_mask: u16,
) -> Vec<(KeyAction, Arg)> {
    let state = clean_mask(state, numlock_mask);
    bindings
        .iter()
        .filter(|b| b.keysym == keysym && clean_mask(b.modifiers, numlock_mask) == state)
        .map(|b| (b.action, b.arg.clone()))
        .collect()
}

/// Actions of every button binding matching the click region, button and
/// state. A click argument, when present, fills in bindings without one.
pub fn matching_buttons(
    bindings: &[ButtonBinding],
    click: ClickRegion,
    button: u8,
    state: u16,
    numlock_mask: u16,
    click_arg: Option<&Arg>,
) -> Vec<(KeyAction, Arg)> {
    let state = clean_mask(state, numlock_mask);
    bindings
        .iter()
        .filter(|b| {
            b.click == click
                && b.button == button
                && clean_mask(b.modifiers, numlock_mask) == state
        })
        .map(|b| match (click_arg, &b.arg) {
            (Some(arg), Arg::None) => (b.action, arg.clone()),
            _ => (b.action, b.arg.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::keysyms::{XK_J, XK_RETURN};

    const MOD4: u16 = 1 << 6;
    const NUMLOCK: u16 = 1 << 4;
    const LOCK: u16 = 1 << 1;
    const BUTTON1_HELD: u16 = 1 << 8;

    fn keys() -> Vec<KeyBinding> {
        vec![
            KeyBinding::new(&[KeyButMask::MOD4], XK_J, KeyAction::FocusStack, Arg::Int(1)),
            KeyBinding::new(
                &[KeyButMask::MOD4, KeyButMask::SHIFT],
                XK_J,
                KeyAction::FocusStack,
                Arg::Int(-1),
            ),
            KeyBinding::new(&[KeyButMask::MOD4], XK_RETURN, KeyAction::Zoom, Arg::None),
        ]
    }

    #[test]
    fn lock_masks_are_stripped_before_matching() {
        let hits = matching_keys(&keys(), XK_J, MOD4 | NUMLOCK | LOCK, NUMLOCK);
        assert_eq!(hits, vec![(KeyAction::FocusStack, Arg::Int(1))]);
    }

    #[test]
    fn extra_modifiers_do_not_match() {
        let hits = matching_keys(&keys(), XK_RETURN, MOD4 | u16::from(ModMask::CONTROL), 0);
        assert!(hits.is_empty());
    }

    #[test]
    fn click_argument_fills_in_an_empty_binding_argument() {
        let buttons = vec![
            ButtonBinding::new(ClickRegion::TagBar, &[], 1, KeyAction::View, Arg::None),
            ButtonBinding::new(ClickRegion::TagBar, &[KeyButMask::MOD4], 1, KeyAction::Tag, Arg::None),
        ];

        let hits = matching_buttons(
            &buttons,
            ClickRegion::TagBar,
            1,
            BUTTON1_HELD,
            0,
            Some(&Arg::Tags(1 << 2)),
        );

        assert_eq!(hits, vec![(KeyAction::View, Arg::Tags(1 << 2))]);
    }

    #[test]
    fn each_lock_combination_is_grabbed() {
        assert_eq!(lock_variants(NUMLOCK), [0, LOCK, NUMLOCK, NUMLOCK | LOCK]);
    }
}
