pub mod bar;
pub mod client;
pub mod config;
pub mod display;
pub mod errors;
pub mod geometry;
pub mod keyboard;
pub mod layout;
pub mod monitor;
pub mod size_hints;
pub mod spawn;
pub mod window_manager;
pub mod xserver;

pub mod prelude {
    pub use crate::ColorScheme;
    pub use crate::bar::BarPosition;
    pub use crate::client::{Position, Rule};
    pub use crate::keyboard::{Arg, ButtonBinding, ClickRegion, KeyAction, KeyBinding, keysyms};
    pub use crate::layout::LayoutType;
    pub use x11rb::protocol::xproto::KeyButMask;
}

use crate::bar::BarPosition;
use crate::client::{Position, Rule, TagMask};
use crate::keyboard::{Arg, ButtonBinding, ClickRegion, KeyAction, KeyBinding};
use crate::layout::LayoutType;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorScheme {
    pub foreground: u32,
    pub background: u32,
    pub border: u32,
}

#[derive(Clone, Debug)]
pub struct Config {
    // Appearance
    pub border_width: i32,
    pub font: String,
    pub scheme_normal: ColorScheme,
    pub scheme_selected: ColorScheme,
    /// `_NET_WM_WINDOW_OPACITY` for focused windows and the selected bar.
    pub opacity_focus: Option<f32>,
    pub opacity_unfocus: Option<f32>,
    /// Overrides both of the above while a client is fullscreen.
    pub opacity_fullscreen: Option<f32>,

    // Gaps
    pub gap_window: i32,
    pub gap_bar: i32,
    pub gap_edge: i32,
    pub snap: i32,

    // Bar
    pub show_bar: bool,
    pub bar_position: BarPosition,

    // Layout
    pub master_factor: f32,
    pub num_master: i32,
    pub resize_hints: bool,
    pub layouts: Vec<LayoutType>,

    // Focus
    pub focus_on_hover: bool,
    pub focus_monitor_on_hover: bool,
    pub focus_on_wheel: bool,
    pub focus_monitor_on_wheel: bool,
    pub resize_mouse_warp: bool,

    // Tags and rules
    pub tags: Vec<String>,
    pub rules: Vec<Rule>,
    /// Window classes whose size hints are never honoured, matched exactly.
    pub ignore_hints_exact: Vec<String>,
    /// As above, matched as substrings of the class.
    pub ignore_hints_contains: Vec<String>,

    // Basics
    pub terminal: String,
    pub modkey: x11rb::protocol::xproto::KeyButMask,
    pub autostart: Vec<Vec<String>>,

    // Bindings
    pub keybindings: Vec<KeyBinding>,
    pub buttons: Vec<ButtonBinding>,
}

impl Config {
    /// Bits of every configured tag.
    pub fn tag_mask(&self) -> TagMask {
        match self.tags.len() {
            0 => 1,
            n if n >= TagMask::BITS as usize => TagMask::MAX,
            n => (1 << n) - 1,
        }
    }
}

fn argv(parts: &[&str]) -> Arg {
    Arg::Array(parts.iter().map(|s| s.to_string()).collect())
}

impl Default for Config {
    fn default() -> Self {
        use crate::keyboard::keysyms::*;
        use x11rb::protocol::xproto::KeyButMask;

        const MODKEY: KeyButMask = KeyButMask::MOD4;
        const SHIFT: KeyButMask = KeyButMask::SHIFT;
        const CONTROL: KeyButMask = KeyButMask::CONTROL;

        const TERMINAL: &str = "kitty";
        const FONT: &str = "monospace:size=10";

        let scheme_normal = ColorScheme {
            foreground: 0xffffff,
            background: 0x000000,
            border: 0x000000,
        };
        let scheme_selected = ColorScheme {
            foreground: 0x000000,
            background: 0xffddff,
            border: 0xffddff,
        };

        let launcher = argv(&[
            "dmenu_run", "-m", "{monitor}", "-i", "-fn", FONT, "-nb", "#000000", "-nf",
            "#ffffff", "-sb", "#ffddff", "-sf", "#000000",
        ]);

        let mut keybindings = vec![
            KeyBinding::new(&[MODKEY], XK_T, KeyAction::Spawn, Arg::Str(TERMINAL.to_string())),
            KeyBinding::new(&[MODKEY], XK_R, KeyAction::Spawn, launcher),
            KeyBinding::new(&[MODKEY], XK_PRINT, KeyAction::Spawn, argv(&["screenshot", "1"])),
            KeyBinding::new(&[], XK_PRINT, KeyAction::Spawn, argv(&["screenshot"])),
            KeyBinding::new(&[MODKEY, CONTROL], XK_DELETE, KeyAction::Quit, Arg::None),
            KeyBinding::new(&[MODKEY], XK_F4, KeyAction::KillClient, Arg::None),
            KeyBinding::new(&[MODKEY, SHIFT], XK_F4, KeyAction::Spawn, argv(&["xkill"])),
            KeyBinding::new(&[], XK_SUPER_L, KeyAction::StartAltTab, Arg::None),
            KeyBinding::new(&[MODKEY], XK_TAB, KeyAction::AltTab, Arg::None),
            KeyBinding::new(&[MODKEY], XK_SPACE, KeyAction::ToggleAlwaysOnTop, Arg::Int(0)),
            KeyBinding::new(&[MODKEY, SHIFT], XK_SPACE, KeyAction::ToggleAlwaysOnTop, Arg::Int(1)),
            KeyBinding::new(&[MODKEY], XK_J, KeyAction::FocusStack, Arg::Int(1)),
            KeyBinding::new(&[MODKEY], XK_K, KeyAction::FocusStack, Arg::Int(-1)),
            KeyBinding::new(&[MODKEY], XK_H, KeyAction::SetMasterFactor, Arg::Float(-0.05)),
            KeyBinding::new(&[MODKEY], XK_L, KeyAction::SetMasterFactor, Arg::Float(0.05)),
            KeyBinding::new(&[MODKEY], XK_I, KeyAction::IncNumMaster, Arg::Int(1)),
            KeyBinding::new(&[MODKEY], XK_U, KeyAction::IncNumMaster, Arg::Int(-1)),
            KeyBinding::new(&[MODKEY], XK_RETURN, KeyAction::Zoom, Arg::None),
            KeyBinding::new(&[MODKEY], XK_N, KeyAction::IncLayout, Arg::Int(1)),
            KeyBinding::new(&[MODKEY, SHIFT], XK_N, KeyAction::IncLayout, Arg::Int(-1)),
            KeyBinding::new(&[MODKEY], XK_B, KeyAction::ToggleBar, Arg::None),
            KeyBinding::new(&[MODKEY], XK_F, KeyAction::ToggleFloating, Arg::None),
            KeyBinding::new(&[MODKEY], XK_MINUS, KeyAction::SetGapWindow, Arg::Int(-5)),
            KeyBinding::new(&[MODKEY], XK_EQUAL, KeyAction::SetGapWindow, Arg::Int(5)),
            KeyBinding::new(&[MODKEY, SHIFT], XK_EQUAL, KeyAction::SetGapWindow, Arg::Int(0)),
            KeyBinding::new(&[MODKEY], XK_COMMA, KeyAction::FocusMonitor, Arg::Int(-1)),
            KeyBinding::new(&[MODKEY], XK_PERIOD, KeyAction::FocusMonitor, Arg::Int(1)),
            KeyBinding::new(&[MODKEY, SHIFT], XK_COMMA, KeyAction::SendMonitor, Arg::Int(-1)),
            KeyBinding::new(&[MODKEY, SHIFT], XK_PERIOD, KeyAction::SendMonitor, Arg::Int(1)),
            KeyBinding::new(&[MODKEY], XK_0, KeyAction::View, Arg::Tags(TagMask::MAX)),
            KeyBinding::new(&[MODKEY], XK_GRAVE, KeyAction::WinView, Arg::None),
        ];

        let number_keys = [XK_1, XK_2, XK_3, XK_4, XK_5, XK_6, XK_7, XK_8, XK_9];
        for (i, &key) in number_keys.iter().enumerate() {
            let tags = Arg::Tags(1 << i);
            keybindings.extend([
                KeyBinding::new(&[MODKEY], key, KeyAction::View, tags.clone()),
                KeyBinding::new(&[MODKEY, SHIFT], key, KeyAction::Tag, tags.clone()),
                KeyBinding::new(&[MODKEY, CONTROL], key, KeyAction::ToggleView, tags.clone()),
                KeyBinding::new(&[MODKEY, CONTROL, SHIFT], key, KeyAction::ToggleTag, tags),
            ]);
        }

        let position = |position: Position| Arg::Position {
            position,
            forced: false,
        };
        let presets = [
            (XK_Q, Position::NorthWest),
            (XK_A, Position::West),
            (XK_Z, Position::SouthWest),
            (XK_W, Position::North),
            (XK_S, Position::Fill),
            (XK_X, Position::South),
            (XK_E, Position::NorthEast),
            (XK_D, Position::East),
            (XK_C, Position::SouthEast),
        ];
        for (key, preset) in presets {
            keybindings.push(KeyBinding::new(&[MODKEY], key, KeyAction::SetPosition, position(preset)));
        }
        keybindings.extend([
            KeyBinding::new(&[MODKEY, SHIFT], XK_S, KeyAction::SetPosition, position(Position::Fullscreen)),
            KeyBinding::new(&[MODKEY, CONTROL], XK_S, KeyAction::SetPosition, position(Position::Center)),
            KeyBinding::new(
                &[MODKEY, CONTROL, SHIFT],
                XK_S,
                KeyAction::SetPosition,
                position(Position::DoubleFullscreen),
            ),
        ]);

        let buttons = vec![
            ButtonBinding::new(ClickRegion::LayoutSymbol, &[], 1, KeyAction::IncLayout, Arg::Int(1)),
            ButtonBinding::new(ClickRegion::LayoutSymbol, &[], 3, KeyAction::IncLayout, Arg::Int(-1)),
            ButtonBinding::new(ClickRegion::WindowTitle, &[], 2, KeyAction::Zoom, Arg::None),
            ButtonBinding::new(
                ClickRegion::StatusText,
                &[],
                2,
                KeyAction::Spawn,
                Arg::Str(TERMINAL.to_string()),
            ),
            ButtonBinding::new(ClickRegion::ClientWindow, &[MODKEY], 1, KeyAction::MoveMouse, Arg::None),
            ButtonBinding::new(ClickRegion::ClientWindow, &[MODKEY], 2, KeyAction::ToggleFloating, Arg::None),
            ButtonBinding::new(ClickRegion::ClientWindow, &[MODKEY], 3, KeyAction::ResizeMouse, Arg::None),
            ButtonBinding::new(ClickRegion::TagBar, &[], 1, KeyAction::View, Arg::None),
            ButtonBinding::new(ClickRegion::TagBar, &[], 3, KeyAction::ToggleView, Arg::None),
            ButtonBinding::new(ClickRegion::TagBar, &[MODKEY], 1, KeyAction::Tag, Arg::None),
            ButtonBinding::new(ClickRegion::TagBar, &[MODKEY], 3, KeyAction::ToggleTag, Arg::None),
        ];

        Self {
            border_width: 0,
            font: FONT.to_string(),
            scheme_normal,
            scheme_selected,
            opacity_focus: None,
            opacity_unfocus: None,
            opacity_fullscreen: None,
            gap_window: 10,
            gap_bar: 0,
            gap_edge: 0,
            snap: 0,
            show_bar: true,
            bar_position: BarPosition::Top,
            master_factor: 0.55,
            num_master: 1,
            resize_hints: true,
            layouts: vec![LayoutType::Tile, LayoutType::Columns, LayoutType::Floating],
            focus_on_hover: true,
            focus_monitor_on_hover: true,
            focus_on_wheel: false,
            focus_monitor_on_wheel: false,
            resize_mouse_warp: true,
            tags: (1..=9).map(|i| i.to_string()).collect(),
            rules: vec![Rule {
                position: Position::Tiled,
                ..Rule::default()
            }],
            ignore_hints_exact: Vec::new(),
            ignore_hints_contains: Vec::new(),
            terminal: TERMINAL.to_string(),
            modkey: MODKEY,
            autostart: vec![vec![
                "/bin/sh".to_string(),
                "-c".to_string(),
                "[ -x ~/.config/tilewm/autostart.sh ] && exec ~/.config/tilewm/autostart.sh"
                    .to_string(),
            ]],
            keybindings,
            buttons,
        }
    }
}
