//! `config.ron` loading. Every field is optional; missing ones keep the
//! values of [`Config::default`].

use crate::bar::BarPosition;
use crate::client::{Position, Rule, TagMask};
use crate::errors::ConfigError;
use crate::keyboard::keysyms::{self, Keysym};
use crate::keyboard::{Arg, ButtonBinding, ClickRegion, KeyAction, KeyBinding};
use crate::layout::LayoutType;
use crate::{ColorScheme, Config};
use ron::extensions::Extensions;
use serde::Deserialize;
use std::path::PathBuf;
use x11rb::protocol::xproto::KeyButMask;

/// `$XDG_CONFIG_HOME/tilewm/config.ron`.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tilewm").join("config.ron"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModKey {
    /// The configured modkey.
    Mod,
    Mod1,
    Mod2,
    Mod3,
    Mod4,
    Mod5,
    Shift,
    Control,
}

impl ModKey {
    fn parse(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "mod" => Ok(Self::Mod),
            "mod1" | "alt" => Ok(Self::Mod1),
            "mod2" => Ok(Self::Mod2),
            "mod3" => Ok(Self::Mod3),
            "mod4" | "super" => Ok(Self::Mod4),
            "mod5" => Ok(Self::Mod5),
            "shift" => Ok(Self::Shift),
            "control" | "ctrl" => Ok(Self::Control),
            _ => Err(ConfigError::InvalidModkey(name.to_string())),
        }
    }

    fn mask(self, modkey: KeyButMask) -> KeyButMask {
        match self {
            Self::Mod => modkey,
            Self::Mod1 => KeyButMask::MOD1,
            Self::Mod2 => KeyButMask::MOD2,
            Self::Mod3 => KeyButMask::MOD3,
            Self::Mod4 => KeyButMask::MOD4,
            Self::Mod5 => KeyButMask::MOD5,
            Self::Shift => KeyButMask::SHIFT,
            Self::Control => KeyButMask::CONTROL,
        }
    }
}

const ACTIONS: &[(&str, KeyAction)] = &[
    ("spawn", KeyAction::Spawn),
    ("killclient", KeyAction::KillClient),
    ("quit", KeyAction::Quit),
    ("focusclient", KeyAction::FocusClient),
    ("focusmonitor", KeyAction::FocusMonitor),
    ("focusstack", KeyAction::FocusStack),
    ("inclayout", KeyAction::IncLayout),
    ("incnummaster", KeyAction::IncNumMaster),
    ("movemouse", KeyAction::MoveMouse),
    ("resizemouse", KeyAction::ResizeMouse),
    ("setgapwindow", KeyAction::SetGapWindow),
    ("setgapbar", KeyAction::SetGapBar),
    ("setgapedge", KeyAction::SetGapEdge),
    ("setlayout", KeyAction::SetLayout),
    ("setmasterfactor", KeyAction::SetMasterFactor),
    ("setposition", KeyAction::SetPosition),
    ("sendmonitor", KeyAction::SendMonitor),
    ("tag", KeyAction::Tag),
    ("togglebar", KeyAction::ToggleBar),
    ("togglefloating", KeyAction::ToggleFloating),
    ("togglealwaysontop", KeyAction::ToggleAlwaysOnTop),
    ("toggletag", KeyAction::ToggleTag),
    ("toggleview", KeyAction::ToggleView),
    ("view", KeyAction::View),
    ("winview", KeyAction::WinView),
    ("zoom", KeyAction::Zoom),
    ("startalttab", KeyAction::StartAltTab),
    ("alttab", KeyAction::AltTab),
];

/// Accepts both `KillClient` and `kill_client`.
fn parse_action(name: &str) -> Result<KeyAction, ConfigError> {
    let normalized: String = name
        .chars()
        .filter(|&c| c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    ACTIONS
        .iter()
        .find(|(n, _)| *n == normalized)
        .map(|&(_, action)| action)
        .ok_or_else(|| ConfigError::UnknownAction(name.to_string()))
}

fn parse_key(name: &str) -> Result<Keysym, ConfigError> {
    keysyms::keysym_from_name(name).ok_or_else(|| ConfigError::UnknownKey(name.to_string()))
}

fn parse_layout(name: &str) -> Result<LayoutType, ConfigError> {
    name.parse()
        .map_err(|_| ConfigError::UnknownLayout(name.to_string()))
}

/// A leading `!` applies the position even to clients that are tiled.
fn parse_position(name: &str) -> Result<(Position, bool), ConfigError> {
    let (name_only, forced) = match name.strip_prefix('!') {
        Some(rest) => (rest, true),
        None => (name, false),
    };
    let position = name_only
        .parse()
        .map_err(|_| ConfigError::UnknownPosition(name.to_string()))?;
    Ok((position, forced))
}

/// Replace `$name` uses with the values of preceding `#DEFINE $name = value`
/// lines.
fn preprocess_variables(input: &str) -> Result<String, ConfigError> {
    let mut variables: Vec<(String, String)> = Vec::new();
    let mut result = String::new();

    for line in input.lines() {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("#DEFINE") {
            let Some((name, value)) = rest.split_once('=') else {
                return Err(ConfigError::InvalidDefine(trimmed.to_string()));
            };
            let name = name.trim();
            let value = value.trim().trim_end_matches(',');
            if !name.starts_with('$') || name.len() < 2 {
                return Err(ConfigError::InvalidVariableName(name.to_string()));
            }

            variables.retain(|(n, _)| n != name);
            variables.push((name.to_string(), value.to_string()));
            // longest first so that `$term` does not clobber `$terminal`
            variables.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
            result.push('\n');
            continue;
        }

        let mut processed = line.to_string();
        for (name, value) in &variables {
            processed = processed.replace(name.as_str(), value);
        }
        if let Some(undefined) = variable_outside_strings(&processed) {
            return Err(ConfigError::UndefinedVariable(undefined));
        }
        result.push_str(&processed);
        result.push('\n');
    }

    Ok(result)
}

/// The first `$name` token outside a string literal. Dollars inside
/// strings belong to shell commands.
fn variable_outside_strings(line: &str) -> Option<String> {
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = line.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '/' if chars.peek().is_some_and(|&(_, next)| next == '/') => return None,
            '$' => {
                let end = line[i + 1..]
                    .find(|c: char| !c.is_alphanumeric() && c != '_')
                    .map_or(line.len(), |offset| i + 1 + offset);
                return Some(line[i..end].to_string());
            }
            _ => {}
        }
    }
    None
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigData {
    border_width: Option<i32>,
    font: Option<String>,
    scheme_normal: Option<ColorSchemeData>,
    scheme_selected: Option<ColorSchemeData>,
    opacity_focus: Option<f32>,
    opacity_unfocus: Option<f32>,
    opacity_fullscreen: Option<f32>,

    gap_window: Option<i32>,
    gap_bar: Option<i32>,
    gap_edge: Option<i32>,
    snap: Option<i32>,

    show_bar: Option<bool>,
    bar_position: Option<BarPosition>,

    master_factor: Option<f32>,
    num_master: Option<i32>,
    resize_hints: Option<bool>,
    layouts: Option<Vec<String>>,

    focus_on_hover: Option<bool>,
    focus_monitor_on_hover: Option<bool>,
    focus_on_wheel: Option<bool>,
    focus_monitor_on_wheel: Option<bool>,
    resize_mouse_warp: Option<bool>,

    tags: Option<Vec<String>>,
    rules: Option<Vec<RuleData>>,
    ignore_hints_exact: Option<Vec<String>>,
    ignore_hints_contains: Option<Vec<String>>,

    terminal: Option<String>,
    modkey: Option<String>,
    autostart: Option<Vec<CommandData>>,

    keybindings: Option<Vec<KeybindingData>>,
    buttons: Option<Vec<ButtonData>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ColorSchemeData {
    foreground: u32,
    background: u32,
    border: u32,
}

impl From<ColorSchemeData> for ColorScheme {
    fn from(data: ColorSchemeData) -> Self {
        Self {
            foreground: data.foreground,
            background: data.background,
            border: data.border,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RuleData {
    class: Option<String>,
    instance: Option<String>,
    title: Option<String>,
    tags: TagMask,
    position: Option<String>,
    monitor: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CommandData {
    /// Run through `/bin/sh -c`.
    Shell(String),
    Argv(Vec<String>),
}

impl From<CommandData> for Vec<String> {
    fn from(command: CommandData) -> Self {
        match command {
            CommandData::Shell(line) => vec!["/bin/sh".to_string(), "-c".to_string(), line],
            CommandData::Argv(argv) => argv,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeybindingData {
    #[serde(default)]
    modifiers: Vec<String>,
    key: String,
    action: String,
    #[serde(default)]
    arg: ArgData,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ButtonData {
    click: ClickRegion,
    #[serde(default)]
    modifiers: Vec<String>,
    button: u8,
    action: String,
    #[serde(default)]
    arg: ArgData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum ArgData {
    #[default]
    None,
    Int(i32),
    Float(f32),
    String(String),
    Array(Vec<String>),
}

fn invalid(action: KeyAction, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidArgument {
        action: format!("{action:?}"),
        reason: reason.into(),
    }
}

/// Interpret a raw argument in the context of the action it is bound to.
fn arg_data_to_arg(action: KeyAction, data: ArgData) -> Result<Arg, ConfigError> {
    use KeyAction::*;

    match (action, data) {
        (_, ArgData::None) => Ok(Arg::None),

        // tag commands take a tag index or "all"
        (View | Tag | ToggleView | ToggleTag, ArgData::Int(index)) => u32::try_from(index)
            .ok()
            .and_then(|i| 1u32.checked_shl(i))
            .map(Arg::Tags)
            .ok_or_else(|| invalid(action, format!("tag index {index} out of range"))),
        (View | Tag | ToggleView | ToggleTag, ArgData::String(s)) if s == "all" => {
            Ok(Arg::Tags(TagMask::MAX))
        }
        (View | Tag | ToggleView | ToggleTag, _) => {
            Err(invalid(action, "expected a tag index or \"all\""))
        }

        (SetLayout, ArgData::String(name)) => parse_layout(&name).map(Arg::Layout),
        (SetLayout, _) => Err(invalid(action, "expected a layout name")),

        (SetPosition, ArgData::String(name)) => {
            let (position, forced) = parse_position(&name)?;
            Ok(Arg::Position { position, forced })
        }
        (SetPosition, _) => Err(invalid(action, "expected a position name")),

        (SetMasterFactor, ArgData::Float(f)) => Ok(Arg::Float(f)),
        (SetMasterFactor, ArgData::Int(i)) => Ok(Arg::Float(i as f32)),
        (SetMasterFactor, _) => Err(invalid(action, "expected a number")),

        (Spawn, ArgData::String(command)) => Ok(Arg::Str(command)),
        (Spawn, ArgData::Array(argv)) if !argv.is_empty() => Ok(Arg::Array(argv)),
        (Spawn, _) => Err(invalid(action, "expected a command")),

        (_, ArgData::Int(i)) => Ok(Arg::Int(i)),
        (_, ArgData::Float(f)) => Ok(Arg::Float(f)),
        (_, ArgData::String(s)) => Ok(Arg::Str(s)),
        (_, ArgData::Array(a)) => Ok(Arg::Array(a)),
    }
}

fn modifier_masks(names: &[String], modkey: KeyButMask) -> Result<Vec<KeyButMask>, ConfigError> {
    names
        .iter()
        .map(|name| ModKey::parse(name).map(|m| m.mask(modkey)))
        .collect()
}

fn parse_rule(data: RuleData) -> Result<Rule, ConfigError> {
    let position = match data.position {
        Some(name) => parse_position(&name)?.0,
        None => Position::default(),
    };
    Ok(Rule {
        class: data.class,
        instance: data.instance,
        title: data.title,
        tags: data.tags,
        position,
        monitor: data.monitor,
    })
}

pub fn parse_config(input: &str) -> Result<Config, ConfigError> {
    let preprocessed = preprocess_variables(input)?;
    let data: ConfigData = ron::Options::default()
        .with_default_extension(Extensions::IMPLICIT_SOME)
        .from_str(&preprocessed)?;
    config_data_to_config(data)
}

fn config_data_to_config(data: ConfigData) -> Result<Config, ConfigError> {
    let mut config = Config::default();

    if let Some(name) = data.modkey {
        config.modkey = match ModKey::parse(&name)? {
            ModKey::Mod => return Err(ConfigError::InvalidModkey(name)),
            key => key.mask(config.modkey),
        };
    }
    let modkey = config.modkey;

    macro_rules! set {
        ($($field:ident),* $(,)?) => {
            $(if let Some(value) = data.$field {
                config.$field = value;
            })*
        };
    }
    set!(
        border_width,
        font,
        gap_window,
        gap_bar,
        gap_edge,
        snap,
        show_bar,
        bar_position,
        master_factor,
        num_master,
        resize_hints,
        focus_on_hover,
        focus_monitor_on_hover,
        focus_on_wheel,
        focus_monitor_on_wheel,
        resize_mouse_warp,
        tags,
        ignore_hints_exact,
        ignore_hints_contains,
        terminal,
    );

    for (field, value) in [
        (&mut config.opacity_focus, data.opacity_focus),
        (&mut config.opacity_unfocus, data.opacity_unfocus),
        (&mut config.opacity_fullscreen, data.opacity_fullscreen),
    ] {
        if value.is_some() {
            *field = value;
        }
    }

    if let Some(scheme) = data.scheme_normal {
        config.scheme_normal = scheme.into();
    }
    if let Some(scheme) = data.scheme_selected {
        config.scheme_selected = scheme.into();
    }

    if let Some(names) = data.layouts {
        let layouts = names
            .iter()
            .map(|name| parse_layout(name))
            .collect::<Result<Vec<_>, _>>()?;
        if !layouts.is_empty() {
            config.layouts = layouts;
        }
    }

    if let Some(rules) = data.rules {
        config.rules = rules
            .into_iter()
            .map(parse_rule)
            .collect::<Result<_, _>>()?;
    }

    if let Some(commands) = data.autostart {
        config.autostart = commands.into_iter().map(Vec::from).collect();
    }

    if let Some(bindings) = data.keybindings {
        config.keybindings = bindings
            .into_iter()
            .map(|kb| {
                let action = parse_action(&kb.action)?;
                Ok(KeyBinding::new(
                    &modifier_masks(&kb.modifiers, modkey)?,
                    parse_key(&kb.key)?,
                    action,
                    arg_data_to_arg(action, kb.arg)?,
                ))
            })
            .collect::<Result<_, ConfigError>>()?;
    }

    if let Some(buttons) = data.buttons {
        config.buttons = buttons
            .into_iter()
            .map(|b| {
                let action = parse_action(&b.action)?;
                Ok(ButtonBinding::new(
                    b.click,
                    &modifier_masks(&b.modifiers, modkey)?,
                    b.button,
                    action,
                    arg_data_to_arg(action, b.arg)?,
                ))
            })
            .collect::<Result<_, ConfigError>>()?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::keysyms::{XK_RETURN, XK_T};
    use simple_test_case::test_case;

    #[test]
    fn empty_config_keeps_the_defaults() {
        let config = parse_config("()").unwrap();
        let defaults = Config::default();

        assert_eq!(config.gap_window, defaults.gap_window);
        assert_eq!(config.layouts, defaults.layouts);
        assert_eq!(config.keybindings, defaults.keybindings);
    }

    #[test]
    fn fields_override_the_defaults() {
        let config = parse_config(
            r#"(
                border_width: 2,
                gap_window: 4,
                bar_position: Bottom,
                opacity_unfocus: 0.8,
                layouts: ["monocle", "tile"],
                tags: ["web", "code"],
            )"#,
        )
        .unwrap();

        assert_eq!(config.border_width, 2);
        assert_eq!(config.gap_window, 4);
        assert_eq!(config.bar_position, BarPosition::Bottom);
        assert_eq!(config.opacity_unfocus, Some(0.8));
        assert_eq!(config.layouts, vec![LayoutType::Monocle, LayoutType::Tile]);
        assert_eq!(config.tag_mask(), 0b11);
    }

    #[test]
    fn keybindings_resolve_modifiers_and_keys() {
        let config = parse_config(
            r#"(
                modkey: "Mod1",
                keybindings: [
                    (modifiers: ["Mod", "Shift"], key: "Return", action: "Spawn", arg: "kitty"),
                    (modifiers: ["Mod"], key: "t", action: "set_layout", arg: "tile"),
                ],
            )"#,
        )
        .unwrap();

        let mod1_shift = u16::from(KeyButMask::MOD1) | u16::from(KeyButMask::SHIFT);
        assert_eq!(config.keybindings.len(), 2);
        assert_eq!(config.keybindings[0].modifiers, mod1_shift);
        assert_eq!(config.keybindings[0].keysym, XK_RETURN);
        assert_eq!(config.keybindings[0].arg, Arg::Str("kitty".into()));
        assert_eq!(config.keybindings[1].keysym, XK_T);
        assert_eq!(config.keybindings[1].arg, Arg::Layout(LayoutType::Tile));
    }

    #[test_case("View", ArgData::Int(2), Arg::Tags(1 << 2); "tag index")]
    #[test_case("View", ArgData::String("all".into()), Arg::Tags(TagMask::MAX); "all tags")]
    #[test_case("SetPosition", ArgData::String("!north".into()), Arg::Position { position: Position::North, forced: true }; "forced position")]
    #[test_case("SetPosition", ArgData::String("center".into()), Arg::Position { position: Position::Center, forced: false }; "position")]
    #[test_case("SetMasterFactor", ArgData::Int(1), Arg::Float(1.0); "integer factor")]
    #[test_case("FocusStack", ArgData::Int(-1), Arg::Int(-1); "plain integer")]
    #[test]
    fn arguments_follow_their_action(action: &str, data: ArgData, expected: Arg) {
        let action = parse_action(action).unwrap();
        assert_eq!(arg_data_to_arg(action, data).unwrap(), expected);
    }

    #[test]
    fn defines_are_substituted() {
        let input = r#"
            #DEFINE $term = "alacritty"
            #DEFINE $terminal_gap = 7
            (terminal: $term, gap_window: $terminal_gap)
        "#;
        let config = parse_config(input).unwrap();

        assert_eq!(config.terminal, "alacritty");
        assert_eq!(config.gap_window, 7);
    }

    #[test]
    fn dollars_inside_strings_are_left_alone() {
        let config = parse_config(r#"(autostart: ["echo $HOME > /tmp/home"])"#).unwrap();
        assert_eq!(
            config.autostart,
            vec![vec!["/bin/sh".to_string(), "-c".into(), "echo $HOME > /tmp/home".into()]]
        );
    }

    #[test]
    fn rules_are_parsed() {
        let config = parse_config(
            r#"(rules: [(class: "Gimp", tags: 4, position: "none", monitor: 1)])"#,
        )
        .unwrap();

        assert_eq!(
            config.rules,
            vec![Rule {
                class: Some("Gimp".into()),
                instance: None,
                title: None,
                tags: 4,
                position: Position::None,
                monitor: Some(1),
            }]
        );
    }

    #[test_case("(modkey: \"Hyper\")", "Invalid modkey"; "modkey")]
    #[test_case("(modkey: \"Mod\")", "Invalid modkey"; "modkey placeholder")]
    #[test_case("(keybindings: [(key: \"nope\", action: \"quit\")])", "Unknown key"; "key")]
    #[test_case("(keybindings: [(key: \"q\", action: \"explode\")])", "Unknown action"; "action")]
    #[test_case("(layouts: [\"spiral\"])", "Unknown layout"; "layout")]
    #[test_case("(rules: [(position: \"up\")])", "Unknown position"; "position")]
    #[test_case("(keybindings: [(key: \"q\", action: \"view\", arg: 40)])", "Invalid argument"; "tag out of range")]
    #[test_case("(gap_window: $gap)", "Undefined variable"; "undefined variable")]
    #[test_case("#DEFINE gap = 1\n()", "Invalid variable name"; "variable without dollar")]
    #[test_case("#DEFINE $gap 1\n()", "Invalid #DEFINE"; "define without value")]
    #[test_case("(colour: 1)", "Failed to parse"; "unknown field")]
    #[test]
    fn invalid_configs_are_rejected(input: &str, message: &str) {
        let error = parse_config(input).unwrap_err();
        assert!(error.to_string().contains(message), "{error}");
    }

    #[test]
    fn stock_template_parses() {
        let config = parse_config(include_str!("../../templates/config.ron")).unwrap();
        assert!(!config.keybindings.is_empty());
        assert_eq!(config.tags.len(), 9);
    }
}
