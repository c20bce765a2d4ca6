#[derive(Debug)]
pub enum WmError {
    X11(X11Error),
    Io(std::io::Error),
    Config(ConfigError),
    OtherWmRunning,
}

#[derive(Debug)]
pub enum X11Error {
    ConnectError(x11rb::errors::ConnectError),
    ConnectionError(x11rb::errors::ConnectionError),
    ReplyError(x11rb::errors::ReplyError),
    ReplyOrIdError(x11rb::errors::ReplyOrIdError),
    /// An asynchronous protocol error that is not a known benign race.
    Protocol { request: u8, error: u8 },
    DisplayOpenFailed,
    FontLoadFailed(String),
    DrawCreateFailed,
}

#[derive(Debug)]
pub enum ConfigError {
    ParseError(ron::error::SpannedError),
    InvalidModkey(String),
    UnknownKey(String),
    UnknownAction(String),
    UnknownLayout(String),
    UnknownPosition(String),
    InvalidArgument { action: String, reason: String },
    InvalidVariableName(String),
    InvalidDefine(String),
    UndefinedVariable(String),
}

pub type WmResult<T> = Result<T, WmError>;

impl std::fmt::Display for WmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X11(error) => write!(f, "{}", error),
            Self::Io(error) => write!(f, "{}", error),
            Self::Config(error) => write!(f, "{}", error),
            Self::OtherWmRunning => write!(f, "another window manager is already running"),
        }
    }
}

impl std::error::Error for WmError {}

impl std::fmt::Display for X11Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectError(err) => write!(f, "{}", err),
            Self::ConnectionError(err) => write!(f, "{}", err),
            Self::ReplyError(err) => write!(f, "{}", err),
            Self::ReplyOrIdError(err) => write!(f, "{}", err),
            Self::Protocol { request, error } => {
                write!(f, "fatal X error: request code={}, error code={}", request, error)
            }
            Self::DisplayOpenFailed => write!(f, "failed to open X11 display"),
            Self::FontLoadFailed(font_name) => write!(f, "failed to load Xft font: {}", font_name),
            Self::DrawCreateFailed => write!(f, "failed to create XftDraw"),
        }
    }
}

impl std::error::Error for X11Error {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseError(err) => write!(f, "Failed to parse RON config: {}", err),
            Self::InvalidModkey(key) => write!(f, "Invalid modkey: {}", key),
            Self::UnknownKey(key) => write!(f, "Unknown key: {}", key),
            Self::UnknownAction(action) => write!(f, "Unknown action: {}", action),
            Self::UnknownLayout(layout) => write!(f, "Unknown layout: {}", layout),
            Self::UnknownPosition(position) => write!(f, "Unknown position: {}", position),
            Self::InvalidArgument { action, reason } => {
                write!(f, "Invalid argument for {}: {}", action, reason)
            }
            Self::InvalidVariableName(name) => {
                write!(f, "Invalid variable name '{}': must start with $", name)
            }
            Self::InvalidDefine(line) => {
                write!(f, "Invalid #DEFINE syntax: '{}'. Expected: #DEFINE $var_name = value", line)
            }
            Self::UndefinedVariable(var) => {
                write!(f, "Undefined variable '{}': define it with #DEFINE before use", var)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl<T: Into<X11Error>> From<T> for WmError {
    fn from(value: T) -> Self {
        Self::X11(value.into())
    }
}

impl From<std::io::Error> for WmError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ConfigError> for WmError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(value: ron::error::SpannedError) -> Self {
        ConfigError::ParseError(value)
    }
}

impl From<x11rb::errors::ConnectError> for X11Error {
    fn from(value: x11rb::errors::ConnectError) -> Self {
        X11Error::ConnectError(value)
    }
}

impl From<x11rb::errors::ConnectionError> for X11Error {
    fn from(value: x11rb::errors::ConnectionError) -> Self {
        X11Error::ConnectionError(value)
    }
}

impl From<x11rb::errors::ReplyError> for X11Error {
    fn from(value: x11rb::errors::ReplyError) -> Self {
        X11Error::ReplyError(value)
    }
}

impl From<x11rb::errors::ReplyOrIdError> for X11Error {
    fn from(value: x11rb::errors::ReplyOrIdError) -> Self {
        X11Error::ReplyOrIdError(value)
    }
}

/// Core protocol error and request codes.
pub mod protocol {
    pub const BAD_WINDOW: u8 = 3;
    pub const BAD_MATCH: u8 = 8;
    pub const BAD_DRAWABLE: u8 = 9;
    pub const BAD_ACCESS: u8 = 10;

    pub const CONFIGURE_WINDOW: u8 = 12;
    pub const GRAB_BUTTON: u8 = 28;
    pub const GRAB_KEY: u8 = 33;
    pub const SET_INPUT_FOCUS: u8 = 42;
    pub const COPY_AREA: u8 = 62;
    pub const POLY_SEGMENT: u8 = 66;
    pub const POLY_FILL_RECTANGLE: u8 = 70;
    pub const POLY_TEXT8: u8 = 74;
}

/// Errors caused by windows vanishing between a notification and our
/// request, or by keys another client already grabbed.
pub fn is_benign_x_error(error_code: u8, request_code: u8) -> bool {
    use protocol::*;

    match error_code {
        BAD_WINDOW => true,
        BAD_MATCH => matches!(request_code, SET_INPUT_FOCUS | CONFIGURE_WINDOW),
        BAD_DRAWABLE => matches!(
            request_code,
            POLY_TEXT8 | POLY_FILL_RECTANGLE | POLY_SEGMENT | COPY_AREA
        ),
        BAD_ACCESS => matches!(request_code, GRAB_BUTTON | GRAB_KEY),
        _ => false,
    }
}
