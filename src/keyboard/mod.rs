pub mod handlers;
pub mod keysyms;
pub mod mapping;

pub use handlers::{
    Arg, ButtonBinding, ClickRegion, KeyAction, KeyBinding, clean_mask, matching_buttons,
    matching_keys,
};
pub use mapping::KeyboardMapping;
