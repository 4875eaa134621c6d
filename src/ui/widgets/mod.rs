pub mod key_state;
pub mod keyboard_hint;
pub mod level_meter;
pub mod scope;
pub mod slider;
