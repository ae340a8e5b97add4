pub mod listeners;
pub mod setup;

pub use listeners::{log_animation_cues, log_interactions, log_menu_toggles, request_object_focus};
pub use setup::setup;
