pub mod debug;
pub mod hotload;
pub mod player;
pub mod settings;
pub mod ui;
