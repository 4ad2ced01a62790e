pub mod common;
pub mod debug;
pub mod spinner;
pub mod status_bar;
pub mod viewer;
