// Top-level utility modules
pub mod frame_loop;
pub mod logging;
pub mod screenshot;
pub mod settings;
pub mod ui;
pub mod utils;

// MVC split
pub mod model;
pub mod view;
pub mod controller;
