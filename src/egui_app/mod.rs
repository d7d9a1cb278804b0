//! egui front end: controller, view state and rendering.

pub mod controller;
pub mod state;
pub mod ui;
