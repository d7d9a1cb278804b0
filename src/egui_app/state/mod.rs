//! View state shared between the controller and the egui renderer.

mod alerts;
mod panel;
mod section;

pub use alerts::*;
pub use panel::*;
pub use section::*;
