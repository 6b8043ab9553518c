//! Controller layer: UI events and command orchestration around the shared
//! case controller.

pub mod events;
pub mod orchestration;
