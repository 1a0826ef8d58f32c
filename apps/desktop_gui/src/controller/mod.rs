//! Controller layer: UI events and command orchestration for the catalog GUI.

pub mod events;
pub mod orchestration;
