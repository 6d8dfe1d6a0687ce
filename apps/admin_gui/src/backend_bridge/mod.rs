//! Bridge between the egui thread and the tokio worker that talks to the category service.

pub mod commands;
pub mod runtime;
