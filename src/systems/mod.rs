//! Application systems
//!
//! Modular systems extracted from main.rs for better organization and testability.

mod experience;
mod render;
mod window;

pub use experience::ExperienceSystem;
pub use render::{RenderError, RenderSystem};
pub use window::{WindowError, WindowSystem};
