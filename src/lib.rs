//! Vignette - an interactive 3D story told in short scenes
//!
//! The binary wires these modules to a winit window; they are exposed as a
//! library so the integration tests can drive them headless.

pub mod config;
pub mod input;
pub mod shell;
pub mod systems;
