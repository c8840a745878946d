//! Pointer input handling
//!
//! This crate turns window-space mouse and touch events into the
//! normalized device coordinates the scene core works in.

mod pointer;

pub use pointer::PointerTracker;
