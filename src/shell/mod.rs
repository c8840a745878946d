//! Presentation shell
//!
//! Things the user sees outside the 3D scenes: the loading bar and the
//! text line describing the current step.

mod loading;
mod status;

pub use loading::LoadingBar;
pub use status::StatusText;
