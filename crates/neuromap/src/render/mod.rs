//! Terminal rendering of the laid-out graph
//!
//! A character-grid canvas plus a scene renderer that projects world
//! coordinates onto it. Colorization is left to the CLI.

mod canvas;
mod scene;

pub use canvas::*;
pub use scene::*;
