//! Notebook model.
//!
//! This module defines the typed notebook document that the loader produces
//! and the renderer consumes.

mod cell;
mod notebook;

pub use cell::*;
pub use notebook::*;
