//! Core library components.
//!
//! The store itself and everything it is built from. Nothing here prints,
//! prompts, or exits.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod diff;
pub mod keyfile;
pub mod model;
pub mod types;
pub mod validation;
