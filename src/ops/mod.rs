//! High-level operations.
//!
//! This module contains the implementation of Narwhal commands.

pub mod load;
pub mod resolve;

pub use load::{load_project, LoadedProject};
pub use resolve::{resolve_platform, resolve_platforms, ActiveCompiler, EffectiveSettings, OutputName};
