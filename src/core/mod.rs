//! Core types shared by every stage of the pipeline.
//!
//! At the moment this is the error taxonomy: [`RenderError`] and the crate-wide
//! [`Result`] alias. The sequencer, compiler, and renderer all report failures through
//! it so a sink sees one error type regardless of where the render broke.

pub mod error;

pub use error::{RenderError, Result};
