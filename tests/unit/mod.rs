//! Unit test suite for html-stream
//!
//! Exercises the public API one piece at a time: escaping, value classification,
//! template shapes and compiled producers. End-to-end rendering lives in the
//! integration suite.
//!
//! ```bash
//! cargo test --test unit
//! ```

mod fragments;
mod producers;
