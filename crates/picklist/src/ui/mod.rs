//! Renderers that turn engine state into operator-facing output.

pub mod console;
