//! Outer surfaces: CSV input, console output and display formatting.

pub mod console;
pub mod csv;
pub mod display;
