//! Report rendering (colored text or JSON)

pub mod console;
pub mod formatter;
pub mod json;
