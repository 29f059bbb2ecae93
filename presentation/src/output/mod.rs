//! Output formatting for consensus answers

pub mod console;
pub mod formatter;
