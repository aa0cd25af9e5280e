//! Built-in sink drivers

mod console;

pub use console::{ConsoleConnection, ConsoleDriver};
