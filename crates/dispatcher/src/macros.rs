//! Leveled logging macros.
//!
//! Body rendering at the call site: no body → empty string; a format
//! string with arguments → `format!` (verb/argument mismatches become
//! compile errors); a single expression → its `Display` form; several
//! plain expressions → their `Display` forms joined by spaces.
//!
//! Any leading literal is treated as a format string, numeric literals
//! included, so `log_info!(engine, 42, 43)` is rejected at compile time.
//! To space-join values starting with a literal, bind the first one to a
//! variable.

/// Write one entry at an explicit level.
#[macro_export]
macro_rules! log_write {
    ($engine:expr, $level:expr) => {
        $engine.log($level, ::std::string::String::new())
    };
    ($engine:expr, $level:expr, $fmt:literal, $($arg:expr),+ $(,)?) => {
        $engine.log($level, ::std::format!($fmt, $($arg),+))
    };
    ($engine:expr, $level:expr, $body:expr $(,)?) => {
        $engine.log($level, ::std::format!("{}", $body))
    };
    ($engine:expr, $level:expr, $($arg:expr),+ $(,)?) => {{
        let parts: ::std::vec::Vec<::std::string::String> =
            ::std::vec![$(::std::format!("{}", $arg)),+];
        $engine.log($level, parts.join(" "))
    }};
}

/// Write a DEBUG entry.
#[macro_export]
macro_rules! log_debug {
    ($engine:expr $(, $($rest:tt)+)?) => {
        $crate::log_write!($engine, $crate::Level::Debug $(, $($rest)+)?)
    };
}

/// Write a TRACE entry.
#[macro_export]
macro_rules! log_trace {
    ($engine:expr $(, $($rest:tt)+)?) => {
        $crate::log_write!($engine, $crate::Level::Trace $(, $($rest)+)?)
    };
}

/// Write an INFO entry.
#[macro_export]
macro_rules! log_info {
    ($engine:expr $(, $($rest:tt)+)?) => {
        $crate::log_write!($engine, $crate::Level::Info $(, $($rest)+)?)
    };
}

/// Write a NOTICE entry.
#[macro_export]
macro_rules! log_notice {
    ($engine:expr $(, $($rest:tt)+)?) => {
        $crate::log_write!($engine, $crate::Level::Notice $(, $($rest)+)?)
    };
}

/// Write a WARNING entry.
#[macro_export]
macro_rules! log_warning {
    ($engine:expr $(, $($rest:tt)+)?) => {
        $crate::log_write!($engine, $crate::Level::Warning $(, $($rest)+)?)
    };
}

/// Write an ERROR entry.
#[macro_export]
macro_rules! log_error {
    ($engine:expr $(, $($rest:tt)+)?) => {
        $crate::log_write!($engine, $crate::Level::Error $(, $($rest)+)?)
    };
}

/// Write a PANIC-level entry (logs only; does not panic the process).
#[macro_export]
macro_rules! log_panic {
    ($engine:expr $(, $($rest:tt)+)?) => {
        $crate::log_write!($engine, $crate::Level::Panic $(, $($rest)+)?)
    };
}

/// Write a FATAL entry (logs only; does not exit the process).
#[macro_export]
macro_rules! log_fatal {
    ($engine:expr $(, $($rest:tt)+)?) => {
        $crate::log_write!($engine, $crate::Level::Fatal $(, $($rest)+)?)
    };
}
