//! crates/logging/src/macros.rs
//! Level-gated diagnostic macros backed by the thread-local event buffer.

/// Emit an info diagnostic when the named flag is at or above `level`.
///
/// ```
/// use logging::{info_log, drain_events, init, VerbosityConfig};
///
/// init(VerbosityConfig::from_verbose_level(1));
/// drain_events();
/// info_log!(Copy, 1, "copied {}", "a.txt");
/// assert_eq!(drain_events()[0].message(), "copied a.txt");
/// ```
#[macro_export]
macro_rules! info_log {
    ($flag:ident, $level:expr, $($arg:tt)+) => {{
        let level: u8 = $level;
        if $crate::info_gte($crate::InfoFlag::$flag, level) {
            $crate::emit_info($crate::InfoFlag::$flag, level, format!($($arg)+));
        }
    }};
}

/// Emit a debug diagnostic when the named flag is at or above `level`.
///
/// The message is only formatted when the flag is enabled.
#[macro_export]
macro_rules! debug_log {
    ($flag:ident, $level:expr, $($arg:tt)+) => {{
        let level: u8 = $level;
        if $crate::debug_gte($crate::DebugFlag::$flag, level) {
            $crate::emit_debug($crate::DebugFlag::$flag, level, format!($($arg)+));
        }
    }};
}
