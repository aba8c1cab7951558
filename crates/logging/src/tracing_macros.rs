//! crates/logging/src/tracing_macros.rs
//! Convenience macros for engine-specific tracing targets.
//!
//! Targets follow the `stage_sync::<area>` convention understood by
//! [`SyncLayer`](crate::SyncLayer).

/// Emit a copy operation trace.
///
/// # Example
/// ```ignore
/// trace_copy!("copying {}", path);
/// ```
#[macro_export]
macro_rules! trace_copy {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "stage_sync::copy", $($arg)*);
    };
}

/// Emit a deletion operation trace.
///
/// # Example
/// ```ignore
/// trace_del!("deleting {}", path);
/// ```
#[macro_export]
macro_rules! trace_del {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "stage_sync::delete", $($arg)*);
    };
}

/// Emit a walk trace.
///
/// # Example
/// ```ignore
/// trace_flist!("collected {} entries", count);
/// ```
#[macro_export]
macro_rules! trace_flist {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "stage_sync::flist", $($arg)*);
    };
}

/// Emit an external command trace.
///
/// # Example
/// ```ignore
/// trace_cmd!("running {:?}", args);
/// ```
#[macro_export]
macro_rules! trace_cmd {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "stage_sync::cmd", $($arg)*);
    };
}
