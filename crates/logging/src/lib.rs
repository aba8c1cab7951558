#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` provides the verbosity flag system used by the synchronization
//! engine. Diagnostics are grouped into user-facing info flags (copies,
//! deletions, skipped entries) and debug flags (command lines, walk and guard
//! internals). Each flag carries a level; a message is emitted only when the
//! flag's configured level is at or above the message's level.
//!
//! # Design
//!
//! The active [`VerbosityConfig`] lives in thread-local storage and emitted
//! messages are buffered per thread as [`DiagnosticEvent`]s. Callers drain the
//! buffer with [`drain_events`] and render events however they like. The
//! [`info_log!`] and [`debug_log!`] macros skip formatting entirely when their
//! flag is disabled.
//!
//! With the `tracing` feature, [`SyncLayer`] routes `tracing` events with
//! `stage_sync::<area>` targets into the same buffer.
//!
//! # Examples
//!
//! ```
//! use logging::{debug_log, drain_events, init, VerbosityConfig};
//!
//! init(VerbosityConfig::from_verbose_level(3));
//! debug_log!(Guard, 1, "source nested in destination");
//! assert_eq!(drain_events().len(), 1);
//! ```

mod config;
mod levels;
mod macros;
mod thread_local;
#[cfg(feature = "tracing")]
mod tracing_bridge;
#[cfg(feature = "tracing")]
mod tracing_macros;

pub use config::VerbosityConfig;
pub use levels::{DebugFlag, DebugLevels, InfoFlag, InfoLevels};
pub use thread_local::{
    DiagnosticEvent, apply_debug_flag, apply_info_flag, current, debug_gte, drain_events,
    emit_debug, emit_info, info_gte, init,
};
#[cfg(feature = "tracing")]
pub use tracing_bridge::{SyncLayer, init_tracing, init_tracing_with_filter};
