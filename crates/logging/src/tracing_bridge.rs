//! crates/logging/src/tracing_bridge.rs
//! Bridge between the tracing crate and the verbosity flag system.
//!
//! [`SyncLayer`] is a `tracing-subscriber` layer that maps events with
//! `stage_sync::<area>` targets onto info and debug flags. Events whose flag
//! is enabled in the thread-local [`VerbosityConfig`] are recorded as
//! [`DiagnosticEvent`](crate::DiagnosticEvent)s.
//!
//! ```rust,ignore
//! use logging::{VerbosityConfig, init_tracing};
//!
//! init_tracing(VerbosityConfig::from_verbose_level(2));
//! tracing::info!(target: "stage_sync::copy", "copied file");
//! ```

use super::config::VerbosityConfig;
use super::levels::{DebugFlag, InfoFlag};
use super::thread_local::{debug_gte, emit_debug, emit_info, info_gte};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// A tracing layer that routes events into the verbosity system.
pub struct SyncLayer {
    _config: VerbosityConfig,
}

impl SyncLayer {
    /// Create a new layer with the given verbosity configuration.
    #[must_use]
    pub const fn new(config: VerbosityConfig) -> Self {
        Self { _config: config }
    }

    fn area(target: &str) -> &str {
        target.rsplit("::").next().unwrap_or(target)
    }

    /// Map a tracing target to an info flag.
    fn target_to_info_flag(target: &str) -> Option<InfoFlag> {
        match Self::area(target) {
            "copy" => Some(InfoFlag::Copy),
            "del" | "delete" => Some(InfoFlag::Del),
            "nonreg" | "symlink" => Some(InfoFlag::Nonreg),
            "progress" | "output" => Some(InfoFlag::Progress),
            "skip" => Some(InfoFlag::Skip),
            "stats" => Some(InfoFlag::Stats),
            _ => None,
        }
    }

    /// Map a tracing target to a debug flag.
    fn target_to_debug_flag(target: &str) -> Option<DebugFlag> {
        match Self::area(target) {
            "cmd" | "command" => Some(DebugFlag::Cmd),
            "exclude" | "filter" => Some(DebugFlag::Exclude),
            "exec" | "locator" => Some(DebugFlag::Exec),
            "flist" | "walk" => Some(DebugFlag::Flist),
            "guard" => Some(DebugFlag::Guard),
            "time" | "deadline" => Some(DebugFlag::Time),
            _ => None,
        }
    }

    const fn level_to_verbosity_level(level: &Level) -> u8 {
        match *level {
            Level::ERROR | Level::WARN | Level::INFO => 1,
            Level::DEBUG => 2,
            Level::TRACE => 3,
        }
    }
}

impl<S> Layer<S> for SyncLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();
        if !target.starts_with("stage_sync") {
            return;
        }
        let verbosity_level = Self::level_to_verbosity_level(metadata.level());

        if let Some(debug_flag) = Self::target_to_debug_flag(target) {
            if debug_gte(debug_flag, verbosity_level) {
                let mut visitor = MessageVisitor::default();
                event.record(&mut visitor);
                if let Some(message) = visitor.message {
                    emit_debug(debug_flag, verbosity_level, message);
                }
            }
            return;
        }

        if let Some(info_flag) = Self::target_to_info_flag(target) {
            if info_gte(info_flag, verbosity_level) {
                let mut visitor = MessageVisitor::default();
                event.record(&mut visitor);
                if let Some(message) = visitor.message {
                    emit_info(info_flag, verbosity_level, message);
                }
            }
        }
    }
}

#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        }
    }
}

/// Install a global subscriber that feeds the verbosity system.
///
/// Also initializes the calling thread's [`VerbosityConfig`].
pub fn init_tracing(config: VerbosityConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    super::thread_local::init(config.clone());
    tracing_subscriber::registry()
        .with(SyncLayer::new(config))
        .init();
}

/// Like [`init_tracing`], with an additional filter layer such as
/// `tracing_subscriber::EnvFilter`.
pub fn init_tracing_with_filter<F>(config: VerbosityConfig, filter: F)
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    super::thread_local::init(config.clone());
    tracing_subscriber::registry()
        .with(filter)
        .with(SyncLayer::new(config))
        .init();
}
