use logging::debug_log;

use crate::config::{ConfigError, EngineConfig, Strategy};
use crate::delegated::DelegatedSyncer;
use crate::error::SyncError;
use crate::locator::ExecutableLocator;
use crate::native::NativeSyncer;
use crate::request::SyncRequest;
use crate::SyncEngine;

/// Chooses a strategy for each run.
///
/// Under [`Strategy::Auto`] the delegated strategy is used whenever the
/// configured tool can be located, and the native strategy otherwise. The
/// selector owns the locator, so lookups are cached for its lifetime only.
#[derive(Debug, Default)]
pub struct StrategySelector {
    config: EngineConfig,
    locator: ExecutableLocator,
}

impl StrategySelector {
    /// Creates a selector searching the process `PATH`.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_locator(config, ExecutableLocator::new())
    }

    /// Creates a selector that uses `locator` to find the tool.
    #[must_use]
    pub const fn with_locator(config: EngineConfig, locator: ExecutableLocator) -> Self {
        Self { config, locator }
    }

    /// Creates a selector configured from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        EngineConfig::from_env().map(Self::new)
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The locator used for the delegated tool.
    #[must_use]
    pub const fn locator(&self) -> &ExecutableLocator {
        &self.locator
    }

    /// Returns the strategy the next run would use.
    pub fn select(&self) -> Result<Box<dyn SyncEngine>, SyncError> {
        let program = self.config.program();
        let engine: Box<dyn SyncEngine> = match self.config.strategy() {
            Strategy::Native => Box::new(NativeSyncer::new()),
            Strategy::Delegated => match self.locator.locate(program) {
                Some(path) => Box::new(DelegatedSyncer::new(path)),
                None => return Err(SyncError::tool_unavailable(program)),
            },
            Strategy::Auto => match self.locator.locate(program) {
                Some(path) => Box::new(DelegatedSyncer::new(path)),
                None => {
                    debug_log!(Exec, 1, "{:?} not found, using native strategy", program);
                    Box::new(NativeSyncer::new())
                }
            },
        };
        debug_log!(Exec, 1, "selected {} strategy", engine.name());
        Ok(engine)
    }

    /// Runs `request` with the selected strategy. A request without its own
    /// timeout inherits the configured default.
    pub fn sync(&self, request: SyncRequest<'_>) -> Result<(), SyncError> {
        let engine = self.select()?;
        engine.sync(request.timeout_or(self.config.default_timeout()))
    }
}
