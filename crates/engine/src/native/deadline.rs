use std::time::{Duration, Instant};

use crate::error::SyncError;

/// Cooperative wall-clock budget for one native run.
///
/// The deadline is fixed when the run starts and checked between entries, so
/// a single slow file copy can overrun it. A zero limit, or one too large to
/// represent, is unbounded.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Deadline {
    limit: Option<Duration>,
    expires_at: Option<Instant>,
}

impl Deadline {
    pub(crate) fn start(limit: Option<Duration>) -> Self {
        let limit = crate::request::bounded(limit);
        let now = Instant::now();
        Self {
            limit,
            expires_at: limit.and_then(|limit| now.checked_add(limit)),
        }
    }

    pub(crate) fn check(&self) -> Result<(), SyncError> {
        match (self.limit, self.expires_at) {
            (Some(limit), Some(expires_at)) if Instant::now() >= expires_at => {
                Err(SyncError::timed_out(limit))
            }
            _ => Ok(()),
        }
    }
}
