//! Helpers shared by the cross-strategy integration tests.

#![allow(dead_code)]

use std::ffi::OsStr;

use stage_sync::{
    AbsolutePath, DelegatedSyncer, ExclusionSet, ExecutableLocator, NativeSyncer, SyncEngine,
    SyncRequest,
};
use test_support::SyncFixture;

/// Every strategy runnable on this machine. The delegated one is included
/// only when `rsync` is on `PATH`.
pub fn engines() -> Vec<Box<dyn SyncEngine>> {
    let mut engines: Vec<Box<dyn SyncEngine>> = vec![Box::new(NativeSyncer::new())];
    if let Some(rsync) = ExecutableLocator::new().locate(OsStr::new("rsync")) {
        engines.push(Box::new(DelegatedSyncer::new(rsync)));
    }
    engines
}

pub fn request<'a>(fixture: &SyncFixture, exclusions: &[&str]) -> SyncRequest<'a> {
    SyncRequest::new(
        AbsolutePath::new(fixture.source()).unwrap(),
        AbsolutePath::new(fixture.destination()).unwrap(),
    )
    .exclusions(ExclusionSet::normalize(exclusions).unwrap())
}
