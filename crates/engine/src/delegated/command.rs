use std::ffi::OsString;

use filters::ExclusionSet;
use paths::AbsolutePath;

/// Flags every delegated run starts with, in order.
///
/// Extraneous entries are deleted only after the transfer completes so the
/// tool never races itself when one root contains the other.
pub const BASE_FLAGS: [&str; 3] = ["--archive", "--delete-after", "--verbose"];

/// Builds the tool's argument vector.
///
/// `exclusions` must already hold every effective pattern; each is rendered
/// rooted, as `--exclude=/<pattern>`. The source gets a trailing separator so
/// its contents, not the directory itself, land in the destination.
#[must_use]
pub fn build_arguments(
    source: &AbsolutePath,
    destination: &AbsolutePath,
    exclusions: &ExclusionSet,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(BASE_FLAGS.len() + exclusions.len() + 2);
    args.extend(BASE_FLAGS.iter().map(OsString::from));
    args.extend(
        exclusions
            .rooted_patterns()
            .map(|pattern| OsString::from(format!("--exclude={pattern}"))),
    );
    args.push(source.with_trailing_separator());
    args.push(destination.as_path().as_os_str().to_os_string());
    args
}
