use std::path::Path;

use rustix::fs::{Access, access};

/// Asks the kernel whether the effective user may execute `path`.
pub(super) fn can_execute(path: &Path) -> bool {
    access(path, Access::EXEC_OK).is_ok()
}
