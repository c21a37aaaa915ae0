//! Sandbox Setup (§4.1): runs in the child immediately after fork, before
//! any user code executes.

use std::os::unix::io::RawFd;

use crate::seccomp;
use crate::util::raw_exit;
use crate::Status;

/// Closes every inherited descriptor except `keep`, then installs the
/// strict seccomp filter.
///
/// On any failure this raw-exits with the corresponding [`Status`] code; it
/// never returns an `Err` because there is no one left to hand one to once
/// the fd table and/or syscall surface may already be compromised. The
/// only safe, correct response is to terminate immediately and let the
/// Reaper classify the exit code.
pub(crate) fn run(keep: RawFd, fd_table_ceiling: i32) {
    close_all_except(keep, fd_table_ceiling);

    if let Err(_errno) = seccomp::enable_strict_mode() {
        raw_exit(Status::SeccompFail.as_i32());
    }
}

fn close_all_except(keep: RawFd, fd_table_ceiling: i32) {
    if fd_table_ceiling > 1024 {
        // Safe to use the normal logging path: this check runs before the
        // seccomp filter is installed, so `tracing`'s own syscalls (which
        // may include more than read/write) are still permitted.
        tracing::warn!(
            fd_table_ceiling,
            "fd table ceiling exceeds the conventional FD_SETSIZE; scanning anyway"
        );
    }

    for candidate in 0..fd_table_ceiling {
        if candidate == keep {
            continue;
        }
        // close() on an fd that was never open simply returns EBADF, which
        // we ignore: the scan doesn't know in advance which indices are
        // open. A failure to close an fd that *was* open is the only case
        // §4.1 calls host-attributable.
        match nix::unistd::close(candidate) {
            Ok(()) | Err(nix::Error::EBADF) => {}
            Err(_) => raw_exit(Status::ResourceBusy.as_i32()),
        }
    }
}
