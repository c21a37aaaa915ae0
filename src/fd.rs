//! Owned file descriptor wrapper, closed on drop.
//!
//! Grounded on the reference crate's `linux::fd::Fd`; narrowed here to just
//! what the executor needs (no `fcntl`/duplication helpers beyond what's
//! used).

use std::os::unix::io::{AsRawFd, BorrowedFd, RawFd};

/// An owned, close-on-drop file descriptor.
pub struct Fd(RawFd);

impl Fd {
    pub fn new(raw: RawFd) -> Self {
        Fd(raw)
    }

    pub fn as_raw(&self) -> RawFd {
        self.0
    }

    /// Releases the descriptor without closing it. Used when ownership is
    /// handed off across `fork` (the child end of the pipe).
    pub fn into_raw(self) -> RawFd {
        let raw = self.0;
        std::mem::forget(self);
        raw
    }
}

impl AsRawFd for Fd {
    fn as_raw_fd(&self) -> RawFd {
        self.0
    }
}

impl Drop for Fd {
    fn drop(&mut self) {
        // Best-effort: a close() failure here has no actionable recovery
        // and must not panic on an invocation's cleanup path.
        let _ = nix::unistd::close(self.0);
    }
}

pub(crate) fn borrow(fd: &Fd) -> BorrowedFd<'_> {
    // SAFETY: `fd` owns a valid, open descriptor for its whole lifetime.
    unsafe { BorrowedFd::borrow_raw(fd.as_raw()) }
}
