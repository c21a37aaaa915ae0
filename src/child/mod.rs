//! Everything that runs on the child side of the fork: Sandbox Setup
//! (§4.1) followed by the Child Runner (§4.2).

mod runner;
mod setup;

use std::ffi::CStr;
use std::os::unix::io::RawFd;

use crate::shape::{RawCallee, Shape};

/// Entry point executed in the freshly forked child. Never returns: every
/// path through Sandbox Setup and the Child Runner ends in a raw exit
/// syscall.
pub(crate) fn run_in_child(
    write_fd: RawFd,
    fd_table_ceiling: i32,
    callee: RawCallee,
    args: &CStr,
    shape: Shape,
) -> ! {
    setup::run(write_fd, fd_table_ceiling);
    runner::run(callee, args, shape, write_fd)
}
