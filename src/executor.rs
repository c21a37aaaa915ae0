//! Ties the four components together into a single invocation (§2
//! "Invocation flow").

use std::ffi::CStr;

use nix::unistd::ForkResult;

use crate::child;
use crate::config::Config;
use crate::error::HostError;
use crate::pipe;
use crate::reader::{read_with_deadline, ReaderOutcome};
use crate::reaper::reap_and_classify;
use crate::shape::{RawCallee, Shape};
use crate::Status;

/// Runs one invocation end-to-end: creates the pipe, forks, drives the
/// child through Sandbox Setup and the Child Runner, reads the parent side
/// with a deadline, and reaps + classifies the child.
///
/// Returns `(buffer, status)`: `buffer` is `Some` only when `status` is
/// [`Status::Success`].
pub(crate) fn invoke(
    callee: RawCallee,
    args: &CStr,
    shape: Shape,
    cfg: &Config,
) -> (Option<Vec<u8>>, Status) {
    match invoke_inner(callee, args, shape, cfg) {
        Ok(result) => result,
        Err(host_error) => {
            tracing::warn!(error = %host_error, "invocation failed before classification");
            (None, host_error.to_status())
        }
    }
}

fn invoke_inner(
    callee: RawCallee,
    args: &CStr,
    shape: Shape,
    cfg: &Config,
) -> Result<(Option<Vec<u8>>, Status), HostError> {
    let pipe::PipeEnds {
        read_end,
        write_end,
    } = pipe::create()?;

    // SAFETY: the child branch below only calls async-signal-safe code
    // (raw syscalls) until it raw-exits; it never returns into Rust code
    // that assumes the invariants of a non-forked process (allocator
    // locks held by other threads, etc. are not touched).
    let fork_result = unsafe { nix::unistd::fork() }.map_err(HostError::Fork)?;

    match fork_result {
        ForkResult::Child => {
            // The child owns the write end exclusively from here; drop the
            // parent's read end copy by value (closing it) before Sandbox
            // Setup's fd scan, which would otherwise have to special-case
            // it.
            drop(read_end);
            let write_fd = write_end.into_raw();
            child::run_in_child(write_fd, cfg.fd_table_ceiling, callee, args, shape);
        }
        ForkResult::Parent { child } => {
            // The parent must close its copy of the write end *before*
            // reading, or the read side will never observe EOF (§5,
            // "Ordering guarantees").
            drop(write_end);

            let reader_outcome = read_with_deadline(&read_end, child, cfg)?;
            drop(read_end);

            reap_and_classify(child, reader_outcome)
        }
    }
}
