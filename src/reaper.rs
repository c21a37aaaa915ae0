//! Reaper & Classifier (§4.4): waits for the child and maps its
//! termination cause onto the [`Status`] taxonomy.

use nix::sys::signal::Signal;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;

use tracing::{debug, trace};

use crate::error::HostError;
use crate::reader::ReaderOutcome;
use crate::Status;

/// Combines the Reader's outcome with the child's reaped termination cause
/// into exactly one [`Status`], discarding any buffer on non-success.
pub(crate) fn reap_and_classify(
    pid: Pid,
    reader_outcome: ReaderOutcome,
) -> Result<(Option<Vec<u8>>, Status), HostError> {
    let wait_result = loop {
        match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => {
                trace!(pid = pid.as_raw(), "waitpid returned 0, retrying");
                std::thread::yield_now();
                continue;
            }
            other => break other,
        }
    };

    // A `TLE` from the Reader is preserved regardless of reaping details:
    // the Reader set the status before signalling, and we sent the kill
    // ourselves (§4.4 step 3). This takes precedence even over a `waitpid`
    // failure, so it must be checked before propagating one.
    if let ReaderOutcome::Failed(Status::Tle) = reader_outcome {
        debug!(pid = pid.as_raw(), ?wait_result, "reaped after deadline kill");
        return Ok((None, Status::Tle));
    }

    let wait_status = wait_result.map_err(HostError::Wait)?;

    let classified = classify(wait_status);
    debug!(pid = pid.as_raw(), ?wait_status, ?classified, "reaped child");

    match reader_outcome {
        ReaderOutcome::Success(buffer) => {
            if classified == Status::Success {
                Ok((Some(buffer), Status::Success))
            } else {
                Ok((None, classified))
            }
        }
        ReaderOutcome::Failed(reader_status) => {
            // The Reader already determined a non-success status (e.g. a
            // plumbing `Failure`); prefer the more specific classification
            // from the exit/signal cause when one is available, otherwise
            // keep what the Reader observed.
            if classified == Status::Success {
                Ok((None, reader_status))
            } else {
                Ok((None, classified))
            }
        }
    }
}

fn classify(wait_status: WaitStatus) -> Status {
    match wait_status {
        WaitStatus::Exited(_, code) => Status::from_i32(code).unwrap_or(Status::Failure),
        WaitStatus::Signaled(_, Signal::SIGSEGV, _) => Status::Segfault,
        WaitStatus::Signaled(_, Signal::SIGKILL, _) => Status::Killed,
        WaitStatus::Signaled(..) => Status::Failure,
        _ => Status::Failure,
    }
}
