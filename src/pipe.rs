//! Pipe creation for the parent/child result channel (§3 "Ephemeral
//! resources").

use std::os::fd::IntoRawFd;

use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::unistd::pipe2;

use crate::error::HostError;
use crate::fd::Fd;

/// The two ends of a freshly created pipe. `read_end` is already
/// non-blocking, per §4.3 ("the descriptor is non-blocking").
pub struct PipeEnds {
    pub read_end: Fd,
    pub write_end: Fd,
}

pub fn create() -> Result<PipeEnds, HostError> {
    let (read_owned, write_owned) = pipe2(OFlag::O_CLOEXEC).map_err(HostError::Pipe)?;
    let read_end = Fd::new(read_owned.into_raw_fd());
    let write_end = Fd::new(write_owned.into_raw_fd());

    fcntl(
        crate::fd::borrow(&read_end),
        FcntlArg::F_SETFL(OFlag::O_NONBLOCK),
    )
    .map_err(HostError::SetNonBlocking)?;

    Ok(PipeEnds {
        read_end,
        write_end,
    })
}
