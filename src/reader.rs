//! Parent Reader with Deadline (§4.3): drains the pipe read end using
//! edge-triggered epoll readiness multiplexed with a one-shot timerfd.

use std::os::unix::io::AsRawFd;

use nix::errno::Errno;
use nix::sys::epoll::{Epoll, EpollCreateFlags, EpollEvent, EpollFlags, EpollTimeout};
use nix::sys::time::TimeSpec;
use nix::sys::timerfd::{ClockId, Expiration, TimerFd, TimerFlags, TimerSetTimeFlags};

use tracing::warn;

use crate::config::Config;
use crate::error::HostError;
use crate::fd::Fd;
use crate::Status;

const PIPE_TAG: u64 = 1;
const TIMER_TAG: u64 = 2;

/// What the Reader produced. A `Failed` outcome with status `Tle` means the
/// child has already been sent `SIGKILL`; the Reaper must still reap it.
pub(crate) enum ReaderOutcome {
    Success(Vec<u8>),
    Failed(Status),
}

pub(crate) fn read_with_deadline(
    read_end: &Fd,
    child_pid: nix::unistd::Pid,
    cfg: &Config,
) -> Result<ReaderOutcome, HostError> {
    let timer = TimerFd::new(ClockId::CLOCK_MONOTONIC, TimerFlags::TFD_CLOEXEC)
        .map_err(HostError::TimerCreate)?;
    timer
        .set(
            Expiration::OneShot(TimeSpec::from_duration(cfg.deadline)),
            TimerSetTimeFlags::empty(),
        )
        .map_err(HostError::TimerArm)?;

    let epoll = Epoll::new(EpollCreateFlags::empty()).map_err(HostError::EpollCreate)?;
    epoll
        .add(&timer, EpollEvent::new(EpollFlags::EPOLLIN, TIMER_TAG))
        .map_err(HostError::EpollCtl)?;
    epoll
        .add(
            crate::fd::borrow(read_end),
            EpollEvent::new(EpollFlags::EPOLLIN | EpollFlags::EPOLLET, PIPE_TAG),
        )
        .map_err(HostError::EpollCtl)?;

    let outcome = drain(read_end, &epoll, cfg, child_pid);

    // `timer` and `epoll` close on drop regardless of which branch above was
    // taken, satisfying invariant #2 in §8 ("the parent's pipe ends, timer
    // fd, and epoll fd are all closed by return").
    outcome
}

fn drain(
    read_end: &Fd,
    epoll: &Epoll,
    cfg: &Config,
    child_pid: nix::unistd::Pid,
) -> Result<ReaderOutcome, HostError> {
    let mut buf: Vec<u8> = Vec::with_capacity(cfg.initial_buffer_capacity.max(1));
    let mut events = [EpollEvent::empty(); 2];

    loop {
        ensure_capacity(&mut buf)?;
        let old_len = buf.len();
        let cap = buf.capacity();
        buf.resize(cap, 0);
        let n = unsafe {
            libc::read(
                read_end.as_raw_fd(),
                buf[old_len..].as_mut_ptr() as *mut libc::c_void,
                buf.len() - old_len,
            )
        };

        if n > 0 {
            buf.truncate(old_len + n as usize);
            continue;
        }

        if n == 0 {
            buf.truncate(old_len);
            return Ok(ReaderOutcome::Success(buf));
        }

        buf.truncate(old_len);
        let errno = Errno::last();
        if errno != Errno::EAGAIN && errno != Errno::EWOULDBLOCK {
            return Err(HostError::Read(errno));
        }

        match epoll.wait(&mut events, EpollTimeout::NONE) {
            Ok(0) => return Ok(ReaderOutcome::Failed(Status::Failure)),
            Ok(n) => {
                let timer_fired = events[..n].iter().any(|e| e.data() == TIMER_TAG);
                let pipe_ready = events[..n].iter().any(|e| e.data() == PIPE_TAG);
                if timer_fired {
                    warn!(pid = child_pid.as_raw(), "deadline elapsed, killing child");
                    nix::sys::signal::kill(child_pid, nix::sys::signal::Signal::SIGKILL)
                        .map_err(HostError::Kill)?;
                    return Ok(ReaderOutcome::Failed(Status::Tle));
                }
                if pipe_ready {
                    continue;
                }
                return Ok(ReaderOutcome::Failed(Status::Failure));
            }
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(HostError::EpollWait(e)),
        }
    }
}

/// Doubles `buf`'s capacity once it's full. Uses `try_reserve` rather than
/// `reserve`, since an allocation failure here must return `FAILURE`
/// (§4.3 step 5) rather than abort the process.
fn ensure_capacity(buf: &mut Vec<u8>) -> Result<(), HostError> {
    if buf.len() == buf.capacity() {
        let additional = buf.capacity().max(1);
        buf.try_reserve(additional).map_err(|_| HostError::Alloc)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_capacity_doubles() {
        let mut buf: Vec<u8> = Vec::with_capacity(32);
        buf.resize(32, 0);
        ensure_capacity(&mut buf).unwrap();
        assert!(buf.capacity() >= 64);
    }
}
