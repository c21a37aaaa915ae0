//! Internal plumbing errors, distinct from the public [`crate::Status`]
//! taxonomy.
//!
//! `HostError` never crosses the fork and never reaches the host directly:
//! every public entry point folds it into `Status::Failure` or
//! `Status::ResourceBusy` at the boundary.

/// A failure while the parent was setting up or tearing down per-invocation
/// resources (pipe, timer fd, epoll instance, fork, signal delivery).
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("failed to create pipe")]
    Pipe(#[source] nix::Error),

    #[error("failed to set non-blocking mode on pipe read end")]
    SetNonBlocking(#[source] nix::Error),

    #[error("failed to create timer descriptor")]
    TimerCreate(#[source] nix::Error),

    #[error("failed to arm timer descriptor")]
    TimerArm(#[source] nix::Error),

    #[error("failed to create epoll instance")]
    EpollCreate(#[source] nix::Error),

    #[error("failed to register descriptor with epoll")]
    EpollCtl(#[source] nix::Error),

    #[error("epoll_wait failed")]
    EpollWait(#[source] nix::Error),

    #[error("fork failed")]
    Fork(#[source] nix::Error),

    #[error("failed to deliver SIGKILL to child")]
    Kill(#[source] nix::Error),

    #[error("waitpid failed")]
    Wait(#[source] nix::Error),

    #[error("read from pipe failed")]
    Read(#[source] nix::Error),

    #[error("result buffer allocation failed")]
    Alloc,
}

impl HostError {
    /// Maps this plumbing error onto the public taxonomy. A handful of
    /// failure modes (short write in the child, fd-close failure) are
    /// reported as `RESOURCE_BUSY` per §7; everything else that happens in
    /// the parent before the callee could possibly have run is an
    /// unclassified `FAILURE`.
    pub fn to_status(&self) -> crate::Status {
        match self {
            HostError::Pipe(_) | HostError::SetNonBlocking(_) => crate::Status::ResourceBusy,
            _ => crate::Status::Failure,
        }
    }
}
