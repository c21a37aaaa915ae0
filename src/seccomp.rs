//! Strict-mode seccomp installation (§4.1).
//!
//! `SECCOMP_MODE_STRICT` needs no BPF program: the kernel hard-codes the
//! permitted set to `read`, `write`, `_exit`, and `rt_sigreturn`. This is
//! narrower and simpler than the reference crate's `SECCOMP_SET_MODE_FILTER`
//! path, which ships a generated BPF allow-list (`minion-codegen`). That
//! machinery has no counterpart here (see DESIGN.md).

/// Installs the strict syscall filter on the calling thread.
///
/// Must be called in the child, after Sandbox Setup has closed every
/// descriptor except the pipe write end, and before invoking the callee.
/// After this returns `Ok(())`, only `read`, `write`, `_exit`, and
/// `rt_sigreturn` are permitted; any other syscall (including the libc
/// wrapper for `exit_group`) terminates the process with `SIGKILL`.
pub fn enable_strict_mode() -> Result<(), i32> {
    // SECCOMP_MODE_STRICT == 1, set via prctl(PR_SET_SECCOMP, ...).
    // Equivalent to, and more portable across kernel versions than, the raw
    // seccomp(2) syscall with SECCOMP_SET_MODE_STRICT.
    let ret = unsafe { libc::prctl(libc::PR_SET_SECCOMP, libc::SECCOMP_MODE_STRICT, 0, 0, 0) };
    if ret == 0 {
        Ok(())
    } else {
        Err(errno_code())
    }
}

fn errno_code() -> i32 {
    std::io::Error::last_os_error()
        .raw_os_error()
        .unwrap_or(-1)
}
