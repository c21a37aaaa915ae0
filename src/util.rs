//! Small helpers shared by the child-side and parent-side code.

/// Terminates the calling process immediately via the raw `exit` syscall
/// (`SYS_exit`, *not* `SYS_exit_group`).
///
/// This is the only exit path permitted once the strict seccomp filter is
/// active: libc's `exit`/`std::process::exit` ultimately invoke
/// `exit_group`, which the filter does not allow and which would terminate
/// the child with `SIGKILL` instead of the intended exit code, silently
/// turning every clean exit into a misclassified [`crate::Status::Killed`].
///
/// Never returns.
pub(crate) fn raw_exit(code: i32) -> ! {
    unsafe {
        libc::syscall(libc::SYS_exit, code as libc::c_long);
    }
    // The syscall never returns; this is unreachable, but the compiler
    // cannot know that from a bare `libc::syscall` call.
    loop {
        std::hint::spin_loop();
    }
}
