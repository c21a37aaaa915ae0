//! Child Runner (§4.2): invokes the callee and reports its result.

use std::ffi::CStr;
use std::os::unix::io::RawFd;

use crate::shape::{RawCallee, Shape};
use crate::util::raw_exit;
use crate::Status;

/// Invokes `callee(args)`, writes the shape-appropriate result to `w`, and
/// raw-exits with a [`Status`] code. Never returns.
///
/// Must only be called after [`super::setup::run`] has succeeded: the
/// strict seccomp filter must already be active, since this is where the
/// untrusted callee actually runs.
pub(crate) fn run(callee: RawCallee, args: &CStr, shape: Shape, w: RawFd) -> ! {
    let result_ptr = unsafe { (callee.as_fn())(args.as_ptr()) };

    if result_ptr.is_null() {
        raw_exit(Status::NullResult.as_i32());
    }

    let len = match shape {
        Shape::Fixed64 => std::mem::size_of::<i64>(),
        Shape::CString => {
            // SAFETY: the callee's contract (§3) guarantees a NUL-terminated
            // byte string when shape is CString and the pointer is non-null.
            let cstr = unsafe { CStr::from_ptr(result_ptr as *const std::os::raw::c_char) };
            cstr.to_bytes_with_nul().len()
        }
    };

    let bytes: &[u8] = unsafe { std::slice::from_raw_parts(result_ptr as *const u8, len) };

    if !write_all(w, bytes) {
        raw_exit(Status::ResourceBusy.as_i32());
    }

    raw_exit(Status::Success.as_i32());
}

/// Writes `buf` to `fd` in full, retrying on short writes, as required by
/// §4.2 step 3. Only `read`/`write`/`_exit`/`rt_sigreturn` are permitted at
/// this point, so this must go through the raw syscall rather than any
/// buffered `std::io` writer.
fn write_all(fd: RawFd, mut buf: &[u8]) -> bool {
    while !buf.is_empty() {
        let n = unsafe { libc::write(fd, buf.as_ptr() as *const libc::c_void, buf.len()) };
        if n <= 0 {
            return false;
        }
        buf = &buf[n as usize..];
    }
    true
}
