//! C ABI surface for embedding [`eni_sandbox`] in a non-Rust VM host (§4.9).
//!
//! Every function here is `#[no_mangle] extern "C"` and takes only plain
//! data or raw pointers; none of it is part of `eni_sandbox`'s own public
//! API, which stays pure Rust.

use std::ffi::CStr;
use std::os::raw::c_char;
use std::time::Duration;

use eni_sandbox::{CalleeFn, Config, RawCallee, Status};

/// Mirrors [`eni_sandbox::Status`] as a plain `i32` for C callers.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EniStatus {
    Success = 0,
    Failure = 11,
    ResourceBusy = 12,
    SeccompFail = 13,
    Tle = 21,
    Killed = 22,
    Segfault = 23,
    NullResult = 24,
}

impl From<Status> for EniStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => EniStatus::Success,
            Status::Failure => EniStatus::Failure,
            Status::ResourceBusy => EniStatus::ResourceBusy,
            Status::SeccompFail => EniStatus::SeccompFail,
            Status::Tle => EniStatus::Tle,
            Status::Killed => EniStatus::Killed,
            Status::Segfault => EniStatus::Segfault,
            Status::NullResult => EniStatus::NullResult,
        }
    }
}

fn config_for(deadline_ms: u64) -> Config {
    if deadline_ms == 0 {
        Config::default()
    } else {
        Config {
            deadline: Duration::from_millis(deadline_ms),
            ..Config::default()
        }
    }
}

/// Invokes `callee` as a `Fixed64` operation.
///
/// `args` must be a valid, NUL-terminated string. `deadline_ms` of `0` means
/// "use the default deadline". On [`EniStatus::Success`], `*out_value` is
/// set to the callee's result; on any other status it is left untouched.
///
/// # Safety
/// `callee` must be a valid extern "C" function pointer matching
/// [`eni_sandbox::CalleeFn`]'s signature; `args` and `out_value` must be
/// valid for the lifetime of this call.
#[no_mangle]
pub unsafe extern "C" fn eni_invoke_fixed64(
    callee: CalleeFn,
    args: *const c_char,
    deadline_ms: u64,
    out_value: *mut i64,
) -> EniStatus {
    let args = unsafe { CStr::from_ptr(args) };
    let callee = unsafe { RawCallee::new(callee) };
    let cfg = config_for(deadline_ms);

    let (value, status) = eni_sandbox::invoke_fixed64_with_config(callee, args, &cfg);
    if status == Status::Success {
        unsafe { *out_value = value };
    } else {
        tracing::debug!(?status, "eni_invoke_fixed64 returned non-success");
    }
    status.into()
}

/// Invokes `callee` as a `CString` operation.
///
/// On [`EniStatus::Success`], `*out_buf`/`*out_len` are set to a
/// heap-allocated buffer (including the terminating NUL byte) that the
/// caller must release with [`eni_free_buffer`]; on any other status they
/// are left untouched.
///
/// # Safety
/// Same requirements as [`eni_invoke_fixed64`], plus `out_buf`/`out_len`
/// must be valid for the lifetime of this call.
#[no_mangle]
pub unsafe extern "C" fn eni_invoke_cstring(
    callee: CalleeFn,
    args: *const c_char,
    deadline_ms: u64,
    out_buf: *mut *mut u8,
    out_len: *mut usize,
) -> EniStatus {
    let args = unsafe { CStr::from_ptr(args) };
    let callee = unsafe { RawCallee::new(callee) };
    let cfg = config_for(deadline_ms);

    let (value, status) = eni_sandbox::invoke_cstring_with_config(callee, args, &cfg);
    if let (Status::Success, Some(bytes)) = (status, value) {
        let len = bytes.len();
        let boxed = bytes.into_boxed_slice();
        let ptr = Box::into_raw(boxed) as *mut u8;
        unsafe {
            *out_buf = ptr;
            *out_len = len;
        }
    } else if status != Status::Success {
        tracing::debug!(?status, "eni_invoke_cstring returned non-success");
    }
    status.into()
}

/// Releases a buffer previously returned by [`eni_invoke_cstring`].
///
/// Passing a `buf`/`len` pair not obtained from [`eni_invoke_cstring`], or
/// calling this twice on the same buffer, is undefined behavior.
///
/// # Safety
/// `buf` must be the unmodified pointer `eni_invoke_cstring` wrote into
/// `*out_buf`, and `len` the unmodified value it wrote into `*out_len`.
#[no_mangle]
pub unsafe extern "C" fn eni_free_buffer(buf: *mut u8, len: usize) {
    if buf.is_null() {
        return;
    }
    let slice_ptr = std::ptr::slice_from_raw_parts_mut(buf, len);
    drop(unsafe { Box::from_raw(slice_ptr) });
}

/// Returns a static, NUL-terminated description of `status`. The returned
/// pointer is valid for the lifetime of the process and must not be freed.
#[no_mangle]
pub extern "C" fn eni_status_describe(status: EniStatus) -> *const c_char {
    let text: &'static CStr = match status {
        EniStatus::Success => c"success",
        EniStatus::Failure => c"generic host-side failure",
        EniStatus::ResourceBusy => c"host resource temporarily unavailable",
        EniStatus::SeccompFail => c"child failed to install the seccomp filter",
        EniStatus::Tle => c"callee exceeded its deadline",
        EniStatus::Killed => c"callee was killed",
        EniStatus::Segfault => c"callee received SIGSEGV",
        EniStatus::NullResult => c"callee returned a null result pointer",
    };
    text.as_ptr()
}
