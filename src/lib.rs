//! Sandboxed synchronous invocation of untrusted ENI (extension native
//! interface) operations.
//!
//! This crate forks a child process per invocation, strips it down to a
//! single pipe write end, installs the kernel's strict seccomp mode, runs
//! the caller-supplied function, and reports the outcome as one of a small,
//! stable [`Status`] codes, never panicking or blocking the host beyond a
//! configurable deadline.
//!
//! # Platform support
//! Linux only. The design depends on `fork`, `seccomp(2)` strict mode,
//! `epoll`, and `timerfd`, none of which have portable equivalents; there is
//! no fallback backend for other platforms (see the Non-goals in the design
//! notes).
//!
//! # Example
//! ```no_run
//! use std::ffi::CString;
//! use eni_sandbox::{invoke_fixed64, RawCallee, Status};
//!
//! unsafe extern "C" fn returns_42(_args: *const std::os::raw::c_char) -> *mut std::os::raw::c_void {
//!     Box::into_raw(Box::new(42i64)) as *mut std::os::raw::c_void
//! }
//!
//! let callee = unsafe { RawCallee::new(returns_42) };
//! let args = CString::new("").unwrap();
//! let (value, status) = invoke_fixed64(callee, &args);
//! assert_eq!(status, Status::Success);
//! assert_eq!(value, 42);
//! ```

#[cfg(not(target_os = "linux"))]
compile_error!("eni-sandbox only supports Linux: it depends on fork, seccomp strict mode, epoll, and timerfd");

mod child;
mod config;
mod error;
mod executor;
mod fd;
mod pipe;
mod reader;
mod reaper;
mod seccomp;
mod shape;
mod status;
mod util;

use std::ffi::CStr;

pub use config::Config;
pub use shape::{CalleeFn, RawCallee, Shape};
pub use status::Status;

/// Invokes `callee` as a [`Shape::Fixed64`] operation using
/// [`Config::default`].
///
/// On [`Status::Success`], the returned `i64` is the value the callee
/// returned a pointer to; on any other status it is `0`.
pub fn invoke_fixed64(callee: RawCallee, args: &CStr) -> (i64, Status) {
    invoke_fixed64_with_config(callee, args, &Config::default())
}

/// As [`invoke_fixed64`], with an explicit [`Config`].
pub fn invoke_fixed64_with_config(callee: RawCallee, args: &CStr, cfg: &Config) -> (i64, Status) {
    let (buffer, status) = executor::invoke(callee, args, Shape::Fixed64, cfg);
    match (buffer, status) {
        (Some(bytes), Status::Success) if bytes.len() == 8 => {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&bytes);
            (i64::from_le_bytes(raw), Status::Success)
        }
        (_, Status::Success) => {
            // A well-behaved callee always produces exactly 8 bytes for
            // Fixed64; anything else is a host/callee contract violation we
            // did not anticipate and must not silently coerce.
            (0, Status::Failure)
        }
        (_, other) => (0, other),
    }
}

/// Invokes `callee` as a [`Shape::CString`] operation using
/// [`Config::default`].
///
/// On [`Status::Success`], the returned buffer includes the terminating
/// NUL; on any other status it is `None`.
pub fn invoke_cstring(callee: RawCallee, args: &CStr) -> (Option<Vec<u8>>, Status) {
    invoke_cstring_with_config(callee, args, &Config::default())
}

/// As [`invoke_cstring`], with an explicit [`Config`].
pub fn invoke_cstring_with_config(
    callee: RawCallee,
    args: &CStr,
    cfg: &Config,
) -> (Option<Vec<u8>>, Status) {
    executor::invoke(callee, args, Shape::CString, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::raw::{c_char, c_void};

    unsafe extern "C" fn echo_fixed(args: *const c_char) -> *mut c_void {
        let value: i64 = std::ffi::CStr::from_ptr(args)
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        Box::into_raw(Box::new(value)) as *mut c_void
    }

    unsafe extern "C" fn returns_hello(_args: *const c_char) -> *mut c_void {
        let s = std::ffi::CString::new("hello").unwrap();
        s.into_raw() as *mut c_void
    }

    unsafe extern "C" fn returns_null(_args: *const c_char) -> *mut c_void {
        std::ptr::null_mut()
    }

    unsafe extern "C" fn spins_forever(_args: *const c_char) -> *mut c_void {
        loop {
            std::hint::spin_loop();
        }
    }

    #[test]
    fn fixed64_round_trips_negative_one() {
        let callee = unsafe { RawCallee::new(echo_fixed) };
        let args = std::ffi::CString::new("-1").unwrap();
        let (value, status) = invoke_fixed64(callee, &args);
        assert_eq!(status, Status::Success);
        assert_eq!(value, -1);
    }

    #[test]
    fn cstring_round_trips_hello() {
        let callee = unsafe { RawCallee::new(returns_hello) };
        let args = std::ffi::CString::new("").unwrap();
        let (value, status) = invoke_cstring(callee, &args);
        assert_eq!(status, Status::Success);
        assert_eq!(value.unwrap(), b"hello\0");
    }

    #[test]
    fn null_return_is_classified() {
        let callee = unsafe { RawCallee::new(returns_null) };
        let args = std::ffi::CString::new("").unwrap();
        let (value, status) = invoke_cstring(callee, &args);
        assert_eq!(status, Status::NullResult);
        assert!(value.is_none());
    }

    #[test]
    fn deadline_kills_spinning_callee() {
        let callee = unsafe { RawCallee::new(spins_forever) };
        let args = std::ffi::CString::new("").unwrap();
        let cfg = Config {
            deadline: std::time::Duration::from_millis(200),
            ..Config::default()
        };
        let started = std::time::Instant::now();
        let (value, status) = invoke_fixed64_with_config(callee, &args, &cfg);
        assert_eq!(status, Status::Tle);
        assert_eq!(value, 0);
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }
}
