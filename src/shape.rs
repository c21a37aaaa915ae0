//! The closed set of result shapes a callee may declare, and the opaque
//! callee handle itself (§3, §9 "Pointer-typed opaque callees").

use std::os::raw::c_char;

/// How the parent measures and interprets the bytes a callee writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// The callee returns a pointer to an 8-byte signed integer.
    Fixed64,
    /// The callee returns a pointer to a NUL-terminated byte string.
    CString,
}

/// An opaque, already-resolved extension function pointer.
///
/// Constructing one is `unsafe`: the caller vouches that `ptr` is a valid
/// function of the calling convention `extern "C" fn(*const c_char) -> *mut
/// c_void`, that it remains valid for the duration of the invocation, and
/// that it is safe to run in a forked, seccomp-strict child (i.e. it does
/// not assume access to fds other than its own stdout of a single pipe write
/// end, which Sandbox Setup provides).
///
/// Resolving the pointer itself (loading a library, looking up a symbol) is
/// explicitly out of scope for this crate (§1); callers typically use
/// `libloading` or hand-rolled `dlopen`/`dlsym`.
#[derive(Debug, Clone, Copy)]
pub struct RawCallee {
    ptr: usize,
}

/// The calling convention every callee must implement.
pub type CalleeFn = unsafe extern "C" fn(*const c_char) -> *mut std::os::raw::c_void;

impl RawCallee {
    /// # Safety
    /// See the type-level documentation: `ptr` must be a valid, callable
    /// function pointer of type [`CalleeFn`] for the lifetime of the
    /// invocation.
    pub unsafe fn new(ptr: CalleeFn) -> Self {
        RawCallee { ptr: ptr as usize }
    }

    /// Builds a `RawCallee` from a raw address, e.g. one resolved via
    /// `dlsym`.
    ///
    /// # Safety
    /// `ptr` must be non-null and satisfy the same contract as
    /// [`RawCallee::new`].
    pub unsafe fn from_raw_address(ptr: *const std::os::raw::c_void) -> Self {
        RawCallee { ptr: ptr as usize }
    }

    pub(crate) fn as_fn(self) -> CalleeFn {
        // SAFETY: upheld by the constructor's contract.
        unsafe { std::mem::transmute::<usize, CalleeFn>(self.ptr) }
    }
}
