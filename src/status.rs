//! The status taxonomy every invocation resolves to.
//!
//! The numeric codes are part of the external contract: they are both the
//! value returned to the host and the exit code the sandboxed child uses to
//! report host-setup failures (see [`crate::child`]).

/// Outcome of a single ENI invocation.
///
/// Codes `>= 20` are callee-attributable (the extension did something wrong
/// or took too long); codes in `11..=13` are host-attributable (something in
/// the sandboxing machinery itself failed before the callee could run).
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Child exited normally with zero; result buffer valid.
    Success = 0,
    /// Unclassified host-side fault.
    Failure = 11,
    /// A required syscall failed (pipe, fd ops, partial write in child).
    ResourceBusy = 12,
    /// Could not install the syscall filter in the child.
    SeccompFail = 13,
    /// Deadline elapsed; child was killed by the parent.
    Tle = 21,
    /// Child terminated by `SIGKILL` from outside, or by filter violation.
    Killed = 22,
    /// Child terminated by `SIGSEGV`.
    Segfault = 23,
    /// Callee returned a null pointer.
    NullResult = 24,
}

impl Status {
    /// The numeric wire/exit code for this status.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Recovers a `Status` from a numeric code, e.g. a child's exit code.
    ///
    /// Returns `None` for codes that are not part of the taxonomy (the
    /// caller should treat that as [`Status::Failure`]).
    pub fn from_i32(code: i32) -> Option<Self> {
        Some(match code {
            0 => Status::Success,
            11 => Status::Failure,
            12 => Status::ResourceBusy,
            13 => Status::SeccompFail,
            21 => Status::Tle,
            22 => Status::Killed,
            23 => Status::Segfault,
            24 => Status::NullResult,
            _ => return None,
        })
    }

    /// Whether this status indicates the fault lies with the host's own
    /// sandboxing machinery rather than the callee.
    pub fn is_host_attributable(self) -> bool {
        matches!(
            self,
            Status::Failure | Status::ResourceBusy | Status::SeccompFail
        )
    }

    /// Whether this status indicates the fault lies with the invoked
    /// extension function.
    pub fn is_callee_attributable(self) -> bool {
        self.as_i32() >= 20
    }

    /// A short, static, human-readable description. Useful for logging and
    /// for FFI consumers that want a message without linking `Display`.
    pub fn describe(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Failure => "unclassified host-side fault",
            Status::ResourceBusy => "a required syscall failed while preparing the sandbox",
            Status::SeccompFail => "could not install the seccomp strict filter",
            Status::Tle => "deadline elapsed, child was killed",
            Status::Killed => "child was killed (signal or filter violation)",
            Status::Segfault => "child terminated by SIGSEGV",
            Status::NullResult => "callee returned a null pointer",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.describe(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_numeric_code() {
        let all = [
            Status::Success,
            Status::Failure,
            Status::ResourceBusy,
            Status::SeccompFail,
            Status::Tle,
            Status::Killed,
            Status::Segfault,
            Status::NullResult,
        ];
        for status in all {
            assert_eq!(Status::from_i32(status.as_i32()), Some(status));
        }
    }

    #[test]
    fn partitions_attributable_classes() {
        assert!(Status::Success.is_host_attributable() == false);
        assert!(Status::Success.is_callee_attributable() == false);
        for status in [Status::Failure, Status::ResourceBusy, Status::SeccompFail] {
            assert!(status.is_host_attributable());
            assert!(!status.is_callee_attributable());
        }
        for status in [Status::Tle, Status::Killed, Status::Segfault, Status::NullResult] {
            assert!(status.is_callee_attributable());
            assert!(!status.is_host_attributable());
        }
    }

    #[test]
    fn unknown_code_is_not_in_taxonomy() {
        assert_eq!(Status::from_i32(7), None);
        assert_eq!(Status::from_i32(1), None);
    }
}
