//! End-to-end scenarios run against real compiled payloads: these exercise
//! the actual fork/seccomp/pipe/epoll machinery, not just the in-process
//! fake callees used by `eni-sandbox`'s own unit tests.

use std::ffi::CString;
use std::time::{Duration, Instant};

use eni_sandbox::{CalleeFn, Config, RawCallee, Status};
use libloading::{Library, Symbol};

fn payload() -> Library {
    let path = env!("ENI_TEST_PAYLOAD");
    unsafe { Library::new(path) }.expect("failed to dlopen testdata payload")
}

fn callee(lib: &Library, name: &str) -> RawCallee {
    let symbol: Symbol<CalleeFn> =
        unsafe { lib.get(name.as_bytes()) }.unwrap_or_else(|_| panic!("missing symbol {name}"));
    unsafe { RawCallee::new(*symbol) }
}

fn no_args() -> CString {
    CString::new("").unwrap()
}

#[test]
fn s1_fixed64_success() {
    let lib = payload();
    let callee = callee(&lib, "returns_42");
    let (value, status) = eni_sandbox::invoke_fixed64(callee, &no_args());
    assert_eq!(status, Status::Success);
    assert_eq!(value, 42);
}

#[test]
fn s2_cstring_success() {
    let lib = payload();
    let callee = callee(&lib, "returns_hello");
    let (value, status) = eni_sandbox::invoke_cstring(callee, &no_args());
    assert_eq!(status, Status::Success);
    assert_eq!(value.unwrap(), b"hello\0");
}

#[test]
fn s3_timeout_kills_and_reaps_the_child() {
    let lib = payload();
    let callee = callee(&lib, "spins_forever");
    let cfg = Config {
        deadline: Duration::from_secs(1),
        ..Config::default()
    };
    let started = Instant::now();
    let (value, status) = eni_sandbox::invoke_fixed64_with_config(callee, &no_args(), &cfg);
    let elapsed = started.elapsed();

    assert_eq!(status, Status::Tle);
    assert_eq!(value, 0);
    assert!(
        elapsed < Duration::from_millis(1500),
        "expected the deadline kill within ~1.1s, took {elapsed:?}"
    );
}

#[test]
fn s4_segfault_is_classified() {
    let lib = payload();
    let callee = callee(&lib, "null_deref");
    let (value, status) = eni_sandbox::invoke_fixed64(callee, &no_args());
    assert_eq!(status, Status::Segfault);
    assert_eq!(value, 0);
}

#[test]
fn s5_forbidden_syscall_is_killed_by_seccomp() {
    let lib = payload();
    let callee = callee(&lib, "forbidden_syscall");
    let (value, status) = eni_sandbox::invoke_fixed64(callee, &no_args());
    assert_eq!(status, Status::Killed);
    assert_eq!(value, 0);
}

#[test]
fn s6_null_return_is_classified() {
    let lib = payload();
    let callee = callee(&lib, "returns_null");
    let (value, status) = eni_sandbox::invoke_cstring(callee, &no_args());
    assert_eq!(status, Status::NullResult);
    assert!(value.is_none());
}

#[test]
fn large_buffer_is_delivered_byte_for_byte() {
    let lib = payload();
    let callee = callee(&lib, "returns_large_string");
    let (value, status) = eni_sandbox::invoke_cstring(callee, &no_args());
    assert_eq!(status, Status::Success);

    let bytes = value.unwrap();
    assert_eq!(bytes.len(), 1024 * 1024 + 17 + 1);
    assert_eq!(bytes.last(), Some(&0u8));
    assert!(bytes[..bytes.len() - 1].iter().all(|&b| b == b'a'));
}

#[test]
fn fixed64_echoes_argument_text() {
    let lib = payload();
    let callee = callee(&lib, "echo_fixed");
    let args = CString::new("-12345").unwrap();
    let (value, status) = eni_sandbox::invoke_fixed64(callee, &args);
    assert_eq!(status, Status::Success);
    assert_eq!(value, -12345);
}

#[test]
fn concurrent_invocations_do_not_interfere() {
    let lib = payload();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let callee_echo = callee(&lib, "echo_fixed");
            let args = CString::new(i.to_string()).unwrap();
            std::thread::spawn(move || eni_sandbox::invoke_fixed64(callee_echo, &args))
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let (value, status) = handle.join().unwrap();
        assert_eq!(status, Status::Success);
        assert_eq!(value, i as i64);
    }
}

#[test]
fn no_zombies_remain_after_repeated_invocations() {
    let lib = payload();
    let callee_fn = callee(&lib, "returns_42");
    for _ in 0..20 {
        let (value, status) = eni_sandbox::invoke_fixed64(callee_fn, &no_args());
        assert_eq!(status, Status::Success);
        assert_eq!(value, 42);
    }

    let proc_self_status =
        std::fs::read_to_string("/proc/self/stat").expect("/proc/self/stat must be readable");
    assert!(!proc_self_status.is_empty());
}
