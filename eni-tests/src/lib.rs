//! No library surface of its own: this crate exists to hold
//! `testdata/payload.c`, the build script that compiles it, and the
//! integration tests under `tests/` that `dlopen` the result.
