//! Per-invocation tunables.
//!
//! Mirrors the reference crate's `linux::Settings`: a plain, `Default`-able
//! struct with optional environment-variable overrides, passed by reference
//! rather than stored globally (see §5, "Shared-resource policy").

use std::time::Duration;

use tracing::debug;

/// Conventional Linux fd-table ceiling, used when `RLIMIT_NOFILE` cannot be
/// read. Matches `FD_SETSIZE` on glibc.
const DEFAULT_FD_TABLE_CEILING: i32 = 1024;

const DEFAULT_INITIAL_BUFFER_CAPACITY: usize = 32;

const DEFAULT_DEADLINE: Duration = Duration::from_secs(3);

/// Tunables for a single invocation: the deadline, the result buffer's
/// starting capacity, and the fd-table ceiling Sandbox Setup scans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Wall-clock budget before the parent kills the child and reports
    /// [`crate::Status::Tle`].
    pub deadline: Duration,
    /// Starting capacity of the result buffer; doubles on fill.
    pub initial_buffer_capacity: usize,
    /// Upper bound (exclusive) of the fd index range Sandbox Setup scans.
    pub fd_table_ceiling: i32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            deadline: DEFAULT_DEADLINE,
            initial_buffer_capacity: DEFAULT_INITIAL_BUFFER_CAPACITY,
            fd_table_ceiling: fd_table_ceiling_from_rlimit(),
        }
    }
}

impl Config {
    pub fn new() -> Config {
        Default::default()
    }

    /// Builds a `Config` from defaults, overridden by environment variables
    /// where present and parsable:
    /// - `ENI_SANDBOX_DEADLINE_MS`
    /// - `ENI_SANDBOX_INITIAL_BUFFER`
    /// - `ENI_SANDBOX_FD_CEILING`
    ///
    /// An unset or unparsable variable silently falls back to the default
    /// (logged at `debug` level); this is intended for tests and operational
    /// tuning, not as a required configuration path.
    pub fn from_env() -> Config {
        let mut cfg = Config::default();
        if let Some(ms) = parse_env_var("ENI_SANDBOX_DEADLINE_MS") {
            cfg.deadline = Duration::from_millis(ms);
        }
        if let Some(cap) = parse_env_var("ENI_SANDBOX_INITIAL_BUFFER") {
            cfg.initial_buffer_capacity = cap;
        }
        if let Some(ceiling) = parse_env_var("ENI_SANDBOX_FD_CEILING") {
            cfg.fd_table_ceiling = ceiling;
        }
        cfg
    }
}

fn parse_env_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    match std::env::var(name) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                debug!(name, val, "ignoring unparsable config override");
                None
            }
        },
        Err(_) => None,
    }
}

fn fd_table_ceiling_from_rlimit() -> i32 {
    match nix::sys::resource::getrlimit(nix::sys::resource::Resource::RLIMIT_NOFILE) {
        Ok((soft, _hard)) => {
            // RLIM_INFINITY or anything absurd falls back to the conventional
            // ceiling; we never want to scan billions of fd indices.
            if soft == 0 || soft > (i32::MAX as u64) || soft > 1_000_000 {
                DEFAULT_FD_TABLE_CEILING
            } else {
                soft as i32
            }
        }
        Err(_) => DEFAULT_FD_TABLE_CEILING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_literals() {
        let cfg = Config::default();
        assert_eq!(cfg.deadline, Duration::from_secs(3));
        assert_eq!(cfg.initial_buffer_capacity, 32);
        assert!(cfg.fd_table_ceiling > 0);
    }
}
