//! Developer CLI for driving one ENI invocation against an arbitrary
//! compiled extension library. Not part of the core's external contract
//! (§6): `eni-sandbox` itself parses no CLI arguments and opens no files.
//!
//! Symbol resolution (this binary's job) is explicitly out of scope for the
//! core crate (§1); it's handled here with `libloading`, entirely outside
//! the sandbox.

use std::ffi::CString;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use eni_sandbox::{Config, RawCallee, Status};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ShapeArg {
    Fixed64,
    Cstring,
}

/// Invoke a single ENI operation from a compiled extension library.
#[derive(Debug, Parser)]
#[command(name = "eni-cli", version)]
struct Opt {
    /// Path to the compiled extension shared object (.so).
    library: String,

    /// Symbol name to resolve and invoke.
    symbol: String,

    /// Result shape the callee declares.
    #[arg(value_enum)]
    shape: ShapeArg,

    /// NUL-terminated argument text passed to the callee.
    #[arg(long, default_value = "")]
    args: String,

    /// Override the default 3-second deadline, in milliseconds.
    #[arg(long)]
    deadline_ms: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opt = Opt::parse();

    // SAFETY: the user vouches for `library`/`symbol` naming a function
    // matching `eni_sandbox::CalleeFn`'s signature and ABI; that contract
    // cannot be checked by `libloading` or by this CLI.
    let library = unsafe { libloading::Library::new(&opt.library) }?;
    let symbol: libloading::Symbol<eni_sandbox::CalleeFn> =
        unsafe { library.get(opt.symbol.as_bytes()) }?;
    let callee = unsafe { RawCallee::new(*symbol) };

    let mut cfg = Config::default();
    if let Some(ms) = opt.deadline_ms {
        cfg.deadline = Duration::from_millis(ms);
    }

    let args = CString::new(opt.args)?;

    let status = match opt.shape {
        ShapeArg::Fixed64 => {
            let (value, status) = eni_sandbox::invoke_fixed64_with_config(callee, &args, &cfg);
            println!("status: {status}");
            if status == Status::Success {
                println!("value: {value}");
            }
            status
        }
        ShapeArg::Cstring => {
            let (value, status) = eni_sandbox::invoke_cstring_with_config(callee, &args, &cfg);
            println!("status: {status}");
            if let Some(bytes) = value {
                println!("value: {:?}", String::from_utf8_lossy(&bytes));
            }
            status
        }
    };

    std::process::exit(exit_code_for(status));
}

fn exit_code_for(status: Status) -> i32 {
    match status {
        Status::Success => 0,
        s if s.is_callee_attributable() => 1,
        _ => 2,
    }
}
