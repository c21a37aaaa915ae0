use std::env;
use std::path::PathBuf;

/// Compiles `testdata/payload.c` into a shared object the integration tests
/// `dlopen` at runtime. `cc::Build` targets static objects meant for linking
/// into the Rust build, not a standalone `.so`, so the compiler it locates
/// is invoked directly with `-shared -fPIC` instead of through `Build::compile`.
fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let source = manifest_dir.join("testdata").join("payload.c");
    let output = out_dir.join("libpayload.so");

    let compiler = cc::Build::new().cpp(false).get_compiler();
    let mut command = compiler.to_command();
    command
        .arg("-shared")
        .arg("-fPIC")
        .arg("-O1")
        .arg(&source)
        .arg("-o")
        .arg(&output);

    let status = command
        .status()
        .expect("failed to invoke the C compiler to build testdata/payload.c");
    assert!(status.success(), "compiling testdata/payload.c failed");

    println!("cargo:rustc-env=ENI_TEST_PAYLOAD={}", output.display());
    println!("cargo:rerun-if-changed=testdata/payload.c");
}
