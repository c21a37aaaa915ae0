use std::env;
use std::path::PathBuf;

fn main() {
    let crate_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let config = cbindgen::Config {
        language: cbindgen::Language::C,
        header: Some("/* Generated by cbindgen. Do not edit by hand. */".to_string()),
        ..Default::default()
    };

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(out_dir.join("eni_ffi.h"));
        }
        Err(err) => {
            // Header generation is a convenience for C/C++ embedders, not a
            // build requirement of the Rust crate itself.
            println!("cargo:warning=cbindgen failed to generate eni_ffi.h: {err}");
        }
    }

    println!("cargo:rerun-if-changed=src/lib.rs");
}
