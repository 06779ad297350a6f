//! Generates `include/skein.h` from the exported surface.

use std::env;
use std::path::{Path, PathBuf};

const HEADER: &str = "skein.h";

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=cbindgen.toml");
    println!("cargo:rerun-if-env-changed=DOCS_RS");

    // docs.rs builds from a read-only source tree.
    if env::var_os("DOCS_RS").is_some() {
        return;
    }

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("cargo sets CARGO_MANIFEST_DIR"));
    write_header(&crate_dir, &crate_dir.join("include"));
}

fn write_header(crate_dir: &Path, include_dir: &Path) {
    let config = cbindgen::Config::from_file(crate_dir.join("cbindgen.toml"))
        .unwrap_or_else(|e| panic!("cbindgen.toml: {e}"));
    std::fs::create_dir_all(include_dir)
        .unwrap_or_else(|e| panic!("creating {}: {e}", include_dir.display()));

    let bindings = match cbindgen::generate_with_config(crate_dir, config) {
        Ok(b) => b,
        Err(e) => panic!("generating {HEADER}: {e}"),
    };
    // Leaves the file untouched when the contents are unchanged.
    bindings.write_to_file(include_dir.join(HEADER));
}
