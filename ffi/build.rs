//! Generates `include/item_ffi.h` for C and Swift hosts. The header is a
//! build artifact and is not checked in.

fn main() {
    println!("cargo:rerun-if-changed=src");

    let Ok(crate_dir) = std::env::var("CARGO_MANIFEST_DIR") else {
        return;
    };
    let config = cbindgen::Config {
        language: cbindgen::Language::C,
        include_guard: Some("ITEM_FFI_H".to_string()),
        documentation: true,
        // `FfiErrorCode_Ok` rather than a bare `Ok` in the host's namespace.
        enumeration: cbindgen::EnumConfig {
            prefix_with_name: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let generated = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate();

    let header = format!("{crate_dir}/include/item_ffi.h");
    match generated {
        Ok(bindings) => {
            // `false` also means the header was already up to date.
            let changed = bindings.write_to_file(&header);
            if !changed && !std::path::Path::new(&header).is_file() {
                println!("cargo:warning=header not written: {header}");
            }
        }
        Err(e) => println!("cargo:warning=header generation skipped: {e}"),
    }
}
