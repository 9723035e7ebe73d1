//! This build script copies the `memory.x` file from the crate root into a directory where
//! the linker can always find it at build time, and records the build time as the
//! initial wall clock of the firmware.

use std::{env, fs::File, io::Write, path::PathBuf};

fn main() {
    // Put memory layout in the output directory and ensure it's on the linker search path.
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());

    // Seconds since the Unix epoch (UTC) at build time. The watch has no RTC
    // backup, so this is where the clock starts after flashing.
    File::create(out.join("utc.rs"))
        .unwrap()
        .write_fmt(format_args!(
            "const BUILD_EPOCH_SECS: i64 = {:?};",
            chrono::Utc::now().timestamp()
        ))
        .unwrap();

    // By default, Cargo will re-run a build script whenever any file in the project changes,
    // which keeps the recorded build time fresh.
}
