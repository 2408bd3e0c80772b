//! Build script: embeds the git hash and pre-flight-checks GPU toolkits
//! before whisper-rs-sys tries to compile with a GPU feature enabled.

use std::process::Command;

fn main() {
    // Embed git short hash for version string
    if let Ok(output) = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        && output.status.success()
    {
        let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=GIT_HASH={}", hash);
    }
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");

    if cfg!(feature = "cuda") {
        check_tool(
            "nvcc",
            &["--version"],
            "CUDA toolkit not found. Install it or build without the `cuda` feature.",
        );
    }
    if cfg!(feature = "vulkan") {
        check_tool(
            "vulkaninfo",
            &["--summary"],
            "Vulkan SDK not found. Install it or build without the `vulkan` feature.",
        );
    }
    if cfg!(feature = "hipblas") {
        check_tool(
            "rocminfo",
            &[],
            "ROCm not found. Install it or build without the `hipblas` feature.",
        );
    }
    if cfg!(feature = "openblas") {
        check_openblas();
    }
}

fn check_tool(tool: &str, args: &[&str], message: &str) {
    if Command::new(tool).args(args).output().is_err() {
        panic!("`{}` not available: {}", tool, message);
    }
    println!("cargo::warning={} detected", tool);
}

fn check_openblas() {
    let pkg_config_ok = Command::new("pkg-config")
        .args(["--exists", "openblas"])
        .status()
        .is_ok_and(|s| s.success());

    if !pkg_config_ok {
        let lib_exists = std::path::Path::new("/usr/lib/x86_64-linux-gnu/libopenblas.so").exists()
            || std::path::Path::new("/usr/lib/libopenblas.so").exists()
            || std::path::Path::new("/usr/lib64/libopenblas.so").exists();

        if !lib_exists {
            panic!("OpenBLAS not found. Install libopenblas-dev or build without the `openblas` feature.");
        }
    }
    println!("cargo::warning=OpenBLAS detected");
}
