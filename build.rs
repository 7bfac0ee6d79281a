use chrono::Utc;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    Some(hash.trim().to_string()).filter(|h| !h.is_empty())
}

fn main() {
    let out_dir = PathBuf::from(env::var_os("OUT_DIR").expect("cargo sets OUT_DIR"));
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    let built = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let hash = git_short_hash().unwrap_or_else(|| "unknown".to_string());

    let generated = format!(
        "pub const BUILD_TIME: &str = {built:?};\n\
         pub const GIT_HASH: &str = {hash:?};\n\
         pub const LONG_VERSION: &str = {long:?};\n",
        long = format!("{version} ({hash} built {built})"),
    );
    fs::write(out_dir.join("version.rs"), generated).expect("write version.rs");

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=Cargo.toml");
}
