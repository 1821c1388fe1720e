//! Embeds the commit and build date shown by `sdf --version`.

use std::process::Command;

fn short_commit() -> Option<String> {
    let out = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let hash = String::from_utf8(out.stdout).ok()?;
    let hash = hash.trim();
    (!hash.is_empty()).then(|| hash.to_string())
}

fn main() {
    let commit = short_commit().unwrap_or_else(|| "unknown".into());
    let date = chrono::Utc::now().date_naive();

    println!("cargo:rustc-env=SDF_GIT_HASH={commit}");
    println!("cargo:rustc-env=SDF_BUILD_DATE={date}");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
}
