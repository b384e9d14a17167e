use chrono::Utc;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Schema version of the TOML config file, taken from `[package.metadata]`.
fn config_version(cargo_toml_path: &Path) -> String {
    fs::read_to_string(cargo_toml_path)
        .ok()
        .and_then(|content| content.parse::<toml::Table>().ok())
        .and_then(|manifest| {
            manifest
                .get("package")?
                .get("metadata")?
                .get("config_version")?
                .as_integer()
        })
        .map(|v| v.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn git_short_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let out_dir = env::var_os("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("version.rs");
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let cargo_toml_path = Path::new(&manifest_dir).join("Cargo.toml");

    // Skip when the generated file is newer than the manifest
    if let (Ok(generated), Ok(manifest)) = (fs::metadata(&dest_path), fs::metadata(&cargo_toml_path)) {
        if let (Ok(generated), Ok(manifest)) = (generated.modified(), manifest.modified()) {
            if generated >= manifest {
                return;
            }
        }
    }

    let build_time = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

    let mut f = File::create(&dest_path).unwrap();
    writeln!(
        &mut f,
        r###"pub const CONFIG_VERSION: &str = "{}";
pub const BUILD_TIME: &str = "{}";
pub const GIT_HASH: &str = "{}";"###,
        config_version(&cargo_toml_path),
        build_time,
        git_short_hash()
    )
    .unwrap();

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=.git/HEAD");
}
