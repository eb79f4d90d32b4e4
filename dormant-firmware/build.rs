//! Build script for dormant-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates wake.toml and encodes it as postcard for the binaries

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use dormant_core::config::{DemoConfig, MAX_ENCODED_LEN};

/// Backup SRAM words on the STM32F405 (4KB)
const BACKUP_WORDS: usize = 1024;

fn main() {
    setup_linker();
    encode_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Parse, validate and encode wake.toml
fn encode_config() {
    println!("cargo:rerun-if-changed=wake.toml");

    let config_path = Path::new("wake.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: wake.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds its settings from wake.toml.                ║\n\
            ║  Please create one in the dormant-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read wake.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: DemoConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid wake.toml                                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    if let Err(e) = config.validate(BACKUP_WORDS) {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: wake.toml failed validation                              ║\n\
            ║                                                                  ║\n\
            ║  {:<64} ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format!("{:?}", e)
        );
    }

    let mut buf = [0u8; MAX_ENCODED_LEN];
    let encoded = config
        .encode(&mut buf)
        .expect("encoded config exceeds MAX_ENCODED_LEN");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("wake.bin"), &*encoded).unwrap();

    println!(
        "cargo:warning=wake.toml validated successfully ({} bytes)",
        encoded.len()
    );
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
