// TurboTap64 - Turbo-loading C64 cassette images from crunched PRG files
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! End-to-end CLI integration tests.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_turbotap64"))
}

fn write_assets(dir: &Path) {
    let mut header = vec![0x20; 0xc2];
    header[..2].copy_from_slice(&[0x3c, 0x03]);
    fs::write(dir.join("loader-header.prg"), header).unwrap();
    fs::write(dir.join("loader-boot.prg"), [0xbc, 0x02, 0x60]).unwrap();
}

fn write_game(path: &Path) {
    fs::write(
        path,
        [0x01, 0x08, 0x0b, 0x08, 0x0a, 0x00, 0x9e, b'2', b'0', b'6', b'1', 0x00, 0x00, 0x00, 0x60],
    )
    .unwrap();
}

/// Test --help flag.
#[test]
fn test_help_flag() {
    let output = cargo_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("turbotap64") || stdout.contains("TurboTap64"));
    assert!(stdout.contains("--effect"));
    assert!(stdout.contains("--compilation"));
}

/// Test --version flag.
#[test]
fn test_version_flag() {
    let output = cargo_bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("turbotap64"));
    assert!(stdout.contains("0.1.0"));
}

/// Test listing effects and colours.
#[test]
fn test_list_menus() {
    let output = cargo_bin()
        .arg("--list")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0 - Original"));
    assert!(stdout.contains("J - It's a sin!"));
    assert!(stdout.contains("D - Light Blue"));
}

/// Test converting a single program.
#[test]
fn test_convert_single_file() {
    let temp_dir = TempDir::new().unwrap();
    write_assets(temp_dir.path());
    let input = temp_dir.path().join("Boulder Dash-[ex].prg");
    write_game(&input);
    let out = temp_dir.path().join("tapes");

    let output = cargo_bin()
        .arg(&input)
        .arg("--assets")
        .arg(temp_dir.path())
        .arg("-o")
        .arg(&out)
        .args(["--effect", "random", "--colour", "2", "--clear-screen", "--seed", "64"])
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "Conversion failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Running length"));

    let image = fs::read(out.join("Boulder Dash.tap")).unwrap();
    assert_eq!(&image[..12], b"C64-TAPE-RAW");
}

/// Test the default output directory next to the input file.
#[test]
fn test_default_output_dir() {
    let temp_dir = TempDir::new().unwrap();
    write_assets(temp_dir.path());
    let input = temp_dir.path().join("elite.prg");
    write_game(&input);

    let output = cargo_bin()
        .arg(&input)
        .arg("--assets")
        .arg(temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    assert!(temp_dir.path().join("elite.prg-TAP").join("elite.tap").is_file());
}

/// Test a path that is neither file nor directory.
#[test]
fn test_invalid_input_path() {
    let temp_dir = TempDir::new().unwrap();
    write_assets(temp_dir.path());

    let output = cargo_bin()
        .arg(temp_dir.path().join("missing.prg"))
        .arg("--assets")
        .arg(temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("E001"));
}

/// Test running without the loader stages.
#[test]
fn test_missing_assets() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("game.prg");
    write_game(&input);

    let output = cargo_bin()
        .arg(&input)
        .arg("--assets")
        .arg(temp_dir.path().join("nowhere"))
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("loader-header.prg"));
}

/// Test rejecting an unknown effect key.
#[test]
fn test_invalid_effect() {
    let output = cargo_bin()
        .args(["game.prg", "--effect", "Z"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}
