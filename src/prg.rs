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

//! PRG file reader.
//!
//! PRG format is very simple:
//! - 2-byte load address (little-endian)
//! - Program data
//!
//! Programs must fit between the screen and the I/O area, i.e. into
//! `$0400-$cfff`, and start through a `SYS` line at `$0801`.

use std::path::{Path, PathBuf};

use crate::basic::{find_sys, BASIC_START_ADDRESS};
use crate::error::{Result, TapeError};

/// Lowest address a program may load to.
pub const MIN_LOAD_ADDRESS: u16 = 0x0400;

/// First address a program may not reach.
pub const MAX_END_ADDRESS: u32 = 0xd000;

/// Suffix added by the OneLoad64 collection to crunched files.
const VENDOR_SUFFIX: &str = "-[ex]";

/// A program read from disk.
#[derive(Debug, Clone)]
pub struct PrgFile {
    path: PathBuf,
    name: String,
    title: String,
    data: Vec<u8>,
}

impl PrgFile {
    /// Read a PRG file.
    pub fn read(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| name.clone());

        Self::new(path.to_path_buf(), name, &stem, data)
    }

    /// Create a program from memory. `file_name` is the name it would have on disk.
    pub fn from_bytes(file_name: &str, data: Vec<u8>) -> Result<Self> {
        let path = PathBuf::from(file_name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::new(path, file_name.to_string(), &stem, data)
    }

    fn new(path: PathBuf, name: String, stem: &str, data: Vec<u8>) -> Result<Self> {
        if data.len() < 2 {
            return Err(TapeError::TruncatedProgram {
                name,
                len: data.len(),
            });
        }

        Ok(Self {
            path,
            title: strip_vendor_suffix(stem),
            name,
            data,
        })
    }

    /// The source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file name including extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file name without extension and vendor suffix.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The complete file content, load address included.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The load address.
    pub fn load_address(&self) -> u16 {
        u16::from_le_bytes([self.data[0], self.data[1]])
    }

    /// Number of program bytes after the load address.
    pub fn payload_len(&self) -> usize {
        self.data.len() - 2
    }

    /// Check the load range and locate the entry point.
    ///
    /// Returns the `SYS` address.
    pub fn validate(&self) -> Result<u16> {
        load_range(&self.name, &self.data)?;
        self.sys_address()
    }

    /// The jump address of the `SYS` line at `$0801`.
    ///
    /// Programs loading above the BASIC start cannot carry that line.
    pub fn sys_address(&self) -> Result<u16> {
        let load_address = self.load_address();

        let sys = if load_address <= BASIC_START_ADDRESS {
            find_sys(&self.data, (BASIC_START_ADDRESS - load_address) as usize)
        } else {
            None
        };

        sys.ok_or_else(|| TapeError::MissingEntryPoint {
            name: self.name.clone(),
        })
    }

    /// The title as PETSCII, at most `width` characters.
    pub fn display_name(&self, width: usize) -> Vec<u8> {
        to_petscii(&self.title, width)
    }
}

/// Compute the load and end address of a PRG and check them against the
/// loadable window.
///
/// The end address is one past the last byte and is what the loader stores
/// as the start of the BASIC variables.
pub fn load_range(name: &str, data: &[u8]) -> Result<(u16, u16)> {
    if data.len() < 2 {
        return Err(TapeError::TruncatedProgram {
            name: name.to_string(),
            len: data.len(),
        });
    }

    let load_address = u16::from_le_bytes([data[0], data[1]]);
    let end_address = load_address as u32 + (data.len() - 2) as u32;

    if load_address < MIN_LOAD_ADDRESS || end_address > MAX_END_ADDRESS {
        return Err(TapeError::OutOfAddressRange {
            name: name.to_string(),
            load_address,
            end_address,
        });
    }

    Ok((load_address, end_address as u16))
}

/// Remove every `-[ex]` suffix, ignoring case.
pub fn strip_vendor_suffix(stem: &str) -> String {
    let mut result = stem.to_string();
    while let Some(pos) = result.to_ascii_lowercase().find(VENDOR_SUFFIX) {
        result.replace_range(pos..pos + VENDOR_SUFFIX.len(), "");
    }
    result
}

/// Convert text to upper case PETSCII, truncated to `max_len` characters.
///
/// Characters without a printable PETSCII equivalent become `?`.
pub fn to_petscii(text: &str, max_len: usize) -> Vec<u8> {
    text.chars()
        .map(|c| c.to_ascii_uppercase())
        .map(|c| match c {
            ' '..='_' => c as u8,
            _ => b'?',
        })
        .take(max_len)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_prg() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("Boulder Dash-[EX].prg");
        fs::write(&path, [0x01, 0x08, 0x60]).unwrap();

        let prg = PrgFile::read(&path).unwrap();
        assert_eq!(prg.name(), "Boulder Dash-[EX].prg");
        assert_eq!(prg.title(), "Boulder Dash");
        assert_eq!(prg.load_address(), 0x0801);
        assert_eq!(prg.payload_len(), 1);
    }

    #[test]
    fn test_truncated_prg() {
        assert!(matches!(
            PrgFile::from_bytes("x.prg", vec![0x01]),
            Err(TapeError::TruncatedProgram { len: 1, .. })
        ));
    }

    #[test]
    fn test_load_range_bounds() {
        assert_eq!(load_range("a", &[0x00, 0x04]).unwrap(), (0x0400, 0x0400));
        assert!(load_range("a", &[0xff, 0x03]).is_err());

        // Ends exactly at $d000
        let mut data = vec![0x00, 0xcf];
        data.resize(2 + 0x100, 0xea);
        assert_eq!(load_range("a", &data).unwrap(), (0xcf00, 0xd000));

        data.push(0xea);
        assert!(matches!(
            load_range("a", &data),
            Err(TapeError::OutOfAddressRange { end_address: 0xd001, .. })
        ));
    }

    #[test]
    fn test_high_load_address_has_no_entry_point() {
        let prg = PrgFile::from_bytes("high.prg", vec![0x00, 0x10, 0x60]).unwrap();
        assert!(matches!(
            prg.validate(),
            Err(TapeError::MissingEntryPoint { .. })
        ));
    }

    #[test]
    fn test_validate_finds_sys() {
        let prg = PrgFile::from_bytes(
            "game.prg",
            vec![
                0x01, 0x08, 0x0b, 0x08, 0x0a, 0x00, 0x9e, b'2', b'0', b'6', b'1', 0x00, 0x00, 0x00,
            ],
        )
        .unwrap();
        assert_eq!(prg.validate().unwrap(), 2061);
    }

    #[test]
    fn test_strip_vendor_suffix() {
        assert_eq!(strip_vendor_suffix("Elite-[ex]"), "Elite");
        assert_eq!(strip_vendor_suffix("Elite-[EX]"), "Elite");
        assert_eq!(strip_vendor_suffix("Elite"), "Elite");
        assert_eq!(strip_vendor_suffix("a-[ex]b-[Ex]"), "ab");
    }

    #[test]
    fn test_to_petscii() {
        assert_eq!(to_petscii("Paradroid", 16), b"PARADROID".to_vec());
        assert_eq!(to_petscii("Ghosts'n Goblins", 14), b"GHOSTS'N GOBLI".to_vec());
        assert_eq!(to_petscii("caf\u{e9}~", 16), b"CAF??".to_vec());
    }
}
