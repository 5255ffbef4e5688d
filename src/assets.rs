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

//! The two loader stages shipped next to the executable.

use std::path::{Path, PathBuf};

use crate::error::{Result, TapeError};
use crate::tape::LOADER_HEADER_SIZE;

/// Default file name of the header stage.
pub const HEADER_FILE_NAME: &str = "loader-header.prg";

/// Default file name of the boot stage.
pub const BOOT_FILE_NAME: &str = "loader-boot.prg";

/// The loader header template and boot block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderAssets {
    pub header: Vec<u8>,
    pub boot: Vec<u8>,
}

impl LoaderAssets {
    /// Load both stages from `dir` using the default file names.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        Self::load(&dir.join(HEADER_FILE_NAME), &dir.join(BOOT_FILE_NAME))
    }

    /// Load both stages.
    pub fn load(header_path: &Path, boot_path: &Path) -> Result<Self> {
        let header = read_asset(header_path)?;
        if header.len() != LOADER_HEADER_SIZE {
            return Err(TapeError::InvalidAsset {
                path: header_path.to_path_buf(),
                reason: format!(
                    "expected {} bytes, got {}",
                    LOADER_HEADER_SIZE,
                    header.len()
                ),
            });
        }

        let boot = read_asset(boot_path)?;
        if boot.len() <= 2 {
            return Err(TapeError::InvalidAsset {
                path: boot_path.to_path_buf(),
                reason: "boot block has no code after its load address".to_string(),
            });
        }

        Ok(Self { header, boot })
    }
}

fn read_asset(path: &Path) -> Result<Vec<u8>> {
    if !path.is_file() {
        return Err(TapeError::MissingAsset {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read(path)?)
}

/// The directory holding the running executable.
pub fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}
