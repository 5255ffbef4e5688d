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

//! Error types for TurboTap64.
//!
//! Every failure of the conversion pipeline is a [`TapeError`]. Errors that
//! concern a single program carry the offending file name so that a batch
//! run can report which input stopped it.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::tape::TapImageFault;

/// Error codes for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Encoding contract errors (E001-E099)
    InvalidArgument,

    // Program errors (E100-E199)
    OutOfAddressRange,
    MissingEntryPoint,
    TruncatedProgram,
    DuplicateOutput,

    // Asset and image errors (E200-E299)
    MissingAsset,
    InvalidAsset,
    InvalidTapImage,

    // I/O errors (E300-E399)
    Io,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "E001",

            ErrorCode::OutOfAddressRange => "E100",
            ErrorCode::MissingEntryPoint => "E101",
            ErrorCode::TruncatedProgram => "E102",
            ErrorCode::DuplicateOutput => "E103",

            ErrorCode::MissingAsset => "E200",
            ErrorCode::InvalidAsset => "E201",
            ErrorCode::InvalidTapImage => "E202",

            ErrorCode::Io => "E300",
        }
    }
}

/// Errors that can occur while building tape images.
#[derive(Debug, Error)]
pub enum TapeError {
    /// An encoding routine was called outside its contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The program does not fit into the loadable memory window.
    #[error("{name}: program must load into the address range $0400 - $cfff (loads at ${load_address:04x}, ends at ${end_address:04x})")]
    OutOfAddressRange {
        name: String,
        load_address: u16,
        end_address: u32,
    },

    /// No BASIC SYS line could be found at $0801.
    #[error("{name}: couldn't locate BASIC SYS line at $0801")]
    MissingEntryPoint { name: String },

    /// The file is too short to hold a load address.
    #[error("{name}: PRG file too short ({len} bytes)")]
    TruncatedProgram { name: String, len: usize },

    /// Two programs of one batch would write the same tape image.
    #[error("{name}: output {} is already produced by another program", .path.display())]
    DuplicateOutput { name: String, path: PathBuf },

    /// A required companion file could not be found.
    #[error("cannot find {}", .path.display())]
    MissingAsset { path: PathBuf },

    /// A companion file exists but does not match its size contract.
    #[error("{}: {reason}", .path.display())]
    InvalidAsset { path: PathBuf, reason: String },

    /// A file that should be a tape image is not one.
    #[error("{}: not a valid TAP image ({reason})", .path.display())]
    InvalidTapImage { path: PathBuf, reason: TapImageFault },

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TapeError {
    /// Get the error code of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            TapeError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            TapeError::OutOfAddressRange { .. } => ErrorCode::OutOfAddressRange,
            TapeError::MissingEntryPoint { .. } => ErrorCode::MissingEntryPoint,
            TapeError::TruncatedProgram { .. } => ErrorCode::TruncatedProgram,
            TapeError::DuplicateOutput { .. } => ErrorCode::DuplicateOutput,
            TapeError::MissingAsset { .. } => ErrorCode::MissingAsset,
            TapeError::InvalidAsset { .. } => ErrorCode::InvalidAsset,
            TapeError::InvalidTapImage { .. } => ErrorCode::InvalidTapImage,
            TapeError::Io(_) => ErrorCode::Io,
        }
    }

    /// Get the error code string.
    pub fn code_str(&self) -> &'static str {
        self.code().code()
    }
}

/// Result type for tape operations.
pub type Result<T> = std::result::Result<T, TapeError>;

/// Format an error for the console.
pub fn format_error(error: &TapeError) -> String {
    format!("error[{}]: {}\n", error.code_str(), error)
}
