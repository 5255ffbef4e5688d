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

//! TurboTap64 Library
//!
//! This library turns crunched Commodore 64 programs into TAP cassette
//! images that load with a turbo loader, and packs batches of them onto
//! compilation cassettes.
//!
//! # Modules
//!
//! - [`error`] - Error types and error reporting
//! - [`prg`] - PRG file reading and validation
//! - [`basic`] - Locating the `SYS` line of a crunched program
//! - [`tape`] - Pulse encoding and TAP image writing
//! - [`effects`] - Loading effects and FOUND message styling
//! - [`assets`] - The loader stages written in front of every program
//! - [`packing`] - Best-fit-decreasing distribution over cassette sides
//! - [`compilation`] - Joined side images and contents listings
//! - [`convert`] - Batch conversion
//!
//! # Example
//!
//! ```no_run
//! use turbotap64::{assets::LoaderAssets, convert};
//! use std::path::Path;
//!
//! fn build(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
//!     let assets = LoaderAssets::from_dir(Path::new("assets"))?;
//!     let options = convert::ConvertOptions::new(convert::default_output_dir(input));
//!
//!     for record in convert::convert_path(input, &assets, &options)?.records {
//!         println!("{}: {:.1}s", record.title, record.duration);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod basic;
pub mod compilation;
pub mod convert;
pub mod effects;
pub mod error;
pub mod packing;
pub mod prg;
pub mod tape;

// Re-export commonly used types
pub use convert::{ConvertOptions, TapRecord};
pub use error::{format_error, ErrorCode, Result, TapeError};
pub use packing::{best_fit_decreasing, Packing};
pub use prg::PrgFile;

/// The version of TurboTap64.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the tool.
pub const NAME: &str = "TurboTap64";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name() {
        assert_eq!(NAME, "TurboTap64");
    }
}
