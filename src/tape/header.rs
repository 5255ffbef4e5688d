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

//! Personalisation of the loader's CBM header block.
//!
//! The header image is a PRG of `$c2` bytes: a 2-byte load address
//! (`$033c`, the cassette buffer) followed by the 192-byte CBM header:
//! - `$02`: header type
//! - `$03-$06`: start and end address of the boot code
//! - `$07-$16`: 16-byte filename shown in the FOUND message
//! - `$17-$a5`: turbo loader code
//! - `$a6-$c1`: loading effect routine, called for every bit read

use crate::error::{Result, TapeError};

/// Size of the header image including its load address.
pub const LOADER_HEADER_SIZE: usize = 0xc2;

/// Offset of the filename field.
pub const FILENAME_OFFSET: usize = 0x07;

/// Width of the filename field.
pub const FILENAME_LENGTH: usize = 0x10;

/// Offset of the loading effect routine.
pub const EFFECT_OFFSET: usize = 0xa6;

/// Maximum size of a loading effect routine.
pub const MAX_EFFECT_LENGTH: usize = LOADER_HEADER_SIZE - EFFECT_OFFSET;

/// Fill byte for blanked fields.
const BLANK: u8 = b' ';

/// Build the header block for one program.
///
/// `filename` is the complete content of the filename field (any control
/// prefix included) and `effect` the loading effect routine. The template is
/// not modified.
pub fn build_loader_header(template: &[u8], filename: &[u8], effect: &[u8]) -> Result<Vec<u8>> {
    if template.len() != LOADER_HEADER_SIZE {
        return Err(TapeError::InvalidArgument(format!(
            "loader header must be {} bytes, got {}",
            LOADER_HEADER_SIZE,
            template.len()
        )));
    }
    if filename.len() > FILENAME_LENGTH {
        return Err(TapeError::InvalidArgument(format!(
            "filename of {} bytes exceeds the {}-byte field",
            filename.len(),
            FILENAME_LENGTH
        )));
    }
    if effect.len() > MAX_EFFECT_LENGTH {
        return Err(TapeError::InvalidArgument(format!(
            "loading effect of {} bytes exceeds {} bytes",
            effect.len(),
            MAX_EFFECT_LENGTH
        )));
    }

    let mut header = template.to_vec();

    let name_field = &mut header[FILENAME_OFFSET..FILENAME_OFFSET + FILENAME_LENGTH];
    name_field.fill(BLANK);
    name_field[..filename.len()].copy_from_slice(filename);

    let effect_field = &mut header[EFFECT_OFFSET..];
    effect_field.fill(BLANK);
    effect_field[..effect.len()].copy_from_slice(effect);

    Ok(header)
}
