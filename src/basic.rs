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

//! Scanner for the `SYS` line crunchers put at the BASIC start.
//!
//! A tokenized BASIC line is laid out as:
//! - 2-byte link to the next line
//! - 2-byte line number
//! - tokens and PETSCII text
//! - `$00` terminator
//!
//! Only a `SYS` at the very start of the first line is accepted, e.g.
//! `10 SYS2061` or `0 SYS(2061) EXOMIZER`.

/// The default BASIC start address.
pub const BASIC_START_ADDRESS: u16 = 0x0801;

/// The BASIC token for `SYS`.
pub const SYS_TOKEN: u8 = 0x9e;

/// Give up on lines longer than this.
const MAX_LINE_SCAN: usize = 1000;

/// Find the jump address of the `SYS` statement at the BASIC start.
///
/// `basic_offset` is the index of the BASIC start within `prg`, which
/// includes its 2-byte load address.
pub fn find_sys(prg: &[u8], basic_offset: usize) -> Option<u16> {
    // Skip load address, link and line number
    let token_index = basic_offset.checked_add(6)?;
    if *prg.get(token_index)? != SYS_TOKEN {
        return None;
    }

    let mut i = token_index + 1;
    while i - basic_offset < MAX_LINE_SCAN {
        let c = *prg.get(i)?;
        if c == 0x00 {
            return None;
        }

        if c != b' ' && c != b'(' {
            let digits = prg[i..].iter().take_while(|b| b.is_ascii_digit()).count();
            if digits > 0 {
                let text = std::str::from_utf8(&prg[i..i + digits]).ok()?;
                return text.parse::<u16>().ok();
            }
        }

        i += 1;
    }

    None
}
