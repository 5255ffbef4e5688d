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

//! Fuzz target for PRG validation.
//!
//! Feeds random files through the load range check and the SYS scanner.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_prg

#![no_main]

use libfuzzer_sys::fuzz_target;
use turbotap64::basic::find_sys;
use turbotap64::PrgFile;

fuzz_target!(|data: &[u8]| {
    if let Ok(prg) = PrgFile::from_bytes("fuzz.prg", data.to_vec()) {
        // Must return Ok or Err, never panic
        let _ = prg.validate();
    }

    for offset in [0, 1, 0x0401, usize::MAX] {
        let _ = find_sys(data, offset);
    }
});
