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

//! Fuzz target for the tape writer.
//!
//! Every image the writer accepts must parse back with a length field
//! matching its pulse data.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_tape

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use turbotap64::effects::LOADING_EFFECTS;
use turbotap64::tape::{build_loader_header, parse_tap, TapWriter, LOADER_HEADER_SIZE};

#[derive(Debug, Arbitrary)]
struct Input {
    load_address: u16,
    program: Vec<u8>,
    boot: Vec<u8>,
    filename: Vec<u8>,
    effect: u8,
}

fuzz_target!(|input: Input| {
    let mut template = vec![0x20; LOADER_HEADER_SIZE];
    template[..2].copy_from_slice(&[0x3c, 0x03]);

    let effect = LOADING_EFFECTS[input.effect as usize % LOADING_EFFECTS.len()].code;
    let header = match build_loader_header(&template, &input.filename, effect) {
        Ok(header) => header,
        Err(_) => return,
    };

    let mut prg = input.load_address.to_le_bytes().to_vec();
    prg.extend_from_slice(&input.program);

    let mut writer = TapWriter::new(Cursor::new(Vec::new()));
    if let Ok(summary) = writer.write_program("fuzz", &header, &input.boot, &prg) {
        let image = writer.into_inner().into_inner();
        let (data_len, body) = parse_tap(&image).expect("writer produced an unreadable image");
        assert_eq!(data_len, summary.data_len);
        assert_eq!(body.len(), data_len as usize);
    }
});
