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

//! TAP image encoding.
//!
//! A TAP (version 1) image is a 20-byte header followed by a stream of
//! pulse lengths:
//! - 12-byte magic `C64-TAPE-RAW`
//! - 1-byte version
//! - 3 reserved bytes
//! - 4-byte little-endian length of the pulse stream
//!
//! Each pulse byte is the pulse length in units of 8 CPU cycles. A zero byte
//! introduces a pause whose length in cycles follows as a 24-bit value.

pub mod checksum;
pub mod header;
pub mod pulse;
pub mod writer;

pub use checksum::xor_checksum;
pub use header::{build_loader_header, LOADER_HEADER_SIZE};
pub use pulse::{EncodeMode, PulseEncoder};
pub use writer::{write_tap, TapSummary, TapWriter};

use std::io::{self, Write};

use thiserror::Error;

/// TAP file signature.
pub const TAP_MAGIC: &[u8; 12] = b"C64-TAPE-RAW";

/// The TAP version written by this crate.
pub const TAP_VERSION: u8 = 1;

/// Size of the TAP file header.
pub const TAP_HEADER_SIZE: usize = 0x14;

/// Offset of the data length field in the TAP file header.
pub const TAP_DATA_LENGTH_OFFSET: usize = 0x10;

/// Why a file is not a usable TAP image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TapImageFault {
    #[error("file shorter than the TAP header")]
    ShortHeader,
    #[error("bad signature")]
    BadSignature,
    #[error("unsupported version {0}")]
    UnsupportedVersion(u8),
    #[error("truncated pulse data")]
    Truncated,
    #[error("pulse data exceeds 4 GiB")]
    TooLarge,
}

/// Write a TAP file header announcing `data_len` bytes of pulse data.
pub fn write_tap_header<W: Write>(out: &mut W, data_len: u32) -> io::Result<()> {
    out.write_all(TAP_MAGIC)?;
    out.write_all(&[TAP_VERSION, 0x00, 0x00, 0x00])?;
    out.write_all(&data_len.to_le_bytes())
}

/// Split a TAP image into its announced data length and pulse data.
///
/// The data must carry the magic, version 1 and at least as many bytes as the
/// length field announces.
pub fn parse_tap(data: &[u8]) -> std::result::Result<(u32, &[u8]), TapImageFault> {
    if data.len() < TAP_HEADER_SIZE {
        return Err(TapImageFault::ShortHeader);
    }
    if &data[..TAP_MAGIC.len()] != TAP_MAGIC {
        return Err(TapImageFault::BadSignature);
    }
    let version = data[TAP_MAGIC.len()];
    if version != TAP_VERSION {
        return Err(TapImageFault::UnsupportedVersion(version));
    }

    let len_bytes = &data[TAP_DATA_LENGTH_OFFSET..TAP_HEADER_SIZE];
    let data_len = u32::from_le_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]);

    let body = &data[TAP_HEADER_SIZE..];
    if body.len() < data_len as usize {
        return Err(TapImageFault::Truncated);
    }

    Ok((data_len, &body[..data_len as usize]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let mut out = Vec::new();
        write_tap_header(&mut out, 0x0001_0203).unwrap();

        assert_eq!(out.len(), TAP_HEADER_SIZE);
        assert_eq!(&out[..12], b"C64-TAPE-RAW");
        assert_eq!(out[12], 1);
        assert_eq!(&out[13..16], &[0, 0, 0]);
        assert_eq!(&out[16..20], &[0x03, 0x02, 0x01, 0x00]);
    }

    #[test]
    fn test_parse_roundtrip() {
        let mut image = Vec::new();
        write_tap_header(&mut image, 3).unwrap();
        image.extend_from_slice(&[0x2f, 0x42, 0x56]);

        let (len, body) = parse_tap(&image).unwrap();
        assert_eq!(len, 3);
        assert_eq!(body, &[0x2f, 0x42, 0x56]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_tap(b"C64"), Err(TapImageFault::ShortHeader));
        assert_eq!(
            parse_tap(b"C64-TAPE-RAX\x01\0\0\0\0\0\0\0"),
            Err(TapImageFault::BadSignature)
        );
        assert_eq!(
            parse_tap(b"C64-TAPE-RAW\x02\0\0\0\0\0\0\0"),
            Err(TapImageFault::UnsupportedVersion(2))
        );

        let mut image = Vec::new();
        write_tap_header(&mut image, 10).unwrap();
        image.push(0x2f);
        assert_eq!(parse_tap(&image), Err(TapImageFault::Truncated));
    }
}
