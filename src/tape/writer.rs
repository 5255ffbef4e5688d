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

//! TAP image writer for one program.
//!
//! The image holds, in order:
//! 1. The loader header block (long pilot) and its repeat
//! 2. A gap
//! 3. The boot block (short pilot) and its repeat
//! 4. A gap
//! 5. The turbo sync sequence, sub-header, program and checksum
//! 6. The end pause

use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use log::debug;

use super::checksum::xor_checksum;
use super::pulse::{EncodeMode, PulseEncoder};
use super::{write_tap_header, TAP_DATA_LENGTH_OFFSET, TAP_HEADER_SIZE};
use crate::error::Result;
use crate::prg::load_range;

/// Pilot length of the loader header block.
pub const HEADER_PILOT_PULSES: usize = 0x6a00;

/// Pilot length of the boot block.
pub const BOOT_PILOT_PULSES: usize = 0x1500;

/// Trailer after the first copy of a block.
pub const TRAILER_PULSES: usize = 0x4f;

/// Trailer after the repeated copy of a block.
pub const REPEAT_TRAILER_PULSES: usize = 0x4e;

/// Sync chain in front of the first copy of a block.
pub const SYNC_CHAIN: [u8; 9] = [0x89, 0x88, 0x87, 0x86, 0x85, 0x84, 0x83, 0x82, 0x81];

/// Sync chain in front of the repeated copy of a block.
pub const SYNC_REPEAT_CHAIN: [u8; 9] = [0x09, 0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01];

/// Gap between blocks, roughly 330ms.
pub const GAP_PAUSE_CYCLES: u32 = 0x50000;

/// Silence at the end of the image, roughly 5s.
pub const END_PAUSE_CYCLES: u32 = 0x4b2b20;

/// Turbo sync byte and its repeat count.
pub const TURBO_SYNC_BYTE: u8 = 0x40;
pub const TURBO_SYNC_COUNT: usize = 0x40;

/// Byte ending the turbo sync sequence.
pub const TURBO_START_BYTE: u8 = 0x5a;

/// Outcome of writing one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapSummary {
    /// Bytes of pulse data after the TAP header.
    pub data_len: u32,
    /// Playback time in seconds.
    pub duration: f64,
}

/// Writes complete TAP images into a seekable sink.
pub struct TapWriter<W> {
    out: W,
}

impl<W: Write + Seek> TapWriter<W> {
    /// Create a writer. Images start at the current position of `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write the image for `program`.
    ///
    /// `loader_header` is the personalised header block and `boot` the boot
    /// block, both including their 2-byte load address. `program` is the
    /// complete PRG. `name` is used for error reporting only.
    ///
    /// The load range is checked before anything is written.
    pub fn write_program(
        &mut self,
        name: &str,
        loader_header: &[u8],
        boot: &[u8],
        program: &[u8],
    ) -> Result<TapSummary> {
        let (load_address, end_address) = load_range(name, program)?;
        let header_checksum = xor_checksum(loader_header, 2)?;
        let boot_checksum = xor_checksum(boot, 2)?;

        let start = self.out.stream_position()?;
        write_tap_header(&mut self.out, 0)?;

        let mut enc = PulseEncoder::new(&mut self.out);

        write_block(&mut enc, HEADER_PILOT_PULSES, loader_header, header_checksum)?;
        enc.write_pause(GAP_PAUSE_CYCLES)?;

        write_block(&mut enc, BOOT_PILOT_PULSES, boot, boot_checksum)?;
        enc.write_pause(GAP_PAUSE_CYCLES)?;

        enc.write_repeated(TURBO_SYNC_BYTE, TURBO_SYNC_COUNT, EncodeMode::Turbo)?;
        enc.encode_byte(TURBO_START_BYTE, EncodeMode::Turbo)?;

        let mut sub_header = [0u8; 4];
        sub_header[..2].copy_from_slice(&load_address.to_le_bytes());
        sub_header[2..].copy_from_slice(&end_address.to_le_bytes());
        enc.write_range(&sub_header, 0, EncodeMode::Turbo)?;

        // Only the program bytes are covered by the turbo checksum
        enc.reset_turbo_checksum();
        enc.write_range(program, 2, EncodeMode::Turbo)?;
        let checksum = enc.turbo_checksum();
        enc.encode_byte(checksum, EncodeMode::Turbo)?;

        enc.write_pause(END_PAUSE_CYCLES)?;

        let duration = enc.elapsed_seconds();
        drop(enc);

        let end = self.out.stream_position()?;
        let data_len = u32::try_from(end - start - TAP_HEADER_SIZE as u64)
            .map_err(|_| io::Error::other("TAP image exceeds 4 GiB"))?;

        self.out
            .seek(SeekFrom::Start(start + TAP_DATA_LENGTH_OFFSET as u64))?;
        self.out.write_all(&data_len.to_le_bytes())?;
        self.out.seek(SeekFrom::Start(end))?;
        self.out.flush()?;

        debug!(
            "{}: ${:04x}-${:04x}, turbo checksum ${:02x}, {} pulse bytes, {:.2}s",
            name, load_address, end_address, checksum, data_len, duration
        );

        Ok(TapSummary { data_len, duration })
    }

    /// Get the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Write a standard block followed by its repeat.
fn write_block<W: Write>(
    enc: &mut PulseEncoder<W>,
    pilot: usize,
    payload: &[u8],
    checksum: u8,
) -> io::Result<()> {
    enc.write_pilot(pilot)?;

    for (sync, trailer) in [
        (&SYNC_CHAIN, TRAILER_PULSES),
        (&SYNC_REPEAT_CHAIN, REPEAT_TRAILER_PULSES),
    ] {
        enc.write_range(sync, 0, EncodeMode::Standard)?;
        enc.write_range(payload, 2, EncodeMode::Standard)?;
        enc.encode_byte(checksum, EncodeMode::Standard)?;
        enc.write_end_marker()?;
        enc.write_pilot(trailer)?;
    }

    Ok(())
}

/// Write the TAP image for `program` to `path`.
///
/// Nothing is created if the program or either block fails validation.
pub fn write_tap(
    path: &Path,
    name: &str,
    loader_header: &[u8],
    boot: &[u8],
    program: &[u8],
) -> Result<TapSummary> {
    load_range(name, program)?;
    xor_checksum(loader_header, 2)?;
    xor_checksum(boot, 2)?;

    let file = File::create(path)?;
    let mut writer = TapWriter::new(BufWriter::new(file));
    writer.write_program(name, loader_header, boot, program)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TapeError;
    use std::io::Cursor;

    fn blob(len: usize, fill: u8) -> Vec<u8> {
        let mut data = vec![fill; len];
        data[0] = 0x3c;
        data[1] = 0x03;
        data
    }

    #[test]
    fn test_length_field_is_patched() {
        let mut writer = TapWriter::new(Cursor::new(Vec::new()));
        let summary = writer
            .write_program("T", &blob(0xc2, 0x20), &blob(0x4a, 0xea), &[0x01, 0x08, 0x00])
            .unwrap();

        let image = writer.into_inner().into_inner();
        assert_eq!(summary.data_len as usize, image.len() - TAP_HEADER_SIZE);
        assert_eq!(&image[16..20], &summary.data_len.to_le_bytes());
        assert!(summary.duration > 0.0);
    }

    #[test]
    fn test_writer_appends_after_existing_data() {
        let mut cursor = Cursor::new(vec![0xff; 5]);
        cursor.seek(SeekFrom::End(0)).unwrap();

        let mut writer = TapWriter::new(cursor);
        let summary = writer
            .write_program("T", &blob(0xc2, 0x20), &blob(0x10, 0xea), &[0x00, 0x10])
            .unwrap();

        let image = writer.into_inner().into_inner();
        assert_eq!(&image[..5], &[0xff; 5]);
        assert_eq!(&image[5..17], b"C64-TAPE-RAW");
        assert_eq!(&image[21..25], &summary.data_len.to_le_bytes());
    }

    #[test]
    fn test_rejects_low_load_address_before_writing() {
        let mut writer = TapWriter::new(Cursor::new(Vec::new()));
        let result =
            writer.write_program("LOW", &blob(0xc2, 0x20), &blob(0x10, 0xea), &[0x99, 0x03]);

        assert!(matches!(result, Err(TapeError::OutOfAddressRange { .. })));
        assert!(writer.into_inner().into_inner().is_empty());
    }

    #[test]
    fn test_block_layout() {
        let mut enc = PulseEncoder::new(Vec::new());
        write_block(&mut enc, 3, &[0x3c, 0x03, 0x00], 0x00).unwrap();
        let out = enc.into_inner();

        // pilot + 2 * (sync + payload + checksum) * 20 + 2 * end marker + trailers
        let expected = 3 + 2 * (9 + 1 + 1) * 20 + 2 * 2 + TRAILER_PULSES + REPEAT_TRAILER_PULSES;
        assert_eq!(out.len(), expected);
        assert_eq!(&out[..3], &[0x2f; 3]);
    }

    #[test]
    fn test_empty_boot_block_creates_no_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empty-boot.tap");

        let result = write_tap(&path, "T", &blob(0xc2, 0x20), &[0xbc, 0x02], &[0x01, 0x08]);

        assert!(matches!(result, Err(TapeError::InvalidArgument(_))));
        assert!(!path.exists());
    }
}
