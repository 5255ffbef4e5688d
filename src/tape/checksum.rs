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

//! XOR checksum shared by the CBM blocks and the turbo payload.

use crate::error::{Result, TapeError};

/// XOR all bytes of `buf` from `start` to the end.
///
/// Fails if `start` is not a valid index into `buf`.
pub fn xor_checksum(buf: &[u8], start: usize) -> Result<u8> {
    if start >= buf.len() {
        return Err(TapeError::InvalidArgument(format!(
            "checksum start index {} is outside a buffer of {} bytes",
            start,
            buf.len()
        )));
    }

    Ok(buf[start..].iter().fold(0, |acc, &b| acc ^ b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_skips_prefix() {
        let buf = [0x3c, 0x03, 0x01, 0x02, 0x04];
        assert_eq!(xor_checksum(&buf, 2).unwrap(), 0x07);
        assert_eq!(xor_checksum(&buf, 4).unwrap(), 0x04);
    }

    #[test]
    fn test_checksum_out_of_range() {
        let buf = [0x01, 0x02];
        assert!(matches!(
            xor_checksum(&buf, 2),
            Err(TapeError::InvalidArgument(_))
        ));
        assert!(xor_checksum(&[], 0).is_err());
    }

    #[test]
    fn test_checksum_cancels_itself() {
        let buf = [0xa9, 0x00, 0x8d, 0x20, 0xd0, 0x60];
        let sum = xor_checksum(&buf, 0).unwrap();
        let mut with_sum = buf.to_vec();
        with_sum.push(sum);
        assert_eq!(xor_checksum(&with_sum, 0).unwrap(), 0);
    }
}
