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

//! Pulse encoding of data bytes.
//!
//! Two schemes are supported:
//! - **Standard**: the KERNAL tape format. Every byte starts with a new-data
//!   marker, each bit is a pair of pulses (LSB first) and a check bit makes
//!   the number of 1-bits odd.
//! - **Turbo**: one pulse per bit, MSB first, no framing and no check bit.
//!   Bytes are folded into a running XOR checksum instead.
//!
//! A [`PulseEncoder`] is one encoding session: it owns the output sink, the
//! elapsed playback time and the turbo checksum of the program being written.

use std::io::{self, Read, Write};

/// Short pulse (bit pair half, pilot tone).
pub const SHORT_PULSE: u8 = 0x2f;

/// Medium pulse (bit pair half).
pub const MEDIUM_PULSE: u8 = 0x42;

/// Long pulse (byte and end-of-data markers).
pub const LONG_PULSE: u8 = 0x56;

/// Turbo pulse for a 0 bit.
pub const TURBO_OFF_PULSE: u8 = 0x15;

/// Turbo pulse for a 1 bit.
pub const TURBO_ON_PULSE: u8 = 0x2a;

/// CPU clock of a PAL C64 (VIC-II colour clock 17.734475 MHz / 18).
pub const PAL_CLOCK_HZ: f64 = 985_248.0;

/// Largest pause that fits the 24-bit pause field.
pub const MAX_PAUSE_CYCLES: u32 = 0x00ff_ffff;

/// The bit encoding used for a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeMode {
    /// KERNAL encoding with byte marker and check bit.
    Standard,
    /// One pulse per bit, MSB first.
    Turbo,
}

/// Playback time of one pulse byte in seconds.
pub fn pulse_seconds(pulse: u8) -> f64 {
    (pulse as f64 * 8.0) / PAL_CLOCK_HZ
}

/// Playback time of a number of CPU cycles in seconds.
pub fn cycles_seconds(cycles: u32) -> f64 {
    cycles as f64 / PAL_CLOCK_HZ
}

/// An encoding session writing pulses to `W`.
pub struct PulseEncoder<W> {
    out: W,
    elapsed: f64,
    turbo_checksum: u8,
}

impl<W: Write> PulseEncoder<W> {
    /// Start a session with zero elapsed time and a zero turbo checksum.
    pub fn new(out: W) -> Self {
        Self {
            out,
            elapsed: 0.0,
            turbo_checksum: 0,
        }
    }

    /// Encode one data byte.
    pub fn encode_byte(&mut self, value: u8, mode: EncodeMode) -> io::Result<()> {
        match mode {
            EncodeMode::Standard => self.encode_standard(value),
            EncodeMode::Turbo => self.encode_turbo(value),
        }
    }

    fn encode_standard(&mut self, value: u8) -> io::Result<()> {
        self.write_pair(LONG_PULSE, MEDIUM_PULSE)?;

        let mut check_bit = true;
        for bit in 0..8 {
            let set = value & (1 << bit) != 0;
            if set {
                check_bit = !check_bit;
            }
            self.write_bit(set)?;
        }

        self.write_bit(check_bit)
    }

    fn encode_turbo(&mut self, value: u8) -> io::Result<()> {
        let mut pulses = [TURBO_OFF_PULSE; 8];
        for (i, pulse) in pulses.iter_mut().enumerate() {
            if value & (0x80 >> i) != 0 {
                *pulse = TURBO_ON_PULSE;
            }
        }

        self.out.write_all(&pulses)?;
        self.elapsed += pulses.iter().map(|&p| pulse_seconds(p)).sum::<f64>();
        self.turbo_checksum ^= value;
        Ok(())
    }

    /// Write a standard-encoding bit as a pulse pair.
    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        if bit {
            self.write_pair(MEDIUM_PULSE, SHORT_PULSE)
        } else {
            self.write_pair(SHORT_PULSE, MEDIUM_PULSE)
        }
    }

    fn write_pair(&mut self, first: u8, second: u8) -> io::Result<()> {
        self.out.write_all(&[first, second])?;
        self.elapsed += pulse_seconds(first) + pulse_seconds(second);
        Ok(())
    }

    /// Write the end-of-data marker closing a standard block.
    pub fn write_end_marker(&mut self) -> io::Result<()> {
        self.write_pair(LONG_PULSE, SHORT_PULSE)
    }

    /// Write a pilot tone or trailer of `count` short pulses.
    pub fn write_pilot(&mut self, count: usize) -> io::Result<()> {
        io::copy(
            &mut io::repeat(SHORT_PULSE).take(count as u64),
            &mut self.out,
        )?;
        self.elapsed += pulse_seconds(SHORT_PULSE) * count as f64;
        Ok(())
    }

    /// Encode the same byte `count` times.
    pub fn write_repeated(&mut self, value: u8, count: usize, mode: EncodeMode) -> io::Result<()> {
        for _ in 0..count {
            self.encode_byte(value, mode)?;
        }
        Ok(())
    }

    /// Encode `buf[start..]` byte by byte. Writes nothing if `start` is past the end.
    pub fn write_range(&mut self, buf: &[u8], start: usize, mode: EncodeMode) -> io::Result<()> {
        for &b in buf.iter().skip(start) {
            self.encode_byte(b, mode)?;
        }
        Ok(())
    }

    /// Write a pause of `cycles` CPU cycles.
    ///
    /// Uses the long pause form: a zero byte followed by the 24-bit
    /// little-endian cycle count.
    pub fn write_pause(&mut self, cycles: u32) -> io::Result<()> {
        if cycles > MAX_PAUSE_CYCLES {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("pause of {} cycles does not fit 24 bits", cycles),
            ));
        }

        let le = cycles.to_le_bytes();
        self.out.write_all(&[0x00, le[0], le[1], le[2]])?;
        self.elapsed += cycles_seconds(cycles);
        Ok(())
    }

    /// The XOR of all bytes turbo-encoded since the last reset.
    pub fn turbo_checksum(&self) -> u8 {
        self.turbo_checksum
    }

    /// Start a new turbo checksum.
    pub fn reset_turbo_checksum(&mut self) {
        self.turbo_checksum = 0;
    }

    /// Playback time of everything written in this session.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    /// Flush the sink.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Get a mutable reference to the sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// End the session and return the sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}
