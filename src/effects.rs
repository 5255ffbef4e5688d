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

//! Loading effects and FOUND message styling.
//!
//! A loading effect is a small 6510 routine the turbo loader calls after
//! every bit. It may use `$fc`, `$fd`, `$fe`, X and A (not Y) and must be fast.
//! Effects are selected by menu key: `0`-`9`, then `A`-`J`.

use rand::Rng;

use crate::error::TapeError;

/// A border effect routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingEffect {
    pub name: &'static str,
    pub code: &'static [u8],
}

/// All loading effects, in menu order.
pub const LOADING_EFFECTS: [LoadingEffect; 20] = [
    // inc $d020 / rts
    LoadingEffect {
        name: "Original",
        code: &[0xee, 0x20, 0xd0, 0x60],
    },
    LoadingEffect {
        name: "Original Double Height",
        code: &[0x8a, 0x49, 0x01, 0xaa, 0xf0, 0x03, 0xee, 0x20, 0xd0, 0x60],
    },
    LoadingEffect {
        name: "Freeload Style",
        code: &[
            0x8a, 0x49, 0x01, 0xaa, 0xf0, 0x14, 0xa5, 0xfd, 0xc5, 0xc2, 0xad, 0x20, 0xd0, 0xb0,
            0x06, 0x69, 0x01, 0xe6, 0xfd, 0xe6, 0xfd, 0x49, 0x05, 0x8d, 0x20, 0xd0, 0x60,
        ],
    },
    LoadingEffect {
        name: "Freeload Alt Style",
        code: &[
            0x8a, 0x49, 0x01, 0xaa, 0xf0, 0x14, 0xa5, 0xfd, 0xc5, 0xc2, 0xad, 0x20, 0xd0, 0xb0,
            0x06, 0x69, 0x01, 0xe6, 0xfd, 0xe6, 0xfd, 0x49, 0x08, 0x8d, 0x20, 0xd0, 0x60,
        ],
    },
    LoadingEffect {
        name: "Stripe Columns",
        code: &[
            0xe6, 0xfd, 0xa5, 0xfd, 0x8d, 0x20, 0xd0, 0xa9, 0x00, 0x8d, 0x20, 0xd0, 0x60,
        ],
    },
    LoadingEffect {
        name: "Medium Stripes",
        code: &[
            0xe6, 0xfd, 0xa5, 0xfd, 0xc9, 0x04, 0x90, 0x07, 0xee, 0x20, 0xd0, 0xa9, 0x00, 0x85,
            0xfd, 0x60,
        ],
    },
    LoadingEffect {
        name: "Thick Stripes (US Gold Style)",
        code: &[
            0xe6, 0xfd, 0xa5, 0xfd, 0xc9, 0x0b, 0x90, 0x07, 0xee, 0x20, 0xd0, 0xa9, 0x00, 0x85,
            0xfd, 0x60,
        ],
    },
    LoadingEffect {
        name: "Black and White",
        code: &[
            0xe6, 0xfd, 0xa5, 0xfd, 0xc9, 0x04, 0x90, 0x0b, 0xa5, 0xfe, 0x49, 0x01, 0x8d, 0x20,
            0xd0, 0x85, 0xfd, 0x85, 0xfe, 0x60,
        ],
    },
    LoadingEffect {
        name: "Jolly Stripes",
        code: &[
            0xe6, 0xfd, 0xa5, 0xfd, 0xc9, 0x04, 0x90, 0x0e, 0xad, 0x20, 0xd0, 0x69, 0x01, 0x49,
            0x05, 0x8d, 0x20, 0xd0, 0xa9, 0x00, 0x85, 0xfd, 0x60,
        ],
    },
    // Reads entropy from ($c1),y and $bd
    LoadingEffect {
        name: "Mixed-Up (Rack It Style)",
        code: &[
            0x8a, 0x49, 0x01, 0xaa, 0xf0, 0x07, 0xa5, 0xbd, 0x51, 0xc1, 0x8d, 0x20, 0xd0, 0x60,
        ],
    },
    LoadingEffect {
        name: "Hi-Tec Stripe Columns",
        code: &[
            0x8a, 0x49, 0x01, 0xaa, 0xf0, 0x06, 0xce, 0x20, 0xd0, 0xee, 0x20, 0xd0, 0x60,
        ],
    },
    LoadingEffect {
        name: "Black and Red Stripes",
        code: &[
            0xe6, 0xfd, 0xa5, 0xfd, 0xc9, 0x04, 0x90, 0x0b, 0xa5, 0xfe, 0x49, 0x02, 0x8d, 0x20,
            0xd0, 0x85, 0xfd, 0x85, 0xfe, 0x60,
        ],
    },
    // Also bumps the SID volume register
    LoadingEffect {
        name: "Flashing with Flatulence",
        code: &[
            0xe6, 0xfd, 0xa5, 0xfd, 0xc9, 0x03, 0x90, 0x0a, 0xee, 0x20, 0xd0, 0xee, 0x18, 0xd4,
            0xa9, 0x00, 0x85, 0xfd, 0x60,
        ],
    },
    LoadingEffect {
        name: "Titus Black and Light Blue",
        code: &[
            0x8a, 0x49, 0x01, 0xaa, 0xf0, 0x0a, 0xa9, 0x0e, 0x8d, 0x20, 0xd0, 0xa9, 0x00, 0x8d,
            0x20, 0xd0, 0x60,
        ],
    },
    LoadingEffect {
        name: "Cruncher AB Depack FX",
        code: &[
            0xe6, 0xfd, 0xa5, 0xfd, 0xc9, 0x04, 0x90, 0x0d, 0xe6, 0xfe, 0xa5, 0xfe, 0x29, 0x05,
            0x8d, 0x20, 0xd0, 0xa9, 0x00, 0x85, 0xfd, 0x60,
        ],
    },
    LoadingEffect {
        name: "Gremlin Style (Alt. World Games)",
        code: &[
            0x8a, 0x49, 0x01, 0xaa, 0xf0, 0x14, 0xa5, 0xfd, 0xc5, 0xc2, 0xad, 0x20, 0xd0, 0xb0,
            0x06, 0x69, 0x01, 0xe6, 0xfd, 0xe6, 0xfd, 0x49, 0x0f, 0x8d, 0x20, 0xd0, 0x60,
        ],
    },
    LoadingEffect {
        name: "Firebird Black and Blue (Black Lamp Style)",
        code: &[
            0xe6, 0xfd, 0xa5, 0xfd, 0xc9, 0x0f, 0x90, 0x0b, 0xa5, 0xfe, 0x49, 0x06, 0x8d, 0x20,
            0xd0, 0x85, 0xfd, 0x85, 0xfe, 0x60,
        ],
    },
    LoadingEffect {
        name: "Two shades of grey with noise",
        code: &[
            0x8a, 0x49, 0x01, 0xaa, 0xf0, 0x0c, 0xe6, 0xfd, 0xa5, 0xfd, 0x09, 0x0b, 0x8d, 0x20,
            0xd0, 0x8d, 0x18, 0xd4, 0x60,
        ],
    },
    LoadingEffect {
        name: "Black and White Stripe Columns",
        code: &[
            0x8a, 0x49, 0x01, 0xaa, 0xf0, 0x0a, 0xa9, 0x01, 0x8d, 0x20, 0xd0, 0xa9, 0x00, 0x8d,
            0x20, 0xd0, 0x60,
        ],
    },
    LoadingEffect {
        name: "It's a sin!",
        code: &[
            0xe6, 0xfd, 0xa5, 0xfd, 0xc9, 0x01, 0x90, 0x10, 0xad, 0x20, 0xd0, 0x49, 0x09, 0x8d,
            0x20, 0xd0, 0xad, 0x18, 0xd4, 0x49, 0x0f, 0x8d, 0x18, 0xd4, 0x60,
        ],
    },
];

/// A PETSCII colour control code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextColour {
    pub name: &'static str,
    pub code: u8,
}

/// FOUND message colours, in menu order.
pub const TEXT_COLOURS: [TextColour; 15] = [
    TextColour { name: "Black", code: 0x90 },
    TextColour { name: "White", code: 0x05 },
    TextColour { name: "Red", code: 0x1c },
    TextColour { name: "Cyan", code: 0x9f },
    TextColour { name: "Purple", code: 0x9c },
    TextColour { name: "Green", code: 0x1e },
    TextColour { name: "Yellow", code: 0x9e },
    TextColour { name: "Orange", code: 0x81 },
    TextColour { name: "Brown", code: 0x95 },
    TextColour { name: "Light Red", code: 0x96 },
    TextColour { name: "Dark Grey", code: 0x97 },
    TextColour { name: "Grey", code: 0x98 },
    TextColour { name: "Light Green", code: 0x99 },
    TextColour { name: "Light Blue", code: 0x9a },
    TextColour { name: "Light Grey", code: 0x9b },
];

/// The colour the KERNAL prints with after power-on.
pub const DEFAULT_TEXT_COLOUR: usize = 13;

/// PETSCII `CHR$(147)`, clears the screen.
pub const CHR_CLEAR_SCREEN: u8 = 0x93;

/// A fixed menu entry or a fresh random pick per program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Fixed(usize),
    Random,
}

impl Choice {
    /// Parse a menu key (`0`-`9`, `A`-`Z`) or `random`/`R` for a menu of `len` entries.
    pub fn parse(s: &str, len: usize) -> Result<Self, String> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("random") || s.eq_ignore_ascii_case("r") {
            return Ok(Choice::Random);
        }

        let index = match s.parse::<usize>() {
            Ok(n) => Some(n),
            Err(_) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphabetic() => {
                        Some(c.to_ascii_uppercase() as usize - 'A' as usize + 10)
                    }
                    _ => None,
                }
            }
        };

        match index {
            Some(i) if i < len => Ok(Choice::Fixed(i)),
            _ => Err(format!(
                "expected a menu key between 0 and {} or 'random', got '{}'",
                menu_key(len - 1),
                s
            )),
        }
    }
}

/// The menu key of an entry.
pub fn menu_key(index: usize) -> char {
    match index {
        0..=9 => (b'0' + index as u8) as char,
        _ => (b'A' + (index - 10) as u8) as char,
    }
}

/// Pick a random index below `len` that differs from `exclude`.
///
/// With fewer than two entries there is nothing else to pick, so 0 is returned.
pub fn sample_excluding<R: Rng + ?Sized>(rng: &mut R, len: usize, exclude: usize) -> usize {
    if len < 2 {
        return 0;
    }

    loop {
        let pick = rng.gen_range(0..len);
        if pick != exclude {
            return pick;
        }
    }
}

/// Hands out menu entries for a sequence of programs.
///
/// Random choices never repeat the previous pick, which starts at the first
/// entry.
#[derive(Debug, Clone)]
pub struct Picker {
    choice: Choice,
    len: usize,
    last: usize,
}

impl Picker {
    /// Create a picker over `len` entries.
    ///
    /// Fails with [`TapeError::InvalidArgument`] if a fixed entry is not below `len`.
    pub fn new(choice: Choice, len: usize) -> crate::error::Result<Self> {
        let last = match choice {
            Choice::Fixed(i) if i < len => i,
            Choice::Fixed(i) => {
                return Err(TapeError::InvalidArgument(format!(
                    "menu entry {} is out of range, there are {} entries",
                    i, len
                )));
            }
            Choice::Random => 0,
        };
        Ok(Self { choice, len, last })
    }

    /// The entry for the next program.
    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        if self.choice == Choice::Random {
            self.last = sample_excluding(rng, self.len, self.last);
        }
        self.last
    }
}

/// How the FOUND message and border look while a program loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingStyle {
    pub effect: Choice,
    pub colour: Choice,
    pub clear_screen: bool,
}

impl Default for LoadingStyle {
    fn default() -> Self {
        Self {
            effect: Choice::Fixed(0),
            colour: Choice::Fixed(DEFAULT_TEXT_COLOUR),
            clear_screen: false,
        }
    }
}

/// The style resolved for one program.
///
/// Only a [`StyleSelector`] hands these out, so the indices are always valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStyle {
    effect: usize,
    colour: usize,
    prefix: Vec<u8>,
}

impl ResolvedStyle {
    /// Menu index of the loading effect.
    pub fn effect(&self) -> usize {
        self.effect
    }

    /// Menu index of the text colour.
    pub fn colour(&self) -> usize {
        self.colour
    }

    /// Control codes put in front of the filename.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// The effect routine.
    pub fn effect_code(&self) -> &'static [u8] {
        LOADING_EFFECTS[self.effect].code
    }

    pub fn effect_name(&self) -> &'static str {
        LOADING_EFFECTS[self.effect].name
    }

    pub fn colour_name(&self) -> &'static str {
        TEXT_COLOURS[self.colour].name
    }
}

/// Resolves a [`LoadingStyle`] program by program.
#[derive(Debug, Clone)]
pub struct StyleSelector {
    style: LoadingStyle,
    effects: Picker,
    colours: Picker,
}

impl StyleSelector {
    /// Create a selector for `style`.
    pub fn new(style: LoadingStyle) -> crate::error::Result<Self> {
        Ok(Self {
            style,
            effects: Picker::new(style.effect, LOADING_EFFECTS.len())?,
            colours: Picker::new(style.colour, TEXT_COLOURS.len())?,
        })
    }

    /// The style for the next program.
    pub fn next<R: Rng + ?Sized>(&mut self, rng: &mut R) -> ResolvedStyle {
        let effect = self.effects.next(rng);
        let colour = self.colours.next(rng);

        let mut prefix = Vec::with_capacity(2);
        if self.style.clear_screen {
            prefix.push(CHR_CLEAR_SCREEN);
        }
        // The ROM already prints in light blue, so that colour takes no
        // slot and the title may use the full field width
        if colour != DEFAULT_TEXT_COLOUR {
            prefix.push(TEXT_COLOURS[colour].code);
        }

        ResolvedStyle {
            effect,
            colour,
            prefix,
        }
    }
}
