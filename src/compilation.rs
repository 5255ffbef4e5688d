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

//! Compilation cassettes.
//!
//! Programs are packed onto cassette sides of a given tape length. Bins
//! `2k` and `2k+1` become side A and B of cassette `k+1`. For each cassette
//! the per-program images are joined into one image per side and a contents
//! listing is written next to them.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::convert::TapRecord;
use crate::error::{Result, TapeError};
use crate::packing::{best_fit_decreasing, side_capacity};
use crate::tape::{parse_tap, write_tap_header, TapImageFault};

/// Files written for one cassette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cassette {
    pub name: String,
    pub side_a: PathBuf,
    /// Missing when everything fits on side A.
    pub side_b: Option<PathBuf>,
    pub contents: PathBuf,
}

/// Distribute `records` over cassettes of `minutes` length and write the
/// side images and listings into `output_dir`.
///
/// The per-program images are removed afterwards unless `keep_individual`
/// is set.
pub fn build_compilations(
    records: &[TapRecord],
    output_dir: &Path,
    minutes: u32,
    keep_individual: bool,
) -> Result<Vec<Cassette>> {
    let capacity = side_capacity(minutes);
    if capacity <= 0.0 {
        return Err(TapeError::InvalidArgument(format!(
            "a tape length of {} minutes leaves no room on either side",
            minutes
        )));
    }

    let durations: Vec<f64> = records.iter().map(|r| r.duration).collect();
    let packing = best_fit_decreasing(&durations, capacity);
    debug!(
        "{} programs packed onto {} sides of {}s",
        records.len(),
        packing.bins,
        capacity
    );

    let mut cassettes = Vec::new();
    for (k, first_side) in (0..packing.bins).step_by(2).enumerate() {
        let name = format!("C64 Compilation Cassette #{}", k + 1);

        let side_a = side_records(records, &packing.items_in(first_side));
        let side_b = side_records(records, &packing.items_in(first_side + 1));

        let side_a_path = output_dir.join(format!("{} - Side A.tap", name));
        join_taps(&side_a, &side_a_path)?;

        let side_b_path = if side_b.is_empty() {
            None
        } else {
            let path = output_dir.join(format!("{} - Side B.tap", name));
            join_taps(&side_b, &path)?;
            Some(path)
        };

        let contents_path = output_dir.join(format!("{} - Contents.txt", name));
        fs::write(&contents_path, contents_listing(&name, &side_a, &side_b))?;

        info!(
            "{}: {} programs on side A, {} on side B",
            name,
            side_a.len(),
            side_b.len()
        );

        cassettes.push(Cassette {
            name,
            side_a: side_a_path,
            side_b: side_b_path,
            contents: contents_path,
        });
    }

    if !keep_individual {
        for record in records {
            fs::remove_file(&record.path)?;
        }
    }

    Ok(cassettes)
}

/// The records of one side, sorted by title ignoring case.
fn side_records<'a>(records: &'a [TapRecord], indices: &[usize]) -> Vec<&'a TapRecord> {
    let mut side: Vec<&TapRecord> = indices.iter().map(|&i| &records[i]).collect();
    side.sort_by_key(|r| r.title.to_lowercase());
    side
}

/// Concatenate the pulse data of several images into one image at `path`.
///
/// Every source is read and checked before the target is created.
pub fn join_taps(records: &[&TapRecord], path: &Path) -> Result<u32> {
    let mut images = Vec::with_capacity(records.len());
    for record in records {
        images.push(fs::read(&record.path)?);
    }

    let mut bodies = Vec::with_capacity(images.len());
    let mut total: u32 = 0;
    for (record, image) in records.iter().zip(&images) {
        let (_, body) = parse_tap(image).map_err(|reason| TapeError::InvalidTapImage {
            path: record.path.clone(),
            reason,
        })?;

        total = u32::try_from(body.len())
            .ok()
            .and_then(|len| total.checked_add(len))
            .ok_or_else(|| TapeError::InvalidTapImage {
                path: path.to_path_buf(),
                reason: TapImageFault::TooLarge,
            })?;
        bodies.push(body);
    }

    let mut out = BufWriter::new(File::create(path)?);
    write_tap_header(&mut out, total)?;
    for body in bodies {
        out.write_all(body)?;
    }
    out.flush()?;

    Ok(total)
}

/// Render the contents listing of a cassette.
pub fn contents_listing(name: &str, side_a: &[&TapRecord], side_b: &[&TapRecord]) -> String {
    let longest = side_a
        .iter()
        .map(|r| r.title.chars().count())
        .max()
        .unwrap_or(0);
    let column = longest + 4;
    let padding = " ".repeat(column.saturating_sub(6));

    let mut out = format!("\n{}\n\n", name);
    out.push_str(&format!("Side A{}Side B\n", padding));
    out.push_str(&format!("------{}------\n\n", padding));

    for row in 0..side_a.len().max(side_b.len()) {
        let a = side_a.get(row).map(|r| r.title.as_str()).unwrap_or("");
        let b = side_b.get(row).map(|r| r.title.as_str()).unwrap_or("");
        out.push_str(&format!("{:<column$}{}\n", a, b));
    }

    out.push_str(&format!("\nLength{}Length\n", padding));
    out.push_str(&format!("------{}------\n\n", padding));
    out.push_str(&format!(
        "{} {}{}\n",
        format_mmss(total_duration(side_a)),
        padding,
        format_mmss(total_duration(side_b))
    ));

    out
}

fn total_duration(side: &[&TapRecord]) -> f64 {
    side.iter().map(|r| r.duration).sum()
}

/// Format seconds as `mm:ss`, truncating fractions. Hours wrap around.
pub fn format_mmss(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", (total / 60) % 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(title: &str, duration: f64) -> TapRecord {
        TapRecord {
            title: title.to_string(),
            path: PathBuf::from(format!("{}.tap", title)),
            data_len: 0,
            duration,
        }
    }

    #[test]
    fn test_format_mmss() {
        assert_eq!(format_mmss(0.0), "00:00");
        assert_eq!(format_mmss(59.99), "00:59");
        assert_eq!(format_mmss(125.4), "02:05");
        assert_eq!(format_mmss(3725.0), "02:05");
    }

    #[test]
    fn test_listing_layout() {
        let a = [record("Elite", 300.0), record("Paradroid", 250.5)];
        let b = [record("Uridium", 200.0)];
        let side_a: Vec<&TapRecord> = a.iter().collect();
        let side_b: Vec<&TapRecord> = b.iter().collect();

        let listing = contents_listing("C64 Compilation Cassette #1", &side_a, &side_b);
        let expected = "\n\
            C64 Compilation Cassette #1\n\
            \n\
            Side A       Side B\n\
            ------       ------\n\
            \n\
            Elite        Uridium\n\
            Paradroid    \n\
            \n\
            Length       Length\n\
            ------       ------\n\
            \n\
            09:10        03:20\n";
        assert_eq!(listing, expected);
    }

    #[test]
    fn test_listing_with_longer_side_b() {
        let a = [record("Zak", 10.0)];
        let b = [record("Ace", 10.0), record("Bmx", 10.0)];
        let side_a: Vec<&TapRecord> = a.iter().collect();
        let side_b: Vec<&TapRecord> = b.iter().collect();

        let listing = contents_listing("X", &side_a, &side_b);
        let lines: Vec<&str> = listing.lines().collect();
        // Short titles collapse the heading padding
        assert_eq!(lines[3], "Side A Side B");
        assert_eq!(lines[6], "Zak    Ace");
        assert_eq!(lines[7], "       Bmx");
    }

    #[test]
    fn test_sides_sort_ignoring_case() {
        let records = [record("beta", 1.0), record("Alpha", 1.0), record("gamma", 1.0)];
        let side = side_records(&records, &[0, 1, 2]);
        let titles: Vec<&str> = side.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = build_compilations(&[record("A", 1.0)], dir.path(), 1, true);
        assert!(matches!(result, Err(TapeError::InvalidArgument(_))));
    }
}
