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

//! Batch conversion of PRG files into tape images.
//!
//! A batch is validated as a whole before the first image is written, so a
//! single bad program leaves the output directory untouched.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::assets::LoaderAssets;
use crate::compilation::{build_compilations, Cassette};
use crate::effects::{LoadingStyle, ResolvedStyle, StyleSelector};
use crate::error::{Result, TapeError};
use crate::packing::side_capacity;
use crate::prg::PrgFile;
use crate::tape::header::FILENAME_LENGTH;
use crate::tape::{build_loader_header, write_tap};

/// Extension of the accepted input files.
const PRG_EXTENSION: &str = "prg";

/// Settings for compilation cassettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilationOptions {
    /// Tape length in minutes, both sides together.
    pub minutes: u32,
    /// Keep the per-program images next to the compilations.
    pub keep_individual: bool,
}

/// Conversion settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    pub output_dir: PathBuf,
    pub style: LoadingStyle,
    /// Seed for random effects and colours; fresh entropy if missing.
    pub seed: Option<u64>,
    pub compilation: Option<CompilationOptions>,
}

impl ConvertOptions {
    /// Options with the default style writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            style: LoadingStyle::default(),
            seed: None,
            compilation: None,
        }
    }
}

/// One written tape image.
#[derive(Debug, Clone, PartialEq)]
pub struct TapRecord {
    pub title: String,
    pub path: PathBuf,
    /// Bytes of pulse data after the TAP header.
    pub data_len: u32,
    /// Playback time in seconds.
    pub duration: f64,
}

/// Result of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub records: Vec<TapRecord>,
    pub cassettes: Vec<Cassette>,
}

/// List the programs named by `input`: the file itself, or every `*.prg`
/// in a directory sorted by name.
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(TapeError::InvalidArgument(format!(
            "{} is neither a file nor a directory",
            input.display()
        )));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(input)? {
        let path = entry?.path();
        let is_prg = path
            .extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(PRG_EXTENSION))
            .unwrap_or(false);
        if is_prg && path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(TapeError::InvalidArgument(format!(
            "{} does not contain any PRG files",
            input.display()
        )));
    }

    files.sort();
    Ok(files)
}

/// Where images go when no output directory is given: `<file>-TAP` for a
/// single program, `<dir>-TAPs` next to a directory.
pub fn default_output_dir(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string());

    if input.is_dir() {
        let parent = input.parent().unwrap_or_else(|| Path::new("."));
        parent.join(format!("{}-TAPs", name))
    } else {
        input.with_file_name(format!("{}-TAP", name))
    }
}

/// Convert every program named by `input`.
pub fn convert_path(
    input: &Path,
    assets: &LoaderAssets,
    options: &ConvertOptions,
) -> Result<Conversion> {
    let programs = collect_inputs(input)?
        .iter()
        .map(|path| PrgFile::read(path))
        .collect::<Result<Vec<_>>>()?;

    convert_programs(&programs, assets, options)
}

/// Convert `programs`, drawing random choices from the configured seed.
pub fn convert_programs(
    programs: &[PrgFile],
    assets: &LoaderAssets,
    options: &ConvertOptions,
) -> Result<Conversion> {
    let mut rng = match options.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    convert_with_rng(programs, assets, options, &mut rng)
}

/// Convert `programs` using `rng` for random effects and colours.
pub fn convert_with_rng<R: Rng + ?Sized>(
    programs: &[PrgFile],
    assets: &LoaderAssets,
    options: &ConvertOptions,
    rng: &mut R,
) -> Result<Conversion> {
    if let Some(compilation) = options.compilation {
        if side_capacity(compilation.minutes) <= 0.0 {
            return Err(TapeError::InvalidArgument(format!(
                "a tape length of {} minutes leaves no room on either side",
                compilation.minutes
            )));
        }
    }
    let mut selector = StyleSelector::new(options.style)?;
    let targets = plan_outputs(programs, &options.output_dir)?;

    fs::create_dir_all(&options.output_dir)?;

    let mut records = Vec::with_capacity(programs.len());

    for (prg, path) in programs.iter().zip(targets) {
        let style = selector.next(rng);
        let header = personalise_header(&assets.header, prg, &style)?;

        let summary = write_tap(&path, prg.name(), &header, &assets.boot, prg.data())?;
        info!(
            "{} -> {} (effect '{}', colour '{}', {:.1}s)",
            prg.name(),
            path.display(),
            style.effect_name(),
            style.colour_name(),
            summary.duration
        );

        records.push(TapRecord {
            title: prg.title().to_string(),
            path,
            data_len: summary.data_len,
            duration: summary.duration,
        });
    }

    let cassettes = match options.compilation {
        Some(compilation) => build_compilations(
            &records,
            &options.output_dir,
            compilation.minutes,
            compilation.keep_individual,
        )?,
        None => Vec::new(),
    };

    Ok(Conversion { records, cassettes })
}

/// Put the styled title and loading effect of `prg` into the header template.
///
/// The title is cut to whatever the control prefix leaves of the filename field.
fn personalise_header(template: &[u8], prg: &PrgFile, style: &ResolvedStyle) -> Result<Vec<u8>> {
    let mut filename = style.prefix().to_vec();
    filename.extend(prg.display_name(FILENAME_LENGTH - style.prefix().len()));
    build_loader_header(template, &filename, style.effect_code())
}

/// Validate every program and map it to its image path.
///
/// Paths are compared ignoring case, as on the file systems the images
/// usually end up on.
fn plan_outputs(programs: &[PrgFile], output_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut targets = Vec::with_capacity(programs.len());

    for prg in programs {
        let sys = prg.validate()?;
        debug!(
            "{}: loads at ${:04x}, SYS {}",
            prg.name(),
            prg.load_address(),
            sys
        );

        let path = output_dir.join(format!("{}.tap", prg.title()));
        let key = path.to_string_lossy().to_lowercase();
        if seen.insert(key, prg.name()).is_some() {
            return Err(TapeError::DuplicateOutput {
                name: prg.name().to_string(),
                path,
            });
        }
        targets.push(path);
    }

    Ok(targets)
}
