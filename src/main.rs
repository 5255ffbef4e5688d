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

//! TurboTap64 CLI
//!
//! Builds turbo-loading cassette images from crunched C64 programs.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use turbotap64::assets::{executable_dir, LoaderAssets, BOOT_FILE_NAME, HEADER_FILE_NAME};
use turbotap64::compilation::format_mmss;
use turbotap64::convert::{self, CompilationOptions, ConvertOptions};
use turbotap64::effects::{menu_key, Choice, LoadingStyle, LOADING_EFFECTS, TEXT_COLOURS};
use turbotap64::error::format_error;

/// TurboTap64 - Turbo-loading C64 cassette images
#[derive(Parser, Debug)]
#[command(name = "turbotap64")]
#[command(author = "Marcel Joachim Kloubert <marcel@kloubert.dev>")]
#[command(version)]
#[command(about = "Builds turbo-loading C64 cassette images (TAP) from crunched PRG files")]
#[command(long_about = r#"
TurboTap64 writes a TAP image for every crunched PRG file. Each image
starts with a small turbo loader that shows the program name and a
loading effect while the program loads about ten times faster than
with the standard KERNAL routines.

The crunched PRG files need a BASIC SYS line at $0801 to run the
program (e.g. crunched with Exomizer), and must fit into the address
range $0400 - $cfff.

Example usage:
  turbotap64 game.prg
  turbotap64 games/ --effect random --colour random --clear-screen
  turbotap64 games/ --compilation 90 -o tapes/

Use --list to show the available loading effects and colours.
"#)]
struct Cli {
    /// A PRG file or a directory of PRG files
    #[arg(required_unless_present = "list")]
    input: Option<PathBuf>,

    /// Output directory (default: <file>-TAP or <dir>-TAPs)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory holding loader-header.prg and loader-boot.prg (default: next to the executable)
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Loader header stage, overrides --assets
    #[arg(long)]
    header: Option<PathBuf>,

    /// Loader boot stage, overrides --assets
    #[arg(long)]
    boot: Option<PathBuf>,

    /// Loading effect: menu key 0-9 / A-J, or 'random' for a different one per program
    #[arg(short, long, default_value = "0", value_parser = parse_effect)]
    effect: Choice,

    /// FOUND message colour: menu key 0-9 / A-E, or 'random'
    #[arg(short, long, default_value = "D", value_parser = parse_colour)]
    colour: Choice,

    /// Clear the screen before the FOUND message
    #[arg(long)]
    clear_screen: bool,

    /// Also build compilation cassettes of this length in minutes (e.g. 90 for a C90)
    #[arg(long, value_name = "MINUTES")]
    compilation: Option<u32>,

    /// Keep the individual TAP files next to the compilations
    #[arg(long, requires = "compilation")]
    keep_individual: bool,

    /// Seed for random effects and colours
    #[arg(long)]
    seed: Option<u64>,

    /// List loading effects and colours
    #[arg(long)]
    list: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_effect(s: &str) -> Result<Choice, String> {
    Choice::parse(s, LOADING_EFFECTS.len())
}

fn parse_colour(s: &str) -> Result<Choice, String> {
    Choice::parse(s, TEXT_COLOURS.len())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    if let Err(e) = simple_logger::SimpleLogger::new().with_level(level).init() {
        eprintln!("Warning: Cannot initialize logging: {}", e);
    }

    if cli.list {
        print_menus();
        return ExitCode::SUCCESS;
    }

    let input = match &cli.input {
        Some(input) => input.clone(),
        None => {
            eprintln!("Error: An input file or directory is required.");
            return ExitCode::from(2);
        }
    };

    let assets_dir = match &cli.assets {
        Some(dir) => dir.clone(),
        None => match executable_dir() {
            Ok(dir) => dir,
            Err(e) => {
                eprint!("{}", format_error(&e));
                return ExitCode::from(3);
            }
        },
    };
    let header_path = cli
        .header
        .clone()
        .unwrap_or_else(|| assets_dir.join(HEADER_FILE_NAME));
    let boot_path = cli
        .boot
        .clone()
        .unwrap_or_else(|| assets_dir.join(BOOT_FILE_NAME));

    let assets = match LoaderAssets::load(&header_path, &boot_path) {
        Ok(assets) => assets,
        Err(e) => {
            eprint!("{}", format_error(&e));
            return ExitCode::from(3);
        }
    };

    let options = ConvertOptions {
        output_dir: cli
            .output
            .clone()
            .unwrap_or_else(|| convert::default_output_dir(&input)),
        style: LoadingStyle {
            effect: cli.effect,
            colour: cli.colour,
            clear_screen: cli.clear_screen,
        },
        seed: cli.seed,
        compilation: cli.compilation.map(|minutes| CompilationOptions {
            minutes,
            keep_individual: cli.keep_individual,
        }),
    };

    if cli.verbose {
        println!("{} v{}", turbotap64::NAME, turbotap64::VERSION);
        println!("Input: {}", input.display());
        println!("Output: {}", options.output_dir.display());
        println!("Loader: {}, {}", header_path.display(), boot_path.display());
        println!();
    }

    let conversion = match convert::convert_path(&input, &assets, &options) {
        Ok(conversion) => conversion,
        Err(e) => {
            eprint!("{}", format_error(&e));
            return ExitCode::from(1);
        }
    };

    for record in &conversion.records {
        println!("Converted {}", record.title);
        println!("  Running length: {}", format_mmss(record.duration));
    }

    for cassette in &conversion.cassettes {
        println!("Built {}", cassette.name);
        if cli.verbose {
            println!("  Side A: {}", cassette.side_a.display());
            if let Some(side_b) = &cassette.side_b {
                println!("  Side B: {}", side_b.display());
            }
            println!("  Contents: {}", cassette.contents.display());
        }
    }

    let sides: usize = conversion
        .cassettes
        .iter()
        .map(|c| 1 + usize::from(c.side_b.is_some()))
        .sum();
    let individual = match options.compilation {
        Some(compilation) if !compilation.keep_individual => 0,
        _ => conversion.records.len(),
    };
    println!(
        "Wrote {} TAP file(s) to {}",
        individual + sides,
        options.output_dir.display()
    );

    ExitCode::SUCCESS
}

/// Print the effect and colour menus with their keys.
fn print_menus() {
    println!("Loading effects:");
    for (i, effect) in LOADING_EFFECTS.iter().enumerate() {
        println!("  {} - {}", menu_key(i), effect.name);
    }

    println!();
    println!("Colours:");
    for (i, colour) in TEXT_COLOURS.iter().enumerate() {
        println!("  {} - {}", menu_key(i), colour.name);
    }
}
