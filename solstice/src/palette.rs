use log::info;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::Error;

pub const PALETTE_ENTRIES: usize = 64;
pub const PALETTE_FILE_SIZE: usize = PALETTE_ENTRIES * 3;
pub const PALETTE_EXTENSION: &str = "pal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color { r: r, g: g, b: b }
}

const SILVER: Color = rgb(0xc0, 0xc0, 0xc0);

// Hand-matched approximations of the cartridge's colors, used when there is
// no palette file. Room palettes and sprite colors were matched separately.
const BUILTIN_BACKGROUND: &[(u8, Color)] = &[
    (4, rgb(0x8b, 0x00, 0x8b)),
    (7, rgb(0x74, 0x54, 0x20)),
    (9, rgb(0x00, 0x10, 0x00)),
    (10, rgb(0x00, 0x24, 0x00)),
    (11, rgb(0x0d, 0x35, 0x2a)),
    (12, rgb(0x0d, 0x22, 0x35)),
    (17, rgb(0x33, 0x55, 0xbb)),
    (18, rgb(0x33, 0x33, 0xcc)),
    (19, rgb(0x44, 0x44, 0xdd)),
    (20, rgb(0xff, 0x00, 0xff)),
    (23, rgb(0xc4, 0xa4, 0x50)),
    (24, rgb(0x9a, 0xcd, 0x32)),
    (25, rgb(0x12, 0x42, 0x00)),
    (26, rgb(0x32, 0x9a, 0x22)),
    (27, rgb(0x0d, 0x55, 0x4a)),
    (28, rgb(0x0d, 0x55, 0x6a)),
    (33, rgb(0x64, 0x95, 0xed)),
    (34, rgb(0x8d, 0xcc, 0xf0)),
    (35, rgb(0x7c, 0xdc, 0xff)),
    (36, rgb(0xff, 0x00, 0xff)),
    (39, rgb(0xc4, 0xa4, 0x50)),
    (41, rgb(0x9a, 0xaa, 0x35)),
    (42, rgb(0x3a, 0x90, 0x28)),
    (43, rgb(0xfa, 0xfa, 0xd2)),
    (49, rgb(0xd3, 0xd3, 0xd3)),
];

const BUILTIN_FOREGROUND: &[(u8, Color)] = &[
    (6, rgb(0x8b, 0x00, 0x00)),
    (7, rgb(0xdc, 0x14, 0x3c)),
    (17, rgb(0x87, 0xce, 0xeb)),
    (18, rgb(0x19, 0x19, 0x70)),
    (19, rgb(0x80, 0x00, 0x80)),
    (20, rgb(0xff, 0x00, 0xff)),
    (21, rgb(0xff, 0x69, 0xb4)),
    (22, rgb(0xff, 0x00, 0x00)),
    (23, rgb(0xf4, 0xa4, 0x60)),
    (24, rgb(0xff, 0x8c, 0x00)),
    (25, rgb(0xb8, 0x86, 0x0b)),
    (26, rgb(0x32, 0xcd, 0x32)),
    (27, rgb(0x22, 0x8b, 0x22)),
    (28, rgb(0x00, 0x00, 0xff)),
    (33, rgb(0xad, 0xff, 0x2f)),
    (35, rgb(0xb8, 0x86, 0x0b)),
    (36, rgb(0xff, 0x00, 0xff)),
    (37, rgb(0xff, 0x69, 0xb4)),
    (38, rgb(0xfa, 0x80, 0x72)),
    (39, rgb(0xf0, 0xff, 0xf0)),
    (40, rgb(0xda, 0xa5, 0x20)),
    (43, rgb(0x90, 0xee, 0x90)),
    (44, rgb(0x2e, 0x8b, 0x57)),
];

fn build_table(entries: &[(u8, Color)]) -> Vec<Color> {
    let mut colors = vec![SILVER; PALETTE_ENTRIES];
    for &(i, c) in entries {
        colors[i as usize] = c;
    }
    colors
}

/// Maps the palette indices stored in rooms and entities to colors.
///
/// Room palette bytes index the background table, entity colors index the
/// foreground table. A palette read from a file uses one table for both.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    background: Vec<Color>,
    foreground: Vec<Color>,
}

impl Palette {
    pub fn builtin() -> Palette {
        Palette {
            background: build_table(BUILTIN_BACKGROUND),
            foreground: build_table(BUILTIN_FOREGROUND),
        }
    }

    /// Parses 64 consecutive RGB triples.
    pub fn from_bytes(data: &[u8]) -> Result<Palette, Error> {
        if data.len() != PALETTE_FILE_SIZE {
            return Err(Error::InvalidPalette { len: data.len() });
        }
        let colors: Vec<Color> = data.chunks(3).map(|c| rgb(c[0], c[1], c[2])).collect();
        Ok(Palette {
            background: colors.clone(),
            foreground: colors,
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Palette, Error> {
        Palette::from_bytes(&fs::read(path)?)
    }

    /// The palette file next to a ROM: same name, `.pal` extension.
    pub fn sibling_path<P: AsRef<Path>>(rom_path: P) -> PathBuf {
        rom_path.as_ref().with_extension(PALETTE_EXTENSION)
    }

    /// Loads the ROM's sibling palette file, falling back to the builtin
    /// table when there is none.
    pub fn for_rom<P: AsRef<Path>>(rom_path: P) -> Result<Palette, Error> {
        let path = Palette::sibling_path(rom_path);
        if path.is_file() {
            info!("using palette {}", path.display());
            Palette::load(&path)
        } else {
            info!("no palette at {}, using builtin colors", path.display());
            Ok(Palette::builtin())
        }
    }

    pub fn background(&self, index: u8) -> Color {
        self.background[index as usize % PALETTE_ENTRIES]
    }

    pub fn foreground(&self, index: u8) -> Color {
        self.foreground[index as usize % PALETTE_ENTRIES]
    }
}

impl Default for Palette {
    fn default() -> Palette {
        Palette::builtin()
    }
}
