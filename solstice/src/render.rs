use image::{Rgba, RgbaImage};

use super::palette::{Color, Palette};
use super::room::{BlockCosmeticType, Code, FloorCosmeticType, Room, WallSide};
use super::Direction;

const EXIT_COLOR: Color = Color {
    r: 0x66,
    g: 0x66,
    b: 0xf2,
};
const WALL_COLOR: Color = Color {
    r: 0x00,
    g: 0x00,
    b: 0xff,
};

// Smallest cell that still leaves room for block outlines and spikes.
pub const MIN_CELL_SIZE: u32 = 8;
// A 7x7 room at this size is already larger than most displays.
pub const MAX_CELL_SIZE: u32 = 256;

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub palette: Palette,
    /// Edge length of one tile in pixels, clamped to
    /// `MIN_CELL_SIZE..=MAX_CELL_SIZE`.
    /// Entities use half of this.
    pub cell_size: u32,
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            palette: Palette::builtin(),
            cell_size: 16,
        }
    }
}

/// Draws a top-down map of a room: far (NE) wall at the top, NW wall on the
/// left, with a half-cell border around the floor for exits and windows.
pub struct RoomRenderer {
    config: RenderConfig,
}

impl RoomRenderer {
    pub fn new(mut config: RenderConfig) -> RoomRenderer {
        config.cell_size = config.cell_size.max(MIN_CELL_SIZE).min(MAX_CELL_SIZE);
        RoomRenderer { config: config }
    }

    fn border(&self) -> u32 {
        self.config.cell_size / 2
    }

    pub fn image_size(&self, room: &Room) -> (u32, u32) {
        let cell = self.config.cell_size;
        (
            room.width as u32 * cell + 2 * self.border(),
            room.height as u32 * cell + 2 * self.border(),
        )
    }

    pub fn render(&self, room: &Room) -> RgbaImage {
        let (img_w, img_h) = self.image_size(room);
        let mut img = RgbaImage::new(img_w, img_h);
        for (_, _, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0xff]);
        }

        self.render_walls(&mut img, room);
        self.render_floor(&mut img, room);
        self.render_blocks(&mut img, room);
        self.render_entities(&mut img, room);

        img
    }

    fn cell_origin(&self, row: usize, col: usize) -> (u32, u32) {
        let cell = self.config.cell_size;
        (
            self.border() + col as u32 * cell,
            self.border() + row as u32 * cell,
        )
    }

    fn render_walls(&self, img: &mut RgbaImage, room: &Room) {
        let cell = self.config.cell_size;
        let border = self.border();
        let (img_w, img_h) = self.image_size(room);

        // Outline the room.
        fill_rect(img, 0, 0, img_w, 1, WALL_COLOR);
        fill_rect(img, 0, img_h - 1, img_w, 1, WALL_COLOR);
        fill_rect(img, 0, 0, 1, img_h, WALL_COLOR);
        fill_rect(img, img_w - 1, 0, 1, img_h, WALL_COLOR);

        let window = self.config.palette.background(room.palette[1]);
        for i in 0..room.height {
            if room.has_window(WallSide::NW, i) {
                let (_, y) = self.cell_origin(room.height - i - 1, 0);
                fill_rect(img, 0, y + cell / 4, border, cell / 2, window);
            }
        }
        for i in 0..room.width {
            if room.has_window(WallSide::NE, i) {
                let (x, _) = self.cell_origin(0, room.width - i - 1);
                fill_rect(img, x + cell / 4, 0, cell / 2, border, window);
            }
        }

        // Wall exits are placed from the near corner of their wall.
        for (dir, exit) in room.exits.iter() {
            let w = exit.w as usize;
            match dir {
                Direction::NW | Direction::SE => {
                    let row = room.height.saturating_sub(w + 2);
                    let (_, y) = self.cell_origin(row, 0);
                    let x = if dir == Direction::NW {
                        0
                    } else {
                        img_w - border
                    };
                    fill_rect(img, x, y, border, cell, EXIT_COLOR);
                }
                Direction::NE | Direction::SW => {
                    let col = (w + 1).min(room.width - 1);
                    let (x, _) = self.cell_origin(0, col);
                    let y = if dir == Direction::NE {
                        0
                    } else {
                        img_h - border
                    };
                    fill_rect(img, x, y, cell, border, EXIT_COLOR);
                }
                Direction::Floor | Direction::Ceiling => {}
            }
        }
    }

    fn render_floor(&self, img: &mut RgbaImage, room: &Room) {
        let cell = self.config.cell_size;
        let floor = self.config.palette.background(room.palette[1]);
        let spikes = self.config.palette.background(room.palette[2]);

        for row in 0..room.height {
            for col in 0..room.width {
                let layer = match room.floor_at(row, col) {
                    Some(layer) => layer,
                    None => continue,
                };
                let (x, y) = self.cell_origin(row, col);
                match layer.cosmetic {
                    Code::Known(FloorCosmeticType::Empty) => {}
                    Code::Known(FloorCosmeticType::BedOfSpikes)
                    | Code::Known(FloorCosmeticType::BedOfSpikes2) => {
                        let q = cell / 4;
                        for &(dx, dy) in [(q, q), (3 * q, q), (q, 3 * q), (3 * q, 3 * q)].iter() {
                            fill_rect(img, x + dx - q / 2, y + dy - q / 2, q, q, spikes);
                        }
                    }
                    Code::Known(FloorCosmeticType::SmallTiles) => {
                        let half = cell / 2;
                        for &(dx, dy) in [(0, 0), (half, 0), (0, half), (half, half)].iter() {
                            fill_rect(img, x + dx + 1, y + dy + 1, half - 1, half - 1, floor);
                        }
                    }
                    _ => fill_rect(img, x + 1, y + 1, cell - 1, cell - 1, floor),
                }
            }
        }
    }

    fn render_blocks(&self, img: &mut RgbaImage, room: &Room) {
        let cell = self.config.cell_size;
        let solid = self.config.palette.background(room.palette[2]);
        let light = self.config.palette.background(room.palette[0]);

        // Lower blocks first so raised ones cover them.
        let mut blocks: Vec<(u8, u8, u8, Code<BlockCosmeticType>)> = room
            .static_blocks
            .iter()
            .map(|b| (b.z(), b.y(), b.x(), b.cosmetic()))
            .chain(
                room.dynamic_blocks
                    .iter()
                    .map(|b| (b.z(), b.y(), b.x(), b.cosmetic())),
            )
            .collect();
        blocks.sort_by_key(|&(z, y, x, _)| (z, y, x));

        for &(_, y, x, cosmetic) in blocks.iter() {
            if y as usize >= room.height || x as usize >= room.width {
                continue;
            }
            let (px, py) = self.cell_origin(y as usize, x as usize);
            match cosmetic {
                Code::Known(BlockCosmeticType::TransparentOutlined) => {
                    outline_rect(img, px + 1, py + 1, cell - 2, cell - 2, light);
                }
                Code::Known(BlockCosmeticType::VerticalColumn)
                | Code::Known(BlockCosmeticType::RoundedStoneSlab) => {
                    fill_rect(img, px + 2, py + 2, cell - 4, cell - 4, light);
                }
                Code::Known(_) => {
                    fill_rect(img, px + 1, py + 1, cell - 2, cell - 2, solid);
                    outline_rect(img, px + 1, py + 1, cell - 2, cell - 2, BLACK);
                }
                Code::Unknown(_) => {
                    outline_rect(img, px + 1, py + 1, cell - 2, cell - 2, solid);
                }
            }
        }
    }

    fn render_entities(&self, img: &mut RgbaImage, room: &Room) {
        let half = self.config.cell_size / 2;
        for e in room.entities.iter() {
            let color = self.config.palette.foreground(e.color1());
            let x = self.border() + e.x() as u32 * half + half / 2;
            let y = self.border() + e.y() as u32 * half + half / 2;
            fill_rect(img, x, y, half, half, color);
            outline_rect(img, x, y, half, half, BLACK);
        }
    }
}

const BLACK: Color = Color { r: 0, g: 0, b: 0 };

// Both helpers clip to the image.
fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Color) {
    let x_end = (x + w).min(img.width());
    let y_end = (y + h).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            *img.get_pixel_mut(px, py) = Rgba([color.r, color.g, color.b, 0xff]);
        }
    }
}

fn outline_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Color) {
    if w == 0 || h == 0 {
        return;
    }
    fill_rect(img, x, y, w, 1, color);
    fill_rect(img, x, y + h - 1, w, 1, color);
    fill_rect(img, x, y, 1, h, color);
    fill_rect(img, x + w - 1, y, 1, h, color);
}
