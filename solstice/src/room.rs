use num::FromPrimitive;
use num_derive::FromPrimitive;
use serde::Serialize;
use serde_hex::{SerHex, StrictPfx};

use super::exits::{Direction, Exits, RoomExit};
use super::visibility::Grid;
use super::Error;

/// A byte from a closed enumeration. Values with no named variant are kept
/// as-is so that unnamed cartridge codes survive decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Code<T> {
    Known(T),
    Unknown(u8),
}

impl<T: FromPrimitive> Code<T> {
    pub fn from_byte(b: u8) -> Code<T> {
        match T::from_u8(b) {
            Some(v) => Code::Known(v),
            None => Code::Unknown(b),
        }
    }
}

impl<T: PartialEq> Code<T> {
    pub fn is(&self, value: T) -> bool {
        match self {
            Code::Known(v) => *v == value,
            Code::Unknown(_) => false,
        }
    }
}

impl<T> Code<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Code::Known(v) => Some(v),
            Code::Unknown(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum BlockCosmeticType {
    Solid = 0,
    VerticalColumn = 1,
    RoundedStoneSlab = 2,
    ConveyorEW = 3,
    ConveyorNS = 4,
    TransparentOutlined = 5,
    SandwichBlock = 6,
    StoneSlabHemisphereTopCap = 8,
    StoneSlabHemisphereBottomCap = 9,
    PyramidSpikes = 10,
    TeleporterTop = 15,
    TeleporterPad = 16,
}

impl BlockCosmeticType {
    /// Block shapes that fill their whole cell, hiding the floor beneath.
    pub fn occludes_floor(self) -> bool {
        match self {
            BlockCosmeticType::Solid
            | BlockCosmeticType::ConveyorEW
            | BlockCosmeticType::ConveyorNS
            | BlockCosmeticType::PyramidSpikes
            | BlockCosmeticType::SandwichBlock => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum BlockFunctionalType {
    ConveyorEW = 0,
    ConveyorNS = 1,
    DisappearsWhenTouched = 4,
    AppearsWhenTouched = 5,
    Teleport = 7,
}

#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum WallType {
    Bricks1 = 0x00,
    Bricks2 = 0x01,
    Cave1 = 0x02,
    Crates1 = 0x03,
    Bricks3 = 0x04,
    Bricks4 = 0x05,
    Fence1 = 0x06,
    Stone1 = 0x07,
    Logs1 = 0x08,
    Logs2 = 0x09,
    Logs3 = 0x0a,
    Logs4 = 0x0b,
    Trees1 = 0x0c,
    Trees2 = 0x0d,
    Trees3 = 0x0e,
    Cave2 = 0x0f,
    Cave3 = 0x10,
    Cave4 = 0x11,
    Stone2 = 0x12,
    Stone3 = 0x13,
    Fence2 = 0x14,
    Fence3 = 0x15,
    Crates2 = 0x16,
}

#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum FloorCosmeticType {
    Empty = 0x0,
    Stone = 0x1,
    SmallTiles = 0x2,
    ForestDirt = 0x3,
    Gravel = 0x4,
    BedOfSpikes = 0x5,
    BedOfSpikes2 = 0x6,
}

#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq, Serialize)]
#[repr(u8)]
pub enum EntityType {
    GruntEW = 2,
    Blob = 5,
    SolidStripedBlock = 7,
    MovingLift = 8,
    GruntNS = 14,
    GruntTurnableNS = 17,
    SlidingCrystalBall = 19,
    FloatingSpike = 24,
    SliderEW = 26,
    WalkingEyeball = 35,
    StriderNS = 40,
    SlugNS = 49,
    WalkingFootNS = 55,
    SolidCube = 129,
    Hemisphere = 130,
    TransparentCube = 131,
    ExtraLife = 203,
    Boots = 208,
    Key = 209,
    Key1 = 210,
    Key3 = 212,
    StaffPiece = 214,
    StaffPiece2 = 216,
    StaffPiece3 = 217,
    GreenPotion = 221,
    Credit = 235,
}

// Blocks live on the 8x8x8 tile grid; entities use half tiles on x/y.
pub const TILE_LIMIT: u8 = 8;
pub const HALF_TILE_LIMIT: u8 = 16;

fn check_coord(axis: char, value: u8, limit: u8) -> Result<u8, Error> {
    if value >= limit {
        return Err(Error::InvalidCoordinate {
            axis: axis,
            value: value,
        });
    }
    Ok(value)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticBlock {
    cosmetic: Code<BlockCosmeticType>,
    x: u8,
    y: u8,
    z: u8,
}

impl StaticBlock {
    pub fn new(
        cosmetic: Code<BlockCosmeticType>,
        x: u8,
        y: u8,
        z: u8,
    ) -> Result<StaticBlock, Error> {
        Ok(StaticBlock {
            cosmetic: cosmetic,
            x: check_coord('x', x, TILE_LIMIT)?,
            y: check_coord('y', y, TILE_LIMIT)?,
            z: check_coord('z', z, TILE_LIMIT)?,
        })
    }

    pub fn cosmetic(&self) -> Code<BlockCosmeticType> {
        self.cosmetic
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    pub fn z(&self) -> u8 {
        self.z
    }

    pub fn occludes_floor(&self) -> bool {
        self.z == 0 && self.cosmetic.known().map_or(false, |c| c.occludes_floor())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DynamicBlock {
    cosmetic: Code<BlockCosmeticType>,
    functional: Code<BlockFunctionalType>,
    x: u8,
    y: u8,
    z: u8,
}

impl DynamicBlock {
    pub fn new(
        cosmetic: Code<BlockCosmeticType>,
        functional: Code<BlockFunctionalType>,
        x: u8,
        y: u8,
        z: u8,
    ) -> Result<DynamicBlock, Error> {
        Ok(DynamicBlock {
            cosmetic: cosmetic,
            functional: functional,
            x: check_coord('x', x, TILE_LIMIT)?,
            y: check_coord('y', y, TILE_LIMIT)?,
            z: check_coord('z', z, TILE_LIMIT)?,
        })
    }

    pub fn cosmetic(&self) -> Code<BlockCosmeticType> {
        self.cosmetic
    }

    pub fn functional(&self) -> Code<BlockFunctionalType> {
        self.functional
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    pub fn z(&self) -> u8 {
        self.z
    }

    // Blocks that only show up once touched must not hide the floor.
    pub fn occludes_floor(&self) -> bool {
        self.z == 0
            && !self.functional.is(BlockFunctionalType::AppearsWhenTouched)
            && self.cosmetic.known().map_or(false, |c| c.occludes_floor())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticEntity {
    entity_type: Code<EntityType>,
    x: u8,
    y: u8,
    z: u8,
    extra: u8,
    color1: u8,
    color2: u8,
}

impl StaticEntity {
    /// `x` and `y` are in half tiles.
    pub fn new(
        entity_type: Code<EntityType>,
        x: u8,
        y: u8,
        z: u8,
        extra: u8,
        color1: u8,
        color2: u8,
    ) -> Result<StaticEntity, Error> {
        Ok(StaticEntity {
            entity_type: entity_type,
            x: check_coord('x', x, HALF_TILE_LIMIT)?,
            y: check_coord('y', y, HALF_TILE_LIMIT)?,
            z: check_coord('z', z, TILE_LIMIT)?,
            extra: extra,
            color1: color1,
            color2: color2,
        })
    }

    pub fn entity_type(&self) -> Code<EntityType> {
        self.entity_type
    }

    pub fn x(&self) -> u8 {
        self.x
    }

    pub fn y(&self) -> u8 {
        self.y
    }

    pub fn z(&self) -> u8 {
        self.z
    }

    pub fn extra(&self) -> u8 {
        self.extra
    }

    pub fn color1(&self) -> u8 {
        self.color1
    }

    pub fn color2(&self) -> u8 {
        self.color2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloorLayer {
    pub cosmetic: Code<FloorCosmeticType>,
    pub behavior: u8,
}

impl FloorLayer {
    // High nibble is behavior, low nibble is appearance.
    pub fn from_byte(b: u8) -> FloorLayer {
        FloorLayer {
            cosmetic: Code::from_byte(b & 0xf),
            behavior: b >> 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WallSide {
    NW,
    NE,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    pub number: usize,
    pub palette: [u8; 3],
    pub width: usize,
    pub height: usize,

    // Which floor layer shows in each cell (true = floor 1), and whether any
    // floor is drawn there at all. Both are `height` rows of `width` cells.
    pub floor_visible: Grid,
    pub render_floor: Grid,

    #[serde(with = "SerHex::<StrictPfx>")]
    pub window_mask_nw: u8,
    #[serde(with = "SerHex::<StrictPfx>")]
    pub window_mask_ne: u8,
    pub wall_nw: Code<WallType>,
    pub wall_ne: Code<WallType>,

    pub floor1: FloorLayer,
    pub floor2: FloorLayer,

    pub exits: Exits,

    pub entities: Vec<StaticEntity>,
    pub static_blocks: Vec<StaticBlock>,
    pub dynamic_blocks: Vec<DynamicBlock>,
}

impl Room {
    pub fn has_exit(&self, dir: Direction) -> bool {
        self.exits.get(dir).is_some()
    }

    pub fn exit(&self, dir: Direction) -> Option<&RoomExit> {
        self.exits.get(dir)
    }

    /// Window masks count from the far edge of the wall: bit 7 is position 0.
    pub fn has_window(&self, side: WallSide, i: usize) -> bool {
        if i >= 8 {
            return false;
        }
        let mask = match side {
            WallSide::NW => self.window_mask_nw,
            WallSide::NE => self.window_mask_ne,
        };
        mask & (0x80 >> i) != 0
    }

    /// The floor layer drawn at a cell, if any.
    ///
    /// Cells covered by a solid block draw nothing. The second layer is only
    /// drawn where it has a behavior; otherwise the cell is a hole.
    pub fn floor_at(&self, row: usize, col: usize) -> Option<&FloorLayer> {
        if !self.render_floor.get(row, col) {
            return None;
        }
        if self.floor_visible.get(row, col) {
            Some(&self.floor1)
        } else if self.floor2.behavior != 0 {
            Some(&self.floor2)
        } else {
            None
        }
    }
}
