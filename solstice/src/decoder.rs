use super::exits::{read_exits, Direction, Exits, RoomExit};
use super::room::{
    BlockFunctionalType, Code, DynamicBlock, FloorCosmeticType, FloorLayer, Room, StaticBlock,
    StaticEntity, WallType,
};
use super::rommap::{ROOM_RECORD_MAX, SENTINEL_ROOM};
use super::size::room_size;
use super::util::RomReader;
use super::visibility::{unpack_floor_mask, Grid, FLOOR_MASK_SIZE};
use super::{Error, RoomIndex};

// Opaque tile reference data trailing some block records.
const STATIC_BLOCK_EXTRA_SIZE: usize = 12;
const DYNAMIC_BLOCK_EXTRA_SIZE: usize = 12;
const VANISHING_BLOCK_EXTRA_SIZE: usize = 36;

/// Decodes room `number`, or builds the sentinel room for 254.
pub fn decode_room(image: &[u8], index: &RoomIndex, number: usize) -> Result<Room, Error> {
    if number == SENTINEL_ROOM {
        return Ok(sentinel_room());
    }
    let offset = index.offset(number)?;
    let mut r = RomReader::new(image, offset, ROOM_RECORD_MAX)?;
    read_room(&mut r, number)
}

/// The end room has no record in the cartridge.
pub fn sentinel_room() -> Room {
    let floor = FloorLayer {
        cosmetic: Code::Known(FloorCosmeticType::ForestDirt),
        behavior: 0,
    };
    let mut exits = Exits::default();
    exits.set(Direction::SE, RoomExit::new(243, 0, 0));

    Room {
        number: SENTINEL_ROOM,
        palette: [43, 9, 17],
        width: 7,
        height: 7,
        floor_visible: Grid::new(7, 7, true),
        render_floor: Grid::new(7, 7, true),
        window_mask_nw: 0,
        window_mask_ne: 0,
        wall_nw: Code::Known(WallType::Logs4),
        wall_ne: Code::Known(WallType::Logs4),
        floor1: floor,
        floor2: floor,
        exits: exits,
        entities: Vec::new(),
        static_blocks: Vec::new(),
        dynamic_blocks: Vec::new(),
    }
}

fn read_room(r: &mut RomReader, number: usize) -> Result<Room, Error> {
    let palette: [u8; 3] = r.read_array()?;
    let (width, height) = room_size(r.read_byte()?);

    let entities = read_entities(r)?;

    let window_mask_nw = r.read_byte()?;
    let window_mask_ne = r.read_byte()?;

    // Wall bytes: |7 6 5 4|3 2 1|0|, type in bits 4..1.
    let wall_nw = Code::from_byte((r.read_byte()? >> 1) & 0xf);
    let wall_ne = Code::from_byte((r.read_byte()? >> 1) & 0xf);

    let floor1 = FloorLayer::from_byte(r.read_byte()?);
    let floor2 = FloorLayer::from_byte(r.read_byte()?);

    let floor_mask: [u8; FLOOR_MASK_SIZE] = r.read_array()?;
    let floor_visible = unpack_floor_mask(&floor_mask, width, height);
    let mut render_floor = Grid::new(width, height, true);

    let exits = read_exits(r)?;

    let static_blocks = read_static_blocks(r, &mut render_floor)?;
    let dynamic_blocks = read_dynamic_blocks(r, &mut render_floor)?;

    Ok(Room {
        number: number,
        palette: palette,
        width: width,
        height: height,
        floor_visible: floor_visible,
        render_floor: render_floor,
        window_mask_nw: window_mask_nw,
        window_mask_ne: window_mask_ne,
        wall_nw: wall_nw,
        wall_ne: wall_ne,
        floor1: floor1,
        floor2: floor2,
        exits: exits,
        entities: entities,
        static_blocks: static_blocks,
        dynamic_blocks: dynamic_blocks,
    })
}

// A floor-hiding block has to sit on a cell of the room.
fn clear_floor(render_floor: &mut Grid, x: u8, y: u8) -> Result<(), Error> {
    if render_floor.set(y as usize, x as usize, false) {
        return Ok(());
    }
    let (axis, value) = if y as usize >= render_floor.height() {
        ('y', y)
    } else {
        ('x', x)
    };
    Err(Error::InvalidCoordinate {
        axis: axis,
        value: value,
    })
}

// Entity records are 5 bytes:
//   type, y << 4 | x, extra << 4 | z, color1, color2
fn read_entities(r: &mut RomReader) -> Result<Vec<StaticEntity>, Error> {
    let count = r.read_byte()?;
    let mut entities = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let k: [u8; 5] = r.read_array()?;
        entities.push(StaticEntity::new(
            Code::from_byte(k[0]),
            k[1] & 0xf,
            k[1] >> 4,
            k[2] & 0xf,
            k[2] >> 4,
            k[3],
            k[4],
        )?);
    }
    Ok(entities)
}

// Static block records are 4 bytes, followed by 12 bytes of extra data when
// the last byte is zero:
//   cosmetic, y << 4 | x, z, subtype
fn read_static_blocks(
    r: &mut RomReader,
    render_floor: &mut Grid,
) -> Result<Vec<StaticBlock>, Error> {
    let count = r.read_byte()?;
    let mut blocks = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let k: [u8; 4] = r.read_array()?;
        let block = StaticBlock::new(Code::from_byte(k[0]), k[1] & 0xf, k[1] >> 4, k[2] & 0xf)?;
        if k[3] == 0x00 {
            r.skip(STATIC_BLOCK_EXTRA_SIZE)?;
        }

        if block.occludes_floor() {
            clear_floor(render_floor, block.x(), block.y())?;
        }
        blocks.push(block);
    }
    Ok(blocks)
}

// Dynamic block records are 4 bytes, always followed by extra data:
//   cosmetic, y << 4 | x, z, functional type
fn read_dynamic_blocks(
    r: &mut RomReader,
    render_floor: &mut Grid,
) -> Result<Vec<DynamicBlock>, Error> {
    let count = r.read_byte()?;
    let mut blocks = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let k: [u8; 4] = r.read_array()?;
        let block = DynamicBlock::new(
            Code::from_byte(k[0]),
            Code::from_byte(k[3]),
            k[1] & 0xf,
            k[1] >> 4,
            k[2],
        )?;

        let extra = if block
            .functional()
            .is(BlockFunctionalType::DisappearsWhenTouched)
        {
            VANISHING_BLOCK_EXTRA_SIZE
        } else {
            DYNAMIC_BLOCK_EXTRA_SIZE
        };
        r.skip(extra)?;

        if block.occludes_floor() {
            clear_floor(render_floor, block.x(), block.y())?;
        }
        blocks.push(block);
    }
    Ok(blocks)
}
