pub mod decoder;
mod error;
pub mod exits;
pub mod palette;
#[cfg(feature = "render")]
pub mod render;
pub mod room;
mod rommap;
pub mod size;
mod util;
pub mod visibility;

use log::debug;
use std::fs;
use std::path::Path;

pub use error::Error;
pub use exits::{Direction, Exits, RoomExit};
pub use room::{
    BlockCosmeticType, BlockFunctionalType, Code, DynamicBlock, EntityType, FloorCosmeticType,
    FloorLayer, Room, StaticBlock, StaticEntity, WallSide, WallType,
};
pub use rommap::{ROOM_INDEX_COUNT, SENTINEL_ROOM};
pub use visibility::Grid;

/// Absolute image offsets of every room record, indexed by room number.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomIndex {
    offsets: Vec<usize>,
}

impl RoomIndex {
    // The table is split in two: all the low bytes, then all the high bytes.
    pub fn from_image(image: &[u8]) -> Result<RoomIndex, Error> {
        let end = rommap::ROOM_INDEX_START + rommap::ROOM_INDEX_SIZE;
        if image.len() < end {
            return Err(Error::ImageTooSmall { len: image.len() });
        }
        let lo = &image[rommap::ROOM_INDEX_START..];
        let hi = &image[rommap::ROOM_INDEX_START + ROOM_INDEX_COUNT..];

        let offsets = (0..ROOM_INDEX_COUNT)
            .map(|i| room_addr!(lo[i] as u16 | (hi[i] as u16) << 8))
            .collect();

        Ok(RoomIndex { offsets: offsets })
    }

    pub fn offset(&self, room: usize) -> Result<usize, Error> {
        self.offsets
            .get(room)
            .cloned()
            .ok_or(Error::UnknownRoomNumber(room))
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }
}

/// Room connections plus the rooms that could not be decoded.
#[derive(Debug, Default)]
pub struct ExitGraph {
    pub edges: Vec<(usize, usize)>,
    pub failures: Vec<(usize, Error)>,
}

/// A loaded cartridge image and its room index. Read-only once loaded.
#[derive(Clone)]
pub struct GameData {
    image: Vec<u8>,
    index: RoomIndex,
}

impl GameData {
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    pub fn index(&self) -> &RoomIndex {
        &self.index
    }

    pub fn room(&self, number: usize) -> Result<Room, Error> {
        decoder::decode_room(&self.image, &self.index, number)
    }

    /// Every room number that can be decoded: the indexed rooms plus the
    /// sentinel.
    pub fn room_numbers(&self) -> impl Iterator<Item = usize> {
        (0..self.index.len()).chain(std::iter::once(SENTINEL_ROOM))
    }

    pub fn rooms(&self) -> impl Iterator<Item = (usize, Result<Room, Error>)> + '_ {
        self.room_numbers().map(move |n| (n, self.room(n)))
    }

    /// All `(from, to)` room connections, in room then exit record order.
    /// Rooms that fail to decode contribute no edges and are listed in
    /// `failures`.
    pub fn exit_graph(&self) -> ExitGraph {
        let mut graph = ExitGraph::default();
        for (number, room) in self.rooms() {
            match room {
                Ok(room) => {
                    for (_, exit) in room.exits.iter() {
                        graph.edges.push((number, exit.room as usize));
                    }
                }
                Err(e) => graph.failures.push((number, e)),
            }
        }
        graph
    }
}

/// Drops the iNES header, if there is one.
pub fn strip_header(rom_data: &[u8]) -> Result<&[u8], Error> {
    if !rom_data.starts_with(&rommap::INES_MAGIC) {
        return Ok(rom_data);
    }
    if rom_data.len() < rommap::INES_HEADER_SIZE {
        return Err(Error::ImageTooSmall {
            len: rom_data.len(),
        });
    }
    debug!("stripping {} byte iNES header", rommap::INES_HEADER_SIZE);
    Ok(&rom_data[rommap::INES_HEADER_SIZE..])
}

pub fn load(rom_data: &[u8]) -> Result<GameData, Error> {
    let image = strip_header(rom_data)?.to_vec();
    let index = RoomIndex::from_image(&image)?;
    debug!(
        "loaded {} byte image with {} rooms",
        image.len(),
        index.len()
    );

    Ok(GameData {
        image: image,
        index: index,
    })
}

pub fn load_file<P: AsRef<Path>>(path: P) -> Result<GameData, Error> {
    let rom_data = fs::read(path)?;
    load(&rom_data)
}
